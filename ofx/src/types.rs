use libc::{c_char, c_double, c_float, c_int, c_uint, c_void};
use ofx_sys::{OfxHost, OfxPropertySetHandle, OfxStatus};

pub type Int = c_int;
pub type UnsignedInt = c_uint;
pub type Double = c_double;
pub type Float = c_float;
pub type Bool = bool;
pub type Char = c_char;
pub type CharPtr = *const c_char;
pub type CharPtrMut = *mut c_char;
pub type Void = c_void;
pub type VoidPtr = *const c_void;
pub type VoidPtrMut = *mut c_void;
pub type Status = OfxStatus;
pub type Time = Double;
pub type SetHost = unsafe extern "C" fn(*mut OfxHost);
pub type MainEntry =
	unsafe extern "C" fn(CharPtr, VoidPtr, OfxPropertySetHandle, OfxPropertySetHandle) -> Int;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectI {
	pub x1: Int,
	pub y1: Int,
	pub x2: Int,
	pub y2: Int,
}

impl RectI {
	pub fn width(&self) -> Int {
		self.x2 - self.x1
	}

	pub fn height(&self) -> Int {
		self.y2 - self.y1
	}
}

impl From<[Int; 4]> for RectI {
	fn from(v: [Int; 4]) -> Self {
		RectI {
			x1: v[0],
			y1: v[1],
			x2: v[2],
			y2: v[3],
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RGBAColourD {
	pub r: Double,
	pub g: Double,
	pub b: Double,
	pub a: Double,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RGBColourD {
	pub r: Double,
	pub g: Double,
	pub b: Double,
}
