use crate::types::*;
use ofx_sys::*;
use std::fmt;

pub use ofx_sys::eOfxStatus_ErrBadHandle;
pub use ofx_sys::eOfxStatus_ErrBadIndex;
pub use ofx_sys::eOfxStatus_ErrExists;
pub use ofx_sys::eOfxStatus_ErrFatal;
pub use ofx_sys::eOfxStatus_ErrMissingHostFeature;
pub use ofx_sys::eOfxStatus_ErrUnknown;
pub use ofx_sys::eOfxStatus_ErrValue;
pub use ofx_sys::eOfxStatus_Failed;
pub use ofx_sys::eOfxStatus_OK;
pub use ofx_sys::eOfxStatus_ReplyDefault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	PluginNotFound,
	InvalidAction,
	InvalidImageEffectAction,
	InvalidNameEncoding,
	InvalidResultEncoding,
	PropertyIndexOutOfBounds,
	InvalidHandle,
	InvalidValue,
	InvalidSuite,
	SuiteNotInitialized,
	PluginNotReady,
	HostNotReady,
	EnumNotFound,
	InvalidInstanceData,
	AlreadyExists,
	MissingHostFeature,
	UnknownProperty,
	UnknownError,
}

pub const OK: Result<Int> = Ok(eOfxStatus_OK);
pub const REPLY_DEFAULT: Result<Int> = Ok(eOfxStatus_ReplyDefault);
pub const FAILED: Result<Int> = Ok(eOfxStatus_Failed);

impl Error {
	/// Status code reported back to the host when an action fails with this error.
	pub fn status(self) -> Int {
		match self {
			Error::InvalidHandle | Error::InvalidInstanceData => eOfxStatus_ErrBadHandle,
			Error::PropertyIndexOutOfBounds => eOfxStatus_ErrBadIndex,
			Error::InvalidValue => eOfxStatus_ErrValue,
			Error::AlreadyExists => eOfxStatus_ErrExists,
			Error::UnknownProperty => eOfxStatus_ErrUnknown,
			Error::InvalidSuite | Error::MissingHostFeature | Error::HostNotReady => {
				eOfxStatus_ErrMissingHostFeature
			}
			_ => eOfxStatus_Failed,
		}
	}
}

impl From<OfxStatus> for Error {
	fn from(status: OfxStatus) -> Error {
		match status {
			ofx_sys::eOfxStatus_ErrBadHandle => Error::InvalidHandle,
			ofx_sys::eOfxStatus_ErrBadIndex => Error::PropertyIndexOutOfBounds,
			ofx_sys::eOfxStatus_ErrValue => Error::InvalidValue,
			ofx_sys::eOfxStatus_ErrExists => Error::AlreadyExists,
			ofx_sys::eOfxStatus_ErrUnknown => Error::UnknownProperty,
			ofx_sys::eOfxStatus_ErrMissingHostFeature => Error::MissingHostFeature,
			_ => Error::UnknownError,
		}
	}
}

impl From<std::ffi::NulError> for Error {
	fn from(_src: std::ffi::NulError) -> Error {
		Error::InvalidNameEncoding
	}
}

impl From<std::ffi::IntoStringError> for Error {
	fn from(_src: std::ffi::IntoStringError) -> Error {
		Error::InvalidNameEncoding
	}
}

impl From<std::ffi::FromBytesWithNulError> for Error {
	fn from(_src: std::ffi::FromBytesWithNulError) -> Error {
		Error::InvalidNameEncoding
	}
}

impl From<std::str::Utf8Error> for Error {
	fn from(_src: std::str::Utf8Error) -> Error {
		Error::InvalidResultEncoding
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let description = match self {
			Error::PluginNotFound => "plugin not found",
			Error::InvalidAction => "invalid action",
			Error::InvalidImageEffectAction => "invalid image effect action",
			Error::InvalidNameEncoding => "name is not a valid C string",
			Error::InvalidResultEncoding => "host returned a string that is not UTF-8",
			Error::PropertyIndexOutOfBounds => "property index out of bounds",
			Error::InvalidHandle => "invalid handle",
			Error::InvalidValue => "invalid value",
			Error::InvalidSuite => "suite not available",
			Error::SuiteNotInitialized => "suite function not initialized",
			Error::PluginNotReady => "plugin not loaded",
			Error::HostNotReady => "host not set",
			Error::EnumNotFound => "unknown enumeration value",
			Error::InvalidInstanceData => "missing or mistyped instance data",
			Error::AlreadyExists => "object already exists",
			Error::MissingHostFeature => "missing host feature",
			Error::UnknownProperty => "unknown property",
			Error::UnknownError => "unknown error",
		};
		write!(f, "Openfx error: {}", description)
	}
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Turns a status returned by a suite function into a `Result`.
pub fn to_result(status: OfxStatus) -> Result<()> {
	if status == eOfxStatus_OK {
		Ok(())
	} else {
		Err(Error::from(status))
	}
}
