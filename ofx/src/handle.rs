use crate::enums::*;
use crate::property::*;
use crate::result::*;
use crate::suites::*;
use crate::types::*;
use crate::util::*;
use ofx_sys::*;
use std::any::Any;
use std::ffi::CString;
use std::fmt;

/// An image effect, either a descriptor (during describe actions) or a live instance.
#[derive(Clone)]
pub struct ImageEffectHandle {
	inner: OfxImageEffectHandle,
	suites: Suites,
}

#[derive(Clone)]
pub struct ParamSetHandle {
	inner: OfxParamSetHandle,
	suites: Suites,
}

#[derive(Clone)]
pub struct ImageClipHandle {
	inner: OfxImageClipHandle,
	name: String,
	suites: Suites,
}

/// An image fetched from a clip. It is handed back to the host when dropped.
pub struct ImageHandle {
	properties: PropertySetHandle,
	suites: Suites,
}

type InstanceData = Box<dyn Any>;

impl ImageEffectHandle {
	pub(crate) fn new(ptr: VoidPtr, suites: Suites) -> Result<Self> {
		if ptr.is_null() {
			Err(Error::InvalidHandle)
		} else {
			Ok(ImageEffectHandle {
				inner: ptr as OfxImageEffectHandle,
				suites,
			})
		}
	}

	/// Property set of the effect, typed for the action being answered.
	pub fn properties<T>(&self) -> Result<T>
	where
		T: From<PropertySetHandle>,
	{
		let mut property_set_handle: OfxPropertySetHandle = std::ptr::null_mut();
		to_result(suite_call!(
			getPropertySet in self.suites.image_effect(),
			self.inner,
			&mut property_set_handle
		))?;
		PropertySetHandle::new(property_set_handle, self.suites.property()).map(T::from)
	}

	pub fn parameter_set(&self) -> Result<ParamSetHandle> {
		let mut param_set_handle: OfxParamSetHandle = std::ptr::null_mut();
		to_result(suite_call!(
			getParamSet in self.suites.image_effect(),
			self.inner,
			&mut param_set_handle
		))?;
		if param_set_handle.is_null() {
			Err(Error::InvalidHandle)
		} else {
			Ok(ParamSetHandle {
				inner: param_set_handle,
				suites: self.suites.clone(),
			})
		}
	}

	pub fn new_clip(&mut self, name: &str) -> Result<ClipProperties> {
		let c_name = CString::new(name)?;
		let mut property_set_handle: OfxPropertySetHandle = std::ptr::null_mut();
		to_result(suite_call!(
			clipDefine in self.suites.image_effect(),
			self.inner,
			c_name.as_ptr(),
			&mut property_set_handle
		))?;
		PropertySetHandle::new(property_set_handle, self.suites.property()).map(ClipProperties::from)
	}

	pub fn new_output_clip(&mut self) -> Result<ClipProperties> {
		self.new_clip(&image_effect_output_clip_name())
	}

	pub fn new_simple_input_clip(&mut self) -> Result<ClipProperties> {
		self.new_clip(&image_effect_simple_source_clip_name())
	}

	pub fn get_clip(&self, name: &str) -> Result<ImageClipHandle> {
		let c_name = CString::new(name)?;
		let mut clip_handle: OfxImageClipHandle = std::ptr::null_mut();
		let mut property_set_handle: OfxPropertySetHandle = std::ptr::null_mut();
		to_result(suite_call!(
			clipGetHandle in self.suites.image_effect(),
			self.inner,
			c_name.as_ptr(),
			&mut clip_handle,
			&mut property_set_handle
		))?;
		if clip_handle.is_null() {
			Err(Error::InvalidHandle)
		} else {
			Ok(ImageClipHandle {
				inner: clip_handle,
				name: name.to_owned(),
				suites: self.suites.clone(),
			})
		}
	}

	pub fn get_output_clip(&self) -> Result<ImageClipHandle> {
		self.get_clip(&image_effect_output_clip_name())
	}

	pub fn get_simple_input_clip(&self) -> Result<ImageClipHandle> {
		self.get_clip(&image_effect_simple_source_clip_name())
	}

	pub fn abort(&self) -> Result<Bool> {
		Ok(suite_call!(abort in self.suites.image_effect(), self.inner) != 0)
	}

	/// Attaches plugin data to this instance, replacing (and dropping) any previous value.
	pub fn set_instance_data<T: Any>(&mut self, data: T) -> Result<()> {
		self.drop_instance_data()?;
		let boxed: Box<InstanceData> = Box::new(Box::new(data));
		let data_ptr = Box::into_raw(boxed);
		let mut effect_props: ImageEffectProperties = self.properties()?;
		effect_props
			.set(kOfxPropInstanceData, data_ptr as VoidPtrMut)
			.map_err(|e| {
				// the host never saw the pointer, take it back
				drop(unsafe { Box::from_raw(data_ptr) });
				e
			})
	}

	pub fn get_instance_data<T: Any>(&mut self) -> Result<&mut T> {
		let data_ptr = self.instance_data_ptr()?;
		if data_ptr.is_null() {
			return Err(Error::InvalidInstanceData);
		}
		let data = unsafe { &mut *data_ptr };
		data.downcast_mut::<T>().ok_or(Error::InvalidInstanceData)
	}

	pub fn drop_instance_data(&mut self) -> Result<()> {
		let data_ptr = self.instance_data_ptr()?;
		if !data_ptr.is_null() {
			let mut effect_props: ImageEffectProperties = self.properties()?;
			effect_props.set(kOfxPropInstanceData, std::ptr::null_mut::<Void>())?;
			drop(unsafe { Box::from_raw(data_ptr) });
		}
		Ok(())
	}

	fn instance_data_ptr(&self) -> Result<*mut InstanceData> {
		let effect_props: ImageEffectProperties = self.properties()?;
		match effect_props.get::<VoidPtrMut>(kOfxPropInstanceData) {
			Ok(ptr) => Ok(ptr as *mut InstanceData),
			// nothing was ever stored on this instance
			Err(Error::UnknownProperty) => Ok(std::ptr::null_mut()),
			Err(e) => Err(e),
		}
	}
}

impl fmt::Debug for ImageEffectHandle {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "ImageEffectHandle({:?})", self.inner)
	}
}

impl ParamSetHandle {
	pub fn properties(&self) -> Result<ParamSetProperties> {
		let mut property_set_handle: OfxPropertySetHandle = std::ptr::null_mut();
		to_result(suite_call!(
			paramSetGetPropertySet in self.suites.parameter(),
			self.inner,
			&mut property_set_handle
		))?;
		PropertySetHandle::new(property_set_handle, self.suites.property())
			.map(ParamSetProperties::from)
	}

	fn param_define<T>(&mut self, param_type: ParamType, name: &str) -> Result<T>
	where
		T: From<PropertySetHandle>,
	{
		let c_name = CString::new(name)?;
		let c_type = std::ffi::CStr::from_bytes_with_nul(param_type.to_bytes())?;
		let mut property_set_handle: OfxPropertySetHandle = std::ptr::null_mut();
		to_result(suite_call!(
			paramDefine in self.suites.parameter(),
			self.inner,
			c_type.as_ptr(),
			c_name.as_ptr(),
			&mut property_set_handle
		))
		.map_err(|e| {
			error!("Failed to define {} parameter {}: {}", param_type, name, e);
			e
		})?;
		PropertySetHandle::new(property_set_handle, self.suites.property()).map(T::from)
	}

	pub fn param_define_integer(&mut self, name: &str) -> Result<ParamIntegerProperties> {
		self.param_define(ParamType::Integer, name)
	}

	pub fn param_define_integer_2d(&mut self, name: &str) -> Result<ParamInteger2DProperties> {
		self.param_define(ParamType::Integer2D, name)
	}

	pub fn param_define_integer_3d(&mut self, name: &str) -> Result<ParamInteger3DProperties> {
		self.param_define(ParamType::Integer3D, name)
	}

	pub fn param_define_double(&mut self, name: &str) -> Result<ParamDoubleProperties> {
		self.param_define(ParamType::Double, name)
	}

	pub fn param_define_double_2d(&mut self, name: &str) -> Result<ParamDouble2DProperties> {
		self.param_define(ParamType::Double2D, name)
	}

	pub fn param_define_double_3d(&mut self, name: &str) -> Result<ParamDouble3DProperties> {
		self.param_define(ParamType::Double3D, name)
	}

	pub fn param_define_boolean(&mut self, name: &str) -> Result<ParamBooleanProperties> {
		self.param_define(ParamType::Boolean, name)
	}

	pub fn param_define_choice(&mut self, name: &str) -> Result<ParamChoiceProperties> {
		self.param_define(ParamType::Choice, name)
	}

	pub fn param_define_rgba(&mut self, name: &str) -> Result<ParamRGBAProperties> {
		self.param_define(ParamType::RGBA, name)
	}

	pub fn param_define_rgb(&mut self, name: &str) -> Result<ParamRGBProperties> {
		self.param_define(ParamType::RGB, name)
	}

	pub fn param_define_string(&mut self, name: &str) -> Result<ParamStringProperties> {
		self.param_define(ParamType::String, name)
	}

	pub fn param_define_custom(&mut self, name: &str) -> Result<ParamCustomProperties> {
		self.param_define(ParamType::Custom, name)
	}

	pub fn param_define_push_button(&mut self, name: &str) -> Result<ParamPushButtonProperties> {
		self.param_define(ParamType::PushButton, name)
	}

	pub fn param_define_page(&mut self, name: &str) -> Result<ParamPageProperties> {
		self.param_define(ParamType::Page, name)
	}
}

impl ImageClipHandle {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn properties(&self) -> Result<ClipInstanceProperties> {
		let mut property_set_handle: OfxPropertySetHandle = std::ptr::null_mut();
		to_result(suite_call!(
			clipGetPropertySet in self.suites.image_effect(),
			self.inner,
			&mut property_set_handle
		))?;
		PropertySetHandle::new(property_set_handle, self.suites.property())
			.map(ClipInstanceProperties::from)
	}

	pub fn get_connected(&self) -> Result<Bool> {
		self.properties()?.get_connected()
	}

	/// Fetches the whole image at `time`.
	pub fn get_image(&self, time: Time) -> Result<ImageHandle> {
		let mut image_handle: OfxPropertySetHandle = std::ptr::null_mut();
		to_result(suite_call!(
			clipGetImage in self.suites.image_effect(),
			self.inner,
			time,
			std::ptr::null(),
			&mut image_handle
		))?;
		let properties = PropertySetHandle::new(image_handle, self.suites.property())?;
		trace!("Fetched image from {} at {}", self.name, time);
		Ok(ImageHandle {
			properties,
			suites: self.suites.clone(),
		})
	}
}

impl fmt::Debug for ImageClipHandle {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "ImageClipHandle({}, {:?})", self.name, self.inner)
	}
}

impl AsProperties for ImageHandle {
	fn handle(&self) -> OfxPropertySetHandle {
		self.properties.handle()
	}
	fn suite(&self) -> &OfxPropertySuiteV1 {
		self.properties.suite()
	}
}

impl ImageHandle {
	pub fn get_bounds(&self) -> Result<RectI> {
		let mut bounds = [0; 4];
		for (index, v) in bounds.iter_mut().enumerate() {
			*v = self.get_at(kOfxImagePropBounds, index)?;
		}
		Ok(RectI::from(bounds))
	}

	pub fn get_pixel_depth(&self) -> Result<BitDepth> {
		self.get_enum(kOfxImageEffectPropPixelDepth)
	}

	pub fn get_components(&self) -> Result<ImageComponent> {
		self.get_enum(kOfxImageEffectPropComponents)
	}
}

impl Drop for ImageHandle {
	fn drop(&mut self) {
		let release = self.suites.image_effect().clipReleaseImage;
		let status = match release {
			Some(release) => unsafe { release(self.properties.handle()) },
			None => eOfxStatus_Failed,
		};
		if status != eOfxStatus_OK {
			error!("Failed to release image {:?}: {}", self.properties, status);
		}
	}
}

impl fmt::Debug for ImageHandle {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "ImageHandle({:?})", self.properties)
	}
}
