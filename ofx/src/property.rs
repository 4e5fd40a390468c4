use crate::enums::*;
use crate::result::*;
use crate::types::*;
use ofx_sys::*;
use std::ffi::{CStr, CString};
use std::fmt;
use std::sync::Arc;

pub type StaticName = &'static [u8];

/// A property set owned by the host, together with the suite used to read and write it.
#[derive(Clone)]
pub struct PropertySetHandle {
	inner: OfxPropertySetHandle,
	suite: Arc<OfxPropertySuiteV1>,
}

impl PropertySetHandle {
	pub(crate) fn new(inner: OfxPropertySetHandle, suite: Arc<OfxPropertySuiteV1>) -> Result<Self> {
		if inner.is_null() {
			Err(Error::InvalidHandle)
		} else {
			Ok(PropertySetHandle { inner, suite })
		}
	}
}

impl fmt::Debug for PropertySetHandle {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "PropertySetHandle({:?})", self.inner)
	}
}

pub trait AsProperties {
	fn handle(&self) -> OfxPropertySetHandle;
	fn suite(&self) -> &OfxPropertySuiteV1;
}

impl AsProperties for PropertySetHandle {
	fn handle(&self) -> OfxPropertySetHandle {
		self.inner
	}
	fn suite(&self) -> &OfxPropertySuiteV1 {
		&self.suite
	}
}

fn c_name(name: &[u8]) -> Result<&CStr> {
	Ok(CStr::from_bytes_with_nul(name)?)
}

/// A value that can be read from a single property slot.
pub trait ValueGet: Sized {
	fn get_at<P: AsProperties + ?Sized>(properties: &P, name: &CStr, index: Int) -> Result<Self>;
}

/// A value that can be written to a single property slot.
pub trait ValueSet {
	fn set_at<P: AsProperties + ?Sized>(&self, properties: &P, name: &CStr, index: Int) -> Result<()>;
}

impl ValueGet for Int {
	fn get_at<P: AsProperties + ?Sized>(properties: &P, name: &CStr, index: Int) -> Result<Self> {
		let mut c_int_out: Int = 0;
		to_result(suite_call!(
			propGetInt in properties.suite(),
			properties.handle(),
			name.as_ptr(),
			index,
			&mut c_int_out
		))?;
		Ok(c_int_out)
	}
}

impl ValueSet for Int {
	fn set_at<P: AsProperties + ?Sized>(&self, properties: &P, name: &CStr, index: Int) -> Result<()> {
		to_result(suite_call!(
			propSetInt in properties.suite(),
			properties.handle(),
			name.as_ptr(),
			index,
			*self
		))
	}
}

impl ValueGet for Bool {
	fn get_at<P: AsProperties + ?Sized>(properties: &P, name: &CStr, index: Int) -> Result<Self> {
		Ok(Int::get_at(properties, name, index)? != 0)
	}
}

impl ValueSet for Bool {
	fn set_at<P: AsProperties + ?Sized>(&self, properties: &P, name: &CStr, index: Int) -> Result<()> {
		(*self as Int).set_at(properties, name, index)
	}
}

impl ValueGet for Double {
	fn get_at<P: AsProperties + ?Sized>(properties: &P, name: &CStr, index: Int) -> Result<Self> {
		let mut c_double_out: Double = 0.0;
		to_result(suite_call!(
			propGetDouble in properties.suite(),
			properties.handle(),
			name.as_ptr(),
			index,
			&mut c_double_out
		))?;
		Ok(c_double_out)
	}
}

impl ValueSet for Double {
	fn set_at<P: AsProperties + ?Sized>(&self, properties: &P, name: &CStr, index: Int) -> Result<()> {
		to_result(suite_call!(
			propSetDouble in properties.suite(),
			properties.handle(),
			name.as_ptr(),
			index,
			*self
		))
	}
}

impl ValueGet for String {
	fn get_at<P: AsProperties + ?Sized>(properties: &P, name: &CStr, index: Int) -> Result<Self> {
		let mut c_ptr_out: CharPtrMut = std::ptr::null_mut();
		to_result(suite_call!(
			propGetString in properties.suite(),
			properties.handle(),
			name.as_ptr(),
			index,
			&mut c_ptr_out
		))?;
		if c_ptr_out.is_null() {
			return Err(Error::InvalidValue);
		}
		let value = unsafe { CStr::from_ptr(c_ptr_out) };
		Ok(value.to_str()?.to_owned())
	}
}

impl<'a> ValueSet for &'a str {
	fn set_at<P: AsProperties + ?Sized>(&self, properties: &P, name: &CStr, index: Int) -> Result<()> {
		// the host copies the string before returning
		let c_value = CString::new(*self)?;
		to_result(suite_call!(
			propSetString in properties.suite(),
			properties.handle(),
			name.as_ptr(),
			index,
			c_value.as_ptr()
		))
	}
}

impl ValueSet for String {
	fn set_at<P: AsProperties + ?Sized>(&self, properties: &P, name: &CStr, index: Int) -> Result<()> {
		self.as_str().set_at(properties, name, index)
	}
}

impl ValueGet for VoidPtrMut {
	fn get_at<P: AsProperties + ?Sized>(properties: &P, name: &CStr, index: Int) -> Result<Self> {
		let mut c_ptr_out: VoidPtrMut = std::ptr::null_mut();
		to_result(suite_call!(
			propGetPointer in properties.suite(),
			properties.handle(),
			name.as_ptr(),
			index,
			&mut c_ptr_out
		))?;
		Ok(c_ptr_out)
	}
}

impl ValueSet for VoidPtrMut {
	fn set_at<P: AsProperties + ?Sized>(&self, properties: &P, name: &CStr, index: Int) -> Result<()> {
		to_result(suite_call!(
			propSetPointer in properties.suite(),
			properties.handle(),
			name.as_ptr(),
			index,
			*self
		))
	}
}

pub trait Readable: AsProperties {
	fn get<T: ValueGet>(&self, name: &[u8]) -> Result<T> {
		self.get_at(name, 0)
	}

	fn get_at<T: ValueGet>(&self, name: &[u8], index: usize) -> Result<T> {
		T::get_at(self, c_name(name)?, index as Int)
	}

	fn get_all<T: ValueGet>(&self, name: &[u8]) -> Result<Vec<T>> {
		(0..self.dimension(name)?)
			.map(|index| self.get_at(name, index))
			.collect()
	}

	fn get_enum<E: IdentifiedEnum>(&self, name: &[u8]) -> Result<E> {
		E::from_str_value(&self.get::<String>(name)?)
	}

	fn dimension(&self, name: &[u8]) -> Result<usize> {
		let mut c_int_out: Int = 0;
		to_result(suite_call!(
			propGetDimension in self.suite(),
			self.handle(),
			c_name(name)?.as_ptr(),
			&mut c_int_out
		))?;
		Ok(c_int_out.max(0) as usize)
	}
}

pub trait Writable: AsProperties {
	fn set<T: ValueSet>(&mut self, name: &[u8], value: T) -> Result<()> {
		self.set_at(name, 0, value)
	}

	fn set_at<T: ValueSet>(&mut self, name: &[u8], index: usize, value: T) -> Result<()> {
		value.set_at(&*self, c_name(name)?, index as Int)
	}

	fn set_all<T: ValueSet>(&mut self, name: &[u8], values: &[T]) -> Result<()> {
		let c_name = c_name(name)?;
		for (index, value) in values.iter().enumerate() {
			value.set_at(&*self, c_name, index as Int)?;
		}
		Ok(())
	}

	/// Appends one value after the current last element of a variable dimension property.
	fn append<T: ValueSet>(&mut self, name: &[u8], value: T) -> Result<()>
	where
		Self: Readable,
	{
		let index = self.dimension(name)?;
		self.set_at(name, index, value)
	}

	fn set_enum<E: IdentifiedEnum>(&mut self, name: &[u8], value: E) -> Result<()> {
		let bytes = value.to_bytes();
		let c_value = CStr::from_bytes_with_nul(bytes)?;
		self.set(name, c_value.to_str()?)
	}

	fn set_enums<E: IdentifiedEnum>(&mut self, name: &[u8], values: &[E]) -> Result<()> {
		for (index, value) in values.iter().enumerate() {
			let c_value = CStr::from_bytes_with_nul(value.to_bytes())?;
			self.set_at(name, index, c_value.to_str()?)?;
		}
		Ok(())
	}

	fn reset(&mut self, name: &[u8]) -> Result<()> {
		to_result(suite_call!(
			propReset in self.suite(),
			self.handle(),
			c_name(name)?.as_ptr()
		))
	}
}

impl<T: AsProperties + ?Sized> Readable for T {}
impl<T: AsProperties + ?Sized> Writable for T {}

macro_rules! properties_type {
	($($name:ident),* $(,)*) => {
		$(
			#[derive(Clone, Debug)]
			pub struct $name(PropertySetHandle);

			impl From<PropertySetHandle> for $name {
				fn from(handle: PropertySetHandle) -> Self {
					$name(handle)
				}
			}

			impl AsProperties for $name {
				fn handle(&self) -> OfxPropertySetHandle {
					self.0.handle()
				}
				fn suite(&self) -> &OfxPropertySuiteV1 {
					self.0.suite()
				}
			}
		)*
	};
}

properties_type!(
	HostProperties,
	EffectDescriptorProperties,
	ImageEffectProperties,
	ClipProperties,
	ClipInstanceProperties,
	ParamSetProperties,
	ParamIntegerProperties,
	ParamInteger2DProperties,
	ParamInteger3DProperties,
	ParamDoubleProperties,
	ParamDouble2DProperties,
	ParamDouble3DProperties,
	ParamBooleanProperties,
	ParamChoiceProperties,
	ParamRGBAProperties,
	ParamRGBProperties,
	ParamStringProperties,
	ParamCustomProperties,
	ParamPushButtonProperties,
	ParamPageProperties,
	DescribeInContextInArgs,
	InstanceChangedInArgs,
	RenderInArgs,
);

impl HostProperties {
	pub fn get_name(&self) -> Result<String> {
		self.get(kOfxPropName)
	}

	pub fn get_label(&self) -> Result<String> {
		self.get(kOfxPropLabel)
	}
}

impl EffectDescriptorProperties {
	pub fn set_grouping(&mut self, value: &str) -> Result<()> {
		self.set(kOfxImageEffectPluginPropGrouping, value)
	}

	pub fn set_supported_contexts(&mut self, values: &[ImageEffectContext]) -> Result<()> {
		self.set_enums(kOfxImageEffectPropSupportedContexts, values)
	}

	pub fn set_supported_pixel_depths(&mut self, values: &[BitDepth]) -> Result<()> {
		self.set_enums(kOfxImageEffectPropSupportedPixelDepths, values)
	}

	pub fn set_single_instance(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageEffectPluginPropSingleInstance, value)
	}

	pub fn set_host_frame_threading(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageEffectPluginPropHostFrameThreading, value)
	}

	pub fn set_supports_multi_resolution(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageEffectPropSupportsMultiResolution, value)
	}

	pub fn set_supports_tiles(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageEffectPropSupportsTiles, value)
	}

	pub fn set_temporal_clip_access(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageEffectPropTemporalClipAccess, value)
	}

	pub fn set_render_twice_always(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageEffectPluginPropFieldRenderTwiceAlways, value)
	}

	pub fn set_supports_multiple_clip_pars(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageEffectPropSupportsMultipleClipPARs, value)
	}

	pub fn set_render_thread_safety(&mut self, value: RenderThreadSafety) -> Result<()> {
		self.set_enum(kOfxImageEffectPluginRenderThreadSafety, value)
	}
}

impl ImageEffectProperties {
	pub fn get_context(&self) -> Result<ImageEffectContext> {
		self.get_enum(kOfxImageEffectPropContext)
	}
}

impl ClipProperties {
	pub fn set_supported_components(&mut self, values: &[ImageComponent]) -> Result<()> {
		self.set_enums(kOfxImageEffectPropSupportedComponents, values)
	}

	pub fn set_temporal_clip_access(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageEffectPropTemporalClipAccess, value)
	}

	pub fn set_optional(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageClipPropOptional, value)
	}

	pub fn set_supports_tiles(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageEffectPropSupportsTiles, value)
	}

	pub fn set_is_mask(&mut self, value: Bool) -> Result<()> {
		self.set(kOfxImageClipPropIsMask, value)
	}
}

impl ClipInstanceProperties {
	pub fn get_connected(&self) -> Result<Bool> {
		self.get(kOfxImageClipPropConnected)
	}
}

impl DescribeInContextInArgs {
	pub fn get_context(&self) -> Result<ImageEffectContext> {
		self.get_enum(kOfxImageEffectPropContext)
	}
}

impl InstanceChangedInArgs {
	pub fn get_type(&self) -> Result<Type> {
		self.get_enum(kOfxPropType)
	}

	pub fn get_name(&self) -> Result<String> {
		self.get(kOfxPropName)
	}

	pub fn get_change_reason(&self) -> Result<Change> {
		self.get_enum(kOfxPropChangeReason)
	}

	pub fn get_time(&self) -> Result<Time> {
		self.get(kOfxPropTime)
	}
}

impl RenderInArgs {
	pub fn get_time(&self) -> Result<Time> {
		self.get(kOfxPropTime)
	}

	pub fn get_render_window(&self) -> Result<RectI> {
		let mut window = [0; 4];
		for (index, v) in window.iter_mut().enumerate() {
			*v = self.get_at(kOfxImageEffectPropRenderWindow, index)?;
		}
		Ok(RectI::from(window))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::PropertyStore;

	fn handle_of(store: &PropertyStore) -> PropertySetHandle {
		store.property_set_handle()
	}

	#[test]
	fn scalar_values_round_trip() {
		let store = PropertyStore::default();
		let mut props = handle_of(&store);
		props.set(kOfxParamPropDefault, 42 as Int).unwrap();
		props.set(kOfxParamPropMin, -1.5 as Double).unwrap();
		props.set(kOfxPropLabel, "label").unwrap();
		props.set(kOfxParamPropAnimates, true).unwrap();

		assert_eq!(props.get::<Int>(kOfxParamPropDefault), Ok(42));
		assert_eq!(props.get::<Double>(kOfxParamPropMin), Ok(-1.5));
		assert_eq!(props.get::<String>(kOfxPropLabel), Ok("label".to_owned()));
		assert_eq!(props.get::<Bool>(kOfxParamPropAnimates), Ok(true));
	}

	#[test]
	fn missing_property_is_an_error() {
		let store = PropertyStore::default();
		let props = handle_of(&store);
		assert_eq!(
			props.get::<Int>(kOfxParamPropDefault),
			Err(Error::UnknownProperty)
		);
	}

	#[test]
	fn append_grows_variable_dimension_properties() {
		let store = PropertyStore::default();
		let mut props = handle_of(&store);
		props.append(kOfxParamPropChoiceOption, "This").unwrap();
		props.append(kOfxParamPropChoiceOption, "That").unwrap();
		assert_eq!(props.dimension(kOfxParamPropChoiceOption), Ok(2));

		props.reset(kOfxParamPropChoiceOption).unwrap();
		assert_eq!(props.dimension(kOfxParamPropChoiceOption), Ok(0));
	}

	#[test]
	fn enums_are_written_as_header_strings() {
		let store = PropertyStore::default();
		let mut props = handle_of(&store);
		props
			.set_enums(
				kOfxImageEffectPropSupportedPixelDepths,
				&[BitDepth::Byte, BitDepth::Float],
			)
			.unwrap();

		assert_eq!(
			props.get_all::<String>(kOfxImageEffectPropSupportedPixelDepths),
			Ok(vec![
				"OfxBitDepthByte".to_owned(),
				"OfxBitDepthFloat".to_owned()
			])
		);
		assert_eq!(
			props.get_enum::<BitDepth>(kOfxImageEffectPropSupportedPixelDepths),
			Ok(BitDepth::Byte)
		);
	}

	#[test]
	fn render_window_reads_four_ints() {
		let store = PropertyStore::default();
		store.set_ints(kOfxImageEffectPropRenderWindow, &[0, 0, 320, 240]);
		store.set_doubles(kOfxPropTime, &[12.0]);
		let args = RenderInArgs::from(handle_of(&store));

		assert_eq!(
			args.get_render_window(),
			Ok(RectI {
				x1: 0,
				y1: 0,
				x2: 320,
				y2: 240
			})
		);
		assert_eq!(args.get_time(), Ok(12.0));
	}

	#[test]
	fn null_handle_is_rejected() {
		let store = PropertyStore::default();
		let suite = handle_of(&store).suite().clone();
		assert_eq!(
			PropertySetHandle::new(std::ptr::null_mut(), Arc::new(suite)).map(|_| ()),
			Err(Error::InvalidHandle)
		);
	}
}
