//! An in-process host for unit tests. It serves the property, image effect and
//! parameter suites from plain Rust stores so plugins can be driven action by
//! action without a real application.
//!
//! The stores are not thread safe and must outlive every handle given to the plugin.

use crate::enums::*;
use crate::property::*;
use crate::registry::Registry;
use crate::result::*;
use crate::types::*;
use crate::util::*;
use ofx_sys::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

pub const HOST_NAME: &str = "net.itadinanta.ofx-rs.testing";
pub const HOST_LABEL: &str = "ofx-rs test host";

const CLIP_OF_IMAGE: &str = "net.itadinanta.ofx-rs.testing.clip";
const IMAGE_RELEASED: &str = "net.itadinanta.ofx-rs.testing.released";

#[derive(Debug, Clone)]
enum PropertyValue {
	Int(Vec<Int>),
	Double(Vec<Double>),
	String(Vec<CString>),
	Pointer(Vec<VoidPtrMut>),
}

trait Slot: Sized + Clone {
	fn wrap(values: Vec<Self>) -> PropertyValue;
	fn slots(value: &PropertyValue) -> Option<&Vec<Self>>;
	fn slots_mut(value: &mut PropertyValue) -> Option<&mut Vec<Self>>;
}

macro_rules! slot {
	($type:ty => $variant:ident) => {
		impl Slot for $type {
			fn wrap(values: Vec<Self>) -> PropertyValue {
				PropertyValue::$variant(values)
			}
			fn slots(value: &PropertyValue) -> Option<&Vec<Self>> {
				match value {
					PropertyValue::$variant(values) => Some(values),
					_ => None,
				}
			}
			fn slots_mut(value: &mut PropertyValue) -> Option<&mut Vec<Self>> {
				match value {
					PropertyValue::$variant(values) => Some(values),
					_ => None,
				}
			}
		}
	};
}

slot!(Int => Int);
slot!(Double => Double);
slot!(CString => String);
slot!(VoidPtrMut => Pointer);

fn key(name: &[u8]) -> String {
	let name = name.strip_suffix(&[0]).unwrap_or(name);
	String::from_utf8_lossy(name).into_owned()
}

/// A property set whose values take their type from the first write.
#[derive(Debug, Default)]
pub struct PropertyStore {
	values: RefCell<HashMap<String, PropertyValue>>,
}

impl PropertyStore {
	pub fn handle(&self) -> OfxPropertySetHandle {
		self as *const PropertyStore as OfxPropertySetHandle
	}

	pub fn property_set_handle(&self) -> PropertySetHandle {
		PropertySetHandle::new(self.handle(), Arc::new(*property_suite()))
			.expect("a store always has an address")
	}

	fn set_slot<T: Slot>(&self, name: &str, index: Int, value: T) -> OfxStatus {
		if index < 0 {
			return eOfxStatus_ErrBadIndex;
		}
		let index = index as usize;
		let mut values = self.values.borrow_mut();
		let entry = values
			.entry(name.to_owned())
			.or_insert_with(|| T::wrap(Vec::new()));
		match T::slots_mut(entry) {
			Some(slots) if index < slots.len() => {
				slots[index] = value;
				eOfxStatus_OK
			}
			Some(slots) if index == slots.len() => {
				slots.push(value);
				eOfxStatus_OK
			}
			Some(_) => eOfxStatus_ErrBadIndex,
			None => eOfxStatus_ErrValue,
		}
	}

	fn with_slot<T: Slot, R>(
		&self,
		name: &str,
		index: Int,
		f: impl FnOnce(&T) -> R,
	) -> std::result::Result<R, OfxStatus> {
		let values = self.values.borrow();
		let value = values.get(name).ok_or(eOfxStatus_ErrUnknown)?;
		let slots = T::slots(value).ok_or(eOfxStatus_ErrValue)?;
		if index < 0 {
			return Err(eOfxStatus_ErrBadIndex);
		}
		slots
			.get(index as usize)
			.map(f)
			.ok_or(eOfxStatus_ErrBadIndex)
	}

	fn all<T: Slot>(&self, name: &[u8]) -> Option<Vec<T>> {
		self.values.borrow().get(&key(name)).and_then(T::slots).cloned()
	}

	fn dimension(&self, name: &str) -> Int {
		match self.values.borrow().get(name) {
			Some(PropertyValue::Int(values)) => values.len() as Int,
			Some(PropertyValue::Double(values)) => values.len() as Int,
			Some(PropertyValue::String(values)) => values.len() as Int,
			Some(PropertyValue::Pointer(values)) => values.len() as Int,
			None => 0,
		}
	}

	fn replace<T: Slot>(&self, name: &[u8], values: Vec<T>) {
		self.values.borrow_mut().insert(key(name), T::wrap(values));
	}

	pub fn set_ints(&self, name: &[u8], values: &[Int]) {
		self.replace(name, values.to_vec());
	}

	pub fn set_doubles(&self, name: &[u8], values: &[Double]) {
		self.replace(name, values.to_vec());
	}

	pub fn set_strings(&self, name: &[u8], values: &[&str]) {
		let values = values
			.iter()
			.filter_map(|value| CString::new(*value).ok())
			.collect();
		self.replace(name, values);
	}

	pub fn set_pointer(&self, name: &[u8], value: VoidPtrMut) {
		self.replace(name, vec![value]);
	}

	pub fn contains(&self, name: &[u8]) -> bool {
		self.values.borrow().contains_key(&key(name))
	}

	pub fn ints(&self, name: &[u8]) -> Option<Vec<Int>> {
		self.all(name)
	}

	pub fn int(&self, name: &[u8]) -> Option<Int> {
		self.ints(name).and_then(|values| values.first().cloned())
	}

	pub fn doubles(&self, name: &[u8]) -> Option<Vec<Double>> {
		self.all(name)
	}

	pub fn strings(&self, name: &[u8]) -> Option<Vec<String>> {
		self.all::<CString>(name).map(|values| {
			values
				.iter()
				.map(|value| value.to_string_lossy().into_owned())
				.collect()
		})
	}

	pub fn string(&self, name: &[u8]) -> Option<String> {
		self.strings(name).and_then(|values| values.first().cloned())
	}

	pub fn pointer(&self, name: &[u8]) -> Option<VoidPtrMut> {
		self.all::<VoidPtrMut>(name)
			.and_then(|values| values.first().cloned())
	}
}

/// A parameter defined by the plugin.
#[derive(Debug)]
pub struct ParamStore {
	name: String,
	param_type: String,
	properties: PropertyStore,
}

impl ParamStore {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn param_type(&self) -> &str {
		&self.param_type
	}

	pub fn properties(&self) -> &PropertyStore {
		&self.properties
	}
}

#[derive(Debug, Default)]
pub struct ParamSetStore {
	properties: PropertyStore,
	params: RefCell<Vec<Rc<ParamStore>>>,
}

impl ParamSetStore {
	fn handle(&self) -> OfxParamSetHandle {
		self as *const ParamSetStore as OfxParamSetHandle
	}

	fn define(&self, param_type: &str, name: &str) -> std::result::Result<Rc<ParamStore>, OfxStatus> {
		if self.get(name).is_some() {
			return Err(eOfxStatus_ErrExists);
		}
		let properties = PropertyStore::default();
		properties.set_strings(kOfxParamPropType, &[param_type]);
		properties.set_strings(kOfxPropName, &[name]);
		let param = Rc::new(ParamStore {
			name: name.to_owned(),
			param_type: param_type.to_owned(),
			properties,
		});
		self.params.borrow_mut().push(param.clone());
		Ok(param)
	}

	pub fn get(&self, name: &str) -> Option<Rc<ParamStore>> {
		self.params
			.borrow()
			.iter()
			.find(|param| param.name == name)
			.cloned()
	}

	/// Parameter names in definition order.
	pub fn names(&self) -> Vec<String> {
		self.params
			.borrow()
			.iter()
			.map(|param| param.name.clone())
			.collect()
	}

	pub fn properties(&self) -> &PropertyStore {
		&self.properties
	}
}

/// A clip, either described by the plugin or created by the host for an instance.
#[derive(Debug)]
pub struct ClipStore {
	name: String,
	properties: PropertyStore,
	images: RefCell<Vec<Box<PropertyStore>>>,
	fetched: Cell<usize>,
	released: Cell<usize>,
}

impl ClipStore {
	fn new(name: &str) -> Self {
		let properties = PropertyStore::default();
		properties.set_strings(kOfxPropName, &[name]);
		properties.set_strings(kOfxPropType, &[static_bytes_to_string(kOfxTypeClip).as_str()]);
		ClipStore {
			name: name.to_owned(),
			properties,
			images: RefCell::new(Vec::new()),
			fetched: Cell::new(0),
			released: Cell::new(0),
		}
	}

	fn handle(&self) -> OfxImageClipHandle {
		self as *const ClipStore as OfxImageClipHandle
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn properties(&self) -> &PropertyStore {
		&self.properties
	}

	pub fn set_connected(&self, connected: bool) {
		self.properties
			.set_ints(kOfxImageClipPropConnected, &[connected as Int]);
	}

	pub fn fetched(&self) -> usize {
		self.fetched.get()
	}

	pub fn released(&self) -> usize {
		self.released.get()
	}

	fn fetch_image(&self, time: Time) -> std::result::Result<OfxPropertySetHandle, OfxStatus> {
		if self.properties.int(kOfxImageClipPropConnected) != Some(1) {
			return Err(eOfxStatus_Failed);
		}
		let image = Box::new(PropertyStore::default());
		image.set_doubles(kOfxPropTime, &[time]);
		image.set_ints(kOfxImagePropBounds, &[0, 0, 64, 48]);
		image.set_ints(kOfxImagePropRowBytes, &[64 * 16]);
		image.set_pointer(kOfxImagePropData, std::ptr::null_mut());
		for name in [&kOfxImageEffectPropPixelDepth[..], &kOfxImageEffectPropComponents[..]].iter() {
			if let Some(value) = self.properties.string(name) {
				image.set_strings(name, &[value.as_str()]);
			}
		}
		image.set_pointer(CLIP_OF_IMAGE.as_bytes(), self as *const ClipStore as VoidPtrMut);
		let handle = image.handle();
		self.images.borrow_mut().push(image);
		self.fetched.set(self.fetched.get() + 1);
		Ok(handle)
	}
}

/// An effect descriptor or instance as seen through an `OfxImageEffectHandle`.
#[derive(Debug, Default)]
pub struct EffectStore {
	properties: PropertyStore,
	params: ParamSetStore,
	clips: RefCell<Vec<Rc<ClipStore>>>,
	aborted: Cell<bool>,
}

impl EffectStore {
	/// The descriptor passed to the describe action.
	pub fn descriptor() -> Box<Self> {
		let effect = Box::new(EffectStore::default());
		effect
			.properties
			.set_strings(kOfxPropType, &[static_bytes_to_string(kOfxTypeImageEffect).as_str()]);
		effect
	}

	/// The descriptor passed to describe in context.
	pub fn context_descriptor(context: ImageEffectContext) -> Box<Self> {
		let effect = EffectStore::descriptor();
		effect.set_context(context);
		effect
	}

	/// A live instance in `context` with connected RGBA float clips already in place.
	pub fn instance(context: ImageEffectContext) -> Box<Self> {
		let effect = Box::new(EffectStore::default());
		effect.properties.set_strings(
			kOfxPropType,
			&[static_bytes_to_string(kOfxTypeImageEffectInstance).as_str()],
		);
		effect.set_context(context);
		let mut clip_names = vec![image_effect_output_clip_name()];
		if context.has_simple_input() {
			clip_names.push(image_effect_simple_source_clip_name());
		}
		for name in clip_names {
			let clip = ClipStore::new(&name);
			clip.set_connected(true);
			clip.properties.set_strings(
				kOfxImageEffectPropComponents,
				&[ImageComponent::RGBA.to_string().as_str()],
			);
			clip.properties.set_strings(
				kOfxImageEffectPropPixelDepth,
				&[BitDepth::Float.to_string().as_str()],
			);
			effect.clips.borrow_mut().push(Rc::new(clip));
		}
		effect
	}

	fn set_context(&self, context: ImageEffectContext) {
		self.properties
			.set_strings(kOfxImageEffectPropContext, &[context.to_string().as_str()]);
	}

	pub fn handle(&self) -> VoidPtr {
		self as *const EffectStore as VoidPtr
	}

	pub fn properties(&self) -> &PropertyStore {
		&self.properties
	}

	pub fn params(&self) -> &ParamSetStore {
		&self.params
	}

	pub fn param(&self, name: &str) -> Option<Rc<ParamStore>> {
		self.params.get(name)
	}

	pub fn clip(&self, name: &str) -> Option<Rc<ClipStore>> {
		self.clips
			.borrow()
			.iter()
			.find(|clip| clip.name == name)
			.cloned()
	}

	/// Clip names in definition order.
	pub fn clip_names(&self) -> Vec<String> {
		self.clips
			.borrow()
			.iter()
			.map(|clip| clip.name.clone())
			.collect()
	}

	pub fn set_aborted(&self, aborted: bool) {
		self.aborted.set(aborted);
	}

	/// The raw instance data pointer, null when the plugin never set one.
	pub fn instance_data(&self) -> VoidPtrMut {
		self.properties
			.pointer(kOfxPropInstanceData)
			.unwrap_or(std::ptr::null_mut())
	}

	fn define_clip(&self, name: &str) -> std::result::Result<Rc<ClipStore>, OfxStatus> {
		if self.clip(name).is_some() {
			return Err(eOfxStatus_ErrExists);
		}
		let clip = Rc::new(ClipStore::new(name));
		self.clips.borrow_mut().push(clip.clone());
		Ok(clip)
	}
}

fn property_name(property: CharPtr) -> Option<String> {
	if property.is_null() {
		None
	} else {
		Some(unsafe { CStr::from_ptr(property) }.to_string_lossy().into_owned())
	}
}

unsafe fn store<'a>(properties: OfxPropertySetHandle) -> Option<&'a PropertyStore> {
	(properties as *const PropertyStore).as_ref()
}

macro_rules! with_store {
	($properties:expr, $property:expr, |$store:ident, $name:ident| $body:expr) => {
		match (store($properties), property_name($property)) {
			(Some($store), Some($name)) => $body,
			(None, _) => eOfxStatus_ErrBadHandle,
			(_, None) => eOfxStatus_ErrUnknown,
		}
	};
}

fn status_of<T>(result: std::result::Result<T, OfxStatus>, out: impl FnOnce(T)) -> OfxStatus {
	match result {
		Ok(value) => {
			out(value);
			eOfxStatus_OK
		}
		Err(status) => status,
	}
}

unsafe extern "C" fn prop_set_pointer(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	index: Int,
	value: VoidPtrMut,
) -> OfxStatus {
	with_store!(properties, property, |store, name| store.set_slot(&name, index, value))
}

unsafe extern "C" fn prop_set_string(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	index: Int,
	value: CharPtr,
) -> OfxStatus {
	if value.is_null() {
		return eOfxStatus_ErrValue;
	}
	let value = CStr::from_ptr(value).to_owned();
	with_store!(properties, property, |store, name| store.set_slot(&name, index, value))
}

unsafe extern "C" fn prop_set_double(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	index: Int,
	value: Double,
) -> OfxStatus {
	with_store!(properties, property, |store, name| store.set_slot(&name, index, value))
}

unsafe extern "C" fn prop_set_int(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	index: Int,
	value: Int,
) -> OfxStatus {
	with_store!(properties, property, |store, name| store.set_slot(&name, index, value))
}

unsafe extern "C" fn prop_get_pointer(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	index: Int,
	value: *mut VoidPtrMut,
) -> OfxStatus {
	with_store!(properties, property, |store, name| status_of(
		store.with_slot(&name, index, |v: &VoidPtrMut| *v),
		|v| *value = v
	))
}

unsafe extern "C" fn prop_get_string(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	index: Int,
	value: *mut CharPtrMut,
) -> OfxStatus {
	// the pointer stays valid until the property is written again
	with_store!(properties, property, |store, name| status_of(
		store.with_slot(&name, index, |v: &CString| v.as_ptr() as CharPtrMut),
		|v| *value = v
	))
}

unsafe extern "C" fn prop_get_double(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	index: Int,
	value: *mut Double,
) -> OfxStatus {
	with_store!(properties, property, |store, name| status_of(
		store.with_slot(&name, index, |v: &Double| *v),
		|v| *value = v
	))
}

unsafe extern "C" fn prop_get_int(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	index: Int,
	value: *mut Int,
) -> OfxStatus {
	with_store!(properties, property, |store, name| status_of(
		store.with_slot(&name, index, |v: &Int| *v),
		|v| *value = v
	))
}

unsafe extern "C" fn prop_reset(properties: OfxPropertySetHandle, property: CharPtr) -> OfxStatus {
	with_store!(properties, property, |store, name| {
		store.values.borrow_mut().remove(&name);
		eOfxStatus_OK
	})
}

unsafe extern "C" fn prop_get_dimension(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: *mut Int,
) -> OfxStatus {
	with_store!(properties, property, |store, name| {
		*count = store.dimension(&name);
		eOfxStatus_OK
	})
}

unsafe fn set_n<T: Slot>(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	value_at: impl Fn(usize) -> Option<T>,
) -> OfxStatus {
	with_store!(properties, property, |store, name| {
		for index in 0..count.max(0) {
			let status = match value_at(index as usize) {
				Some(value) => store.set_slot(&name, index, value),
				None => eOfxStatus_ErrValue,
			};
			if status != eOfxStatus_OK {
				return status;
			}
		}
		eOfxStatus_OK
	})
}

unsafe fn get_n<T: Slot, V>(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	read: impl Fn(&T) -> V,
	value: *mut V,
) -> OfxStatus {
	with_store!(properties, property, |store, name| {
		for index in 0..count.max(0) {
			match store.with_slot(&name, index, &read) {
				Ok(v) => *value.add(index as usize) = v,
				Err(status) => return status,
			}
		}
		eOfxStatus_OK
	})
}

unsafe extern "C" fn prop_set_pointer_n(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	value: *const VoidPtrMut,
) -> OfxStatus {
	set_n(properties, property, count, |i| Some(*value.add(i)))
}

unsafe extern "C" fn prop_set_string_n(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	value: *const CharPtr,
) -> OfxStatus {
	set_n(properties, property, count, |i| {
		let s = *value.add(i);
		if s.is_null() {
			None
		} else {
			Some(CStr::from_ptr(s).to_owned())
		}
	})
}

unsafe extern "C" fn prop_set_double_n(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	value: *const Double,
) -> OfxStatus {
	set_n(properties, property, count, |i| Some(*value.add(i)))
}

unsafe extern "C" fn prop_set_int_n(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	value: *const Int,
) -> OfxStatus {
	set_n(properties, property, count, |i| Some(*value.add(i)))
}

unsafe extern "C" fn prop_get_pointer_n(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	value: *mut VoidPtrMut,
) -> OfxStatus {
	get_n(properties, property, count, |v: &VoidPtrMut| *v, value)
}

unsafe extern "C" fn prop_get_string_n(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	value: *mut CharPtrMut,
) -> OfxStatus {
	get_n(properties, property, count, |v: &CString| v.as_ptr() as CharPtrMut, value)
}

unsafe extern "C" fn prop_get_double_n(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	value: *mut Double,
) -> OfxStatus {
	get_n(properties, property, count, |v: &Double| *v, value)
}

unsafe extern "C" fn prop_get_int_n(
	properties: OfxPropertySetHandle,
	property: CharPtr,
	count: Int,
	value: *mut Int,
) -> OfxStatus {
	get_n(properties, property, count, |v: &Int| *v, value)
}

unsafe fn effect<'a>(handle: OfxImageEffectHandle) -> Option<&'a EffectStore> {
	(handle as *const EffectStore).as_ref()
}

unsafe fn clip<'a>(handle: OfxImageClipHandle) -> Option<&'a ClipStore> {
	(handle as *const ClipStore).as_ref()
}

unsafe fn param_set<'a>(handle: OfxParamSetHandle) -> Option<&'a ParamSetStore> {
	(handle as *const ParamSetStore).as_ref()
}

unsafe extern "C" fn get_property_set(
	image_effect: OfxImageEffectHandle,
	prop_handle: *mut OfxPropertySetHandle,
) -> OfxStatus {
	match effect(image_effect) {
		Some(effect) => {
			*prop_handle = effect.properties.handle();
			eOfxStatus_OK
		}
		None => eOfxStatus_ErrBadHandle,
	}
}

unsafe extern "C" fn get_param_set(
	image_effect: OfxImageEffectHandle,
	param_set: *mut OfxParamSetHandle,
) -> OfxStatus {
	match effect(image_effect) {
		Some(effect) => {
			*param_set = effect.params.handle();
			eOfxStatus_OK
		}
		None => eOfxStatus_ErrBadHandle,
	}
}

unsafe extern "C" fn clip_define(
	image_effect: OfxImageEffectHandle,
	name: CharPtr,
	property_set: *mut OfxPropertySetHandle,
) -> OfxStatus {
	match (effect(image_effect), property_name(name)) {
		(Some(effect), Some(name)) => status_of(effect.define_clip(&name), |clip| {
			*property_set = clip.properties.handle()
		}),
		_ => eOfxStatus_ErrBadHandle,
	}
}

unsafe extern "C" fn clip_get_handle(
	image_effect: OfxImageEffectHandle,
	name: CharPtr,
	clip: *mut OfxImageClipHandle,
	property_set: *mut OfxPropertySetHandle,
) -> OfxStatus {
	let found = match (effect(image_effect), property_name(name)) {
		(Some(effect), Some(name)) => effect.clip(&name),
		_ => None,
	};
	match found {
		Some(found) => {
			*clip = found.handle();
			if !property_set.is_null() {
				*property_set = found.properties.handle();
			}
			eOfxStatus_OK
		}
		None => eOfxStatus_ErrBadHandle,
	}
}

unsafe extern "C" fn clip_get_property_set(
	clip_handle: OfxImageClipHandle,
	prop_handle: *mut OfxPropertySetHandle,
) -> OfxStatus {
	match clip(clip_handle) {
		Some(clip) => {
			*prop_handle = clip.properties.handle();
			eOfxStatus_OK
		}
		None => eOfxStatus_ErrBadHandle,
	}
}

unsafe extern "C" fn clip_get_image(
	clip_handle: OfxImageClipHandle,
	time: OfxTime,
	_region: *const OfxRectD,
	image_handle: *mut OfxPropertySetHandle,
) -> OfxStatus {
	match clip(clip_handle) {
		Some(clip) => status_of(clip.fetch_image(time), |image| *image_handle = image),
		None => eOfxStatus_ErrBadHandle,
	}
}

unsafe extern "C" fn clip_release_image(image_handle: OfxPropertySetHandle) -> OfxStatus {
	let image = match store(image_handle) {
		Some(image) => image,
		None => return eOfxStatus_ErrBadHandle,
	};
	if image.int(IMAGE_RELEASED.as_bytes()) == Some(1) {
		return eOfxStatus_ErrBadHandle;
	}
	match image
		.pointer(CLIP_OF_IMAGE.as_bytes())
		.and_then(|ptr| clip(ptr as OfxImageClipHandle))
	{
		Some(clip) => {
			image.set_ints(IMAGE_RELEASED.as_bytes(), &[1]);
			clip.released.set(clip.released.get() + 1);
			eOfxStatus_OK
		}
		None => eOfxStatus_ErrBadHandle,
	}
}

unsafe extern "C" fn abort(image_effect: OfxImageEffectHandle) -> Int {
	effect(image_effect).map_or(0, |effect| effect.aborted.get() as Int)
}

unsafe extern "C" fn param_define(
	param_set_handle: OfxParamSetHandle,
	param_type: CharPtr,
	name: CharPtr,
	property_set: *mut OfxPropertySetHandle,
) -> OfxStatus {
	match (
		param_set(param_set_handle),
		property_name(param_type),
		property_name(name),
	) {
		(Some(params), Some(param_type), Some(name)) => {
			if ParamType::from_str_value(&param_type).is_err() {
				return eOfxStatus_ErrUnknown;
			}
			status_of(params.define(&param_type, &name), |param| {
				if !property_set.is_null() {
					*property_set = param.properties.handle();
				}
			})
		}
		(None, _, _) => eOfxStatus_ErrBadHandle,
		_ => eOfxStatus_ErrUnknown,
	}
}

unsafe extern "C" fn param_get_handle(
	param_set_handle: OfxParamSetHandle,
	name: CharPtr,
	param: *mut OfxParamHandle,
	property_set: *mut OfxPropertySetHandle,
) -> OfxStatus {
	let found = match (param_set(param_set_handle), property_name(name)) {
		(Some(params), Some(name)) => params.get(&name),
		(None, _) => return eOfxStatus_ErrBadHandle,
		_ => None,
	};
	match found {
		Some(found) => {
			*param = Rc::as_ptr(&found) as OfxParamHandle;
			if !property_set.is_null() {
				*property_set = found.properties.handle();
			}
			eOfxStatus_OK
		}
		None => eOfxStatus_ErrUnknown,
	}
}

unsafe extern "C" fn param_set_get_property_set(
	param_set_handle: OfxParamSetHandle,
	prop_handle: *mut OfxPropertySetHandle,
) -> OfxStatus {
	match param_set(param_set_handle) {
		Some(params) => {
			*prop_handle = params.properties.handle();
			eOfxStatus_OK
		}
		None => eOfxStatus_ErrBadHandle,
	}
}

unsafe extern "C" fn param_get_property_set(
	param: OfxParamHandle,
	prop_handle: *mut OfxPropertySetHandle,
) -> OfxStatus {
	match (param as *const ParamStore).as_ref() {
		Some(param) => {
			*prop_handle = param.properties.handle();
			eOfxStatus_OK
		}
		None => eOfxStatus_ErrBadHandle,
	}
}

// Entries the test host does not provide stay None.
pub fn property_suite() -> &'static OfxPropertySuiteV1 {
	static SUITE: OnceLock<OfxPropertySuiteV1> = OnceLock::new();
	SUITE.get_or_init(|| {
		let mut suite: OfxPropertySuiteV1 = unsafe { std::mem::zeroed() };
		suite.propSetPointer = Some(prop_set_pointer);
		suite.propSetString = Some(prop_set_string);
		suite.propSetDouble = Some(prop_set_double);
		suite.propSetInt = Some(prop_set_int);
		suite.propGetPointer = Some(prop_get_pointer);
		suite.propGetString = Some(prop_get_string);
		suite.propGetDouble = Some(prop_get_double);
		suite.propGetInt = Some(prop_get_int);
		suite.propSetPointerN = Some(prop_set_pointer_n);
		suite.propSetStringN = Some(prop_set_string_n);
		suite.propSetDoubleN = Some(prop_set_double_n);
		suite.propSetIntN = Some(prop_set_int_n);
		suite.propGetPointerN = Some(prop_get_pointer_n);
		suite.propGetStringN = Some(prop_get_string_n);
		suite.propGetDoubleN = Some(prop_get_double_n);
		suite.propGetIntN = Some(prop_get_int_n);
		suite.propReset = Some(prop_reset);
		suite.propGetDimension = Some(prop_get_dimension);
		suite
	})
}

pub fn image_effect_suite() -> &'static OfxImageEffectSuiteV1 {
	static SUITE: OnceLock<OfxImageEffectSuiteV1> = OnceLock::new();
	SUITE.get_or_init(|| {
		let mut suite: OfxImageEffectSuiteV1 = unsafe { std::mem::zeroed() };
		suite.getPropertySet = Some(get_property_set);
		suite.getParamSet = Some(get_param_set);
		suite.clipDefine = Some(clip_define);
		suite.clipGetHandle = Some(clip_get_handle);
		suite.clipGetPropertySet = Some(clip_get_property_set);
		suite.clipGetImage = Some(clip_get_image);
		suite.clipReleaseImage = Some(clip_release_image);
		suite.abort = Some(abort);
		suite
	})
}

pub fn parameter_suite() -> &'static OfxParameterSuiteV1 {
	static SUITE: OnceLock<OfxParameterSuiteV1> = OnceLock::new();
	SUITE.get_or_init(|| {
		let mut suite: OfxParameterSuiteV1 = unsafe { std::mem::zeroed() };
		suite.paramDefine = Some(param_define);
		suite.paramGetHandle = Some(param_get_handle);
		suite.paramSetGetPropertySet = Some(param_set_get_property_set);
		suite.paramGetPropertySet = Some(param_get_property_set);
		suite
	})
}

unsafe extern "C" fn fetch_suite(
	_host: OfxPropertySetHandle,
	suite_name: CharPtr,
	suite_version: Int,
) -> VoidPtr {
	if suite_name.is_null() || suite_version != 1 {
		return std::ptr::null();
	}
	let name = CStr::from_ptr(suite_name).to_bytes_with_nul();
	if name == &kOfxPropertySuite[..] {
		property_suite() as *const OfxPropertySuiteV1 as VoidPtr
	} else if name == &kOfxImageEffectSuite[..] {
		image_effect_suite() as *const OfxImageEffectSuiteV1 as VoidPtr
	} else if name == &kOfxParameterSuite[..] {
		parameter_suite() as *const OfxParameterSuiteV1 as VoidPtr
	} else {
		std::ptr::null()
	}
}

/// The host side of a test: host properties plus the `OfxHost` handed to `setHost`.
pub struct MockHost {
	properties: Box<PropertyStore>,
	ofx_host: Box<OfxHost>,
}

impl Default for MockHost {
	fn default() -> Self {
		MockHost::new()
	}
}

impl MockHost {
	pub fn new() -> Self {
		let properties = Box::new(PropertyStore::default());
		properties.set_strings(kOfxPropName, &[HOST_NAME]);
		properties.set_strings(kOfxPropLabel, &[HOST_LABEL]);
		properties.set_strings(kOfxPropType, &[static_bytes_to_string(kOfxTypeImageEffectHost).as_str()]);
		properties.set_ints(kOfxImageEffectPropSupportsMultipleClipDepths, &[0]);
		let ofx_host = Box::new(OfxHost {
			host: properties.handle(),
			fetchSuite: Some(fetch_suite),
		});
		MockHost {
			properties,
			ofx_host,
		}
	}

	pub fn properties(&self) -> &PropertyStore {
		&self.properties
	}

	pub fn ofx_host(&self) -> &OfxHost {
		&self.ofx_host
	}

	/// Hands this host to a registered plugin, as `setHost` would.
	pub fn connect(&self, registry: &mut Registry, plugin_module: &str) -> Result<Int> {
		registry.dispatch(
			plugin_module,
			crate::plugin::RawMessage::SetHost {
				host: &self.ofx_host,
			},
		)
	}

	/// Sends `action` through the plugin's main entry and returns the reply status.
	pub fn call(
		&self,
		registry: &mut Registry,
		plugin_module: &str,
		action: &[u8],
		effect: Option<&EffectStore>,
		in_args: Option<&PropertyStore>,
	) -> Int {
		let action = match CStr::from_bytes_with_nul(action) {
			Ok(action) => action,
			Err(_) => return eOfxStatus_ErrUnknown,
		};
		registry.main_entry(
			plugin_module,
			action.as_ptr(),
			effect.map_or(std::ptr::null(), EffectStore::handle),
			in_args.map_or(std::ptr::null_mut(), PropertyStore::handle),
			std::ptr::null_mut(),
		)
	}
}

/// In args of describe in context.
pub fn describe_in_context_args(context: ImageEffectContext) -> PropertyStore {
	let args = PropertyStore::default();
	args.set_strings(kOfxImageEffectPropContext, &[context.to_string().as_str()]);
	args
}

/// In args of render, at full scale.
pub fn render_args(time: Time, window: RectI) -> PropertyStore {
	let args = PropertyStore::default();
	args.set_doubles(kOfxPropTime, &[time]);
	args.set_ints(
		kOfxImageEffectPropRenderWindow,
		&[window.x1, window.y1, window.x2, window.y2],
	);
	args.set_doubles(kOfxImageEffectPropRenderScale, &[1.0, 1.0]);
	args
}

/// In args of instance changed for a user edit.
pub fn instance_changed_args(object_type: Type, name: &str, time: Time) -> PropertyStore {
	let args = PropertyStore::default();
	args.set_strings(kOfxPropType, &[object_type.to_string().as_str()]);
	args.set_strings(kOfxPropName, &[name]);
	args.set_strings(kOfxPropChangeReason, &[Change::UserEdited.to_string().as_str()]);
	args.set_doubles(kOfxPropTime, &[time]);
	args
}
