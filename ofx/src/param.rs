//! Descriptor properties shared by the parameter types.
//!
//! Each `Param*Properties` type gets the capabilities matching what the OFX
//! headers allow on that parameter type, so that, for example, a push button
//! has no default value and a string has no numeric range.

use crate::enums::*;
use crate::property::*;
use crate::result::*;
use crate::types::*;
use ofx_sys::*;

pub trait CanSetLabels: Writable {
	fn set_label(&mut self, value: &str) -> Result<()> {
		self.set(kOfxPropLabel, value)
	}

	fn set_short_label(&mut self, value: &str) -> Result<()> {
		self.set(kOfxPropShortLabel, value)
	}

	fn set_long_label(&mut self, value: &str) -> Result<()> {
		self.set(kOfxPropLongLabel, value)
	}

	fn set_labels(&mut self, label: &str, short_label: &str, long_label: &str) -> Result<()> {
		self.set_label(label)?;
		self.set_short_label(short_label)?;
		self.set_long_label(long_label)
	}
}

pub trait CanSetHint: Writable {
	fn set_hint(&mut self, value: &str) -> Result<()> {
		self.set(kOfxParamPropHint, value)
	}
}

pub trait CanSetScriptName: Writable {
	fn set_script_name(&mut self, value: &str) -> Result<()> {
		self.set(kOfxParamPropScriptName, value)
	}
}

pub trait CanSetParent: Writable {
	fn set_parent(&mut self, value: &str) -> Result<()> {
		self.set(kOfxParamPropParent, value)
	}
}

/// A value that can be written to a parameter property, one slot per dimension.
pub trait ParamValue: Copy {
	fn set_into<P: Writable + ?Sized>(self, properties: &mut P, name: StaticName) -> Result<()>;
}

impl ParamValue for Int {
	fn set_into<P: Writable + ?Sized>(self, properties: &mut P, name: StaticName) -> Result<()> {
		properties.set(name, self)
	}
}

impl ParamValue for Double {
	fn set_into<P: Writable + ?Sized>(self, properties: &mut P, name: StaticName) -> Result<()> {
		properties.set(name, self)
	}
}

impl ParamValue for Bool {
	fn set_into<P: Writable + ?Sized>(self, properties: &mut P, name: StaticName) -> Result<()> {
		properties.set(name, self)
	}
}

impl<T, const N: usize> ParamValue for [T; N]
where
	T: ValueSet + Copy,
{
	fn set_into<P: Writable + ?Sized>(self, properties: &mut P, name: StaticName) -> Result<()> {
		properties.set_all(name, &self)
	}
}

impl ParamValue for RGBAColourD {
	fn set_into<P: Writable + ?Sized>(self, properties: &mut P, name: StaticName) -> Result<()> {
		properties.set_all(name, &[self.r, self.g, self.b, self.a])
	}
}

impl ParamValue for RGBColourD {
	fn set_into<P: Writable + ?Sized>(self, properties: &mut P, name: StaticName) -> Result<()> {
		properties.set_all(name, &[self.r, self.g, self.b])
	}
}

pub trait CanSetDefault: Writable {
	type Value: ParamValue;

	fn set_default(&mut self, value: Self::Value) -> Result<()> {
		value.set_into(self, kOfxParamPropDefault)
	}
}

pub trait CanSetRange: CanSetDefault {
	fn set_min(&mut self, value: Self::Value) -> Result<()> {
		value.set_into(self, kOfxParamPropMin)
	}

	fn set_max(&mut self, value: Self::Value) -> Result<()> {
		value.set_into(self, kOfxParamPropMax)
	}

	fn set_display_min(&mut self, value: Self::Value) -> Result<()> {
		value.set_into(self, kOfxParamPropDisplayMin)
	}

	fn set_display_max(&mut self, value: Self::Value) -> Result<()> {
		value.set_into(self, kOfxParamPropDisplayMax)
	}

	fn set_range(&mut self, min: Self::Value, max: Self::Value) -> Result<()> {
		self.set_min(min)?;
		self.set_max(max)
	}

	fn set_display_range(&mut self, min: Self::Value, max: Self::Value) -> Result<()> {
		self.set_display_min(min)?;
		self.set_display_max(max)
	}
}

pub trait CanSetDoubleType: Writable {
	fn set_double_type(&mut self, value: ParamDoubleType) -> Result<()> {
		self.set_enum(kOfxParamPropDoubleType, value)
	}
}

pub trait CanSetStringType: Writable {
	fn set_string_type(&mut self, value: ParamStringType) -> Result<()> {
		self.set_enum(kOfxParamPropStringMode, value)
	}
}

macro_rules! capabilities {
	($trait_name:ident for $($name:ident),*) => {
		$(impl $trait_name for $name {})*
	};
}

macro_rules! default_value {
	($($name:ident => $value:ty),*) => {
		$(impl CanSetDefault for $name {
			type Value = $value;
		})*
	};
}

capabilities!(CanSetLabels for
	ParamIntegerProperties, ParamInteger2DProperties, ParamInteger3DProperties,
	ParamDoubleProperties, ParamDouble2DProperties, ParamDouble3DProperties,
	ParamBooleanProperties, ParamChoiceProperties, ParamRGBAProperties, ParamRGBProperties,
	ParamStringProperties, ParamCustomProperties, ParamPushButtonProperties,
	ParamPageProperties, EffectDescriptorProperties);

capabilities!(CanSetHint for
	ParamIntegerProperties, ParamInteger2DProperties, ParamInteger3DProperties,
	ParamDoubleProperties, ParamDouble2DProperties, ParamDouble3DProperties,
	ParamBooleanProperties, ParamChoiceProperties, ParamRGBAProperties, ParamRGBProperties,
	ParamStringProperties, ParamCustomProperties, ParamPushButtonProperties);

capabilities!(CanSetScriptName for
	ParamIntegerProperties, ParamInteger2DProperties, ParamInteger3DProperties,
	ParamDoubleProperties, ParamDouble2DProperties, ParamDouble3DProperties,
	ParamBooleanProperties, ParamChoiceProperties, ParamRGBAProperties, ParamRGBProperties,
	ParamStringProperties, ParamCustomProperties, ParamPushButtonProperties);

capabilities!(CanSetParent for
	ParamIntegerProperties, ParamInteger2DProperties, ParamInteger3DProperties,
	ParamDoubleProperties, ParamDouble2DProperties, ParamDouble3DProperties,
	ParamBooleanProperties, ParamChoiceProperties, ParamRGBAProperties, ParamRGBProperties,
	ParamStringProperties, ParamCustomProperties, ParamPushButtonProperties);

default_value!(
	ParamIntegerProperties => Int,
	ParamInteger2DProperties => [Int; 2],
	ParamInteger3DProperties => [Int; 3],
	ParamDoubleProperties => Double,
	ParamDouble2DProperties => [Double; 2],
	ParamDouble3DProperties => [Double; 3],
	ParamBooleanProperties => Bool,
	ParamChoiceProperties => Int,
	ParamRGBAProperties => RGBAColourD,
	ParamRGBProperties => RGBColourD
);

capabilities!(CanSetRange for
	ParamIntegerProperties, ParamInteger2DProperties, ParamInteger3DProperties,
	ParamDoubleProperties, ParamDouble2DProperties, ParamDouble3DProperties);

capabilities!(CanSetDoubleType for
	ParamDoubleProperties, ParamDouble2DProperties, ParamDouble3DProperties);

capabilities!(CanSetStringType for ParamStringProperties);

impl ParamStringProperties {
	pub fn set_default(&mut self, value: &str) -> Result<()> {
		self.set(kOfxParamPropDefault, value)
	}
}

impl ParamCustomProperties {
	pub fn set_default(&mut self, value: &str) -> Result<()> {
		self.set(kOfxParamPropDefault, value)
	}
}

impl ParamChoiceProperties {
	pub fn append_option(&mut self, value: &str) -> Result<()> {
		self.append(kOfxParamPropChoiceOption, value)
	}

	pub fn reset_options(&mut self) -> Result<()> {
		self.reset(kOfxParamPropChoiceOption)
	}

	pub fn set_options(&mut self, values: &[&str]) -> Result<()> {
		self.reset_options()?;
		values
			.iter()
			.try_for_each(|value| self.append_option(value))
	}
}

impl ParamPageProperties {
	pub fn set_children(&mut self, values: &[&str]) -> Result<()> {
		self.set_all(kOfxParamPropPageChild, values)
	}

	pub fn append_child(&mut self, value: &str) -> Result<()> {
		self.append(kOfxParamPropPageChild, value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::PropertyStore;

	#[test]
	fn ranges_are_written_per_dimension() {
		let store = PropertyStore::default();
		let mut props = ParamDouble2DProperties::from(store.property_set_handle());
		props.set_default([0.0, 0.5]).unwrap();
		props.set_range([-1.0, -2.0], [1.0, 2.0]).unwrap();
		props.set_display_range([-1.0, -1.0], [1.0, 1.0]).unwrap();

		assert_eq!(store.doubles(kOfxParamPropDefault), Some(vec![0.0, 0.5]));
		assert_eq!(store.doubles(kOfxParamPropMin), Some(vec![-1.0, -2.0]));
		assert_eq!(store.doubles(kOfxParamPropMax), Some(vec![1.0, 2.0]));
		assert_eq!(store.doubles(kOfxParamPropDisplayMax), Some(vec![1.0, 1.0]));
	}

	#[test]
	fn colours_write_every_channel() {
		let store = PropertyStore::default();
		let mut props = ParamRGBAProperties::from(store.property_set_handle());
		props
			.set_default(RGBAColourD {
				r: 0.0,
				g: 0.25,
				b: 0.5,
				a: 1.0,
			})
			.unwrap();

		assert_eq!(
			store.doubles(kOfxParamPropDefault),
			Some(vec![0.0, 0.25, 0.5, 1.0])
		);
	}

	#[test]
	fn integer_defaults_are_ints() {
		let store = PropertyStore::default();
		let mut props = ParamInteger3DProperties::from(store.property_set_handle());
		props.set_default([1, 2, 3]).unwrap();
		props.set_range([-100; 3], [100; 3]).unwrap();

		assert_eq!(store.ints(kOfxParamPropDefault), Some(vec![1, 2, 3]));
		assert_eq!(store.ints(kOfxParamPropMin), Some(vec![-100, -100, -100]));
	}

	#[test]
	fn choice_options_reset_and_append() {
		let store = PropertyStore::default();
		let mut props = ParamChoiceProperties::from(store.property_set_handle());
		props.append_option("This").unwrap();
		props.append_option("That").unwrap();
		props.reset_options().unwrap();
		props.append_option("Tom").unwrap();

		assert_eq!(
			store.strings(kOfxParamPropChoiceOption),
			Some(vec!["Tom".to_owned()])
		);
	}

	#[test]
	fn labels_and_types() {
		let store = PropertyStore::default();
		let mut props = ParamStringProperties::from(store.property_set_handle());
		props.set_labels("a", "b", "c").unwrap();
		props.set_string_type(ParamStringType::FilePath).unwrap();
		props.set_default("wibble").unwrap();
		props.set_parent("strings").unwrap();

		assert_eq!(store.string(kOfxPropLabel), Some("a".to_owned()));
		assert_eq!(store.string(kOfxPropShortLabel), Some("b".to_owned()));
		assert_eq!(store.string(kOfxPropLongLabel), Some("c".to_owned()));
		assert_eq!(
			store.string(kOfxParamPropStringMode),
			Some("OfxParamStringIsFilePath".to_owned())
		);
		assert_eq!(store.string(kOfxParamPropDefault), Some("wibble".to_owned()));
		assert_eq!(store.string(kOfxParamPropParent), Some("strings".to_owned()));
	}

	#[test]
	fn page_children() {
		let store = PropertyStore::default();
		let mut props = ParamPageProperties::from(store.property_set_handle());
		props.set_children(&["Int", "Int2D"]).unwrap();
		props.append_child("Int3D").unwrap();

		assert_eq!(
			store.strings(kOfxParamPropPageChild),
			Some(vec!["Int".to_owned(), "Int2D".to_owned(), "Int3D".to_owned()])
		);
	}
}
