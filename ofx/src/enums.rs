use crate::result::*;
use ofx_sys::*;
use std::fmt;

/// An enumeration whose values are identified by string constants in the OFX headers.
pub trait IdentifiedEnum: Sized + Copy {
	fn to_bytes(&self) -> &'static [u8];
	fn from_bytes(ofx_name: &[u8]) -> Option<Self>;
	fn values() -> &'static [Self];

	/// Matches a string read back from the host, which comes without the trailing nul.
	fn from_str_value(value: &str) -> Result<Self> {
		Self::values()
			.iter()
			.find(|v| {
				let bytes = v.to_bytes();
				&bytes[..bytes.len() - 1] == value.as_bytes()
			})
			.cloned()
			.ok_or(Error::EnumNotFound)
	}
}

macro_rules! identified_enum {{
		pub enum $name:ident {
			$($key:ident => $value:ident),*
		}
	} => {
		#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
		pub enum $name {
			$($key),
			*
		}

		impl IdentifiedEnum for $name {
			fn to_bytes(&self) -> &'static [u8] {
				match *self {
					$($name::$key => $value),
					*
				}
			}

			fn from_bytes(ofx_name: &[u8]) -> Option<Self> {
				$(if ofx_name == &$value[..] {
					Some($name::$key)
				} else)
				*
				{
					None
				}
			}

			fn values() -> &'static [Self] {
				&[$($name::$key),*]
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
				let bytes = self.to_bytes();
				write!(f, "{}", String::from_utf8_lossy(&bytes[..bytes.len() - 1]))
			}
		}
	}
}

identified_enum! {
	pub enum ImageEffectContext {
		Filter => kOfxImageEffectContextFilter,
		General => kOfxImageEffectContextGeneral,
		Generator => kOfxImageEffectContextGenerator,
		Transition => kOfxImageEffectContextTransition,
		Paint => kOfxImageEffectContextPaint,
		Retimer => kOfxImageEffectContextRetimer
	}
}

impl ImageEffectContext {
	pub fn is_general(self) -> bool {
		self == ImageEffectContext::General
	}

	/// Contexts that receive a "Source" clip.
	pub fn has_simple_input(self) -> bool {
		match self {
			ImageEffectContext::Filter
			| ImageEffectContext::General
			| ImageEffectContext::Paint
			| ImageEffectContext::Retimer => true,
			_ => false,
		}
	}
}

identified_enum! {
	pub enum BitDepth {
		None => kOfxBitDepthNone,
		Byte => kOfxBitDepthByte,
		Short => kOfxBitDepthShort,
		Half => kOfxBitDepthHalf,
		Float => kOfxBitDepthFloat
	}
}

identified_enum! {
	pub enum ImageComponent {
		None => kOfxImageComponentNone,
		RGBA => kOfxImageComponentRGBA,
		RGB => kOfxImageComponentRGB,
		Alpha => kOfxImageComponentAlpha
	}
}

identified_enum! {
	pub enum ParamType {
		Integer => kOfxParamTypeInteger,
		Double => kOfxParamTypeDouble,
		Boolean => kOfxParamTypeBoolean,
		Choice => kOfxParamTypeChoice,
		RGBA => kOfxParamTypeRGBA,
		RGB => kOfxParamTypeRGB,
		Double2D => kOfxParamTypeDouble2D,
		Integer2D => kOfxParamTypeInteger2D,
		Double3D => kOfxParamTypeDouble3D,
		Integer3D => kOfxParamTypeInteger3D,
		String => kOfxParamTypeString,
		Custom => kOfxParamTypeCustom,
		Group => kOfxParamTypeGroup,
		Page => kOfxParamTypePage,
		PushButton => kOfxParamTypePushButton
	}
}

identified_enum! {
	pub enum ParamDoubleType {
		Plain => kOfxParamDoubleTypePlain,
		Angle => kOfxParamDoubleTypeAngle,
		Scale => kOfxParamDoubleTypeScale,
		Time => kOfxParamDoubleTypeTime,
		AbsoluteTime => kOfxParamDoubleTypeAbsoluteTime,
		NormalisedX => kOfxParamDoubleTypeNormalisedX,
		NormalisedY => kOfxParamDoubleTypeNormalisedY,
		NormalisedXAbsolute => kOfxParamDoubleTypeNormalisedXAbsolute,
		NormalisedYAbsolute => kOfxParamDoubleTypeNormalisedYAbsolute,
		NormalisedXY => kOfxParamDoubleTypeNormalisedXY,
		NormalisedXYAbsolute => kOfxParamDoubleTypeNormalisedXYAbsolute
	}
}

identified_enum! {
	pub enum ParamStringType {
		SingleLine => kOfxParamStringIsSingleLine,
		MultiLine => kOfxParamStringIsMultiLine,
		FilePath => kOfxParamStringIsFilePath,
		DirectoryPath => kOfxParamStringIsDirectoryPath,
		Label => kOfxParamStringIsLabel
	}
}

identified_enum! {
	pub enum RenderThreadSafety {
		Unsafe => kOfxImageEffectRenderUnsafe,
		InstanceSafe => kOfxImageEffectRenderInstanceSafe,
		FullySafe => kOfxImageEffectRenderFullySafe
	}
}

identified_enum! {
	pub enum Type {
		ImageEffectHost => kOfxTypeImageEffectHost,
		ImageEffect => kOfxTypeImageEffect,
		ImageEffectInstance => kOfxTypeImageEffectInstance,
		Parameter => kOfxTypeParameter,
		Clip => kOfxTypeClip,
		Image => kOfxTypeImage
	}
}

identified_enum! {
	pub enum Change {
		UserEdited => kOfxChangeUserEdited,
		PluginEdited => kOfxChangePluginEdited,
		Time => kOfxChangeTime
	}
}

identified_enum! {
	pub enum GlobalAction {
		Load => kOfxActionLoad,
		Describe => kOfxActionDescribe,
		Unload => kOfxActionUnload,
		PurgeCaches => kOfxActionPurgeCaches,
		SyncPrivateData => kOfxActionSyncPrivateData,
		CreateInstance => kOfxActionCreateInstance,
		DestroyInstance => kOfxActionDestroyInstance,
		InstanceChanged => kOfxActionInstanceChanged,
		BeginInstanceChanged => kOfxActionBeginInstanceChanged,
		EndInstanceChanged => kOfxActionEndInstanceChanged,
		BeginInstanceEdit => kOfxActionBeginInstanceEdit,
		EndInstanceEdit => kOfxActionEndInstanceEdit
	}
}

identified_enum! {
	pub enum ImageEffectAction {
		GetRegionOfDefinition => kOfxImageEffectActionGetRegionOfDefinition,
		GetRegionsOfInterest => kOfxImageEffectActionGetRegionsOfInterest,
		GetTimeDomain => kOfxImageEffectActionGetTimeDomain,
		GetFramesNeeded => kOfxImageEffectActionGetFramesNeeded,
		GetClipPreferences => kOfxImageEffectActionGetClipPreferences,
		IsIdentity => kOfxImageEffectActionIsIdentity,
		Render => kOfxImageEffectActionRender,
		BeginSequenceRender => kOfxImageEffectActionBeginSequenceRender,
		EndSequenceRender => kOfxImageEffectActionEndSequenceRender,
		DescribeInContext => kOfxImageEffectActionDescribeInContext
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn context_round_trip_through_header_names() {
		for context in ImageEffectContext::values() {
			assert_eq!(
				ImageEffectContext::from_bytes(context.to_bytes()),
				Some(*context)
			);
		}
	}

	#[test]
	fn values_read_back_from_host_match_without_nul() {
		assert_eq!(
			ParamDoubleType::from_str_value("OfxParamDoubleTypeAngle"),
			Ok(ParamDoubleType::Angle)
		);
		assert_eq!(
			Change::from_str_value("OfxChangeUserEdited"),
			Ok(Change::UserEdited)
		);
		assert_eq!(
			BitDepth::from_str_value("OfxBitDepthNotADepth"),
			Err(Error::EnumNotFound)
		);
	}

	#[test]
	fn display_drops_the_nul() {
		assert_eq!(
			format!("{}", ImageComponent::RGBA),
			"OfxImageComponentRGBA"
		);
	}

	#[test]
	fn actions_are_told_apart() {
		assert_eq!(
			GlobalAction::from_bytes(kOfxActionLoad),
			Some(GlobalAction::Load)
		);
		assert_eq!(ImageEffectAction::from_bytes(kOfxActionLoad), None);
		assert_eq!(
			ImageEffectAction::from_bytes(kOfxImageEffectActionRender),
			Some(ImageEffectAction::Render)
		);
	}

	#[test]
	fn simple_input_contexts() {
		assert!(ImageEffectContext::Filter.has_simple_input());
		assert!(!ImageEffectContext::Generator.has_simple_input());
		assert!(ImageEffectContext::General.is_general());
	}
}
