use crate::enums::*;
use crate::handle::*;
use crate::property::*;
use crate::result::*;
use crate::suites::*;
use crate::types::*;
use ofx_sys::*;
use std::ffi::CStr;

#[derive(Debug)]
pub enum Action {
	Load,
	Unload,
	Describe(ImageEffectHandle),
	DescribeInContext(ImageEffectHandle, DescribeInContextInArgs),
	CreateInstance(ImageEffectHandle),
	DestroyInstance(ImageEffectHandle),
	InstanceChanged(ImageEffectHandle, InstanceChangedInArgs),
	Render(ImageEffectHandle, RenderInArgs),
	GenericGlobal(GlobalAction, ImageEffectHandle),
	GenericImageEffect(ImageEffectAction, ImageEffectHandle),
}

/// Either kind of action name the host can send to `mainEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionName {
	Global(GlobalAction),
	ImageEffect(ImageEffectAction),
}

impl ActionName {
	pub fn from_c_str(action: CharPtr) -> Result<Self> {
		if action.is_null() {
			return Err(Error::InvalidAction);
		}
		let name = unsafe { CStr::from_ptr(action) }.to_bytes_with_nul();
		if let Some(action) = ImageEffectAction::from_bytes(name) {
			Ok(ActionName::ImageEffect(action))
		} else if let Some(action) = GlobalAction::from_bytes(name) {
			Ok(ActionName::Global(action))
		} else {
			warn!("No action matching {}", String::from_utf8_lossy(name));
			Err(Error::InvalidAction)
		}
	}
}

pub trait MapAction {
	fn map_action(
		&self,
		action: ActionName,
		handle: VoidPtr,
		in_args: OfxPropertySetHandle,
		out_args: OfxPropertySetHandle,
	) -> Result<Action>;
}

impl MapAction for Suites {
	fn map_action(
		&self,
		action: ActionName,
		handle: VoidPtr,
		in_args: OfxPropertySetHandle,
		_out_args: OfxPropertySetHandle,
	) -> Result<Action> {
		let effect = || ImageEffectHandle::new(handle, self.clone());
		let args = || PropertySetHandle::new(in_args, self.property());
		match action {
			ActionName::Global(GlobalAction::Load) => Ok(Action::Load),
			ActionName::Global(GlobalAction::Unload) => Ok(Action::Unload),
			ActionName::Global(GlobalAction::Describe) => Ok(Action::Describe(effect()?)),
			ActionName::Global(GlobalAction::CreateInstance) => {
				Ok(Action::CreateInstance(effect()?))
			}
			ActionName::Global(GlobalAction::DestroyInstance) => {
				Ok(Action::DestroyInstance(effect()?))
			}
			ActionName::Global(GlobalAction::InstanceChanged) => Ok(Action::InstanceChanged(
				effect()?,
				InstanceChangedInArgs::from(args()?),
			)),
			ActionName::Global(other) => Ok(Action::GenericGlobal(other, effect()?)),
			ActionName::ImageEffect(ImageEffectAction::DescribeInContext) => Ok(
				Action::DescribeInContext(effect()?, DescribeInContextInArgs::from(args()?)),
			),
			ActionName::ImageEffect(ImageEffectAction::Render) => {
				Ok(Action::Render(effect()?, RenderInArgs::from(args()?)))
			}
			ActionName::ImageEffect(other) => Ok(Action::GenericImageEffect(other, effect()?)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn action_names_resolve() {
		assert_eq!(
			ActionName::from_c_str(kOfxActionDescribe.as_ptr() as CharPtr),
			Ok(ActionName::Global(GlobalAction::Describe))
		);
		assert_eq!(
			ActionName::from_c_str(kOfxImageEffectActionDescribeInContext.as_ptr() as CharPtr),
			Ok(ActionName::ImageEffect(ImageEffectAction::DescribeInContext))
		);
	}

	#[test]
	fn unknown_or_null_action_is_invalid() {
		assert_eq!(
			ActionName::from_c_str(b"OfxActionDoTheDishes\0".as_ptr() as CharPtr),
			Err(Error::InvalidAction)
		);
		assert_eq!(
			ActionName::from_c_str(std::ptr::null()),
			Err(Error::InvalidAction)
		);
	}
}
