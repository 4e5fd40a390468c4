use crate::action::*;
use crate::enums::*;
use crate::property::*;
use crate::result::*;
use crate::suites::*;
use crate::types::*;
use ofx_sys::*;
use std::ffi::{CStr, CString};
use std::fmt;
use std::fmt::Display;

pub struct ApiVersion(pub Int);
pub struct PluginVersion(pub UnsignedInt, pub UnsignedInt);

#[macro_export]
macro_rules! static_str (
	($name:expr) => { unsafe { std::ffi::CStr::from_bytes_with_nul_unchecked($name).as_ptr() } }
);

/// What a plugin can reach of the host while it is loaded.
pub struct PluginContext {
	host: HostProperties,
	suites: Suites,
}

impl PluginContext {
	pub fn get_host(&self) -> &HostProperties {
		&self.host
	}

	pub fn suites(&self) -> &Suites {
		&self.suites
	}
}

pub trait Execute {
	fn execute(&mut self, context: &PluginContext, action: &mut Action) -> Result<Int>;
}

#[derive(Debug)]
pub enum RawMessage<'a> {
	SetHost {
		host: &'a OfxHost,
	},
	MainEntry {
		action: CharPtr,
		handle: VoidPtr,
		in_args: OfxPropertySetHandle,
		out_args: OfxPropertySetHandle,
	},
}

pub trait Dispatch {
	fn dispatch(&mut self, message: RawMessage) -> Result<Int>;
}

pub struct PluginDescriptor {
	plugin_id: CString,
	module_name: String,
	plugin_index: usize,
	host: Option<OfxHost>,
	context: Option<PluginContext>,
	instance: Box<dyn Execute + Send>,
	ofx_plugin: OfxPlugin, // need an owned copy for the lifetime of the plugin
}

// The raw pointers held here are only handed to the host, which owns their
// targets for the lifetime of the binary; all access goes through the registry lock.
unsafe impl Send for PluginDescriptor {}

impl Display for PluginDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{:?} {} {}",
			self.plugin_id, self.module_name, self.plugin_index
		)
	}
}

impl Dispatch for PluginDescriptor {
	fn dispatch(&mut self, message: RawMessage) -> Result<Int> {
		match message {
			RawMessage::SetHost { host } => {
				self.host = Some(*host);
				OK
			}
			RawMessage::MainEntry {
				action,
				handle,
				in_args,
				out_args,
			} => {
				let action_name = ActionName::from_c_str(action)?;
				debug!("{} received {:?}", self.module_name, action_name);
				match action_name {
					ActionName::Global(GlobalAction::Load) => self.load(),
					ActionName::Global(GlobalAction::Unload) => self.unload(),
					_ => {
						let context = self.context.as_ref().ok_or(Error::PluginNotReady)?;
						let mut mapped_action =
							context
								.suites
								.map_action(action_name, handle, in_args, out_args)?;
						self.instance.execute(context, &mut mapped_action)
					}
				}
			}
		}
	}
}

impl PluginDescriptor {
	pub(crate) fn new(
		plugin_index: usize,
		module_name: &'static str,
		name: &'static str,
		api_version: ApiVersion,
		plugin_version: PluginVersion,
		instance: Box<dyn Execute + Send>,
		set_host: SetHost,
		main_entry: MainEntry,
	) -> Result<PluginDescriptor> {
		let plugin_id = CString::new(name)?;

		let ofx_plugin = OfxPlugin {
			pluginApi: static_str!(kOfxImageEffectPluginApi),
			apiVersion: api_version.0,
			pluginVersionMajor: plugin_version.0,
			pluginVersionMinor: plugin_version.1,
			pluginIdentifier: plugin_id.as_ptr(),
			setHost: Some(set_host),
			mainEntry: Some(main_entry),
		};

		Ok(PluginDescriptor {
			plugin_index,
			module_name: module_name.to_owned(),
			plugin_id,
			instance,
			host: None,
			context: None,
			ofx_plugin,
		})
	}

	fn load(&mut self) -> Result<Int> {
		let host = self.host.ok_or(Error::HostNotReady)?;
		let suites = Suites::fetch(&host)?;
		let host_properties = HostProperties::from(PropertySetHandle::new(
			host.host,
			suites.property(),
		)?);
		info!(
			"Loading {} in {}",
			self.module_name,
			host_properties
				.get_label()
				.or_else(|_| host_properties.get_name())
				.unwrap_or_else(|_| "an unnamed host".to_owned())
		);
		let context = PluginContext {
			host: host_properties,
			suites,
		};
		let status = self.instance.execute(&context, &mut Action::Load)?;
		self.context = Some(context);
		Ok(status)
	}

	fn unload(&mut self) -> Result<Int> {
		let context = self.context.take().ok_or(Error::PluginNotReady)?;
		info!("Unloading {}", self.module_name);
		self.instance.execute(&context, &mut Action::Unload)
	}

	pub fn module_name(&self) -> &str {
		&self.module_name
	}

	pub fn plugin_id(&self) -> &CStr {
		&self.plugin_id
	}

	pub fn ofx_plugin(&self) -> &OfxPlugin {
		&self.ofx_plugin
	}
}
