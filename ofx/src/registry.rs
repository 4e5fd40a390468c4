use crate::plugin::*;
use crate::result::*;
use crate::types::*;
use ofx_sys::*;
use std::collections::HashMap;
use std::panic;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Log4rs YAML file replacing the built-in logging setup.
pub const LOG_CONFIG_ENV: &str = "OFX_RS_LOG_CONFIG";
/// Level for the binding layer and the plugin crate when no config file is given.
pub const LOG_LEVEL_ENV: &str = "OFX_RS_LOG";

pub struct Registry {
	plugins: Vec<PluginDescriptor>,
	plugin_modules: HashMap<String, usize>,
}

impl Default for Registry {
	fn default() -> Self {
		Registry::new()
	}
}

impl Registry {
	pub fn new() -> Registry {
		Registry {
			plugin_modules: HashMap::new(),
			plugins: Vec::new(),
		}
	}

	#[allow(clippy::too_many_arguments)]
	pub fn add(
		&mut self,
		module_name: &'static str,
		name: &'static str,
		api_version: ApiVersion,
		plugin_version: PluginVersion,
		instance: Box<dyn Execute + Send>,
		set_host: SetHost,
		main_entry: MainEntry,
	) -> Result<usize> {
		if self.plugin_modules.contains_key(module_name) {
			return Err(Error::AlreadyExists);
		}
		let plugin_index = self.plugins.len();

		let plugin = PluginDescriptor::new(
			plugin_index,
			module_name,
			name,
			api_version,
			plugin_version,
			instance,
			set_host,
			main_entry,
		)?;

		self.plugin_modules
			.insert(module_name.to_owned(), plugin_index);
		self.plugins.push(plugin);
		Ok(plugin_index)
	}

	pub fn count(&self) -> Int {
		self.plugins.len() as Int
	}

	pub fn get_plugin(&self, index: usize) -> Option<&PluginDescriptor> {
		self.plugins.get(index)
	}

	pub fn find_plugin(&self, plugin_module: &str) -> Option<&PluginDescriptor> {
		self.plugin_modules
			.get(plugin_module)
			.and_then(|&index| self.plugins.get(index))
	}

	pub fn ofx_plugin(&self, index: Int) -> Option<&OfxPlugin> {
		if index < 0 {
			None
		} else {
			self.get_plugin(index as usize)
				.map(PluginDescriptor::ofx_plugin)
		}
	}

	pub fn dispatch(&mut self, plugin_module: &str, message: RawMessage) -> Result<Int> {
		trace!("{}:{:?}", plugin_module, message);
		let plugin_index = *self
			.plugin_modules
			.get(plugin_module)
			.ok_or(Error::PluginNotFound)?;
		let result = self.plugins[plugin_index].dispatch(message);
		if let Err(e) = result {
			error!("{} failed: {}", plugin_module, e);
		}
		result
	}

	/// Dispatches a raw main entry call, turning the outcome into the status the host expects.
	pub fn main_entry(
		&mut self,
		plugin_module: &str,
		action: CharPtr,
		handle: VoidPtr,
		in_args: OfxPropertySetHandle,
		out_args: OfxPropertySetHandle,
	) -> Int {
		let message = RawMessage::MainEntry {
			action,
			handle,
			in_args,
			out_args,
		};
		match self.dispatch(plugin_module, message) {
			Ok(status) => status,
			Err(e) => e.status(),
		}
	}
}

static GLOBAL_REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();

fn lock_registry() -> Option<MutexGuard<'static, Registry>> {
	let registry = GLOBAL_REGISTRY.get()?;
	// a panicking action must not take every later call down with it
	Some(registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
}

pub fn with_registry<F, T>(f: F) -> Option<T>
where
	F: FnOnce(&mut Registry) -> T,
{
	lock_registry().map(|mut registry| f(&mut registry))
}

pub fn set_host_for_plugin(plugin_module: &str, host: *mut OfxHost) {
	if host.is_null() {
		error!("{} received a null host", plugin_module);
		return;
	}
	let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
		with_registry(|registry| {
			registry
				.dispatch(plugin_module, RawMessage::SetHost { host: unsafe { &*host } })
				.ok();
		})
	}));
	if outcome.is_err() {
		error!("{} panicked while setting the host", plugin_module);
	}
}

pub fn main_entry_for_plugin(
	plugin_module: &str,
	action: CharPtr,
	handle: VoidPtr,
	in_args: OfxPropertySetHandle,
	out_args: OfxPropertySetHandle,
) -> Int {
	let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
		with_registry(|registry| {
			registry.main_entry(plugin_module, action, handle, in_args, out_args)
		})
	}));
	match outcome {
		Ok(Some(status)) => status,
		Ok(None) => {
			error!("{} called before the registry was built", plugin_module);
			eOfxStatus_ErrFatal
		}
		Err(_) => {
			error!("{} panicked", plugin_module);
			eOfxStatus_ErrFatal
		}
	}
}

fn parse_log_level(level: Option<&str>) -> log::LevelFilter {
	level
		.and_then(|level| log::LevelFilter::from_str(level.trim()).ok())
		.unwrap_or(log::LevelFilter::Info)
}

fn default_log_config(
	plugin_target: &str,
	level: log::LevelFilter,
) -> std::result::Result<log4rs::Config, String> {
	use log4rs::append::console::*;
	use log4rs::config::*;
	use log4rs::encode::pattern::PatternEncoder;

	let stderr = ConsoleAppender::builder()
		.target(Target::Stderr)
		.encoder(Box::new(PatternEncoder::new("{d} {l} {t} - {m}{n}")))
		.build();

	let mut builder = Config::builder()
		.appender(Appender::builder().build("stderr", Box::new(stderr)))
		.logger(Logger::builder().build("ofx", level));
	if plugin_target != "ofx" {
		builder = builder.logger(Logger::builder().build(plugin_target, level));
	}
	builder
		.build(Root::builder().appender("stderr").build(log::LevelFilter::Error))
		.map_err(|e| e.to_string())
}

/// The configuration file at `config_path` if it loads, the console setup otherwise.
fn log_config(
	config_path: Option<&str>,
	level: log::LevelFilter,
	plugin_target: &str,
) -> std::result::Result<log4rs::Config, String> {
	if let Some(path) = config_path {
		match log4rs::config::load_config_file(path, Default::default()) {
			Ok(config) => return Ok(config),
			Err(e) => eprintln!("ofx: ignoring log config {}: {}", path, e),
		}
	}
	default_log_config(plugin_target, level)
}

/// Sets up logging once per process. Another logger already being installed is not an error.
pub fn init_logging(plugin_target: &str) {
	let config_path = std::env::var(LOG_CONFIG_ENV).ok();
	let level = parse_log_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
	let outcome = log_config(config_path.as_deref(), level, plugin_target).and_then(|config| {
		log4rs::init_config(config)
			.map(|_| ())
			.map_err(|e| e.to_string())
	});
	if let Err(e) = outcome {
		eprintln!("ofx: logging not configured: {}", e);
	}
}

pub fn init_registry<F>(init_function: F, plugin_target: &'static str)
where
	F: Fn(&mut Registry),
{
	GLOBAL_REGISTRY.get_or_init(|| {
		init_logging(plugin_target);
		let mut registry = Registry::new();
		init_function(&mut registry);
		for plugin in &registry.plugins {
			info!("Registered plugin {}", plugin);
		}
		Mutex::new(registry)
	});
}

pub fn plugin_count() -> Int {
	with_registry(|registry| registry.count()).unwrap_or(0)
}

pub fn ofx_plugin_ptr(index: Int) -> *const OfxPlugin {
	// descriptors are never removed once registered, so the address outlives the lock
	with_registry(|registry| {
		registry
			.ofx_plugin(index)
			.map(|plugin| plugin as *const OfxPlugin)
	})
	.flatten()
	.unwrap_or(std::ptr::null())
}

#[macro_export]
macro_rules! plugin_module {
	($name:expr, $api_version:expr, $plugin_version:expr, $factory:expr) => {
		pub fn name() -> &'static str {
			$name
		}

		pub fn module_name() -> &'static str {
			module_path!()
		}

		pub fn new_instance() -> Box<dyn $crate::Execute + Send> {
			Box::new($factory())
		}

		pub fn api_version() -> $crate::ApiVersion {
			$api_version
		}

		pub fn plugin_version() -> $crate::PluginVersion {
			$plugin_version
		}

		pub extern "C" fn set_host(host: *mut $crate::OfxHost) {
			$crate::set_host_for_plugin(module_name(), host)
		}

		pub extern "C" fn main_entry(
			action: $crate::CharPtr,
			handle: $crate::VoidPtr,
			in_args: $crate::OfxPropertySetHandle,
			out_args: $crate::OfxPropertySetHandle,
		) -> $crate::Int {
			$crate::main_entry_for_plugin(module_name(), action, handle, in_args, out_args)
		}
	};
}

#[macro_export]
macro_rules! register_plugin {
	($registry:ident, $module:ident) => {
		if let Err(e) = $registry.add(
			$module::module_name(),
			$module::name(),
			$module::api_version(),
			$module::plugin_version(),
			$module::new_instance(),
			$module::set_host,
			$module::main_entry,
		) {
			$crate::log::error!("Could not register {}: {}", $module::name(), e);
		}
	};
}

#[macro_export]
macro_rules! build_plugin_registry {
	($init_callback:ident) => {
		fn init() {
			$crate::init_registry($init_callback, module_path!());
		}

		#[no_mangle]
		pub extern "C" fn OfxGetNumberOfPlugins() -> $crate::Int {
			init();
			$crate::plugin_count()
		}

		#[no_mangle]
		pub extern "C" fn OfxGetPlugin(nth: $crate::Int) -> *const $crate::OfxPlugin {
			init();
			$crate::ofx_plugin_ptr(nth)
		}
	};
}

#[macro_export]
macro_rules! register_modules {
	( $ ($module:ident), *) => {
		pub fn register_plugins(registry: &mut $crate::Registry) {
			$($crate::register_plugin!(registry, $module);
			)*
		}

		$crate::build_plugin_registry!(register_plugins);
	};
}
