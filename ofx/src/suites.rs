use crate::result::*;
use crate::types::*;
use ofx_sys::*;
use std::ffi::CStr;
use std::sync::Arc;

macro_rules! suite_call {
	($function:ident in $suite:expr, $($arg:expr),*) => {
		unsafe { ($suite).$function.ok_or(Error::SuiteNotInitialized)?($($arg),*) }
	};
}

const V1: Int = 1;

/// The host suites the binding layer needs, copied out of the host at load time.
#[derive(Clone)]
pub struct Suites {
	image_effect: Arc<OfxImageEffectSuiteV1>,
	property: Arc<OfxPropertySuiteV1>,
	parameter: Arc<OfxParameterSuiteV1>,
}

unsafe fn fetch_suite<T: Copy>(host: &OfxHost, name: &[u8], version: Int) -> Result<T> {
	let fetch = host.fetchSuite.ok_or(Error::HostNotReady)?;
	let suite_name = CStr::from_bytes_with_nul(name)?;
	let suite_ptr = fetch(host.host, suite_name.as_ptr(), version);
	if suite_ptr.is_null() {
		warn!("Host does not provide {:?} v{}", suite_name, version);
		Err(Error::InvalidSuite)
	} else {
		debug!("Found {:?} v{} at {:?}", suite_name, version, suite_ptr);
		Ok(*(suite_ptr as *const T))
	}
}

impl Suites {
	pub fn new(
		image_effect: OfxImageEffectSuiteV1,
		property: OfxPropertySuiteV1,
		parameter: OfxParameterSuiteV1,
	) -> Self {
		Suites {
			image_effect: Arc::new(image_effect),
			property: Arc::new(property),
			parameter: Arc::new(parameter),
		}
	}

	/// Fetches every suite from the host, failing if any of them is missing.
	pub fn fetch(host: &OfxHost) -> Result<Self> {
		unsafe {
			Ok(Suites::new(
				fetch_suite(host, kOfxImageEffectSuite, V1)?,
				fetch_suite(host, kOfxPropertySuite, V1)?,
				fetch_suite(host, kOfxParameterSuite, V1)?,
			))
		}
	}

	pub fn image_effect(&self) -> Arc<OfxImageEffectSuiteV1> {
		self.image_effect.clone()
	}

	pub fn property(&self) -> Arc<OfxPropertySuiteV1> {
		self.property.clone()
	}

	pub fn parameter(&self) -> Arc<OfxParameterSuiteV1> {
		self.parameter.clone()
	}
}
