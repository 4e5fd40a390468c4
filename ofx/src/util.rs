use ofx_sys::*;
use std::ffi::CStr;

pub fn static_bytes_to_string(src: &[u8]) -> String {
	match CStr::from_bytes_with_nul(src) {
		Ok(s) => String::from(s.to_string_lossy()),
		Err(_) => String::from_utf8_lossy(src).into_owned(),
	}
}

pub fn image_effect_simple_source_clip_name() -> String {
	static_bytes_to_string(kOfxImageEffectSimpleSourceClipName)
}

pub fn image_effect_output_clip_name() -> String {
	static_bytes_to_string(kOfxImageEffectOutputClipName)
}
