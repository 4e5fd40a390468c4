use crate::instance::PropTesterInstance;
use crate::params;
use ofx::*;

plugin_module!(
	"net.itadinanta.ofx-rs.prop_tester",
	ApiVersion(1),
	PluginVersion(1, 0),
	PropTester::new
);

#[derive(Default)]
struct PropTester;

impl PropTester {
	pub fn new() -> PropTester {
		PropTester::default()
	}
}

impl Execute for PropTester {
	fn execute(&mut self, plugin_context: &PluginContext, action: &mut Action) -> Result<Int> {
		use Action::*;
		match *action {
			Load => {
				info!("load called");
				OK
			}

			Unload => {
				info!("unload called");
				OK
			}

			Render(ref mut effect, ref in_args) => {
				let time = in_args.get_time()?;
				effect
					.get_instance_data::<PropTesterInstance>()?
					.render(time)?;

				if effect.abort()? {
					FAILED
				} else {
					OK
				}
			}

			InstanceChanged(_, ref in_args) => {
				let object_type = in_args.get_type().map(|t| t.to_string());
				let name = in_args.get_name();
				let reason = in_args.get_change_reason().map(|r| r.to_string());
				info!(
					"{} {} changed: {}",
					object_type.unwrap_or_default(),
					name.unwrap_or_default(),
					reason.unwrap_or_default()
				);
				REPLY_DEFAULT
			}

			CreateInstance(ref mut effect) => {
				let effect_props: ImageEffectProperties = effect.properties()?;
				let context = effect_props.get_context()?;
				match PropTesterInstance::new(effect, context)? {
					Some(instance) => {
						debug!("Created {} instance", instance.context());
						effect.set_instance_data(instance)?;
						OK
					}
					None => {
						warn!("Cannot create an instance in the {} context", context);
						FAILED
					}
				}
			}

			DestroyInstance(ref mut effect) => {
				effect.drop_instance_data()?;
				OK
			}

			DescribeInContext(ref mut effect, ref in_args) => {
				if in_args.get_context()? == ImageEffectContext::Filter {
					let mut source_clip = effect.new_simple_input_clip()?;
					describe_rgba_clip(&mut source_clip)?;
				}

				let mut output_clip = effect.new_output_clip()?;
				describe_rgba_clip(&mut output_clip)?;

				params::describe_params(&mut effect.parameter_set()?)?;

				OK
			}

			Describe(ref mut effect) => {
				debug!(
					"Describing for {}",
					plugin_context
						.get_host()
						.get_name()
						.unwrap_or_else(|_| "an unnamed host".to_owned())
				);

				let mut effect_properties: EffectDescriptorProperties = effect.properties()?;
				effect_properties.set_labels("Prop Tester", "Prop Tester", "Property Tester")?;
				effect_properties.set_grouping("OFX Test")?;

				effect_properties.set_supported_contexts(&[
					ImageEffectContext::Generator,
					ImageEffectContext::Filter,
				])?;
				effect_properties.set_supported_pixel_depths(&[
					BitDepth::Byte,
					BitDepth::Short,
					BitDepth::Float,
				])?;

				effect_properties.set_single_instance(false)?;
				effect_properties.set_host_frame_threading(false)?;
				effect_properties.set_supports_multi_resolution(true)?;
				effect_properties.set_supports_tiles(true)?;
				effect_properties.set_temporal_clip_access(false)?;
				effect_properties.set_render_twice_always(false)?;
				effect_properties.set_supports_multiple_clip_pars(false)?;
				effect_properties.set_render_thread_safety(RenderThreadSafety::InstanceSafe)?;

				OK
			}

			_ => REPLY_DEFAULT,
		}
	}
}

fn describe_rgba_clip(clip: &mut ClipProperties) -> Result<()> {
	clip.set_supported_components(&[ImageComponent::RGBA])?;
	clip.set_temporal_clip_access(false)?;
	clip.set_optional(false)?;
	clip.set_supports_tiles(true)?;
	clip.set_is_mask(false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use ofx::testing::*;

	struct Session {
		registry: Registry,
		host: MockHost,
	}

	impl Session {
		fn loaded() -> Session {
			let mut registry = Registry::new();
			crate::register_plugins(&mut registry);
			let host = MockHost::new();
			host.connect(&mut registry, module_name()).unwrap();
			let mut session = Session { registry, host };
			assert_eq!(session.call(kOfxActionLoad, None, None), eOfxStatus_OK);
			session
		}

		fn call(
			&mut self,
			action: &[u8],
			effect: Option<&EffectStore>,
			in_args: Option<&PropertyStore>,
		) -> Int {
			self.host
				.call(&mut self.registry, module_name(), action, effect, in_args)
		}

		fn describe(&mut self) -> Box<EffectStore> {
			let effect = EffectStore::descriptor();
			assert_eq!(
				self.call(kOfxActionDescribe, Some(&effect), None),
				eOfxStatus_OK
			);
			effect
		}

		fn describe_in_context(&mut self, context: ImageEffectContext) -> Box<EffectStore> {
			let effect = EffectStore::context_descriptor(context);
			let args = describe_in_context_args(context);
			assert_eq!(
				self.call(
					kOfxImageEffectActionDescribeInContext,
					Some(&effect),
					Some(&args)
				),
				eOfxStatus_OK
			);
			effect
		}

		fn create_instance(&mut self, context: ImageEffectContext) -> Box<EffectStore> {
			let effect = EffectStore::instance(context);
			assert_eq!(
				self.call(kOfxActionCreateInstance, Some(&effect), None),
				eOfxStatus_OK
			);
			effect
		}

		fn render(&mut self, effect: &EffectStore) -> Int {
			let args = render_args(
				3.0,
				RectI {
					x1: 0,
					y1: 0,
					x2: 64,
					y2: 48,
				},
			);
			self.call(kOfxImageEffectActionRender, Some(effect), Some(&args))
		}
	}

	fn strings(values: &[&str]) -> Option<Vec<String>> {
		Some(values.iter().map(|v| (*v).to_owned()).collect())
	}

	#[test]
	fn registers_one_plugin() {
		let mut registry = Registry::new();
		crate::register_plugins(&mut registry);
		assert_eq!(registry.count(), 1);
		let plugin = registry.ofx_plugin(0).unwrap();
		assert_eq!(
			(plugin.apiVersion, plugin.pluginVersionMajor, plugin.pluginVersionMinor),
			(1, 1, 0)
		);
		assert_eq!(
			registry.find_plugin(module_name()).map(|p| p.plugin_id().to_owned()),
			std::ffi::CString::new("net.itadinanta.ofx-rs.prop_tester").ok()
		);
	}

	#[test]
	fn actions_before_load_fail() {
		let mut registry = Registry::new();
		crate::register_plugins(&mut registry);
		let host = MockHost::new();
		host.connect(&mut registry, module_name()).unwrap();
		let effect = EffectStore::descriptor();
		let status = host.call(
			&mut registry,
			module_name(),
			kOfxActionDescribe,
			Some(&effect),
			None,
		);
		assert_eq!(status, eOfxStatus_Failed);
	}

	#[test]
	fn unload_forgets_the_host() {
		let mut session = Session::loaded();
		assert_eq!(session.call(kOfxActionUnload, None, None), eOfxStatus_OK);
		let effect = EffectStore::descriptor();
		assert_eq!(
			session.call(kOfxActionDescribe, Some(&effect), None),
			eOfxStatus_Failed
		);
	}

	#[test]
	fn describe_sets_labels_and_flags() {
		let mut session = Session::loaded();
		let effect = session.describe();
		let props = effect.properties();

		assert_eq!(props.string(kOfxPropLabel), Some("Prop Tester".to_owned()));
		assert_eq!(
			props.string(kOfxPropShortLabel),
			Some("Prop Tester".to_owned())
		);
		assert_eq!(
			props.string(kOfxPropLongLabel),
			Some("Property Tester".to_owned())
		);
		assert_eq!(
			props.string(kOfxImageEffectPluginPropGrouping),
			Some("OFX Test".to_owned())
		);
		assert_eq!(
			props.strings(kOfxImageEffectPropSupportedContexts),
			strings(&["OfxImageEffectContextGenerator", "OfxImageEffectContextFilter"])
		);
		assert_eq!(
			props.strings(kOfxImageEffectPropSupportedPixelDepths),
			strings(&["OfxBitDepthByte", "OfxBitDepthShort", "OfxBitDepthFloat"])
		);
		assert_eq!(
			props.string(kOfxImageEffectPluginRenderThreadSafety),
			Some("OfxImageEffectRenderInstanceSafe".to_owned())
		);

		let flags = [
			(&kOfxImageEffectPluginPropSingleInstance[..], 0),
			(&kOfxImageEffectPluginPropHostFrameThreading[..], 0),
			(&kOfxImageEffectPropSupportsMultiResolution[..], 1),
			(&kOfxImageEffectPropSupportsTiles[..], 1),
			(&kOfxImageEffectPropTemporalClipAccess[..], 0),
			(&kOfxImageEffectPluginPropFieldRenderTwiceAlways[..], 0),
			(&kOfxImageEffectPropSupportsMultipleClipPARs[..], 0),
		];
		for (name, expected) in flags.iter() {
			assert_eq!(
				props.int(name),
				Some(*expected),
				"{}",
				String::from_utf8_lossy(name)
			);
		}
	}

	#[test]
	fn filter_context_has_source_and_output() {
		let mut session = Session::loaded();
		let effect = session.describe_in_context(ImageEffectContext::Filter);
		assert_eq!(
			effect.clip_names(),
			vec!["Source".to_owned(), "Output".to_owned()]
		);
		for name in &["Source", "Output"] {
			let clip = effect.clip(name).unwrap();
			let props = clip.properties();
			assert_eq!(
				props.strings(kOfxImageEffectPropSupportedComponents),
				strings(&["OfxImageComponentRGBA"])
			);
			assert_eq!(props.int(kOfxImageEffectPropTemporalClipAccess), Some(0));
			assert_eq!(props.int(kOfxImageClipPropOptional), Some(0));
			assert_eq!(props.int(kOfxImageEffectPropSupportsTiles), Some(1));
			assert_eq!(props.int(kOfxImageClipPropIsMask), Some(0));
		}
	}

	#[test]
	fn generator_context_has_output_only() {
		let mut session = Session::loaded();
		let effect = session.describe_in_context(ImageEffectContext::Generator);
		assert_eq!(effect.clip_names(), vec!["Output".to_owned()]);
	}

	#[test]
	fn every_parameter_is_defined_in_order() {
		let mut session = Session::loaded();
		let effect = session.describe_in_context(ImageEffectContext::Generator);
		let expected = [
			"page1",
			"page2",
			"page3",
			"Int",
			"Int2D",
			"Int3D",
			"double",
			"angle",
			"scale",
			"time",
			"absoluteTime",
			"X_Value",
			"Y_Value",
			"X_Position",
			"Y_Position",
			"double2D",
			"angle2D",
			"scale2D",
			"XY_Value",
			"XY_Position",
			"double3D",
			"angle3D",
			"scale3D",
			"singleLine",
			"multiLine",
			"filePath",
			"dirPath",
			"label",
			"rgba",
			"rgb",
			"bool",
			"choice",
			"push",
			"custom",
		];
		assert_eq!(effect.params().names(), strings(&expected).unwrap());

		for page in params::PARAM_PAGE_NAMES {
			let page = effect.param(page).unwrap();
			assert_eq!(page.param_type(), "OfxParamTypePage");
			assert!(!page.properties().contains(kOfxParamPropPageChild));
		}
	}

	#[test]
	fn integer_parameters() {
		let mut session = Session::loaded();
		let effect = session.describe_in_context(ImageEffectContext::Filter);

		let int = effect.param("Int").unwrap();
		let props = int.properties();
		assert_eq!(int.param_type(), "OfxParamTypeInteger");
		assert_eq!(props.string(kOfxParamPropScriptName), Some("int".to_owned()));
		assert_eq!(
			props.string(kOfxParamPropHint),
			Some("An integer parameter".to_owned())
		);
		assert_eq!(props.ints(kOfxParamPropDefault), Some(vec![0]));
		assert_eq!(props.ints(kOfxParamPropMin), Some(vec![-100]));
		assert_eq!(props.ints(kOfxParamPropDisplayMax), Some(vec![100]));

		let int3d = effect.param("Int3D").unwrap();
		let props = int3d.properties();
		assert_eq!(int3d.param_type(), "OfxParamTypeInteger3D");
		assert_eq!(props.string(kOfxPropLongLabel), Some("Int3D".to_owned()));
		assert_eq!(
			props.string(kOfxParamPropScriptName),
			Some("int3D".to_owned())
		);
		assert_eq!(props.ints(kOfxParamPropDefault), Some(vec![0, 0, 0]));
		assert_eq!(props.ints(kOfxParamPropMax), Some(vec![100, 100, 100]));
		assert_eq!(
			props.ints(kOfxParamPropDisplayMin),
			Some(vec![-100, -100, -100])
		);
	}

	#[test]
	fn double_parameters() {
		let mut session = Session::loaded();
		let effect = session.describe_in_context(ImageEffectContext::Filter);

		let absolute_time = effect.param("absoluteTime").unwrap();
		let props = absolute_time.properties();
		assert_eq!(absolute_time.param_type(), "OfxParamTypeDouble");
		assert_eq!(
			props.string(kOfxParamPropDoubleType),
			Some("OfxParamDoubleTypeAbsoluteTime".to_owned())
		);
		assert_eq!(props.doubles(kOfxParamPropMin), Some(vec![0.0]));
		assert_eq!(props.doubles(kOfxParamPropMax), Some(vec![1000.0]));
		assert_eq!(props.doubles(kOfxParamPropDisplayMax), Some(vec![1000.0]));
		assert_eq!(
			props.string(kOfxParamPropHint),
			Some("A double parameter".to_owned())
		);

		let xy_position = effect.param("XY_Position").unwrap();
		let props = xy_position.properties();
		assert_eq!(xy_position.param_type(), "OfxParamTypeDouble2D");
		assert_eq!(
			props.string(kOfxParamPropDoubleType),
			Some("OfxParamDoubleTypeNormalisedXYAbsolute".to_owned())
		);
		assert_eq!(props.doubles(kOfxParamPropDefault), Some(vec![0.0, 0.0]));
		assert_eq!(props.doubles(kOfxParamPropMin), Some(vec![-1.0, -1.0]));

		let angle3d = effect.param("angle3D").unwrap();
		let props = angle3d.properties();
		assert_eq!(angle3d.param_type(), "OfxParamTypeDouble3D");
		assert_eq!(
			props.string(kOfxParamPropDoubleType),
			Some("OfxParamDoubleTypeAngle".to_owned())
		);
		assert_eq!(
			props.doubles(kOfxParamPropDisplayMin),
			Some(vec![-100.0, -100.0, -100.0])
		);
		assert_eq!(
			props.string(kOfxParamPropScriptName),
			Some("angle3D".to_owned())
		);
	}

	#[test]
	fn string_parameters_default_to_their_name() {
		let mut session = Session::loaded();
		let effect = session.describe_in_context(ImageEffectContext::Generator);
		let modes = [
			("singleLine", "OfxParamStringIsSingleLine"),
			("multiLine", "OfxParamStringIsMultiLine"),
			("filePath", "OfxParamStringIsFilePath"),
			("dirPath", "OfxParamStringIsDirectoryPath"),
			("label", "OfxParamStringIsLabel"),
		];
		for (name, mode) in modes.iter() {
			let param = effect.param(name).unwrap();
			let props = param.properties();
			assert_eq!(param.param_type(), "OfxParamTypeString");
			assert_eq!(props.string(kOfxParamPropDefault), Some(name.to_string()));
			assert_eq!(props.string(kOfxPropLabel), Some(name.to_string()));
			assert_eq!(props.string(kOfxParamPropStringMode), Some(mode.to_string()));
			assert_eq!(
				props.string(kOfxParamPropHint),
				Some("A string parameter".to_owned())
			);
		}
	}

	#[test]
	fn remaining_parameter_kinds() {
		let mut session = Session::loaded();
		let effect = session.describe_in_context(ImageEffectContext::Filter);

		let rgba = effect.param("rgba").unwrap();
		assert_eq!(rgba.param_type(), "OfxParamTypeRGBA");
		assert_eq!(
			rgba.properties().doubles(kOfxParamPropDefault),
			Some(vec![0.0, 0.0, 0.0, 1.0])
		);

		let rgb = effect.param("rgb").unwrap();
		assert_eq!(rgb.param_type(), "OfxParamTypeRGB");
		assert_eq!(
			rgb.properties().doubles(kOfxParamPropDefault),
			Some(vec![0.0, 0.0, 0.0])
		);

		let boolean = effect.param("bool").unwrap();
		assert_eq!(boolean.param_type(), "OfxParamTypeBoolean");
		assert_eq!(boolean.properties().ints(kOfxParamPropDefault), Some(vec![0]));

		let push = effect.param("push").unwrap();
		assert_eq!(push.param_type(), "OfxParamTypePushButton");
		assert_eq!(
			push.properties().string(kOfxPropLongLabel),
			Some("push me Big Nose".to_owned())
		);

		let custom = effect.param("custom").unwrap();
		assert_eq!(custom.param_type(), "OfxParamTypeCustom");
		assert_eq!(
			custom.properties().string(kOfxParamPropDefault),
			Some("wibble".to_owned())
		);
	}

	#[test]
	fn choice_keeps_options_appended_after_reset() {
		let mut session = Session::loaded();
		let effect = session.describe_in_context(ImageEffectContext::Generator);
		let choice = effect.param("choice").unwrap();
		let props = choice.properties();
		assert_eq!(choice.param_type(), "OfxParamTypeChoice");
		assert_eq!(props.string(kOfxPropLabel), Some("choice".to_owned()));
		assert_eq!(props.ints(kOfxParamPropDefault), Some(vec![0]));
		assert_eq!(
			props.strings(kOfxParamPropChoiceOption),
			strings(params::CHOICE_OPTIONS)
		);
	}

	#[test]
	fn filter_render_fetches_and_releases_both_images() {
		let mut session = Session::loaded();
		let effect = session.create_instance(ImageEffectContext::Filter);
		assert!(!effect.instance_data().is_null());

		assert_eq!(session.render(&effect), eOfxStatus_OK);
		for name in &["Source", "Output"] {
			let clip = effect.clip(name).unwrap();
			assert_eq!((clip.fetched(), clip.released()), (1, 1), "{}", name);
		}
	}

	#[test]
	fn generator_render_fetches_output_only() {
		let mut session = Session::loaded();
		let effect = session.create_instance(ImageEffectContext::Generator);

		assert_eq!(session.render(&effect), eOfxStatus_OK);
		assert_eq!(session.render(&effect), eOfxStatus_OK);
		let output = effect.clip("Output").unwrap();
		assert_eq!((output.fetched(), output.released()), (2, 2));
	}

	#[test]
	fn aborted_render_fails_but_releases_images() {
		let mut session = Session::loaded();
		let effect = session.create_instance(ImageEffectContext::Filter);
		effect.set_aborted(true);

		assert_eq!(session.render(&effect), eOfxStatus_Failed);
		let source = effect.clip("Source").unwrap();
		assert_eq!((source.fetched(), source.released()), (1, 1));
	}

	#[test]
	fn failed_fetch_releases_what_was_fetched() {
		let mut session = Session::loaded();
		let effect = session.create_instance(ImageEffectContext::Filter);
		effect.clip("Output").unwrap().set_connected(false);

		assert_eq!(session.render(&effect), eOfxStatus_Failed);
		let source = effect.clip("Source").unwrap();
		assert_eq!((source.fetched(), source.released()), (1, 1));
		assert_eq!(effect.clip("Output").unwrap().fetched(), 0);
	}

	#[test]
	fn render_without_instance_data_is_a_bad_handle() {
		let mut session = Session::loaded();
		let effect = EffectStore::instance(ImageEffectContext::Generator);
		assert_eq!(session.render(&effect), eOfxStatus_ErrBadHandle);
	}

	#[test]
	fn unsupported_context_fails_instance_creation() {
		let mut session = Session::loaded();
		let effect = EffectStore::instance(ImageEffectContext::General);
		assert_eq!(
			session.call(kOfxActionCreateInstance, Some(&effect), None),
			eOfxStatus_Failed
		);
		assert!(effect.instance_data().is_null());
	}

	#[test]
	fn destroy_drops_instance_data() {
		let mut session = Session::loaded();
		let effect = session.create_instance(ImageEffectContext::Generator);
		assert_eq!(
			session.call(kOfxActionDestroyInstance, Some(&effect), None),
			eOfxStatus_OK
		);
		assert!(effect.instance_data().is_null());
	}

	#[test]
	fn instance_changed_replies_default() {
		let mut session = Session::loaded();
		let effect = session.create_instance(ImageEffectContext::Filter);
		let args = instance_changed_args(Type::Parameter, "choice", 1.0);
		assert_eq!(
			session.call(kOfxActionInstanceChanged, Some(&effect), Some(&args)),
			eOfxStatus_ReplyDefault
		);
	}

	#[test]
	fn instance_changed_without_readable_args_replies_default() {
		let mut session = Session::loaded();
		let effect = session.create_instance(ImageEffectContext::Generator);
		let empty = PropertyStore::default();
		assert_eq!(
			session.call(kOfxActionInstanceChanged, Some(&effect), Some(&empty)),
			eOfxStatus_ReplyDefault
		);

		let args = instance_changed_args(Type::Parameter, "bool", 0.0);
		args.set_strings(kOfxPropChangeReason, &["OfxChangeSomethingElse"]);
		args.set_strings(kOfxPropType, &["OfxTypeUnheardOf"]);
		assert_eq!(
			session.call(kOfxActionInstanceChanged, Some(&effect), Some(&args)),
			eOfxStatus_ReplyDefault
		);
	}

	#[test]
	fn other_actions_reply_default() {
		let mut session = Session::loaded();
		let effect = session.create_instance(ImageEffectContext::Filter);
		for action in [
			&kOfxImageEffectActionGetClipPreferences[..],
			&kOfxImageEffectActionIsIdentity[..],
			&kOfxActionPurgeCaches[..],
			&kOfxActionBeginInstanceChanged[..],
		]
		.iter()
		{
			assert_eq!(
				session.call(action, Some(&effect), None),
				eOfxStatus_ReplyDefault
			);
		}
	}

	#[test]
	fn unknown_actions_fail() {
		let mut session = Session::loaded();
		let effect = session.create_instance(ImageEffectContext::Filter);
		assert_eq!(
			session.call(b"OfxActionMakeCoffee\0", Some(&effect), None),
			eOfxStatus_Failed
		);
	}
}
