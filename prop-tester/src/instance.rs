use ofx::*;

/// Per-instance data: the clips the instance renders from and to.
pub enum PropTesterInstance {
	Generator {
		output_clip: ImageClipHandle,
	},
	Filter {
		source_clip: ImageClipHandle,
		output_clip: ImageClipHandle,
	},
}

impl PropTesterInstance {
	/// Fetches the clips of `context`, or `None` when the plugin never described it.
	pub fn new(effect: &ImageEffectHandle, context: ImageEffectContext) -> Result<Option<Self>> {
		match context {
			ImageEffectContext::Generator => Ok(Some(PropTesterInstance::Generator {
				output_clip: effect.get_output_clip()?,
			})),
			ImageEffectContext::Filter => Ok(Some(PropTesterInstance::Filter {
				source_clip: effect.get_simple_input_clip()?,
				output_clip: effect.get_output_clip()?,
			})),
			_ => Ok(None),
		}
	}

	pub fn context(&self) -> ImageEffectContext {
		match self {
			PropTesterInstance::Generator { .. } => ImageEffectContext::Generator,
			PropTesterInstance::Filter { .. } => ImageEffectContext::Filter,
		}
	}

	/// Fetches every image this instance would process at `time`. No pixels are written.
	pub fn render(&self, time: Time) -> Result<()> {
		match self {
			PropTesterInstance::Generator { output_clip } => {
				let output = output_clip.get_image(time)?;
				debug!("Generating {:?} at {}", output.get_bounds().ok(), time);
			}
			PropTesterInstance::Filter {
				source_clip,
				output_clip,
			} => {
				let source = source_clip.get_image(time)?;
				let output = output_clip.get_image(time)?;
				debug!(
					"Filtering {:?} into {:?} at {}",
					source.get_bounds().ok(),
					output.get_bounds().ok(),
					time
				);
			}
		}
		Ok(())
	}
}
