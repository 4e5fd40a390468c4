use ofx::*;

pub const PARAM_PAGE_NAMES: &[&str] = &["page1", "page2", "page3"];
pub const PARAM_RGBA_NAME: &str = "rgba";
pub const PARAM_RGB_NAME: &str = "rgb";
pub const PARAM_BOOL_NAME: &str = "bool";
pub const PARAM_CHOICE_NAME: &str = "choice";
pub const PARAM_PUSH_NAME: &str = "push";
pub const PARAM_CUSTOM_NAME: &str = "custom";

pub const CHOICE_OPTIONS: &[&str] = &["Tom", "Dick", "Harry"];
const CHOICE_DISCARDED_OPTIONS: &[&str] = &["This", "That", "The Other"];

struct IntegerParam {
	name: &'static str,
	script_name: &'static str,
	hint: &'static str,
}

const INTEGER_1D: IntegerParam = IntegerParam {
	name: "Int",
	script_name: "int",
	hint: "An integer parameter",
};
const INTEGER_2D: IntegerParam = IntegerParam {
	name: "Int2D",
	script_name: "int2D",
	hint: "A 2D integer parameter",
};
const INTEGER_3D: IntegerParam = IntegerParam {
	name: "Int3D",
	script_name: "int3D",
	hint: "A 3D integer parameter",
};
const INTEGER_LIMIT: Int = 100;

struct DoubleParam {
	name: &'static str,
	double_type: ParamDoubleType,
	min: Double,
	max: Double,
}

macro_rules! double_params {
	($($name:expr => $double_type:ident, $min:expr, $max:expr);* $(;)*) => {
		&[$(DoubleParam {
			name: $name,
			double_type: ParamDoubleType::$double_type,
			min: $min,
			max: $max,
		}),*]
	};
}

const DOUBLE_1D_PARAMS: &[DoubleParam] = double_params!(
	"double" => Plain, -100.0, 100.0;
	"angle" => Angle, -100.0, 100.0;
	"scale" => Scale, -1.0, 1.0;
	"time" => Time, -100.0, 100.0;
	"absoluteTime" => AbsoluteTime, 0.0, 1000.0;
	"X_Value" => NormalisedX, -1.0, 1.0;
	"Y_Value" => NormalisedY, -1.0, 1.0;
	"X_Position" => NormalisedXAbsolute, -1.0, 1.0;
	"Y_Position" => NormalisedYAbsolute, -1.0, 1.0;
);

const DOUBLE_2D_PARAMS: &[DoubleParam] = double_params!(
	"double2D" => Plain, -100.0, 100.0;
	"angle2D" => Angle, -100.0, 100.0;
	"scale2D" => Scale, -1.0, 1.0;
	"XY_Value" => NormalisedXY, -1.0, 1.0;
	"XY_Position" => NormalisedXYAbsolute, -1.0, 1.0;
);

const DOUBLE_3D_PARAMS: &[DoubleParam] = double_params!(
	"double3D" => Plain, -100.0, 100.0;
	"angle3D" => Angle, -100.0, 100.0;
	"scale3D" => Scale, -1.0, 1.0;
);

const STRING_PARAMS: &[(&str, ParamStringType)] = &[
	("singleLine", ParamStringType::SingleLine),
	("multiLine", ParamStringType::MultiLine),
	("filePath", ParamStringType::FilePath),
	("dirPath", ParamStringType::DirectoryPath),
	("label", ParamStringType::Label),
];

fn describe_integer<P>(
	mut param: P,
	entry: &IntegerParam,
	zero: P::Value,
	min: P::Value,
	max: P::Value,
) -> Result<()>
where
	P: CanSetLabels + CanSetScriptName + CanSetHint + CanSetRange,
{
	param.set_labels(entry.name, entry.name, entry.name)?;
	param.set_script_name(entry.script_name)?;
	param.set_hint(entry.hint)?;
	param.set_default(zero)?;
	param.set_range(min, max)?;
	param.set_display_range(min, max)
}

fn describe_double<P>(
	mut param: P,
	entry: &DoubleParam,
	hint: &str,
	zero: P::Value,
	min: P::Value,
	max: P::Value,
) -> Result<()>
where
	P: CanSetLabels + CanSetScriptName + CanSetHint + CanSetRange + CanSetDoubleType,
{
	param.set_labels(entry.name, entry.name, entry.name)?;
	param.set_script_name(entry.name)?;
	param.set_hint(hint)?;
	param.set_default(zero)?;
	param.set_range(min, max)?;
	param.set_display_range(min, max)?;
	param.set_double_type(entry.double_type)
}

fn describe_pages(param_set: &mut ParamSetHandle) -> Result<()> {
	// left empty, hosts lay the parameters out themselves
	for name in PARAM_PAGE_NAMES {
		param_set.param_define_page(name)?;
	}
	Ok(())
}

fn describe_integers(param_set: &mut ParamSetHandle) -> Result<()> {
	let (min, max) = (-INTEGER_LIMIT, INTEGER_LIMIT);
	describe_integer(
		param_set.param_define_integer(INTEGER_1D.name)?,
		&INTEGER_1D,
		0,
		min,
		max,
	)?;
	describe_integer(
		param_set.param_define_integer_2d(INTEGER_2D.name)?,
		&INTEGER_2D,
		[0; 2],
		[min; 2],
		[max; 2],
	)?;
	describe_integer(
		param_set.param_define_integer_3d(INTEGER_3D.name)?,
		&INTEGER_3D,
		[0; 3],
		[min; 3],
		[max; 3],
	)
}

fn describe_doubles(param_set: &mut ParamSetHandle) -> Result<()> {
	for entry in DOUBLE_1D_PARAMS {
		describe_double(
			param_set.param_define_double(entry.name)?,
			entry,
			"A double parameter",
			0.0,
			entry.min,
			entry.max,
		)?;
	}
	for entry in DOUBLE_2D_PARAMS {
		describe_double(
			param_set.param_define_double_2d(entry.name)?,
			entry,
			"A 2D double parameter",
			[0.0; 2],
			[entry.min; 2],
			[entry.max; 2],
		)?;
	}
	for entry in DOUBLE_3D_PARAMS {
		describe_double(
			param_set.param_define_double_3d(entry.name)?,
			entry,
			"A 3D double parameter",
			[0.0; 3],
			[entry.min; 3],
			[entry.max; 3],
		)?;
	}
	Ok(())
}

fn describe_strings(param_set: &mut ParamSetHandle) -> Result<()> {
	for &(name, string_type) in STRING_PARAMS {
		let mut param = param_set.param_define_string(name)?;
		param.set_default(name)?;
		param.set_script_name(name)?;
		param.set_hint("A string parameter")?;
		param.set_labels(name, name, name)?;
		param.set_string_type(string_type)?;
	}
	Ok(())
}

fn describe_colours(param_set: &mut ParamSetHandle) -> Result<()> {
	let mut rgba = param_set.param_define_rgba(PARAM_RGBA_NAME)?;
	rgba.set_labels(PARAM_RGBA_NAME, PARAM_RGBA_NAME, PARAM_RGBA_NAME)?;
	rgba.set_default(RGBAColourD {
		r: 0.0,
		g: 0.0,
		b: 0.0,
		a: 1.0,
	})?;

	let mut rgb = param_set.param_define_rgb(PARAM_RGB_NAME)?;
	rgb.set_labels(PARAM_RGB_NAME, PARAM_RGB_NAME, PARAM_RGB_NAME)?;
	rgb.set_default(RGBColourD {
		r: 0.0,
		g: 0.0,
		b: 0.0,
	})
}

fn describe_choice(param_set: &mut ParamSetHandle) -> Result<()> {
	let mut choice = param_set.param_define_choice(PARAM_CHOICE_NAME)?;
	choice.set_labels(PARAM_CHOICE_NAME, PARAM_CHOICE_NAME, PARAM_CHOICE_NAME)?;
	choice.set_default(0)?;
	for option in CHOICE_DISCARDED_OPTIONS {
		choice.append_option(option)?;
	}
	choice.reset_options()?;
	for option in CHOICE_OPTIONS {
		choice.append_option(option)?;
	}
	Ok(())
}

/// Defines one parameter of every kind, in the order hosts will list them.
pub fn describe_params(param_set: &mut ParamSetHandle) -> Result<()> {
	describe_pages(param_set)?;
	describe_integers(param_set)?;
	describe_doubles(param_set)?;
	describe_strings(param_set)?;
	describe_colours(param_set)?;

	let mut boolean = param_set.param_define_boolean(PARAM_BOOL_NAME)?;
	boolean.set_labels(PARAM_BOOL_NAME, PARAM_BOOL_NAME, PARAM_BOOL_NAME)?;
	boolean.set_default(false)?;

	describe_choice(param_set)?;

	param_set
		.param_define_push_button(PARAM_PUSH_NAME)?
		.set_labels("push me", "push me", "push me Big Nose")?;

	let mut custom = param_set.param_define_custom(PARAM_CUSTOM_NAME)?;
	custom.set_labels(PARAM_CUSTOM_NAME, PARAM_CUSTOM_NAME, PARAM_CUSTOM_NAME)?;
	custom.set_default("wibble")?;

	debug!("Parameters defined");
	Ok(())
}
