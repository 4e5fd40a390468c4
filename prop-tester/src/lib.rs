extern crate ofx;
#[macro_use]
extern crate log;

mod instance;
mod params;
mod prop_tester;

use ofx::*;

register_modules!(prop_tester);
