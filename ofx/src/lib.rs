#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

#[macro_use]
extern crate log;
extern crate log4rs;
extern crate ofx_sys;

#[macro_use]
mod suites;
mod action;
mod enums;
mod handle;
mod param;
mod plugin;
mod property;
mod registry;
mod result;
mod types;
mod util;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use action::*;
pub use enums::*;
pub use handle::*;
pub use param::*;
pub use plugin::*;
pub use property::*;
pub use registry::*;
pub use result::*;
pub use suites::*;
pub use types::*;
pub use util::*;

pub use ofx_sys::*;

#[doc(hidden)]
pub use log;
