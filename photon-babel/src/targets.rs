//! Built-in targets
//!
//! - [js]: the reference backend, JavaScript for node or the browser.
//! - [c]: C99 with a small embedded list runtime.

pub mod c;
pub mod js;

pub use c::CTarget;
pub use js::JsTarget;
