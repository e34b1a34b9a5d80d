pub mod error;
pub mod html;
pub mod macros;

pub use error::{Context, Error, Result};
