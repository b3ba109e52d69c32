//! Document model shared by the expansion engine.
//!
//! Every input format is parsed once into the tagged [`Value`] tree. Mapping
//! keys are always strings and keep their source order.

mod error;
mod file;
mod value;

pub use error::DocumentError;
pub use file::{load_file, read_file, Format};
pub use value::{Mapping, Value};
