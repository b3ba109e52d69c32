//! Reference expansion over strings and whole documents.
//!
//! - `matcher`: finds reference tokens inside a single string
//! - `walker`: rewrites every string leaf of a document, splicing resolved keys

mod matcher;
mod walker;

pub use matcher::Matcher;
pub use walker::rewrite;
