pub mod document;
pub mod tag;

pub use document::{Document, UploaderStats};
pub use tag::Tag;
