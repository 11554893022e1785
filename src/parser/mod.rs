pub mod document;
pub mod error;

pub use document::*;
pub use error::*;
