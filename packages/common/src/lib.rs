pub mod error;
pub mod language;
pub mod result;

pub use error::*;
pub use language::*;
pub use result::*;
