pub mod error;
pub mod result;

pub use error::GcloneError;
pub use result::{GcloneResult, GcloneResultExt, ResultExt};
