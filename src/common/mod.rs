pub mod error;
pub mod text;

pub use error::{ConvertError, ConvertErrorKind};
