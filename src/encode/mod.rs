pub mod encoder;
pub mod error;

pub use encoder::Base64Encoder;
pub use error::{EncodeError, EncodeResult};
