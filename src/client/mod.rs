pub mod error;
pub mod http;
pub mod types;

pub use error::{ClientError, ClientResult};
pub use http::{ClientConfig, UploadClient};
pub use types::{CombineRequest, CombineResponse, UploadRequest, UploadResponse};
