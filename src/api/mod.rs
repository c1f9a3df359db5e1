pub mod client;
pub mod dto;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
