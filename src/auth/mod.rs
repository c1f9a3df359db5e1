pub mod dto;
pub mod services;

pub use dto::User;
pub use services::AuthStore;
