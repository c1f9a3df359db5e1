pub mod dto;
pub mod services;

pub use dto::{DietaryPreference, HealthProfile};
pub use services::{ProfileForm, ProfileFormError, ProfileStore};
