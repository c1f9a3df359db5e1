//! State layer of the SmartFoodAI food-label demo: auth, health profile and
//! analysis stores over a swappable key-value store, plus the mock analysis
//! generator and the client for the planned backend.

pub mod analysis;
pub mod api;
pub mod auth;
pub mod config;
pub mod profile;
pub mod state;
pub mod storage;

pub use config::AppConfig;
pub use state::AppState;
