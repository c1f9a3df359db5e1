pub mod dto;
pub mod mock;
pub mod services;
pub mod upload;

pub use dto::{AnalysisResult, HistorySummary, Ingredient, NutritionInfo, Safety};
pub use mock::{generate_mock_analysis, DEFAULT_FOOD_NAME};
pub use services::{AnalysisStore, HISTORY_LIMIT};
pub use upload::{analyze_upload, UploadError, UploadItem};
