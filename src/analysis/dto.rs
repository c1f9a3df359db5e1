use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Safety {
    Safe,
    Moderate,
    Unsafe,
}

impl Safety {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Moderate => "moderate",
            Self::Unsafe => "unsafe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub safety: Safety,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Per-serving figures: kcal, grams, sodium in mg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: u32,
    pub protein: u32,
    pub carbohydrates: u32,
    pub fat: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<u32>,
}

/// One finished analysis. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub food_name: String,
    /// Usually a `data:` URL of the uploaded image.
    pub image_url: String,
    pub ingredients: Vec<Ingredient>,
    pub nutrition: NutritionInfo,
    pub warnings: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub analyzed_at: OffsetDateTime,
}

impl AnalysisResult {
    pub fn count(&self, safety: Safety) -> usize {
        self.ingredients
            .iter()
            .filter(|i| i.safety == safety)
            .count()
    }
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total_analyses: usize,
    pub total_safe: usize,
    pub total_unsafe: usize,
}
