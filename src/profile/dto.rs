use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::profile::services::ProfileFormError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryPreference {
    Vegetarian,
    NonVegetarian,
    Vegan,
    /// Persisted as `""`.
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl DietaryPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::NonVegetarian => "non-vegetarian",
            Self::Vegan => "vegan",
            Self::Unset => "",
        }
    }

    pub fn is_set(self) -> bool {
        self != Self::Unset
    }
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryPreference {
    type Err = ProfileFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "vegetarian" => Ok(Self::Vegetarian),
            "non-vegetarian" => Ok(Self::NonVegetarian),
            "vegan" => Ok(Self::Vegan),
            "" => Ok(Self::Unset),
            other => Err(ProfileFormError::UnknownDietaryPreference(other.to_string())),
        }
    }
}

/// Persisted under `healthProfile`. Always replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthProfile {
    pub allergies: Vec<String>,
    pub conditions: Vec<String>,
    pub dietary_preference: DietaryPreference,
}

impl HealthProfile {
    pub fn has_profile(&self) -> bool {
        self.dietary_preference.is_set()
    }
}

/// A selectable option offered by the profile form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: &'static str,
    pub label: &'static str,
}

pub const ALLERGIES: &[Choice] = &[
    Choice { id: "nuts", label: "Nuts" },
    Choice { id: "milk", label: "Milk / Dairy" },
    Choice { id: "gluten", label: "Gluten" },
    Choice { id: "eggs", label: "Eggs" },
    Choice { id: "soy", label: "Soy" },
    Choice { id: "shellfish", label: "Shellfish" },
    Choice { id: "fish", label: "Fish" },
];

pub const CONDITIONS: &[Choice] = &[
    Choice { id: "diabetes", label: "Diabetes" },
    Choice { id: "hypertension", label: "Hypertension" },
    Choice { id: "heart-disease", label: "Heart Disease" },
    Choice { id: "obesity", label: "Obesity" },
    Choice { id: "kidney-disease", label: "Kidney Disease" },
];

pub const DIETARY_PREFERENCES: &[Choice] = &[
    Choice { id: "vegetarian", label: "Vegetarian" },
    Choice { id: "non-vegetarian", label: "Non-Vegetarian" },
    Choice { id: "vegan", label: "Vegan" },
];

/// Label for a known id, falling back to the id itself.
pub fn label_for<'a>(choices: &[Choice], id: &'a str) -> &'a str {
    choices
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.label)
        .unwrap_or(id)
}
