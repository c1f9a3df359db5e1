//! Stand-in for a real label analysis. The image is never inspected: every
//! result carries the same ingredients and warnings, and only the nutrition
//! figures vary.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::analysis::dto::{AnalysisResult, Ingredient, NutritionInfo, Safety};

pub const DEFAULT_FOOD_NAME: &str = "Food Product";

const MOCK_INGREDIENTS: [(&str, Safety, Option<&str>); 6] = [
    ("Wheat Flour", Safety::Safe, None),
    ("Sugar", Safety::Moderate, Some("High glycemic index")),
    ("Palm Oil", Safety::Moderate, Some("High in saturated fats")),
    ("Salt", Safety::Safe, None),
    (
        "Artificial Colors",
        Safety::Unsafe,
        Some("May cause allergic reactions"),
    ),
    ("Preservatives (E211)", Safety::Moderate, Some("Sodium benzoate")),
];

const MOCK_WARNINGS: [&str; 3] = [
    "Contains gluten - not suitable for celiac patients",
    "High sugar content - diabetics should consume in moderation",
    "Contains artificial preservatives",
];

/// Food name as shown for an uploaded file: the name minus its last extension.
pub fn food_name_from_file_name(file_name: &str) -> String {
    lazy_static! {
        static ref EXTENSION_RE: Regex = Regex::new(r"\.[^/.]+$").unwrap();
    }
    EXTENSION_RE.replace(file_name, "").into_owned()
}

pub fn generate_mock_analysis(food_name: &str, image_url: &str) -> AnalysisResult {
    generate_mock_analysis_with(&mut rand::thread_rng(), food_name, image_url)
}

pub fn generate_mock_analysis_with<R: Rng>(
    rng: &mut R,
    food_name: &str,
    image_url: &str,
) -> AnalysisResult {
    let ingredients = MOCK_INGREDIENTS
        .iter()
        .map(|(name, safety, reason)| Ingredient {
            name: (*name).to_string(),
            safety: *safety,
            reason: reason.map(str::to_string),
        })
        .collect();

    let nutrition = NutritionInfo {
        calories: rng.gen_range(100..400),
        protein: rng.gen_range(2..17),
        carbohydrates: rng.gen_range(10..50),
        fat: rng.gen_range(3..23),
        fiber: Some(rng.gen_range(1..6)),
        sugar: Some(rng.gen_range(2..17)),
        sodium: Some(rng.gen_range(100..600)),
    };

    let food_name = if food_name.is_empty() {
        DEFAULT_FOOD_NAME
    } else {
        food_name
    };

    AnalysisResult {
        id: Uuid::new_v4().to_string(),
        food_name: food_name.to_string(),
        image_url: image_url.to_string(),
        ingredients,
        nutrition,
        warnings: MOCK_WARNINGS.iter().map(|w| (*w).to_string()).collect(),
        analyzed_at: OffsetDateTime::now_utc(),
    }
}

#[cfg(test)]
mod mock_tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn nutrition_stays_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let result = generate_mock_analysis_with(&mut rng, "Apple", "data:image/png;base64,");
            let n = result.nutrition;
            assert!((100..=399).contains(&n.calories), "calories {}", n.calories);
            assert!((2..=16).contains(&n.protein), "protein {}", n.protein);
            assert!((10..=49).contains(&n.carbohydrates), "carbs {}", n.carbohydrates);
            assert!((3..=22).contains(&n.fat), "fat {}", n.fat);
            assert!((1..=5).contains(&n.fiber.unwrap()));
            assert!((2..=16).contains(&n.sugar.unwrap()));
            assert!((100..=599).contains(&n.sodium.unwrap()));
        }
    }

    #[test]
    fn ingredients_and_warnings_are_fixed() {
        let result = generate_mock_analysis("Apple", "whatever");
        assert_eq!(result.food_name, "Apple");
        assert_eq!(result.image_url, "whatever");

        let names: Vec<_> = result.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Wheat Flour",
                "Sugar",
                "Palm Oil",
                "Salt",
                "Artificial Colors",
                "Preservatives (E211)"
            ]
        );
        let safety: Vec<_> = result.ingredients.iter().map(|i| i.safety).collect();
        assert_eq!(
            safety,
            [
                Safety::Safe,
                Safety::Moderate,
                Safety::Moderate,
                Safety::Safe,
                Safety::Unsafe,
                Safety::Moderate
            ]
        );
        assert_eq!(result.ingredients[0].reason, None);
        assert_eq!(
            result.ingredients[4].reason.as_deref(),
            Some("May cause allergic reactions")
        );
        assert_eq!(result.warnings.len(), 3);
        assert_eq!(result.count(Safety::Safe), 2);
        assert_eq!(result.count(Safety::Unsafe), 1);
    }

    #[test]
    fn empty_name_falls_back() {
        let result = generate_mock_analysis("", "img");
        assert_eq!(result.food_name, DEFAULT_FOOD_NAME);
    }

    #[test]
    fn each_result_gets_its_own_id() {
        let a = generate_mock_analysis("Apple", "img");
        let b = generate_mock_analysis("Apple", "img");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn strips_only_the_last_extension() {
        assert_eq!(food_name_from_file_name("granola-bar.jpg"), "granola-bar");
        assert_eq!(food_name_from_file_name("label.v2.webp"), "label.v2");
        assert_eq!(food_name_from_file_name("no_extension"), "no_extension");
        assert_eq!(food_name_from_file_name(".png"), "");
        assert_eq!(food_name_from_file_name("dir.d/photo"), "dir.d/photo");
    }

    #[test]
    fn serialized_shape_matches_stored_history() {
        let result = generate_mock_analysis("Apple", "img");
        let value = serde_json::to_value(&result).unwrap();
        for key in ["id", "foodName", "imageUrl", "ingredients", "nutrition", "warnings", "analyzedAt"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["ingredients"][0].get("reason"), None);
        assert_eq!(value["ingredients"][1]["safety"], "moderate");
        assert!(value["nutrition"].get("carbohydrates").is_some());

        let back: AnalysisResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, result.id);
        assert_eq!(back.analyzed_at, result.analyzed_at);
    }
}
