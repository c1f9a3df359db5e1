use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::profile::dto::{DietaryPreference, HealthProfile};
use crate::storage::{load_json, save_json, KeyValueStore, HEALTH_PROFILE_KEY};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileFormError {
    #[error("Please select a dietary preference")]
    DietaryPreferenceRequired,
    #[error("unknown dietary preference `{0}` (expected vegetarian, non-vegetarian or vegan)")]
    UnknownDietaryPreference(String),
}

pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
    profile: HealthProfile,
}

impl ProfileStore {
    pub(crate) fn empty(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            profile: HealthProfile::default(),
        }
    }

    pub async fn load(store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let profile = load_json::<HealthProfile>(store.as_ref(), HEALTH_PROFILE_KEY)
            .await?
            .unwrap_or_default();
        debug!(has_profile = profile.has_profile(), "profile store loaded");
        Ok(Self { store, profile })
    }

    pub fn profile(&self) -> &HealthProfile {
        &self.profile
    }

    pub fn has_profile(&self) -> bool {
        self.profile.has_profile()
    }

    /// Replaces the stored profile. No merge, no vocabulary checks.
    #[instrument(skip(self, profile), fields(diet = %profile.dietary_preference))]
    pub async fn update(&mut self, profile: HealthProfile) -> anyhow::Result<()> {
        save_json(self.store.as_ref(), HEALTH_PROFILE_KEY, &profile).await?;
        info!(
            allergies = profile.allergies.len(),
            conditions = profile.conditions.len(),
            "health profile saved"
        );
        self.profile = profile;
        Ok(())
    }
}

/// Editable copy of a profile, as the profile form holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub allergies: Vec<String>,
    pub conditions: Vec<String>,
    pub dietary_preference: DietaryPreference,
}

fn toggle(list: &mut Vec<String>, id: &str) {
    if let Some(pos) = list.iter().position(|x| x == id) {
        list.remove(pos);
    } else {
        list.push(id.to_string());
    }
}

impl ProfileForm {
    pub fn from_profile(profile: &HealthProfile) -> Self {
        Self {
            allergies: profile.allergies.clone(),
            conditions: profile.conditions.clone(),
            dietary_preference: profile.dietary_preference,
        }
    }

    pub fn toggle_allergy(&mut self, id: &str) {
        toggle(&mut self.allergies, id);
    }

    pub fn toggle_condition(&mut self, id: &str) {
        toggle(&mut self.conditions, id);
    }

    pub fn submit(self) -> Result<HealthProfile, ProfileFormError> {
        if !self.dietary_preference.is_set() {
            return Err(ProfileFormError::DietaryPreferenceRequired);
        }
        Ok(HealthProfile {
            allergies: self.allergies,
            conditions: self.conditions,
            dietary_preference: self.dietary_preference,
        })
    }
}

#[cfg(test)]
mod profile_tests {
    use super::*;
    use crate::profile::dto::{label_for, ALLERGIES, CONDITIONS};
    use crate::storage::MemoryStore;

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn has_profile_tracks_dietary_preference() {
        for diet in [
            DietaryPreference::Vegetarian,
            DietaryPreference::NonVegetarian,
            DietaryPreference::Vegan,
            DietaryPreference::Unset,
        ] {
            let profile = HealthProfile {
                allergies: vec!["nuts".into()],
                conditions: vec![],
                dietary_preference: diet,
            };
            assert_eq!(profile.has_profile(), diet != DietaryPreference::Unset);
        }
        assert!(!HealthProfile::default().has_profile());
    }

    #[test]
    fn dietary_preference_serializes_like_the_web_client() {
        let json = serde_json::to_string(&HealthProfile::default()).unwrap();
        assert_eq!(
            json,
            r#"{"allergies":[],"conditions":[],"dietaryPreference":""}"#
        );
        let diet: DietaryPreference = serde_json::from_str("\"non-vegetarian\"").unwrap();
        assert_eq!(diet, DietaryPreference::NonVegetarian);
    }

    #[test]
    fn dietary_preference_parses_from_cli_input() {
        assert_eq!("vegan".parse::<DietaryPreference>(), Ok(DietaryPreference::Vegan));
        assert_eq!(" vegetarian ".parse::<DietaryPreference>(), Ok(DietaryPreference::Vegetarian));
        assert_eq!("".parse::<DietaryPreference>(), Ok(DietaryPreference::Unset));
        assert_eq!(
            "carnivore".parse::<DietaryPreference>(),
            Err(ProfileFormError::UnknownDietaryPreference("carnivore".into()))
        );
    }

    #[tokio::test]
    async fn starts_empty_without_stored_profile() {
        let profiles = ProfileStore::load(memory()).await.unwrap();
        assert_eq!(profiles.profile(), &HealthProfile::default());
        assert!(!profiles.has_profile());
    }

    #[tokio::test]
    async fn vegan_profile_survives_reload() {
        let store = memory();
        let mut profiles = ProfileStore::load(store.clone()).await.unwrap();
        let profile = HealthProfile {
            allergies: vec!["milk".into(), "eggs".into()],
            conditions: vec!["diabetes".into()],
            dietary_preference: DietaryPreference::Vegan,
        };
        profiles.update(profile.clone()).await.unwrap();
        assert!(profiles.has_profile());

        let reloaded = ProfileStore::load(store).await.unwrap();
        assert_eq!(reloaded.profile(), &profile);
    }

    #[tokio::test]
    async fn update_replaces_without_merging() {
        let store = memory();
        let mut profiles = ProfileStore::load(store.clone()).await.unwrap();
        profiles
            .update(HealthProfile {
                allergies: vec!["nuts".into()],
                conditions: vec!["obesity".into()],
                dietary_preference: DietaryPreference::Vegetarian,
            })
            .await
            .unwrap();
        let replacement = HealthProfile {
            allergies: vec!["not-in-vocabulary".into()],
            conditions: vec![],
            dietary_preference: DietaryPreference::Unset,
        };
        profiles.update(replacement.clone()).await.unwrap();

        assert_eq!(profiles.profile(), &replacement);
        assert!(!profiles.has_profile());
        let reloaded = ProfileStore::load(store).await.unwrap();
        assert_eq!(reloaded.profile(), &replacement);
    }

    #[tokio::test]
    async fn malformed_profile_is_reported() {
        let store = memory();
        store.set(HEALTH_PROFILE_KEY, "{\"allergies\": oops").await.unwrap();
        assert!(ProfileStore::load(store).await.is_err());
    }

    #[test]
    fn form_toggles_and_requires_diet() {
        let mut form = ProfileForm::default();
        form.toggle_allergy("nuts");
        form.toggle_allergy("soy");
        form.toggle_allergy("nuts");
        form.toggle_condition("hypertension");
        assert_eq!(form.allergies, vec!["soy".to_string()]);
        assert_eq!(form.conditions, vec!["hypertension".to_string()]);

        assert_eq!(
            form.clone().submit(),
            Err(ProfileFormError::DietaryPreferenceRequired)
        );

        form.dietary_preference = DietaryPreference::NonVegetarian;
        let profile = form.submit().unwrap();
        assert_eq!(profile.allergies, vec!["soy".to_string()]);
        assert!(profile.has_profile());
    }

    #[test]
    fn form_starts_from_current_profile() {
        let profile = HealthProfile {
            allergies: vec!["fish".into()],
            conditions: vec!["kidney-disease".into()],
            dietary_preference: DietaryPreference::Vegan,
        };
        let form = ProfileForm::from_profile(&profile);
        assert_eq!(form.clone().submit().unwrap(), profile);
    }

    #[test]
    fn labels_fall_back_to_ids() {
        assert_eq!(label_for(ALLERGIES, "milk"), "Milk / Dairy");
        assert_eq!(label_for(CONDITIONS, "heart-disease"), "Heart Disease");
        assert_eq!(label_for(CONDITIONS, "gout"), "gout");
    }
}
