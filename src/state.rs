use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::analysis::AnalysisStore;
use crate::api::ApiClient;
use crate::auth::AuthStore;
use crate::config::AppConfig;
use crate::profile::ProfileStore;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Composition root. Every store shares one persistence backend and loads
/// from it once, here.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn KeyValueStore>,
    pub auth: AuthStore,
    pub profile: ProfileStore,
    pub analysis: AnalysisStore,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(FileStore::new(&config.data_dir)) as Arc<dyn KeyValueStore>;
        info!(data_dir = %config.data_dir.display(), "using file store");
        Self::from_parts(Arc::new(config), store).await
    }

    pub async fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn KeyValueStore>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            auth: AuthStore::load(store.clone()).await?,
            profile: ProfileStore::load(store.clone()).await?,
            analysis: AnalysisStore::load(store.clone()).await?,
            config,
            store,
        })
    }

    /// Client for the backend contract. The flows above never call it.
    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(&self.config.api_base_url, self.store.clone())
    }

    /// Empty in-memory state with no analysis delay.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            analysis_delay: Duration::ZERO,
            ..AppConfig::default()
        });
        let store = Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>;
        Self {
            auth: AuthStore::empty(store.clone()),
            profile: ProfileStore::empty(store.clone()),
            analysis: AnalysisStore::empty(store.clone()),
            config,
            store,
        }
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;
    use crate::profile::{DietaryPreference, HealthProfile};

    #[tokio::test]
    async fn file_backed_state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            analysis_delay: Duration::ZERO,
            ..AppConfig::default()
        };

        let mut state = AppState::init(config.clone()).await.unwrap();
        state.auth.register("Sam", "sam@example.com", "pw").await.unwrap();
        state
            .profile
            .update(HealthProfile {
                allergies: vec!["gluten".into()],
                conditions: vec![],
                dietary_preference: DietaryPreference::Vegetarian,
            })
            .await
            .unwrap();
        state.auth.mark_profile_completed().await.unwrap();

        let restarted = AppState::init(config).await.unwrap();
        let user = restarted.auth.user().unwrap();
        assert_eq!(user.name, "Sam");
        assert!(user.has_completed_profile);
        assert!(restarted.profile.has_profile());
        assert!(restarted.analysis.history().is_empty());
    }

    #[tokio::test]
    async fn malformed_store_fails_init_with_key() {
        let store = Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>;
        store.set(crate::storage::USER_KEY, "not json").await.unwrap();
        let err = match AppState::from_parts(Arc::new(AppConfig::default()), store).await {
            Ok(_) => panic!("expected malformed user to fail"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("`user`"));
    }

    #[test]
    fn fake_state_starts_signed_out() {
        let state = AppState::fake();
        assert!(!state.auth.is_authenticated());
        assert!(!state.profile.has_profile());
        assert!(state.analysis.current().is_none());
        assert_eq!(state.config.analysis_delay, Duration::ZERO);
    }
}
