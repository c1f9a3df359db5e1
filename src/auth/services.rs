use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::auth::dto::{User, MOCK_AUTH_TOKEN};
use crate::storage::{
    load_json, save_json, KeyValueStore, AUTH_TOKEN_KEY, PROFILE_COMPLETED_KEY, USER_KEY,
};

/// Display name derived from an email: everything before the first `@`.
pub(crate) fn name_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Holds the current identity. Login and register never fail on credentials;
/// only storage errors are reported.
pub struct AuthStore {
    store: Arc<dyn KeyValueStore>,
    user: Option<User>,
}

impl AuthStore {
    pub(crate) fn empty(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, user: None }
    }

    pub async fn load(store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let user = load_json::<User>(store.as_ref(), USER_KEY).await?;
        debug!(signed_in = user.is_some(), "auth store loaded");
        Ok(Self { store, user })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub async fn token(&self) -> anyhow::Result<Option<String>> {
        self.store.get(AUTH_TOKEN_KEY).await
    }

    #[instrument(skip(self, _password))]
    pub async fn login(&mut self, email: &str, _password: &str) -> anyhow::Result<&User> {
        let completed = self.store.get(PROFILE_COMPLETED_KEY).await?;
        let user = User {
            // same email, same id across logins
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, email.as_bytes()).to_string(),
            name: name_from_email(email).to_string(),
            email: email.to_string(),
            has_completed_profile: completed.as_deref() == Some("true"),
        };
        self.sign_in(user).await
    }

    #[instrument(skip(self, _password))]
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> anyhow::Result<&User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            has_completed_profile: false,
        };
        self.sign_in(user).await
    }

    async fn sign_in(&mut self, user: User) -> anyhow::Result<&User> {
        save_json(self.store.as_ref(), USER_KEY, &user).await?;
        self.store.set(AUTH_TOKEN_KEY, MOCK_AUTH_TOKEN).await?;
        info!(user_id = %user.id, email = %user.email, "user signed in");
        Ok(&*self.user.insert(user))
    }

    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> anyhow::Result<()> {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "user signed out");
        }
        self.store.remove(USER_KEY).await?;
        self.store.remove(AUTH_TOKEN_KEY).await?;
        self.store.remove(PROFILE_COMPLETED_KEY).await?;
        Ok(())
    }

    /// Flags the current user as having a health profile. No-op when signed out.
    pub async fn mark_profile_completed(&mut self) -> anyhow::Result<()> {
        let Some(user) = self.user.as_mut() else {
            debug!("mark_profile_completed without a user");
            return Ok(());
        };
        user.has_completed_profile = true;
        save_json(self.store.as_ref(), USER_KEY, &*user).await?;
        self.store.set(PROFILE_COMPLETED_KEY, "true").await?;
        Ok(())
    }
}
