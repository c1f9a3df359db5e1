use serde::{Deserialize, Serialize};

/// Token written on every login/register. Nothing verifies it.
pub const MOCK_AUTH_TOKEN: &str = "mock-token-123";

/// Signed-in user as persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub has_completed_profile: bool,
}
