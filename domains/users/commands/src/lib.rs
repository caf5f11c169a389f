use serde::{Deserialize, Serialize};

/// Create an API-only account on behalf of `creator_username`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionApiUserCommand {
    pub username: String,
    pub email: String,
    pub creator_username: String,
}

impl ProvisionApiUserCommand {
    pub fn new(
        username: impl Into<String>, email: impl Into<String>,
        creator_username: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            creator_username: creator_username.into(),
        }
    }
}
