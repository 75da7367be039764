use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile record stored next to the bearer token after login.
///
/// Fields the client does not know about are carried through `extra` so a
/// stored profile is written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            wallet_address: None,
            username: None,
            email: None,
            created_at: None,
            extra: HashMap::new(),
        }
    }

    /// Name to show for this user: username, else wallet address, else id.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.wallet_address.as_deref())
            .unwrap_or(&self.id)
    }
}
