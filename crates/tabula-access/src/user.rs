//! The authenticated user as the backend describes it.

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, Result};

/// A signed-in user.
///
/// Only `permissions` and `roles` matter to the gate; the rest is carried
/// for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn new(name: impl Into<String>) -> Self {
        AuthUser {
            name: name.into(),
            ..AuthUser::default()
        }
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Parses a user from the backend's JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(AccessError::InvalidUser)
    }

    /// Exact, case-sensitive permission lookup.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}
