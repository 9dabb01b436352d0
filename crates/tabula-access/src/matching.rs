//! Permission and role matching.
//!
//! Permissions are opaque strings compared exactly. Role names are
//! free-form labels and compare case-insensitively.

use serde::{Deserialize, Serialize};

use crate::user::AuthUser;

/// How several required permissions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Match {
    /// At least one is held.
    #[default]
    Any,
    /// Every one is held.
    All,
}

/// Checks `required` against the user's permissions.
///
/// An empty requirement list is always satisfied.
pub fn match_permissions<S: AsRef<str>>(user: &AuthUser, required: &[S], mode: Match) -> bool {
    if required.is_empty() {
        return true;
    }
    let held = |p: &S| user.has_permission(p.as_ref());
    match mode {
        Match::Any => required.iter().any(held),
        Match::All => required.iter().all(held),
    }
}

/// Case-insensitive role lookup.
pub fn has_role(user: &AuthUser, role: &str) -> bool {
    let role = role.trim().to_lowercase();
    user.roles
        .iter()
        .any(|r| r.trim().to_lowercase() == role)
}
