//! The permission gate.
//!
//! A gate sits in front of a protected view and decides, from the auth state
//! alone, whether to show a loading placeholder, render the view, or send
//! the user to the access-denied route:
//!
//! | auth loading | user    | required permission | decision |
//! |--------------|---------|---------------------|----------|
//! | yes          | any     | any                 | Loading  |
//! | no           | none    | any                 | Redirect |
//! | no           | some    | none                | Render   |
//! | no           | some    | held                | Render   |
//! | no           | some    | not held            | Redirect |

use serde::Serialize;

use crate::error::{AccessError, Result};
use crate::matching::{match_permissions, Match};
use crate::user::AuthUser;

/// Where denied users are sent unless configured otherwise.
pub const ACCESS_DENIED_ROUTE: &str = "/access-denied";

/// What the gate decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "route", rename_all = "lowercase")]
pub enum Decision {
    Loading,
    Render,
    Redirect(String),
}

/// The gate's decision with the rendered view attached when allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gated<T> {
    Loading,
    Render(T),
    Redirect(String),
}

impl<T> Gated<T> {
    pub fn is_render(&self) -> bool {
        matches!(self, Gated::Render(_))
    }

    pub fn into_rendered(self) -> Option<T> {
        match self {
            Gated::Render(view) => Some(view),
            _ => None,
        }
    }
}

/// A permission requirement plus the route to redirect to when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGate {
    required: Vec<String>,
    mode: Match,
    redirect_to: String,
}

impl Default for PermissionGate {
    fn default() -> Self {
        PermissionGate {
            required: Vec::new(),
            mode: Match::Any,
            redirect_to: ACCESS_DENIED_ROUTE.to_string(),
        }
    }
}

impl PermissionGate {
    /// A gate that only requires a signed-in user.
    pub fn new() -> Self {
        PermissionGate::default()
    }

    /// A gate requiring `permission`, or just a signed-in user for `None`
    /// or a blank string.
    pub fn for_permission(permission: Option<&str>) -> Self {
        permission
            .filter(|p| !p.trim().is_empty())
            .map(|p| PermissionGate::new().require(p))
            .unwrap_or_default()
    }

    pub fn require(mut self, permission: impl Into<String>) -> Self {
        self.required.push(permission.into());
        self
    }

    /// How several required permissions combine. Defaults to [`Match::Any`].
    pub fn mode(mut self, mode: Match) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the redirect route. It must be an absolute path.
    pub fn redirect_to(mut self, route: impl Into<String>) -> Result<Self> {
        let route = route.into();
        if !route.starts_with('/') {
            return Err(AccessError::InvalidRoute(route));
        }
        self.redirect_to = route;
        Ok(self)
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn redirect_route(&self) -> &str {
        &self.redirect_to
    }

    /// Decides for the given auth state. Pure: same inputs, same answer.
    pub fn decide(&self, user: Option<&AuthUser>, auth_loading: bool) -> Decision {
        if auth_loading {
            return Decision::Loading;
        }
        let Some(user) = user else {
            log::debug!("gate: no user, redirecting to {}", self.redirect_to);
            return Decision::Redirect(self.redirect_to.clone());
        };
        if match_permissions(user, &self.required, self.mode) {
            Decision::Render
        } else {
            log::debug!(
                "gate: '{}' lacks {:?}, redirecting to {}",
                user.name,
                self.required,
                self.redirect_to
            );
            Decision::Redirect(self.redirect_to.clone())
        }
    }

    /// Runs `render` only when the gate allows it.
    pub fn guard<T, F>(&self, user: Option<&AuthUser>, auth_loading: bool, render: F) -> Gated<T>
    where
        F: FnOnce() -> T,
    {
        match self.decide(user, auth_loading) {
            Decision::Loading => Gated::Loading,
            Decision::Render => Gated::Render(render()),
            Decision::Redirect(route) => Gated::Redirect(route),
        }
    }
}

/// One-shot form of [`PermissionGate::decide`] with the default route.
pub fn gate(user: Option<&AuthUser>, permission: Option<&str>, auth_loading: bool) -> Decision {
    PermissionGate::for_permission(permission).decide(user, auth_loading)
}
