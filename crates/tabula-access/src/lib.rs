//! Tabula Access - permission gating for protected views.
//!
//! The gate is a pure predicate over the auth state: no I/O, no session
//! handling. Whoever owns authentication passes in the current user (if
//! any) and whether it is still loading; the gate answers with a
//! [`Decision`].
//!
//! ```rust
//! use tabula_access::{gate, AuthUser, Decision};
//!
//! let ann = AuthUser::new("Ann").permission("users.read");
//!
//! assert_eq!(gate(Some(&ann), Some("users.read"), false), Decision::Render);
//! assert_eq!(gate(Some(&ann), Some("users.read"), true), Decision::Loading);
//! assert_eq!(
//!     gate(Some(&ann), Some("users.delete"), false),
//!     Decision::Redirect("/access-denied".to_string())
//! );
//! ```

pub mod error;
pub mod gate;
pub mod matching;
pub mod user;

pub use error::{AccessError, Result};
pub use gate::{gate, Decision, Gated, PermissionGate, ACCESS_DENIED_ROUTE};
pub use matching::{has_role, match_permissions, Match};
pub use user::AuthUser;
