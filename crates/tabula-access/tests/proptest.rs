//! Property-based tests for the permission gate.

use proptest::prelude::*;
use tabula_access::{gate, match_permissions, AuthUser, Decision, Match};

fn permission() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["users.read", "users.write", "Users.Read", "posts.read", ""])
        .prop_map(String::from)
}

fn user_strategy() -> impl Strategy<Value = AuthUser> {
    prop::collection::vec(permission(), 0..4).prop_map(|permissions| AuthUser {
        permissions,
        ..AuthUser::new("u")
    })
}

proptest! {
    /// While auth is loading the gate never decides.
    #[test]
    fn loading_is_always_loading(
        user in prop::option::of(user_strategy()),
        required in prop::option::of(permission()),
    ) {
        prop_assert_eq!(gate(user.as_ref(), required.as_deref(), true), Decision::Loading);
    }

    /// Once loaded, the gate renders exactly when a user holds the permission.
    #[test]
    fn render_iff_permission_held(user in user_strategy(), required in permission()) {
        let decision = gate(Some(&user), Some(&required), false);
        let held = user.permissions.contains(&required);
        prop_assert_eq!(decision == Decision::Render, held);
    }

    /// `All` implies `Any` for a non-empty requirement.
    #[test]
    fn all_implies_any(user in user_strategy(), required in prop::collection::vec(permission(), 1..4)) {
        if match_permissions(&user, &required, Match::All) {
            prop_assert!(match_permissions(&user, &required, Match::Any));
        }
    }

    /// Same inputs, same decision.
    #[test]
    fn gate_is_pure(user in prop::option::of(user_strategy()), required in prop::option::of(permission())) {
        prop_assert_eq!(
            gate(user.as_ref(), required.as_deref(), false),
            gate(user.as_ref(), required.as_deref(), false)
        );
    }
}
