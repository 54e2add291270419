//! Flag model and variant evaluation.
//!
//! A raw [`FlagDeclaration`] is resolved into a [`FeatureFlag`] carrying
//! exactly one [`FlagKind`] variant, selected once at construction. No
//! type inspection happens at evaluation time.

use crate::error::{FeatureError, FeatureResult};
use crate::loader::UserListLoader;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw flag declaration as supplied by a configuration source.
///
/// Only `name` is required. Which variant the declaration resolves to is
/// decided by [`FeatureFlag::resolve`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagDeclaration {
    /// Lookup name, matched case-insensitively
    pub name: String,

    /// Whether the flag is switched on; absent means off
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Path to a newline-delimited user allowlist
    #[serde(default)]
    pub user_list_path: Option<String>,

    /// Rollout fraction in [0, 1], kept as text until resolution
    #[serde(default)]
    pub rollout_fraction: Option<String>,
}

impl FlagDeclaration {
    /// Create a declaration with the given name and nothing else set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: None,
            user_list_path: None,
            rollout_fraction: None,
        }
    }

    /// Set the enabled state
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set the user-list path
    pub fn with_user_list_path(mut self, path: impl Into<String>) -> Self {
        self.user_list_path = Some(path.into());
        self
    }

    /// Set the rollout fraction text
    pub fn with_rollout_fraction(mut self, fraction: impl Into<String>) -> Self {
        self.rollout_fraction = Some(fraction.into());
        self
    }
}

/// Resolved feature flag.
#[derive(Debug, Clone)]
pub struct FeatureFlag {
    name: String,
    enabled: bool,
    kind: FlagKind,
}

/// Variant-specific behavior, fixed at construction.
#[derive(Debug, Clone)]
pub enum FlagKind {
    /// Plain on/off switch
    Basic,
    /// Enabled for a random share of evaluations, re-rolled every call
    RandomRollout {
        /// Probability threshold in [0, 1]
        fraction: f64,
    },
    /// Enabled, for user-scoped queries, only for allowlisted users
    UserAllowlist {
        /// Lowercased user names permitted by the allowlist
        users: HashSet<String>,
    },
}

impl FeatureFlag {
    /// Resolve a raw declaration into exactly one flag variant.
    ///
    /// A declared user list takes precedence over a declared rollout
    /// fraction: a declaration carrying both resolves to a user allowlist
    /// and the fraction is ignored. The user list loads once, here; a load
    /// failure fails the resolution.
    pub fn resolve(
        declaration: &FlagDeclaration,
        loader: &dyn UserListLoader,
    ) -> FeatureResult<Self> {
        let enabled = declaration.enabled.unwrap_or(false);

        let path = declaration
            .user_list_path
            .as_deref()
            .filter(|p| !p.is_empty());
        let fraction = declaration
            .rollout_fraction
            .as_deref()
            .filter(|f| !f.is_empty());

        let kind = if let Some(path) = path {
            let users = loader
                .load(path)?
                .into_iter()
                .map(|user| user.to_lowercase())
                .collect();
            FlagKind::UserAllowlist { users }
        } else if let Some(raw) = fraction {
            FlagKind::RandomRollout {
                fraction: parse_fraction(&declaration.name, raw)?,
            }
        } else {
            FlagKind::Basic
        };

        Ok(Self {
            name: declaration.name.clone(),
            enabled,
            kind,
        })
    }

    /// Flag name as declared
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base enabled state
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Resolved variant
    pub fn kind(&self) -> &FlagKind {
        &self.kind
    }

    /// Evaluate the flag without user scoping.
    ///
    /// Basic and allowlist flags answer their base enabled state; rollout
    /// flags additionally draw from the process-wide generator on every
    /// call, so the outcome is not stable across evaluations.
    pub fn evaluate(&self) -> bool {
        match self.kind {
            FlagKind::RandomRollout { fraction } => {
                self.enabled && rand::rng().random::<f64>() <= fraction
            }
            _ => self.enabled,
        }
    }

    /// Evaluate the flag for a specific user.
    ///
    /// Answers `false` whenever the user-agnostic check does. Allowlist
    /// flags then require a case-insensitive membership match (an empty
    /// user name never matches); other variants apply no user filtering.
    pub fn evaluate_for_user(&self, user: &str) -> bool {
        if !self.evaluate() {
            return false;
        }

        match &self.kind {
            FlagKind::UserAllowlist { users } => {
                !user.is_empty() && users.contains(&user.to_lowercase())
            }
            _ => true,
        }
    }
}

/// Parse a rollout fraction from its locale-invariant text form.
fn parse_fraction(flag: &str, raw: &str) -> FeatureResult<f64> {
    let invalid = || FeatureError::InvalidFraction {
        flag: flag.to_string(),
        value: raw.to_string(),
    };

    let fraction: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(invalid());
    }

    Ok(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticUsers(Vec<&'static str>);

    impl UserListLoader for StaticUsers {
        fn load(&self, _path: &str) -> FeatureResult<HashSet<String>> {
            Ok(self.0.iter().map(|u| u.to_string()).collect())
        }
    }

    struct NoUsers;

    impl UserListLoader for NoUsers {
        fn load(&self, path: &str) -> FeatureResult<HashSet<String>> {
            panic!("unexpected user-list load for {}", path);
        }
    }

    #[test]
    fn test_basic_flag_enabled() {
        let declaration = FlagDeclaration::new("new-ui").with_enabled(true);
        let flag = FeatureFlag::resolve(&declaration, &NoUsers).unwrap();

        assert!(matches!(flag.kind(), FlagKind::Basic));
        assert!(flag.evaluate());
    }

    #[test]
    fn test_basic_flag_disabled_and_unset() {
        let disabled = FlagDeclaration::new("old-ui").with_enabled(false);
        let flag = FeatureFlag::resolve(&disabled, &NoUsers).unwrap();
        assert!(!flag.evaluate());

        // Enabled defaults to off when the declaration omits it
        let unset = FlagDeclaration::new("old-ui");
        let flag = FeatureFlag::resolve(&unset, &NoUsers).unwrap();
        assert!(!flag.evaluate());
    }

    #[test]
    fn test_rollout_full_fraction_always_enabled() {
        let declaration = FlagDeclaration::new("ramp")
            .with_enabled(true)
            .with_rollout_fraction("1.0");
        let flag = FeatureFlag::resolve(&declaration, &NoUsers).unwrap();

        for _ in 0..1_000 {
            assert!(flag.evaluate());
        }
    }

    #[test]
    fn test_rollout_zero_fraction_stays_disabled() {
        let declaration = FlagDeclaration::new("ramp")
            .with_enabled(true)
            .with_rollout_fraction("0.0");
        let flag = FeatureFlag::resolve(&declaration, &NoUsers).unwrap();

        let hits = (0..10_000).filter(|_| flag.evaluate()).count();
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_rollout_disabled_never_draws_true() {
        let declaration = FlagDeclaration::new("ramp")
            .with_enabled(false)
            .with_rollout_fraction("1.0");
        let flag = FeatureFlag::resolve(&declaration, &NoUsers).unwrap();

        assert!(!flag.evaluate());
    }

    #[test]
    fn test_rollout_intermediate_fraction_rate() {
        let declaration = FlagDeclaration::new("ramp")
            .with_enabled(true)
            .with_rollout_fraction("0.3");
        let flag = FeatureFlag::resolve(&declaration, &NoUsers).unwrap();

        let hits = (0..10_000).filter(|_| flag.evaluate()).count();
        let rate = hits as f64 / 10_000.0;
        assert!((rate - 0.3).abs() < 0.05, "observed rate {}", rate);
    }

    #[test]
    fn test_invalid_fraction_is_rejected() {
        for bad in ["0,5", "abc", "", "NaN", "inf", "1.5", "-0.1"] {
            let declaration = FlagDeclaration::new("ramp")
                .with_enabled(true)
                .with_rollout_fraction(bad);
            let result = FeatureFlag::resolve(&declaration, &NoUsers);

            if bad.is_empty() {
                // Empty text means no fraction was declared at all
                assert!(matches!(
                    result.unwrap().kind(),
                    FlagKind::Basic
                ));
            } else {
                assert!(
                    matches!(result, Err(FeatureError::InvalidFraction { .. })),
                    "{:?} should be rejected",
                    bad
                );
            }
        }
    }

    #[test]
    fn test_fraction_accepts_surrounding_whitespace() {
        let declaration = FlagDeclaration::new("ramp")
            .with_enabled(true)
            .with_rollout_fraction(" 0.25 ");
        let flag = FeatureFlag::resolve(&declaration, &NoUsers).unwrap();

        assert!(matches!(
            flag.kind(),
            FlagKind::RandomRollout { fraction } if (fraction - 0.25).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn test_allowlist_membership_is_case_insensitive() {
        let declaration = FlagDeclaration::new("beta")
            .with_enabled(true)
            .with_user_list_path("beta-users.txt");
        let flag = FeatureFlag::resolve(&declaration, &StaticUsers(vec!["alice", "Bob"])).unwrap();

        assert!(flag.evaluate_for_user("Alice"));
        assert!(flag.evaluate_for_user("BOB"));
        assert!(!flag.evaluate_for_user("carol"));
        assert!(!flag.evaluate_for_user(""));
    }

    #[test]
    fn test_allowlist_without_user_uses_base_check() {
        let declaration = FlagDeclaration::new("beta")
            .with_enabled(true)
            .with_user_list_path("beta-users.txt");
        let flag = FeatureFlag::resolve(&declaration, &StaticUsers(vec!["alice"])).unwrap();

        // The user-agnostic form only applies the enabled check
        assert!(flag.evaluate());
    }

    #[test]
    fn test_allowlist_disabled_rejects_member() {
        let declaration = FlagDeclaration::new("beta")
            .with_enabled(false)
            .with_user_list_path("beta-users.txt");
        let flag = FeatureFlag::resolve(&declaration, &StaticUsers(vec!["alice"])).unwrap();

        assert!(!flag.evaluate_for_user("alice"));
    }

    #[test]
    fn test_user_list_takes_precedence_over_rollout() {
        let declaration = FlagDeclaration::new("beta")
            .with_enabled(true)
            .with_user_list_path("beta-users.txt")
            .with_rollout_fraction("0.0");
        let flag = FeatureFlag::resolve(&declaration, &StaticUsers(vec!["alice"])).unwrap();

        // The fraction is ignored outright, so a zero rollout cannot
        // suppress an allowlisted user
        assert!(matches!(flag.kind(), FlagKind::UserAllowlist { .. }));
        assert!(flag.evaluate_for_user("alice"));
    }

    #[test]
    fn test_non_allowlist_flag_ignores_user() {
        let declaration = FlagDeclaration::new("new-ui").with_enabled(true);
        let flag = FeatureFlag::resolve(&declaration, &NoUsers).unwrap();

        assert!(flag.evaluate_for_user("anyone"));
    }
}
