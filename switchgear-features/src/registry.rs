//! Immutable registry of resolved flags.

use crate::error::FeatureResult;
use crate::flag::{FeatureFlag, FlagDeclaration};
use crate::loader::UserListLoader;
use std::collections::HashMap;

/// Snapshot of resolved flag definitions, keyed by lowercased name.
///
/// A registry is built once from an ordered declaration list and never
/// mutated afterwards; replacing it means building a fresh one and
/// swapping the whole snapshot.
pub struct FlagRegistry {
    flags: HashMap<String, FeatureFlag>,
}

impl FlagRegistry {
    /// Resolve an ordered declaration list into a registry.
    ///
    /// All-or-nothing: any user-list or fraction failure aborts the whole
    /// batch. Declarations sharing a name (case-insensitively) resolve to
    /// the last one in the list.
    pub fn from_declarations(
        declarations: &[FlagDeclaration],
        loader: &dyn UserListLoader,
    ) -> FeatureResult<Self> {
        let mut flags = HashMap::with_capacity(declarations.len());

        for declaration in declarations {
            let flag = FeatureFlag::resolve(declaration, loader)?;
            switchgear_log::debug!(
                target: "switchgear::registry",
                "resolved flag {:?} as {:?}",
                flag.name(),
                flag.kind()
            );
            flags.insert(flag.name().to_lowercase(), flag);
        }

        Ok(Self { flags })
    }

    /// Case-insensitive exact-match lookup.
    pub fn find(&self, name: &str) -> Option<&FeatureFlag> {
        self.flags.get(&name.to_lowercase())
    }

    /// Number of registered flags
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the registry holds no flags
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeatureError;
    use crate::loader::FileUserListLoader;

    fn declarations(specs: &[(&str, bool)]) -> Vec<FlagDeclaration> {
        specs
            .iter()
            .map(|(name, enabled)| FlagDeclaration::new(*name).with_enabled(*enabled))
            .collect()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = FlagRegistry::from_declarations(
            &declarations(&[("NewDashboard", true)]),
            &FileUserListLoader,
        )
        .unwrap();

        assert!(registry.find("newdashboard").is_some());
        assert!(registry.find("NEWDASHBOARD").is_some());
        assert!(registry.find("NewDashboard").is_some());
        assert!(registry.find("other").is_none());
    }

    #[test]
    fn test_duplicate_names_last_declaration_wins() {
        let registry = FlagRegistry::from_declarations(
            &declarations(&[("toggle", false), ("TOGGLE", true)]),
            &FileUserListLoader,
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.find("toggle").unwrap().enabled());
    }

    #[test]
    fn test_construction_is_all_or_nothing() {
        let declarations = vec![
            FlagDeclaration::new("good").with_enabled(true),
            FlagDeclaration::new("bad")
                .with_enabled(true)
                .with_rollout_fraction("not-a-number"),
        ];

        let result = FlagRegistry::from_declarations(&declarations, &FileUserListLoader);
        assert!(matches!(result, Err(FeatureError::InvalidFraction { .. })));
    }

    #[test]
    fn test_unreadable_user_list_fails_the_batch() {
        let declarations = vec![
            FlagDeclaration::new("good").with_enabled(true),
            FlagDeclaration::new("gated")
                .with_enabled(true)
                .with_user_list_path("/nonexistent/users.txt"),
        ];

        let result = FlagRegistry::from_declarations(&declarations, &FileUserListLoader);
        assert!(matches!(result, Err(FeatureError::UserList { .. })));
    }

    #[test]
    fn test_empty_declaration_list() {
        let registry = FlagRegistry::from_declarations(&[], &FileUserListLoader).unwrap();

        assert!(registry.is_empty());
        assert!(registry.find("anything").is_none());
    }
}
