// Switchgear - static feature-flag evaluation for Rust
//
// Flags load once from a configuration source into an in-memory registry
// and answer enabled/disabled decisions for the process lifetime. Three
// variants exist: basic on/off, randomized rollout, and user allowlist.

// Re-export core functionality
pub use switchgear_features::*;

// Re-export supporting crates
pub use switchgear_config;
pub use switchgear_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        FeatureError,
        FeatureFlag,
        FeatureResult,
        FeatureService,
        FileUserListLoader,
        FlagDeclaration,
        FlagKind,
        FlagRegistry,
        UserListLoader,
        initialize,
        initialize_default,
        is_enabled,
        is_enabled_for_user,
    };
}
