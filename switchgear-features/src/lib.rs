//! Feature Flags for Switchgear
//!
//! Static feature-flag evaluation: flags load once from a configuration
//! source into an in-memory registry and answer enabled/disabled decisions
//! for the rest of the process lifetime.
//!
//! # Features
//!
//! - 🚀 **Basic flags** - Plain on/off switches
//! - 🎲 **Random rollout** - Probabilistically enable a share of evaluations
//! - 🎯 **User allowlists** - Enable a flag for named users only
//! - 🔁 **Snapshot replace** - Re-initialization swaps the whole registry atomically
//!
//! # Quick Start
//!
//! ```
//! use switchgear_features::{FeatureService, FileUserListLoader, FlagDeclaration};
//!
//! let declarations = vec![
//!     FlagDeclaration::new("new-ui").with_enabled(true),
//!     FlagDeclaration::new("beta-search")
//!         .with_enabled(true)
//!         .with_rollout_fraction("0.25"),
//! ];
//!
//! let service = FeatureService::new();
//! service.initialize(&declarations, &FileUserListLoader)?;
//!
//! assert!(service.is_enabled("new-ui")?);
//! assert!(!service.is_enabled("unknown-flag")?);
//! # Ok::<(), switchgear_features::FeatureError>(())
//! ```
//!
//! # Configuration-driven initialization
//!
//! [`FeatureService::initialize_default`] sources declarations from the
//! file named by `SWITCHGEAR_CONFIG` (`switchgear.toml` by default):
//!
//! ```toml
//! [[features]]
//! name = "new-ui"
//! enabled = true
//!
//! [[features]]
//! name = "beta-search"
//! enabled = true
//! rollout_fraction = "0.25"
//!
//! [[features]]
//! name = "early-access"
//! enabled = true
//! user_list_path = "beta-users.txt"
//! ```
//!
//! The first evaluation call performs this initialization implicitly when
//! nothing was initialized explicitly; the resulting registry is then
//! reused for the process lifetime, or until re-initialized.
//!
//! # User-scoped queries
//!
//! ```
//! use switchgear_features::{FeatureService, FlagDeclaration, UserListLoader, FeatureResult};
//! use std::collections::HashSet;
//!
//! struct BetaGroup;
//!
//! impl UserListLoader for BetaGroup {
//!     fn load(&self, _path: &str) -> FeatureResult<HashSet<String>> {
//!         Ok(["alice".to_string(), "bob".to_string()].into())
//!     }
//! }
//!
//! let service = FeatureService::new();
//! service.initialize(
//!     &[FlagDeclaration::new("early-access")
//!         .with_enabled(true)
//!         .with_user_list_path("beta-users.txt")],
//!     &BetaGroup,
//! )?;
//!
//! assert!(service.is_enabled_for_user("early-access", "Alice")?);
//! assert!(!service.is_enabled_for_user("early-access", "carol")?);
//! # Ok::<(), switchgear_features::FeatureError>(())
//! ```

pub mod error;
pub mod flag;
pub mod loader;
pub mod registry;
pub mod service;

pub use error::{FeatureError, FeatureResult};
pub use flag::{FeatureFlag, FlagDeclaration, FlagKind};
pub use loader::{FileUserListLoader, UserListLoader};
pub use registry::FlagRegistry;
pub use service::{
    features, initialize, initialize_default, is_enabled, is_enabled_for_user, FeatureService,
};
