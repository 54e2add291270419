//! Evaluation service and process-wide entry points.

use crate::error::{FeatureError, FeatureResult};
use crate::flag::FlagDeclaration;
use crate::loader::{FileUserListLoader, UserListLoader};
use crate::registry::FlagRegistry;
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};
use switchgear_config::{ConfigError, ConfigService, FileFormat};

/// Environment variable naming the configuration file.
const CONFIG_PATH_VAR: &str = "SWITCHGEAR_CONFIG";

/// Configuration file consulted when `SWITCHGEAR_CONFIG` is unset.
const DEFAULT_CONFIG_FILE: &str = "switchgear.toml";

/// Configuration key holding the flag declaration list.
const FEATURES_KEY: &str = "features";

/// The flag evaluation service.
///
/// Holds the registry as an immutable snapshot behind a shared slot:
/// initialization builds a complete new registry and swaps it in as a
/// single visible step, so concurrent readers see either the old full set
/// or the new full set, never a partially built one.
pub struct FeatureService {
    registry: RwLock<Option<Arc<FlagRegistry>>>,
}

impl FeatureService {
    /// Create an uninitialized service.
    ///
    /// The registry comes into existence on the first `initialize*` call,
    /// or implicitly on the first evaluation.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(None),
        }
    }

    /// Build a new registry from the declarations and install it,
    /// replacing any previous registry in full.
    pub fn initialize(
        &self,
        declarations: &[FlagDeclaration],
        loader: &dyn UserListLoader,
    ) -> FeatureResult<()> {
        let registry = Arc::new(FlagRegistry::from_declarations(declarations, loader)?);
        self.install(registry);
        Ok(())
    }

    /// Convenience form sourcing declarations from the configuration
    /// subsystem.
    ///
    /// Reads the file named by `SWITCHGEAR_CONFIG` (`switchgear.toml` by
    /// default; TOML, JSON and env formats supported), applies
    /// `SWITCHGEAR_`-prefixed environment variables, and expects the
    /// declaration array under the `features` key. User lists load through
    /// [`FileUserListLoader`].
    pub fn initialize_default(&self) -> FeatureResult<()> {
        let declarations = declarations_from_config()?;
        self.initialize(&declarations, &FileUserListLoader)
    }

    /// Answer whether the named flag is enabled.
    ///
    /// An uninitialized service first runs [`Self::initialize_default`];
    /// once a registry exists it is reused. Empty and unknown names answer
    /// `false`. The only error is an initialization failure on that
    /// implicit first use.
    pub fn is_enabled(&self, name: &str) -> FeatureResult<bool> {
        let registry = self.ensure_registry()?;

        if name.is_empty() {
            return Ok(false);
        }

        Ok(registry
            .find(name)
            .map(|flag| flag.evaluate())
            .unwrap_or(false))
    }

    /// Answer whether the named flag is enabled for the given user.
    ///
    /// `false` whenever [`Self::is_enabled`] is; allowlist flags then
    /// require the user to match an allowlist entry case-insensitively,
    /// while every other variant passes the name-only result through.
    pub fn is_enabled_for_user(&self, name: &str, user: &str) -> FeatureResult<bool> {
        let registry = self.ensure_registry()?;

        if name.is_empty() {
            return Ok(false);
        }

        Ok(registry
            .find(name)
            .map(|flag| flag.evaluate_for_user(user))
            .unwrap_or(false))
    }

    /// Whether a registry has been installed.
    pub fn is_initialized(&self) -> bool {
        self.registry.read().unwrap().is_some()
    }

    fn install(&self, registry: Arc<FlagRegistry>) {
        switchgear_log::info!(
            target: "switchgear::service",
            "flag registry installed with {} flags",
            registry.len()
        );
        *self.registry.write().unwrap() = Some(registry);
    }

    /// Current snapshot, implicitly initialized on first use.
    ///
    /// The lazy path holds the write lock across the build so the default
    /// initialization runs at most once even under concurrent first calls.
    /// A failed attempt leaves the slot empty; the next call retries.
    fn ensure_registry(&self) -> FeatureResult<Arc<FlagRegistry>> {
        if let Some(registry) = self.registry.read().unwrap().clone() {
            return Ok(registry);
        }

        let mut slot = self.registry.write().unwrap();
        if let Some(registry) = slot.as_ref() {
            return Ok(registry.clone());
        }

        let registry = match build_default_registry() {
            Ok(registry) => registry,
            Err(e) => {
                switchgear_log::error!(
                    target: "switchgear::service",
                    "implicit initialization failed: {}",
                    e
                );
                return Err(e);
            }
        };
        switchgear_log::info!(
            target: "switchgear::service",
            "flag registry installed with {} flags",
            registry.len()
        );
        *slot = Some(registry.clone());

        Ok(registry)
    }
}

/// Build a registry the way `initialize_default` does.
fn build_default_registry() -> FeatureResult<Arc<FlagRegistry>> {
    let declarations = declarations_from_config()?;
    Ok(Arc::new(FlagRegistry::from_declarations(
        &declarations,
        &FileUserListLoader,
    )?))
}

impl Default for FeatureService {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the declaration list out of the configuration subsystem.
fn declarations_from_config() -> FeatureResult<Vec<FlagDeclaration>> {
    let path =
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let format = FileFormat::from_path(&path).ok_or_else(|| {
        FeatureError::Configuration(ConfigError::LoadError(format!(
            "Unsupported configuration file: {}",
            path
        )))
    })?;

    let config = ConfigService::builder()
        .with_prefix("SWITCHGEAR".to_string())
        .load_env()
        .add_file(path, format)
        .build()?;

    Ok(config.get(FEATURES_KEY)?)
}

// ============================================================================
// Process-wide service
// ============================================================================

/// Default process-wide service backing the free functions.
static FEATURES: Lazy<FeatureService> = Lazy::new(FeatureService::new);

/// The process-wide feature service.
pub fn features() -> &'static FeatureService {
    &FEATURES
}

/// Initialize the process-wide service from explicit declarations.
pub fn initialize(
    declarations: &[FlagDeclaration],
    loader: &dyn UserListLoader,
) -> FeatureResult<()> {
    FEATURES.initialize(declarations, loader)
}

/// Initialize the process-wide service from the configuration subsystem.
pub fn initialize_default() -> FeatureResult<()> {
    FEATURES.initialize_default()
}

/// Answer whether the named flag is enabled, process-wide.
pub fn is_enabled(name: &str) -> FeatureResult<bool> {
    FEATURES.is_enabled(name)
}

/// Answer whether the named flag is enabled for the given user,
/// process-wide.
pub fn is_enabled_for_user(name: &str, user: &str) -> FeatureResult<bool> {
    FEATURES.is_enabled_for_user(name, user)
}
