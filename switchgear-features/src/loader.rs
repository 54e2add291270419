//! User-list loading.

use crate::error::{FeatureError, FeatureResult};
use std::collections::HashSet;
use std::fs;

/// Resolves a user-list path into the set of user names it contains.
///
/// Allowlist flags load their users exactly once, when the registry is
/// built. Implementations decide what the path means; the default treats
/// it as a filesystem path.
pub trait UserListLoader {
    fn load(&self, path: &str) -> FeatureResult<HashSet<String>>;
}

/// Loads user names from a newline-delimited text file.
///
/// One name per line, surrounding whitespace trimmed, blank lines skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileUserListLoader;

impl UserListLoader for FileUserListLoader {
    fn load(&self, path: &str) -> FeatureResult<HashSet<String>> {
        let content = fs::read_to_string(path).map_err(|source| FeatureError::UserList {
            path: path.to_string(),
            source,
        })?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
