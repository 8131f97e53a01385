//! Role registry: which role names are valid for the current environment

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::document::load_object;
use crate::error::ConfigError;

/// Conventional location of the environment's active roles config
pub const ACTIVE_ROLES_PATH: &str = "conductor/config/roles.json";

/// Shipped default roles config, used when no active config exists
pub const DEFAULT_ROLES_PATH: &str = "config/roles.default.json";

/// Where to look for a roles config when none is given explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSources {
    /// Preferred config, used if it exists
    pub active: PathBuf,
    /// Used when `active` is absent
    pub fallback: PathBuf,
}

impl RoleSources {
    /// The conventional paths resolved against `base`
    pub fn rooted_at(base: &Path) -> Self {
        Self {
            active: base.join(ACTIVE_ROLES_PATH),
            fallback: base.join(DEFAULT_ROLES_PATH),
        }
    }

    /// Pick the config path: explicit (if non-empty), else active if present, else fallback
    pub fn resolve(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
            return path.to_path_buf();
        }

        if self.active.exists() {
            self.active.clone()
        } else {
            self.fallback.clone()
        }
    }
}

impl Default for RoleSources {
    fn default() -> Self {
        Self {
            active: PathBuf::from(ACTIVE_ROLES_PATH),
            fallback: PathBuf::from(DEFAULT_ROLES_PATH),
        }
    }
}

/// Non-empty set of distinct role names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    roles: BTreeSet<String>,
}

impl RoleSet {
    /// Build from names, dropping blank ones. Returns `None` if nothing is left.
    pub fn from_names<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roles: BTreeSet<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| !name.trim().is_empty())
            .collect();

        if roles.is_empty() {
            None
        } else {
            Some(Self { roles })
        }
    }

    /// Load the `roles` object of a config file; its keys are the role names
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let document = load_object(path)?;

        let roles = match document.get("roles") {
            Some(serde_json::Value::Object(roles)) if !roles.is_empty() => roles,
            _ => {
                return Err(ConfigError::MissingRoles {
                    path: path.to_path_buf(),
                })
            }
        };

        Self::from_names(roles.keys().cloned()).ok_or_else(|| ConfigError::NoValidRoles {
            path: path.to_path_buf(),
        })
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Resolve and load the role set for this invocation
pub fn resolve_roles(explicit: Option<&Path>, sources: &RoleSources) -> Result<RoleSet, ConfigError> {
    let path = sources.resolve(explicit);
    tracing::debug!(path = %path.display(), "Loading roles config");
    RoleSet::load(&path)
}
