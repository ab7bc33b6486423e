//! Role management configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment toggle for role CRUD commands
pub const ENV_ENABLE_ROLE_CRUD: &str = "DOCDB_ENABLE_ROLE_CRUD";

/// Environment toggle for the `$db: "admin"` requirement
pub const ENV_ENABLE_ROLES_ADMIN_DB_CHECK: &str = "DOCDB_ENABLE_ROLES_ADMIN_DB_CHECK";

/// Feature switches for the role-management commands
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RbacConfig {
    /// Enables createRole, dropRole and rolesInfo
    #[serde(default)]
    pub enable_role_crud: bool,

    /// Requires role commands to be sent to the admin database
    #[serde(default = "default_true")]
    pub enable_roles_admin_db_check: bool,
}

fn default_true() -> bool { true }

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            enable_role_crud: false,
            enable_roles_admin_db_check: true,
        }
    }
}

impl RbacConfig {
    /// Configuration with role CRUD enabled and the admin database check on
    pub fn enabled() -> Self {
        Self {
            enable_role_crud: true,
            ..Self::default()
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse RBAC configuration")
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Build configuration from environment toggles, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_ENABLE_ROLE_CRUD) {
            config.enable_role_crud = parse_toggle(ENV_ENABLE_ROLE_CRUD, &value)?;
        }
        if let Some(value) = lookup(ENV_ENABLE_ROLES_ADMIN_DB_CHECK) {
            config.enable_roles_admin_db_check =
                parse_toggle(ENV_ENABLE_ROLES_ADMIN_DB_CHECK, &value)?;
        }
        Ok(config)
    }
}

fn parse_toggle(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        other => anyhow::bail!("Invalid boolean '{}' for {}", other, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RbacConfig::default();
        assert!(!config.enable_role_crud);
        assert!(config.enable_roles_admin_db_check);
    }

    #[test]
    fn test_from_toml() {
        let config = RbacConfig::from_toml_str("enable_role_crud = true").unwrap();
        assert!(config.enable_role_crud);
        assert!(config.enable_roles_admin_db_check);

        let config = RbacConfig::from_toml_str(
            "enable_role_crud = true\nenable_roles_admin_db_check = false",
        )
        .unwrap();
        assert!(!config.enable_roles_admin_db_check);

        assert!(RbacConfig::from_toml_str("enable_role_crud = \"maybe\"").is_err());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_ENABLE_ROLE_CRUD, "ON"),
            (ENV_ENABLE_ROLES_ADMIN_DB_CHECK, "0"),
        ]
        .into_iter()
        .collect();

        let config = RbacConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert!(config.enable_role_crud);
        assert!(!config.enable_roles_admin_db_check);
    }

    #[test]
    fn test_invalid_toggle() {
        let result = RbacConfig::from_lookup(|k| {
            (k == ENV_ENABLE_ROLE_CRUD).then(|| "sometimes".to_string())
        });
        assert!(result.is_err());

        let result = RbacConfig::from_lookup(|k| (k == ENV_ENABLE_ROLE_CRUD).then(|| "yes".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(RbacConfig::load("/nonexistent/rbac.toml").is_err());
    }
}
