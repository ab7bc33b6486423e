//! Role store abstraction
//!
//! The store persists roles, their membership grants and custom privileges.
//! Commands only talk to it through [`RoleStore`].

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryRoleStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresRoleStore;

use crate::error::Result;
use crate::request::CustomPrivilege;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One row of the inheritance query: a child role and its direct parents,
/// all in internal form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceRow {
    pub child_role: String,
    #[serde(default)]
    pub parent_roles: Vec<String>,
}

impl InheritanceRow {
    pub fn new(child_role: impl Into<String>, parent_roles: &[&str]) -> Self {
        Self {
            child_role: child_role.into(),
            parent_roles: parent_roles.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Role store trait
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Create a role that cannot log in
    async fn create_role(&self, name: &str) -> Result<()>;

    /// Drop a role together with its memberships and privileges
    async fn drop_role(&self, name: &str) -> Result<()>;

    /// Make `child` a member of `parent`
    async fn grant_role(&self, parent: &str, child: &str) -> Result<()>;

    /// Inheritance rows for every exposed role, one row per child
    ///
    /// Covers non-system roles that cannot log in, plus the root role.
    /// Parents are restricted to non-system roles.
    async fn query_inheritance_rows(&self) -> Result<Vec<InheritanceRow>>;

    /// Persist the custom privileges of a role
    async fn put_custom_privileges(&self, role: &str, privileges: &[CustomPrivilege]) -> Result<()>;

    /// Custom privileges of the named roles, flattened in the order of `roles`
    async fn query_custom_privileges(&self, roles: &[String]) -> Result<Vec<CustomPrivilege>>;
}
