//! In-memory role store
//!
//! Models the relational role catalog: roles carry login/system flags and
//! membership grants are kept in grant order.

use super::{InheritanceRow, RoleStore};
use crate::error::{RbacError, Result};
use crate::names;
use crate::request::CustomPrivilege;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Catalog flags of a stored role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleAttributes {
    /// Role may authenticate
    pub can_login: bool,
    /// Created by the database itself, below the first user object id
    pub system: bool,
}

impl RoleAttributes {
    pub const GROUP: RoleAttributes = RoleAttributes { can_login: false, system: false };
    pub const LOGIN: RoleAttributes = RoleAttributes { can_login: true, system: false };
    pub const SYSTEM: RoleAttributes = RoleAttributes { can_login: false, system: true };
}

#[derive(Debug, Clone)]
struct StoredRole {
    name: String,
    attributes: RoleAttributes,
}

#[derive(Debug, Default)]
struct Catalog {
    /// Creation order
    roles: Vec<StoredRole>,
    /// (parent, child) in grant order
    memberships: Vec<(String, String)>,
    privileges: HashMap<String, Vec<CustomPrivilege>>,
}

impl Catalog {
    fn find(&self, name: &str) -> Option<&StoredRole> {
        self.roles.iter().find(|r| r.name == name)
    }

    fn insert(&mut self, name: &str, attributes: RoleAttributes) {
        self.roles.push(StoredRole {
            name: name.to_string(),
            attributes,
        });
    }

    fn grant(&mut self, parent: &str, child: &str) {
        let exists = self.memberships.iter().any(|(p, c)| p == parent && c == child);
        if !exists {
            self.memberships.push((parent.to_string(), child.to_string()));
        }
    }
}

/// In-memory role store implementation
pub struct InMemoryRoleStore {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryRoleStore {
    /// Create an empty role store
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Catalog::default())),
        }
    }

    /// Create a role store seeded with the built-in role catalog
    pub fn with_builtin_roles() -> Self {
        let mut catalog = Catalog::default();

        catalog.insert("pg_read_all_data", RoleAttributes::SYSTEM);
        catalog.insert(names::READ_ONLY_ROLE, RoleAttributes::GROUP);
        catalog.insert(names::READ_WRITE_ROLE, RoleAttributes::GROUP);
        catalog.insert(names::CLUSTER_ADMIN_ROLE, RoleAttributes::GROUP);
        catalog.insert(names::ADMIN_ROLE, RoleAttributes::GROUP);
        catalog.insert(names::ADMIN_ROLE_V2, RoleAttributes::GROUP);
        catalog.insert(names::ROOT_ROLE, RoleAttributes::LOGIN);
        for login in names::SYSTEM_LOGIN_ROLES {
            catalog.insert(login, RoleAttributes::LOGIN);
        }

        catalog.grant("pg_read_all_data", names::READ_ONLY_ROLE);
        catalog.grant(names::READ_ONLY_ROLE, names::READ_WRITE_ROLE);
        catalog.grant(names::READ_WRITE_ROLE, names::ADMIN_ROLE_V2);
        catalog.grant(names::CLUSTER_ADMIN_ROLE, names::ADMIN_ROLE_V2);
        catalog.grant(names::READ_WRITE_ROLE, names::ADMIN_ROLE);
        catalog.grant(names::ADMIN_ROLE_V2, names::ROOT_ROLE);

        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Insert a role with explicit catalog flags
    pub async fn insert_role(&self, name: &str, attributes: RoleAttributes) -> Result<()> {
        let mut catalog = self.catalog.write().await;
        if catalog.find(name).is_some() {
            return Err(RbacError::RoleExists(name.to_string()));
        }
        catalog.insert(name, attributes);
        Ok(())
    }

    /// Whether a role with this exact name exists
    pub async fn contains_role(&self, name: &str) -> bool {
        self.catalog.read().await.find(name).is_some()
    }

    /// Direct parents of a role in grant order
    pub async fn memberships_of(&self, child: &str) -> Vec<String> {
        let catalog = self.catalog.read().await;
        catalog
            .memberships
            .iter()
            .filter(|(_, c)| c == child)
            .map(|(p, _)| p.clone())
            .collect()
    }
}

impl Default for InMemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn create_role(&self, name: &str) -> Result<()> {
        debug!("CREATE ROLE {}", name);
        self.insert_role(name, RoleAttributes::GROUP).await
    }

    async fn drop_role(&self, name: &str) -> Result<()> {
        debug!("DROP ROLE {}", name);
        let mut catalog = self.catalog.write().await;
        let before = catalog.roles.len();
        catalog.roles.retain(|r| r.name != name);
        if catalog.roles.len() == before {
            return Err(RbacError::RoleNotFound(name.to_string()));
        }
        catalog.memberships.retain(|(p, c)| p != name && c != name);
        catalog.privileges.remove(name);
        Ok(())
    }

    async fn grant_role(&self, parent: &str, child: &str) -> Result<()> {
        debug!("GRANT {} TO {}", parent, child);
        let mut catalog = self.catalog.write().await;
        for name in [parent, child] {
            if catalog.find(name).is_none() {
                return Err(RbacError::RoleNotFound(name.to_string()));
            }
        }
        catalog.grant(parent, child);
        Ok(())
    }

    async fn query_inheritance_rows(&self) -> Result<Vec<InheritanceRow>> {
        let catalog = self.catalog.read().await;

        let rows = catalog
            .roles
            .iter()
            .filter(|r| !r.attributes.system)
            .filter(|r| !r.attributes.can_login || r.name == names::ROOT_ROLE)
            .map(|child| {
                let parent_roles = catalog
                    .memberships
                    .iter()
                    .filter(|(_, c)| *c == child.name)
                    .filter(|(p, _)| catalog.find(p).map_or(false, |r| !r.attributes.system))
                    .map(|(p, _)| p.clone())
                    .collect();
                InheritanceRow {
                    child_role: child.name.clone(),
                    parent_roles,
                }
            })
            .collect();

        Ok(rows)
    }

    async fn put_custom_privileges(&self, role: &str, privileges: &[CustomPrivilege]) -> Result<()> {
        let mut catalog = self.catalog.write().await;
        if catalog.find(role).is_none() {
            return Err(RbacError::RoleNotFound(role.to_string()));
        }
        catalog
            .privileges
            .entry(role.to_string())
            .or_default()
            .extend_from_slice(privileges);
        Ok(())
    }

    async fn query_custom_privileges(&self, roles: &[String]) -> Result<Vec<CustomPrivilege>> {
        let catalog = self.catalog.read().await;
        Ok(roles
            .iter()
            .filter_map(|r| catalog.privileges.get(r))
            .flatten()
            .cloned()
            .collect())
    }
}
