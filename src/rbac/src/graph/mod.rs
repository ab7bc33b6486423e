//! In-memory role inheritance graph
//!
//! Built fresh for every request from one inheritance query against the role
//! store, read-only afterwards and dropped when the request ends.
//!
//! # Example
//!
//! ```rust
//! use docdb_rbac::graph::RoleGraphBuilder;
//! use docdb_rbac::store::InheritanceRow;
//!
//! # fn example() -> docdb_rbac::Result<()> {
//! let graph = RoleGraphBuilder::from_rows(vec![
//!     InheritanceRow::new("reporter", &["documentdb_readonly_role"]),
//!     InheritanceRow::new("documentdb_readonly_role", &[]),
//! ])?;
//!
//! let inherited = graph.resolve_inherited("reporter")?;
//! assert!(inherited.contains("documentdb_readonly_role"));
//! # Ok(())
//! # }
//! ```

pub mod closure;

use crate::error::{RbacError, Result};
use crate::names;
use crate::store::{InheritanceRow, RoleStore};
use std::collections::BTreeMap;
use tracing::debug;

/// One role in the inheritance graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGraphEntry {
    /// Name the role is stored under
    pub internal_name: String,

    /// Name shown to clients
    pub native_name: String,

    /// Direct parents, internal names, in store order
    pub parent_roles: Vec<String>,
}

impl RoleGraphEntry {
    fn new(internal_name: &str) -> Self {
        Self {
            internal_name: internal_name.to_string(),
            native_name: names::to_native(internal_name).to_string(),
            parent_roles: Vec::new(),
        }
    }
}

/// Role inheritance graph keyed by internal role name
#[derive(Debug, Clone, Default)]
pub struct RoleGraph {
    entries: BTreeMap<String, RoleGraphEntry>,
}

impl RoleGraph {
    /// Load the graph from the role store
    pub async fn load(store: &dyn RoleStore) -> Result<Self> {
        let rows = store.query_inheritance_rows().await?;
        debug!("Role inheritance query returned {} rows", rows.len());
        RoleGraphBuilder::from_rows(rows)
    }

    pub fn get(&self, internal_name: &str) -> Option<&RoleGraphEntry> {
        self.entries.get(internal_name)
    }

    pub fn contains(&self, internal_name: &str) -> bool {
        self.entries.contains_key(internal_name)
    }

    /// Entries ordered by internal name
    pub fn entries(&self) -> impl Iterator<Item = &RoleGraphEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Native name of a role that must be present in the graph
    pub fn native_name(&self, internal_name: &str) -> Option<&str> {
        self.entries.get(internal_name).map(|e| e.native_name.as_str())
    }
}

/// Builds a [`RoleGraph`] from inheritance rows
///
/// Rows for system login roles and the composite/legacy admin roles are
/// dropped. A composite admin parent is expanded into the read-write and
/// cluster-admin roles, and both of those are always present as entries.
#[derive(Debug, Default)]
pub struct RoleGraphBuilder {
    entries: BTreeMap<String, RoleGraphEntry>,
}

impl RoleGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a complete set of rows
    pub fn from_rows(rows: impl IntoIterator<Item = InheritanceRow>) -> Result<RoleGraph> {
        let mut builder = Self::new();
        for row in rows {
            builder.add_row(row)?;
        }
        Ok(builder.build())
    }

    /// Add one child row
    ///
    /// # Errors
    ///
    /// Returns `Internal` when the child was already added.
    pub fn add_row(&mut self, row: InheritanceRow) -> Result<()> {
        let child = row.child_role.as_str();

        if is_hidden_role(child) {
            debug!("Skipping hidden role '{}'", child);
            return Ok(());
        }

        if self.entries.contains_key(child) {
            return Err(RbacError::internal(format!(
                "Duplicate 'child_role' '{}' found in role inheritance query result.",
                child
            )));
        }

        let mut entry = RoleGraphEntry::new(child);
        for parent in row.parent_roles {
            if parent == names::ADMIN_ROLE_V2 {
                entry.parent_roles.push(names::READ_WRITE_ROLE.to_string());
                entry.parent_roles.push(names::CLUSTER_ADMIN_ROLE.to_string());
            } else {
                entry.parent_roles.push(parent);
            }
        }

        self.entries.insert(entry.internal_name.clone(), entry);
        Ok(())
    }

    /// Finish the graph, adding the read-write and cluster-admin leaves if absent
    pub fn build(mut self) -> RoleGraph {
        for internal in [names::READ_WRITE_ROLE, names::CLUSTER_ADMIN_ROLE] {
            self.entries
                .entry(internal.to_string())
                .or_insert_with(|| RoleGraphEntry::new(internal));
        }
        RoleGraph {
            entries: self.entries,
        }
    }
}

fn is_hidden_role(name: &str) -> bool {
    names::is_system_login_role(name) || name == names::ADMIN_ROLE_V2 || name == names::ADMIN_ROLE
}
