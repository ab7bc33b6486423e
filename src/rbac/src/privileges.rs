//! Privilege aggregation across inherited roles

use crate::error::Result;
use crate::request::CustomPrivilege;
use crate::store::RoleStore;
use std::collections::BTreeSet;
use tracing::debug;

/// Reads custom privileges of roles and their ancestors from a role store
pub struct PrivilegeAggregator<'a> {
    store: &'a dyn RoleStore,
}

impl<'a> PrivilegeAggregator<'a> {
    pub fn new(store: &'a dyn RoleStore) -> Self {
        Self { store }
    }

    /// Privileges attached to the role itself
    pub async fn own_privileges(&self, internal_name: &str) -> Result<Vec<CustomPrivilege>> {
        self.store
            .query_custom_privileges(&[internal_name.to_string()])
            .await
    }

    /// Privileges of the role and every role in `inherited`
    ///
    /// The role comes first, followed by its ancestors in set order. Records
    /// are returned as the store yields them; identical privileges granted
    /// through different ancestors are not collapsed.
    pub async fn aggregate_inherited(
        &self,
        internal_name: &str,
        inherited: &BTreeSet<String>,
    ) -> Result<Vec<CustomPrivilege>> {
        let mut lookup = Vec::with_capacity(inherited.len() + 1);
        lookup.push(internal_name.to_string());
        lookup.extend(inherited.iter().filter(|r| r.as_str() != internal_name).cloned());

        let privileges = self.store.query_custom_privileges(&lookup).await?;
        debug!(
            "Aggregated {} privileges for '{}' across {} roles",
            privileges.len(),
            internal_name,
            lookup.len()
        );
        Ok(privileges)
    }
}
