//! createRole

use super::{to_document, RoleManager};
use crate::coordinator::RoleCommand;
use crate::error::{RbacError, Result};
use crate::names;
use crate::request::CreateRoleSpec;
use crate::response::OkReply;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

impl RoleManager {
    /// Create a custom role inheriting from built-in roles
    pub async fn create_role(&self, command: &Value) -> Result<Value> {
        self.require_role_crud(RoleCommand::CreateRole)?;

        if let Some(reply) = self.forward(RoleCommand::CreateRole, command).await? {
            return Ok(reply);
        }

        to_document(&self.create_role_local(command).await?)
    }

    pub(super) async fn create_role_local(&self, command: &Value) -> Result<OkReply> {
        let spec = CreateRoleSpec::parse(command, &self.config)?;
        let grants = plan_grants(&spec.parent_roles)?;

        self.store.create_role(&spec.role_name).await?;

        if let Err(e) = self.populate_role(&spec, &grants).await {
            warn!(
                "Rolling back role '{}' after failed setup: {}",
                spec.role_name, e
            );
            if let Err(rollback) = self.store.drop_role(&spec.role_name).await {
                warn!("Failed to roll back role '{}': {}", spec.role_name, rollback);
            }
            return Err(e);
        }

        info!(
            "Created role '{}' inheriting {:?} with {} privileges",
            spec.role_name,
            grants,
            spec.privileges.len()
        );
        Ok(OkReply::default())
    }

    async fn populate_role(&self, spec: &CreateRoleSpec, grants: &[&str]) -> Result<()> {
        for parent in grants {
            debug!("Granting '{}' to '{}'", parent, spec.role_name);
            self.store.grant_role(parent, &spec.role_name).await?;
        }

        if !spec.privileges.is_empty() {
            self.store
                .put_custom_privileges(&spec.role_name, &spec.privileges)
                .await?;
        }
        Ok(())
    }
}

/// Internal parent roles to grant for the requested native parents
///
/// readWriteAnyDatabase and clusterAdmin must be requested together and are
/// granted as the single composite admin role. Every other parent must be
/// inheritable.
fn plan_grants(parents: &BTreeSet<String>) -> Result<Vec<&str>> {
    let read_write = parents.contains(names::READ_WRITE_ANY_DATABASE);
    let cluster_admin = parents.contains(names::CLUSTER_ADMIN);

    if read_write != cluster_admin {
        return Err(RbacError::bad_value(
            "Roles specified are invalid. 'readWriteAnyDatabase' and 'clusterAdmin' must be specified together.",
        ));
    }

    let mut grants = Vec::with_capacity(parents.len());
    if read_write {
        grants.push(names::ADMIN_ROLE_V2);
    }

    for native in parents {
        let internal = names::to_internal(native);
        if internal == names::READ_WRITE_ROLE || internal == names::CLUSTER_ADMIN_ROLE {
            continue;
        }
        if !names::is_inheritable(internal) {
            return Err(RbacError::bad_value(format!(
                "Creating custom roles that inherit from '{}' is not supported.",
                native
            )));
        }
        grants.push(internal);
    }

    Ok(grants)
}
