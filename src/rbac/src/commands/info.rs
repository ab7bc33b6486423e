//! rolesInfo

use super::{to_document, RoleManager};
use crate::coordinator::RoleCommand;
use crate::error::{RbacError, Result};
use crate::graph::{RoleGraph, RoleGraphEntry};
use crate::names;
use crate::privileges::PrivilegeAggregator;
use crate::request::RolesInfoSpec;
use crate::response::{RoleRecord, RoleRef, RolesInfoReply};
use serde_json::Value;
use tracing::debug;

impl RoleManager {
    /// Describe roles, their inheritance and optionally their privileges
    pub async fn roles_info(&self, command: &Value) -> Result<Value> {
        self.require_role_crud(RoleCommand::RolesInfo)?;

        if let Some(reply) = self.forward(RoleCommand::RolesInfo, command).await? {
            return Ok(reply);
        }

        to_document(&self.roles_info_local(command).await?)
    }

    pub(super) async fn roles_info_local(&self, command: &Value) -> Result<RolesInfoReply> {
        let spec = RolesInfoSpec::parse(command, &self.config)?;
        let graph = RoleGraph::load(self.store.as_ref()).await?;
        let aggregator = PrivilegeAggregator::new(self.store.as_ref());

        let mut records = Vec::new();
        if spec.show_all_roles {
            for entry in graph.entries() {
                if !spec.show_builtin_roles && names::is_native_builtin(&entry.native_name) {
                    continue;
                }
                records.push(role_record(entry, &graph, &spec, &aggregator).await?);
            }
        } else {
            for native in &spec.role_names {
                match graph.get(names::to_internal(native)) {
                    Some(entry) => records.push(role_record(entry, &graph, &spec, &aggregator).await?),
                    None => debug!("Requested role '{}' not found", native),
                }
            }
        }

        Ok(RolesInfoReply::new(records))
    }
}

async fn role_record(
    entry: &RoleGraphEntry,
    graph: &RoleGraph,
    spec: &RolesInfoSpec,
    aggregator: &PrivilegeAggregator<'_>,
) -> Result<RoleRecord> {
    let mut record = RoleRecord::new(&entry.native_name, names::is_native_builtin(&entry.native_name));

    if spec.show_privileges {
        record.privileges = Some(aggregator.own_privileges(&entry.internal_name).await?);
    }

    for parent in &entry.parent_roles {
        let native = graph.native_name(parent).ok_or_else(|| {
            RbacError::internal(format!(
                "Parent role '{}' of '{}' not found.",
                parent, entry.internal_name
            ))
        })?;
        record.roles.push(RoleRef::admin(native));
    }

    let inherited = graph.resolve_inherited(&entry.internal_name)?;
    for role in &inherited {
        let native = graph.native_name(role).ok_or_else(|| {
            RbacError::internal(format!(
                "Inherited role '{}' of '{}' not found.",
                role, entry.internal_name
            ))
        })?;
        record.all_inherited_roles.push(RoleRef::admin(native));
    }

    if spec.show_privileges {
        record.inherited_privileges = Some(
            aggregator
                .aggregate_inherited(&entry.internal_name, &inherited)
                .await?,
        );
    }

    Ok(record)
}
