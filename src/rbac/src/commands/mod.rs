//! Role management commands
//!
//! [`RoleManager`] ties the request parsers, the role store, the inheritance
//! graph and coordinator delegation together into the createRole, dropRole,
//! rolesInfo and updateRole commands.
//!
//! # Architecture
//!
//! ```text
//! command ─→ feature gate ─→ coordinator? ──no──→ forward ─→ relay reply
//!                                 │
//!                                yes
//!                                 ↓
//!                  parse ─→ RoleStore / RoleGraph ─→ reply
//! ```

mod create;
mod drop;
mod info;

use crate::config::RbacConfig;
use crate::coordinator::{self, CoordinatorRequest, CoordinatorResponse, CoordinatorTransport, RoleCommand, SingleNode};
use crate::error::{RbacError, Result};
use crate::store::RoleStore;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Executes role management commands against a role store
pub struct RoleManager {
    config: RbacConfig,
    store: Arc<dyn RoleStore>,
    coordinator: Arc<dyn CoordinatorTransport>,
}

impl RoleManager {
    /// Create a role manager
    ///
    /// # Arguments
    ///
    /// * `config` - Feature toggles
    /// * `store` - Role store backend
    /// * `coordinator` - Transport to the metadata coordinator
    pub fn new(
        config: RbacConfig,
        store: Arc<dyn RoleStore>,
        coordinator: Arc<dyn CoordinatorTransport>,
    ) -> Self {
        Self {
            config,
            store,
            coordinator,
        }
    }

    /// Role manager for a node that is its own coordinator
    pub fn single_node(config: RbacConfig, store: Arc<dyn RoleStore>) -> Self {
        Self::new(config, store, Arc::new(SingleNode))
    }

    pub fn config(&self) -> &RbacConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn RoleStore> {
        &self.store
    }

    /// Run a command, dispatching on its first field
    pub async fn execute(&self, command: &Value) -> Result<Value> {
        let name = command
            .as_object()
            .and_then(|doc| doc.keys().next())
            .ok_or_else(|| RbacError::bad_value("Command document must contain a command name."))?;

        debug!("Executing role command '{}'", name);
        match name.as_str() {
            "createRole" => self.create_role(command).await,
            "dropRole" => self.drop_role(command).await,
            "rolesInfo" => self.roles_info(command).await,
            "updateRole" => self.update_role(command),
            other => Err(RbacError::CommandNotSupported(format!(
                "Command '{}' is not supported.",
                other
            ))),
        }
    }

    /// Always fails; role updates are not available
    pub fn update_role(&self, _command: &Value) -> Result<Value> {
        Err(RbacError::CommandNotSupported(
            "UpdateRole command is not supported in preview.".to_string(),
        ))
    }

    /// Service a command forwarded by another node
    ///
    /// Runs the command locally and reports the reply or the error text. The
    /// coordinator's own `enable_role_crud` toggle applies to forwarded
    /// commands too.
    pub async fn handle_coordinator_request(&self, request: CoordinatorRequest) -> CoordinatorResponse {
        match self.run_local(request.command, &request.document).await {
            Ok(reply) => CoordinatorResponse::ok(reply),
            Err(e) => CoordinatorResponse::failed(e.to_string()),
        }
    }

    async fn run_local(&self, command: RoleCommand, document: &Value) -> Result<Value> {
        self.require_role_crud(command)?;
        match command {
            RoleCommand::CreateRole => to_document(&self.create_role_local(document).await?),
            RoleCommand::DropRole => to_document(&self.drop_role_local(document).await?),
            RoleCommand::RolesInfo => to_document(&self.roles_info_local(document).await?),
        }
    }

    /// Forward to the coordinator unless this node is the coordinator
    async fn forward(&self, command: RoleCommand, document: &Value) -> Result<Option<Value>> {
        if self.coordinator.is_coordinator() {
            return Ok(None);
        }
        coordinator::delegate(self.coordinator.as_ref(), command, document)
            .await
            .map(Some)
    }

    fn require_role_crud(&self, command: RoleCommand) -> Result<()> {
        if self.config.enable_role_crud {
            return Ok(());
        }
        let message = match command {
            RoleCommand::CreateRole => "The CreateRole command is currently unsupported.",
            RoleCommand::DropRole => "DropRole command is not supported.",
            RoleCommand::RolesInfo => "RolesInfo command is not supported.",
        };
        Err(RbacError::CommandNotSupported(message.to_string()))
    }
}

fn to_document<T: Serialize>(reply: &T) -> Result<Value> {
    serde_json::to_value(reply)
        .map_err(|e| RbacError::internal(format!("Failed to encode reply: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRoleStore;
    use serde_json::json;

    fn manager() -> RoleManager {
        RoleManager::single_node(RbacConfig::enabled(), Arc::new(InMemoryRoleStore::with_builtin_roles()))
    }

    #[tokio::test]
    async fn test_update_role_not_supported() {
        let err = manager()
            .execute(&json!({ "updateRole": "reporter", "roles": [] }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), 115);
        assert_eq!(err.to_string(), "UpdateRole command is not supported in preview.");
    }

    #[tokio::test]
    async fn test_unknown_and_empty_commands() {
        let m = manager();
        assert!(matches!(
            m.execute(&json!({ "grantRolesToRole": "x" })).await,
            Err(RbacError::CommandNotSupported(_))
        ));
        assert!(matches!(m.execute(&json!({})).await, Err(RbacError::BadValue(_))));
        assert!(matches!(m.execute(&json!("createRole")).await, Err(RbacError::BadValue(_))));
    }

    #[tokio::test]
    async fn test_coordinator_request_reports_error_text() {
        let m = manager();
        let response = m
            .handle_coordinator_request(CoordinatorRequest::new(
                RoleCommand::DropRole,
                json!({ "dropRole": "missing", "$db": "admin" }),
            ))
            .await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Role \"missing\" not found"));
    }
}
