//! dropRole

use super::{to_document, RoleManager};
use crate::coordinator::RoleCommand;
use crate::error::Result;
use crate::request::DropRoleSpec;
use crate::response::OkReply;
use serde_json::Value;
use tracing::info;

impl RoleManager {
    /// Drop a custom role
    pub async fn drop_role(&self, command: &Value) -> Result<Value> {
        self.require_role_crud(RoleCommand::DropRole)?;

        if let Some(reply) = self.forward(RoleCommand::DropRole, command).await? {
            return Ok(reply);
        }

        to_document(&self.drop_role_local(command).await?)
    }

    pub(super) async fn drop_role_local(&self, command: &Value) -> Result<OkReply> {
        let spec = DropRoleSpec::parse(command, &self.config)?;
        self.store.drop_role(&spec.role_name).await?;
        info!("Dropped role '{}'", spec.role_name);
        Ok(OkReply::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RbacConfig;
    use crate::error::RbacError;
    use crate::store::{InMemoryRoleStore, RoleStore};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_drop_custom_role() {
        let store = Arc::new(InMemoryRoleStore::with_builtin_roles());
        store.create_role("reporter").await.unwrap();

        let manager = RoleManager::single_node(RbacConfig::enabled(), store.clone());
        let reply = manager
            .drop_role(&json!({ "dropRole": "reporter", "$db": "admin" }))
            .await
            .unwrap();
        assert_eq!(reply, json!({ "ok": 1 }));
        assert!(!store.contains_role("reporter").await);
    }

    #[tokio::test]
    async fn test_drop_builtin_rejected_before_store() {
        let store = Arc::new(InMemoryRoleStore::with_builtin_roles());
        let manager = RoleManager::single_node(RbacConfig::enabled(), store.clone());

        let err = manager
            .drop_role(&json!({ "dropRole": "readAnyDatabase", "$db": "admin" }))
            .await
            .unwrap_err();
        assert!(matches!(err, RbacError::BadValue(_)));
        assert!(store.contains_role(crate::names::READ_ONLY_ROLE).await);
    }

    #[tokio::test]
    async fn test_drop_disabled() {
        let manager = RoleManager::single_node(RbacConfig::default(), Arc::new(InMemoryRoleStore::new()));
        let err = manager
            .drop_role(&json!({ "dropRole": "reporter", "$db": "admin" }))
            .await
            .unwrap_err();
        assert_eq!(err, RbacError::CommandNotSupported("DropRole command is not supported.".to_string()));
    }
}
