//! Metadata coordinator delegation
//!
//! Role commands run on exactly one node, the metadata coordinator. Any other
//! node forwards the decoded command through a [`CoordinatorTransport`] and
//! relays the reply.

use crate::error::{RbacError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use tracing::debug;

/// Role commands that are funnelled through the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleCommand {
    CreateRole,
    DropRole,
    RolesInfo,
}

impl RoleCommand {
    /// Command name as it appears in the request document
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCommand::CreateRole => "createRole",
            RoleCommand::DropRole => "dropRole",
            RoleCommand::RolesInfo => "rolesInfo",
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            RoleCommand::CreateRole => "Create role",
            RoleCommand::DropRole => "Drop role",
            RoleCommand::RolesInfo => "Roles info",
        }
    }
}

impl fmt::Display for RoleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command forwarded to the coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorRequest {
    pub command: RoleCommand,
    /// Command document as received
    pub document: Value,
}

impl CoordinatorRequest {
    pub fn new(command: RoleCommand, document: Value) -> Self {
        Self { command, document }
    }
}

/// Outcome of a forwarded command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorResponse {
    pub success: bool,

    /// Reply document when `success` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<Value>,

    /// Error text reported by the coordinator otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CoordinatorResponse {
    pub fn ok(reply: Value) -> Self {
        Self {
            success: true,
            reply: Some(reply),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            reply: None,
            error: Some(error.into()),
        }
    }
}

/// Reaches the metadata coordinator
#[async_trait]
pub trait CoordinatorTransport: Send + Sync {
    /// Whether this node is the metadata coordinator
    fn is_coordinator(&self) -> bool;

    /// Run a command on the coordinator
    ///
    /// `Err` means the command could not be delivered; a command that ran and
    /// failed comes back as an unsuccessful [`CoordinatorResponse`].
    async fn execute_on_coordinator(&self, request: CoordinatorRequest) -> Result<CoordinatorResponse>;
}

/// Transport for a deployment with a single node, which is always the coordinator
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleNode;

#[async_trait]
impl CoordinatorTransport for SingleNode {
    fn is_coordinator(&self) -> bool {
        true
    }

    async fn execute_on_coordinator(&self, request: CoordinatorRequest) -> Result<CoordinatorResponse> {
        Err(RbacError::internal(format!(
            "Cannot forward '{}': this node is the metadata coordinator.",
            request.command
        )))
    }
}

/// Forward a command to the coordinator and relay its reply
///
/// Delivery failures and failed commands both surface as `Internal`, carrying
/// the remote error text.
pub async fn delegate(
    transport: &dyn CoordinatorTransport,
    command: RoleCommand,
    document: &Value,
) -> Result<Value> {
    debug!("Forwarding '{}' to the metadata coordinator", command);

    let failed = |text: &str| {
        RbacError::internal(format!("{} operation failed: {}", command.operation(), text))
    };

    let response = transport
        .execute_on_coordinator(CoordinatorRequest::new(command, document.clone()))
        .await
        .map_err(|e| failed(&e.to_string()))?;

    if !response.success {
        return Err(failed(response.error.as_deref().unwrap_or("unknown error")));
    }

    Ok(response.reply.unwrap_or_else(|| json!({ "ok": 1 })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Remote {
        response: Result<CoordinatorResponse>,
        seen: Mutex<Vec<CoordinatorRequest>>,
    }

    #[async_trait]
    impl CoordinatorTransport for Remote {
        fn is_coordinator(&self) -> bool {
            false
        }

        async fn execute_on_coordinator(&self, request: CoordinatorRequest) -> Result<CoordinatorResponse> {
            self.seen.lock().unwrap().push(request);
            self.response.clone()
        }
    }

    fn remote(response: Result<CoordinatorResponse>) -> Remote {
        Remote {
            response,
            seen: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_delegate_relays_reply() {
        let transport = remote(Ok(CoordinatorResponse::ok(json!({ "roles": [], "ok": 1 }))));
        let command = json!({ "rolesInfo": 1, "$db": "admin" });

        let reply = delegate(&transport, RoleCommand::RolesInfo, &command).await.unwrap();
        assert_eq!(reply, json!({ "roles": [], "ok": 1 }));

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].command, RoleCommand::RolesInfo);
        assert_eq!(seen[0].document, command);
    }

    #[tokio::test]
    async fn test_delegate_failure_is_internal() {
        let transport = remote(Ok(CoordinatorResponse::failed("Role \"reporter\" already exists")));
        let err = delegate(&transport, RoleCommand::CreateRole, &json!({ "createRole": "reporter" }))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RbacError::Internal("Create role operation failed: Role \"reporter\" already exists".to_string())
        );

        let transport = remote(Err(RbacError::Storage("connection refused".to_string())));
        let err = delegate(&transport, RoleCommand::DropRole, &json!({ "dropRole": "reporter" }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), 1);
        assert_eq!(
            err.to_string(),
            "Drop role operation failed: Storage error: connection refused"
        );
    }

    #[tokio::test]
    async fn test_single_node_is_coordinator() {
        assert!(SingleNode.is_coordinator());
        let result = SingleNode
            .execute_on_coordinator(CoordinatorRequest::new(RoleCommand::DropRole, json!({})))
            .await;
        assert!(matches!(result, Err(RbacError::Internal(_))));
    }

    #[test]
    fn test_response_wire_shape() {
        let encoded = serde_json::to_value(CoordinatorResponse::failed("boom")).unwrap();
        assert_eq!(encoded, json!({ "success": false, "error": "boom" }));

        let request = serde_json::to_value(CoordinatorRequest::new(RoleCommand::RolesInfo, json!({}))).unwrap();
        assert_eq!(request["command"], "rolesInfo");
    }
}
