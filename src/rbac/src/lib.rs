//! # DocumentDB Role Management
//!
//! Role inheritance resolution and role-management commands for a
//! distributed document database.
//!
//! ## Features
//!
//! - **createRole / dropRole / rolesInfo** over a pluggable [`RoleStore`]
//! - **Inheritance graph** rebuilt per request, with transitive closure and
//!   diamond deduplication
//! - **Composite role expansion** so the internal admin role never leaks to
//!   clients
//! - **Coordinator delegation** funnelling every role command through one node
//! - **PostgreSQL role catalog** behind the `postgres` feature
//!
//! ## Example
//!
//! ```rust
//! use docdb_rbac::{InMemoryRoleStore, RbacConfig, RoleManager};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryRoleStore::with_builtin_roles());
//!     let manager = RoleManager::single_node(RbacConfig::enabled(), store);
//!
//!     manager
//!         .execute(&json!({
//!             "createRole": "reporter",
//!             "roles": ["readAnyDatabase"],
//!             "privileges": [],
//!             "$db": "admin"
//!         }))
//!         .await?;
//!
//!     let info = manager
//!         .execute(&json!({ "rolesInfo": "reporter", "$db": "admin" }))
//!         .await?;
//!     assert_eq!(info["roles"][0]["allInheritedRoles"][0]["role"], "readAnyDatabase");
//!
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod graph;
pub mod names;
pub mod privileges;
pub mod request;
pub mod response;
pub mod store;

// Re-export commonly used types
pub use commands::RoleManager;
pub use config::RbacConfig;
pub use coordinator::{CoordinatorRequest, CoordinatorResponse, CoordinatorTransport, RoleCommand, SingleNode};
pub use error::{RbacError, Result};
pub use graph::{RoleGraph, RoleGraphBuilder, RoleGraphEntry};
pub use privileges::PrivilegeAggregator;
pub use request::{CreateRoleSpec, CustomPrivilege, DropRoleSpec, PrivilegeAction, RolesInfoSpec};
pub use response::{OkReply, RoleRecord, RoleRef, RolesInfoReply};
pub use store::{InMemoryRoleStore, InheritanceRow, RoleStore};

#[cfg(feature = "postgres")]
pub use store::PostgresRoleStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
