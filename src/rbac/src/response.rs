//! Reply documents of the role commands

use crate::names::ADMIN_DB;
use crate::request::CustomPrivilege;
use serde::{Deserialize, Serialize};

/// `{ok: 1}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkReply {
    pub ok: i32,
}

impl Default for OkReply {
    fn default() -> Self {
        Self { ok: 1 }
    }
}

/// Reference to a role in the admin database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub role: String,
    pub db: String,
}

impl RoleRef {
    pub fn admin(native_name: impl Into<String>) -> Self {
        Self {
            role: native_name.into(),
            db: ADMIN_DB.to_string(),
        }
    }
}

/// One role as reported by rolesInfo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRecord {
    #[serde(rename = "_id")]
    pub id: String,

    pub role: String,

    pub db: String,

    #[serde(rename = "isBuiltIn")]
    pub is_builtin: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileges: Option<Vec<CustomPrivilege>>,

    /// Direct parents
    pub roles: Vec<RoleRef>,

    #[serde(rename = "allInheritedRoles")]
    pub all_inherited_roles: Vec<RoleRef>,

    /// Privileges of the role and all of its ancestors
    #[serde(
        rename = "inheritedPrivileges",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub inherited_privileges: Option<Vec<CustomPrivilege>>,
}

impl RoleRecord {
    pub fn new(native_name: &str, is_builtin: bool) -> Self {
        Self {
            id: format!("{}.{}", ADMIN_DB, native_name),
            role: native_name.to_string(),
            db: ADMIN_DB.to_string(),
            is_builtin,
            privileges: None,
            roles: Vec::new(),
            all_inherited_roles: Vec::new(),
            inherited_privileges: None,
        }
    }
}

/// `{roles: [...], ok: 1}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolesInfoReply {
    pub roles: Vec<RoleRecord>,
    pub ok: i32,
}

impl RolesInfoReply {
    pub fn new(roles: Vec<RoleRecord>) -> Self {
        Self { roles, ok: 1 }
    }
}
