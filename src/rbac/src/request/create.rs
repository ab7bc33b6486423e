//! createRole request

use super::privilege::{parse_privileges, CustomPrivilege};
use super::{
    check_admin_db, command_document, expect_top_level_string, is_common_ignored_field,
    missing_db_error,
};
use crate::config::RbacConfig;
use crate::error::{RbacError, Result};
use crate::names;
use serde_json::Value;
use std::collections::BTreeSet;

/// Longest role name the role store keeps without truncation
pub const MAX_ROLE_NAME_LENGTH: usize = 63;

/// Parsed createRole command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleSpec {
    /// Name of the role to create
    pub role_name: String,

    /// Requested parent roles, native names, deduplicated
    pub parent_roles: BTreeSet<String>,

    /// Collection privileges in request order
    pub privileges: Vec<CustomPrivilege>,
}

impl CreateRoleSpec {
    /// Parse and validate a createRole command document
    pub fn parse(command: &Value, config: &RbacConfig) -> Result<Self> {
        let doc = command_document(command, "createRole")?;

        let mut role_name = None;
        let mut parent_roles = None;
        let mut privileges = None;
        let mut db_found = false;

        for (key, value) in doc {
            match key.as_str() {
                "createRole" => {
                    let name = expect_top_level_string(key, value)?;
                    validate_role_name(name)?;
                    role_name = Some(name.to_string());
                }
                "roles" => parent_roles = Some(parse_parent_roles(value)?),
                "privileges" => privileges = Some(parse_privileges(value)?),
                "$db" if config.enable_roles_admin_db_check => {
                    check_admin_db("CreateRole", value)?;
                    db_found = true;
                }
                _ if is_common_ignored_field(key) => continue,
                _ => {
                    return Err(RbacError::InvalidArgument(format!(
                        "The specified field '{}' is not supported.",
                        key
                    )))
                }
            }
        }

        if !db_found && config.enable_roles_admin_db_check {
            return Err(missing_db_error());
        }

        let role_name = role_name.ok_or_else(|| RbacError::bad_value("'createRole' is a required field."))?;
        let parent_roles = parent_roles.ok_or_else(|| RbacError::bad_value("'roles' is a required field."))?;
        let privileges =
            privileges.ok_or_else(|| RbacError::bad_value("'privileges' is a required field."))?;

        Ok(Self {
            role_name,
            parent_roles,
            privileges,
        })
    }
}

fn validate_role_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RbacError::bad_value("The 'createRole' field must not be left empty."));
    }

    if name.len() > MAX_ROLE_NAME_LENGTH {
        return Err(RbacError::bad_value(format!(
            "Role name '{}' exceeds the maximum length of {} bytes.",
            name, MAX_ROLE_NAME_LENGTH
        )));
    }

    if names::has_reserved_prefix(name) {
        return Err(RbacError::bad_value(format!(
            "Role name '{}' is reserved and can't be used as a custom role name.",
            name
        )));
    }

    if names::is_native_builtin(name) {
        return Err(RbacError::bad_value(format!(
            "Role name '{}' is a built-in role and can't be used as a custom role name.",
            name
        )));
    }

    Ok(())
}

fn parse_parent_roles(value: &Value) -> Result<BTreeSet<String>> {
    let items = value.as_array().ok_or_else(|| {
        RbacError::bad_value(format!(
            "Expected 'array' type for 'roles' parameter but found '{}' type",
            super::type_name(value)
        ))
    })?;

    let mut roles = BTreeSet::new();
    for item in items {
        let name = item
            .as_str()
            .ok_or_else(|| RbacError::bad_value("Invalid inherited from role name provided."))?;
        if !name.is_empty() {
            roles.insert(name.to_string());
        }
    }

    Ok(roles)
}
