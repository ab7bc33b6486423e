//! dropRole request

use super::{
    check_admin_db, command_document, expect_top_level_string, is_common_ignored_field,
    missing_db_error,
};
use crate::config::RbacConfig;
use crate::error::{RbacError, Result};
use crate::names;
use serde_json::Value;

/// Parsed dropRole command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRoleSpec {
    pub role_name: String,
}

impl DropRoleSpec {
    pub fn parse(command: &Value, config: &RbacConfig) -> Result<Self> {
        let doc = command_document(command, "dropRole")?;

        let mut role_name = None;
        let mut db_found = false;

        for (key, value) in doc {
            match key.as_str() {
                "dropRole" => {
                    let name = expect_top_level_string(key, value)?;
                    if name.is_empty() {
                        return Err(RbacError::bad_value("'dropRole' cannot be empty."));
                    }
                    if is_protected(name) {
                        return Err(RbacError::bad_value(format!(
                            "Cannot drop built-in role '{}'.",
                            name
                        )));
                    }
                    role_name = Some(name.to_string());
                }
                "$db" if config.enable_roles_admin_db_check => {
                    check_admin_db("DropRole", value)?;
                    db_found = true;
                }
                _ if is_common_ignored_field(key) => continue,
                _ => {
                    return Err(RbacError::InvalidArgument(format!(
                        "Unsupported field specified: '{}'.",
                        key
                    )))
                }
            }
        }

        if !db_found && config.enable_roles_admin_db_check {
            return Err(missing_db_error());
        }

        let role_name = role_name.ok_or_else(|| RbacError::bad_value("'dropRole' is a required field."))?;
        Ok(Self { role_name })
    }
}

fn is_protected(name: &str) -> bool {
    names::is_native_builtin(name) || names::is_internal_builtin(name) || names::is_system_login_role(name)
}
