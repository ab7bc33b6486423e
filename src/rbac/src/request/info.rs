//! rolesInfo request

use super::{check_admin_db, command_document, is_common_ignored_field, missing_db_error};
use crate::config::RbacConfig;
use crate::error::{RbacError, Result};
use crate::names::ADMIN_DB;
use serde_json::{Map, Value};

const INVALID_ROLES_INFO: &str = "'rolesInfo' must be 1, a string, a document, or an array.";

/// Parsed rolesInfo command
///
/// `show_all_roles` selects "all roles" mode; otherwise only `role_names`
/// (native names, request order) are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolesInfoSpec {
    pub role_names: Vec<String>,
    pub show_all_roles: bool,
    pub show_builtin_roles: bool,
    pub show_privileges: bool,
}

impl RolesInfoSpec {
    pub fn parse(command: &Value, config: &RbacConfig) -> Result<Self> {
        let doc = command_document(command, "rolesInfo")?;

        let mut spec = Self::default();
        let mut roles_info_found = false;
        let mut db_found = false;

        for (key, value) in doc {
            match key.as_str() {
                "rolesInfo" => {
                    roles_info_found = true;
                    spec.parse_roles_info(value)?;
                }
                "showBuiltInRoles" => spec.show_builtin_roles = expect_bool(key, value)?,
                "showPrivileges" => spec.show_privileges = expect_bool(key, value)?,
                "$db" if config.enable_roles_admin_db_check => {
                    check_admin_db("RolesInfo", value)?;
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

        if !roles_info_found {
            return Err(RbacError::bad_value("'rolesInfo' is a required field."));
        }

        Ok(spec)
    }

    fn parse_roles_info(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Number(n) => {
                if n.as_i64() == Some(1) && !n.is_f64() {
                    self.show_all_roles = true;
                    Ok(())
                } else {
                    Err(RbacError::bad_value(INVALID_ROLES_INFO))
                }
            }
            Value::Array(items) => items.iter().try_for_each(|item| self.parse_role_definition(item)),
            other => self.parse_role_definition(other),
        }
    }

    /// A role is either its name or a `{role, db}` document
    fn parse_role_definition(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::String(name) => {
                if !name.is_empty() {
                    self.role_names.push(name.clone());
                }
                Ok(())
            }
            Value::Object(doc) => self.parse_role_document(doc),
            _ => Err(RbacError::bad_value(INVALID_ROLES_INFO)),
        }
    }

    fn parse_role_document(&mut self, doc: &Map<String, Value>) -> Result<()> {
        let mut role = None;
        let mut db = None;

        for (key, value) in doc {
            match key.as_str() {
                "role" => {
                    let name = value
                        .as_str()
                        .ok_or_else(|| RbacError::bad_value("'role' field must be a string."))?;
                    role = Some(name);
                }
                "db" => {
                    let name = value
                        .as_str()
                        .ok_or_else(|| RbacError::bad_value("'db' field must be a string."))?;
                    if name != ADMIN_DB {
                        return Err(RbacError::bad_value(
                            "Unsupported value specified for db. Only 'admin' is allowed.",
                        ));
                    }
                    db = Some(name);
                }
                _ => {
                    return Err(RbacError::InvalidArgument(format!(
                        "Unknown property '{}' in role document.",
                        key
                    )))
                }
            }
        }

        match (role, db) {
            (Some(role), Some(_)) => {
                if !role.is_empty() {
                    self.role_names.push(role.to_string());
                }
                Ok(())
            }
            _ => Err(RbacError::bad_value("'role' and 'db' are required fields.")),
        }
    }
}

fn expect_bool(key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| RbacError::bad_value(format!("'{}' must be a boolean value", key)))
}
