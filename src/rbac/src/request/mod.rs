//! Role-management request parsing
//!
//! Each command document is walked once, in wire order. The first violation
//! aborts parsing with an error naming the offending field.

pub mod create;
pub mod drop;
pub mod info;
pub mod privilege;

pub use create::CreateRoleSpec;
pub use drop::DropRoleSpec;
pub use info::RolesInfoSpec;
pub use privilege::{CustomPrivilege, PrivilegeAction, PrivilegeResource};

use crate::error::{RbacError, Result};
use crate::names::ADMIN_DB;
use serde_json::{Map, Value};

/// Generic fields every command may carry without affecting its meaning
const COMMON_IGNORED_FIELDS: &[&str] = &[
    "$db",
    "lsid",
    "$clusterTime",
    "$readPreference",
    "txnNumber",
    "autocommit",
    "startTransaction",
    "writeConcern",
    "readConcern",
    "comment",
    "apiVersion",
    "apiStrict",
    "apiDeprecationErrors",
    "maxTimeMS",
];

pub(crate) fn is_common_ignored_field(key: &str) -> bool {
    COMMON_IGNORED_FIELDS.contains(&key)
}

/// Document type name as reported in error messages
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(n) if n.as_i64().map_or(false, |v| i32::try_from(v).is_ok()) => "int",
        Value::Number(_) => "long",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn command_document<'a>(command: &'a Value, name: &str) -> Result<&'a Map<String, Value>> {
    command.as_object().ok_or_else(|| {
        RbacError::bad_value(format!(
            "The {} command must be a document, found '{}' type.",
            name,
            type_name(command)
        ))
    })
}

/// Require a top-level field to hold a string
pub(crate) fn expect_top_level_string<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value.as_str().ok_or_else(|| {
        RbacError::bad_value(format!(
            "BSON field '{}' is the wrong type '{}', expected type 'string'",
            key,
            type_name(value)
        ))
    })
}

/// Validate `$db` when the admin database check is enabled
pub(crate) fn check_admin_db(command: &str, value: &Value) -> Result<()> {
    let db = expect_top_level_string("$db", value)?;
    if db != ADMIN_DB {
        return Err(RbacError::bad_value(format!(
            "{} must be called from 'admin' database.",
            command
        )));
    }
    Ok(())
}

pub(crate) fn missing_db_error() -> RbacError {
    RbacError::bad_value("The required $db property is missing.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&json!(1)), "int");
        assert_eq!(type_name(&json!(1.0)), "double");
        assert_eq!(type_name(&json!(i64::MAX)), "long");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!([])), "array");
        assert_eq!(type_name(&json!({})), "object");
        assert_eq!(type_name(&json!(null)), "null");
    }

    #[test]
    fn test_admin_db_check() {
        assert!(check_admin_db("CreateRole", &json!("admin")).is_ok());
        let err = check_admin_db("CreateRole", &json!("sales")).unwrap_err();
        assert_eq!(err.to_string(), "CreateRole must be called from 'admin' database.");
        assert!(matches!(
            check_admin_db("CreateRole", &json!(1)),
            Err(RbacError::BadValue(_))
        ));
    }
}
