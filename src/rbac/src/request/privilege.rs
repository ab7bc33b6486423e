//! Collection-level privileges attached to custom roles

use super::type_name;
use crate::error::{RbacError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Actions a custom role may be granted on a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeAction {
    Find,
    Insert,
    Update,
    Remove,
}

impl PrivilegeAction {
    pub const ALL: [PrivilegeAction; 4] = [
        PrivilegeAction::Find,
        PrivilegeAction::Insert,
        PrivilegeAction::Update,
        PrivilegeAction::Remove,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrivilegeAction::Find => "find",
            PrivilegeAction::Insert => "insert",
            PrivilegeAction::Update => "update",
            PrivilegeAction::Remove => "remove",
        }
    }
}

impl fmt::Display for PrivilegeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivilegeAction {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|a| a.as_str() == s)
            .copied()
            .ok_or_else(|| RbacError::bad_value(format!("Unsupported action '{}'.", s)))
    }
}

/// Database and collection a privilege applies to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrivilegeResource {
    pub db: String,
    pub collection: String,
}

/// A grant of actions on one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPrivilege {
    pub resource: PrivilegeResource,
    pub actions: BTreeSet<PrivilegeAction>,
}

impl CustomPrivilege {
    pub fn new(
        db: impl Into<String>,
        collection: impl Into<String>,
        actions: impl IntoIterator<Item = PrivilegeAction>,
    ) -> Self {
        Self {
            resource: PrivilegeResource {
                db: db.into(),
                collection: collection.into(),
            },
            actions: actions.into_iter().collect(),
        }
    }
}

/// Parse the `privileges` array of a createRole command
pub fn parse_privileges(value: &Value) -> Result<Vec<CustomPrivilege>> {
    let entries = value
        .as_array()
        .ok_or_else(|| RbacError::bad_value("'privileges' must be an array."))?;

    entries.iter().map(parse_privilege).collect()
}

fn parse_privilege(entry: &Value) -> Result<CustomPrivilege> {
    let doc = entry
        .as_object()
        .ok_or_else(|| RbacError::bad_value("Each privilege entry must be a document."))?;

    let mut resource = None;
    let mut actions = None;

    for (key, value) in doc {
        match key.as_str() {
            "resource" => resource = Some(parse_resource(value)?),
            "actions" => actions = Some(parse_actions(value)?),
            _ => {
                return Err(RbacError::InvalidArgument(format!(
                    "The specified field '{}' is not supported in privilege.",
                    key
                )))
            }
        }
    }

    let resource = resource.ok_or_else(|| RbacError::bad_value("'resource' is required in privilege."))?;
    let actions = actions.ok_or_else(|| RbacError::bad_value("'actions' is required in privilege."))?;

    Ok(CustomPrivilege { resource, actions })
}

fn parse_resource(value: &Value) -> Result<PrivilegeResource> {
    let doc = value
        .as_object()
        .ok_or_else(|| RbacError::bad_value("'resource' must be a document."))?;

    let mut db = None;
    let mut collection = None;

    for (key, value) in doc {
        match key.as_str() {
            "db" => db = Some(non_empty_string("db", value)?),
            "collection" => collection = Some(non_empty_string("collection", value)?),
            _ => {
                return Err(RbacError::InvalidArgument(format!(
                    "The specified field '{}' is not supported in resource.",
                    key
                )))
            }
        }
    }

    let db = db.ok_or_else(|| RbacError::bad_value("'db' is required in resource."))?;
    let collection =
        collection.ok_or_else(|| RbacError::bad_value("'collection' is required in resource."))?;

    Ok(PrivilegeResource { db, collection })
}

fn non_empty_string(field: &str, value: &Value) -> Result<String> {
    let s = value
        .as_str()
        .ok_or_else(|| RbacError::bad_value(format!("'{}' in resource must be a string.", field)))?;
    if s.is_empty() {
        return Err(RbacError::bad_value(format!("'{}' in resource must not be empty.", field)));
    }
    Ok(s.to_string())
}

/// Empty strings are skipped; duplicates collapse.
fn parse_actions(value: &Value) -> Result<BTreeSet<PrivilegeAction>> {
    let items = value
        .as_array()
        .ok_or_else(|| RbacError::bad_value("'actions' must be an array."))?;

    let mut actions = BTreeSet::new();
    for item in items {
        let action = item.as_str().ok_or_else(|| {
            RbacError::bad_value(format!("Each action must be a string, found '{}'.", type_name(item)))
        })?;
        if action.is_empty() {
            continue;
        }
        actions.insert(action.parse::<PrivilegeAction>()?);
    }

    if actions.is_empty() {
        return Err(RbacError::bad_value("At least one valid action must be specified."));
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bad_value_message(result: Result<Vec<CustomPrivilege>>) -> String {
        match result {
            Err(RbacError::BadValue(msg)) | Err(RbacError::InvalidArgument(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_single_privilege() {
        let privileges = parse_privileges(&json!([
            { "resource": { "db": "sales", "collection": "orders" }, "actions": ["find", "insert"] }
        ]))
        .unwrap();

        assert_eq!(privileges.len(), 1);
        assert_eq!(privileges[0].resource.db, "sales");
        assert_eq!(privileges[0].resource.collection, "orders");
        assert_eq!(
            privileges[0].actions,
            [PrivilegeAction::Find, PrivilegeAction::Insert].into_iter().collect()
        );
    }

    #[test]
    fn test_duplicate_actions_collapse() {
        let privileges = parse_privileges(&json!([
            { "resource": { "db": "sales", "collection": "orders" }, "actions": ["find", "find", ""] }
        ]))
        .unwrap();
        assert_eq!(privileges[0].actions.len(), 1);
    }

    #[test]
    fn test_unsupported_action() {
        let msg = bad_value_message(parse_privileges(&json!([
            { "resource": { "db": "sales", "collection": "orders" }, "actions": ["find", "dropDatabase"] }
        ])));
        assert_eq!(msg, "Unsupported action 'dropDatabase'.");
    }

    #[test]
    fn test_no_valid_actions() {
        let msg = bad_value_message(parse_privileges(&json!([
            { "resource": { "db": "sales", "collection": "orders" }, "actions": ["", ""] }
        ])));
        assert_eq!(msg, "At least one valid action must be specified.");
    }

    #[test]
    fn test_resource_validation() {
        let msg = bad_value_message(parse_privileges(&json!([
            { "resource": { "db": "", "collection": "orders" }, "actions": ["find"] }
        ])));
        assert_eq!(msg, "'db' in resource must not be empty.");

        let msg = bad_value_message(parse_privileges(&json!([
            { "resource": { "db": "sales" }, "actions": ["find"] }
        ])));
        assert_eq!(msg, "'collection' is required in resource.");

        let msg = bad_value_message(parse_privileges(&json!([
            { "resource": { "db": "sales", "collection": "orders", "cluster": true }, "actions": ["find"] }
        ])));
        assert!(msg.contains("'cluster'"));
    }

    #[test]
    fn test_privilege_shape_errors() {
        assert_eq!(
            bad_value_message(parse_privileges(&json!({}))),
            "'privileges' must be an array."
        );
        assert_eq!(
            bad_value_message(parse_privileges(&json!(["find"]))),
            "Each privilege entry must be a document."
        );
        assert_eq!(
            bad_value_message(parse_privileges(&json!([{ "actions": ["find"] }]))),
            "'resource' is required in privilege."
        );
        assert_eq!(
            bad_value_message(parse_privileges(&json!([
                { "resource": { "db": "a", "collection": "b" } }
            ]))),
            "'actions' is required in privilege."
        );
    }

    #[test]
    fn test_serialized_shape() {
        let privilege = CustomPrivilege::new("sales", "orders", [PrivilegeAction::Update, PrivilegeAction::Find]);
        assert_eq!(
            serde_json::to_value(&privilege).unwrap(),
            json!({ "resource": { "db": "sales", "collection": "orders" }, "actions": ["find", "update"] })
        );
    }
}
