//! Native and internal role identifiers
//!
//! Built-in roles are persisted in the role store under internal names that
//! differ from the names clients use. Custom roles share one name in both
//! forms.

/// Database every role lives in
pub const ADMIN_DB: &str = "admin";

/// Native names of the built-in roles
pub const READ_ANY_DATABASE: &str = "readAnyDatabase";
pub const READ_WRITE_ANY_DATABASE: &str = "readWriteAnyDatabase";
pub const CLUSTER_ADMIN: &str = "clusterAdmin";
pub const ROOT: &str = "root";

/// Internal read-only role (`readAnyDatabase`)
pub const READ_ONLY_ROLE: &str = "documentdb_readonly_role";

/// Internal read-write role (`readWriteAnyDatabase`)
pub const READ_WRITE_ROLE: &str = "documentdb_readwrite_role";

/// Internal cluster-admin role (`clusterAdmin`)
pub const CLUSTER_ADMIN_ROLE: &str = "documentdb_cluster_admin_role";

/// Internal root role (`root`)
pub const ROOT_ROLE: &str = "documentdb_root_role";

/// Composite role carrying both read-write and cluster-admin capabilities
pub const ADMIN_ROLE_V2: &str = "documentdb_admin_role_v2";

/// Legacy admin role, never exposed
pub const ADMIN_ROLE: &str = "documentdb_admin_role";

/// Login roles used by the server itself
pub const SYSTEM_LOGIN_ROLES: &[&str] = &["documentdb_bg_worker_role"];

/// Prefixes reserved for internal roles
pub const RESERVED_ROLE_PREFIXES: &[&str] = &["documentdb_", "pg_"];

/// Native built-in names
pub const BUILTIN_ROLES: &[&str] = &[READ_ANY_DATABASE, READ_WRITE_ANY_DATABASE, CLUSTER_ADMIN, ROOT];

/// Internal roles a custom role may be granted
pub const INHERITABLE_ROLES: &[&str] = &[READ_ONLY_ROLE, ADMIN_ROLE_V2];

const NAME_MAP: &[(&str, &str)] = &[
    (CLUSTER_ADMIN, CLUSTER_ADMIN_ROLE),
    (READ_ANY_DATABASE, READ_ONLY_ROLE),
    (READ_WRITE_ANY_DATABASE, READ_WRITE_ROLE),
    (ROOT, ROOT_ROLE),
];

/// Map a native role name to its internal name
pub fn to_internal(native: &str) -> &str {
    NAME_MAP
        .iter()
        .find(|(n, _)| *n == native)
        .map(|(_, i)| *i)
        .unwrap_or(native)
}

/// Map an internal role name to its native name
pub fn to_native(internal: &str) -> &str {
    NAME_MAP
        .iter()
        .find(|(_, i)| *i == internal)
        .map(|(n, _)| *n)
        .unwrap_or(internal)
}

/// Whether `native` names one of the built-in roles
pub fn is_native_builtin(native: &str) -> bool {
    BUILTIN_ROLES.contains(&native)
}

/// Whether `internal` is a role created and owned by the server
pub fn is_internal_builtin(internal: &str) -> bool {
    NAME_MAP.iter().any(|(_, i)| *i == internal)
        || internal == ADMIN_ROLE_V2
        || internal == ADMIN_ROLE
}

pub fn is_system_login_role(name: &str) -> bool {
    SYSTEM_LOGIN_ROLES.contains(&name)
}

pub fn has_reserved_prefix(name: &str) -> bool {
    RESERVED_ROLE_PREFIXES.iter().any(|p| name.starts_with(p))
}

pub fn is_inheritable(internal: &str) -> bool {
    INHERITABLE_ROLES.contains(&internal)
}
