//! Error types for role management

use serde_json::{json, Value};
use thiserror::Error;

/// Role management errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RbacError {
    /// Malformed or disallowed input
    #[error("{0}")]
    BadValue(String),

    /// Field not recognised by the command
    #[error("{0}")]
    InvalidArgument(String),

    /// Command disabled or not implemented
    #[error("{0}")]
    CommandNotSupported(String),

    /// Role already exists in the role store
    #[error("Role \"{0}\" already exists")]
    RoleExists(String),

    /// Role does not exist in the role store
    #[error("Role \"{0}\" not found")]
    RoleNotFound(String),

    /// Role graph or store consistency violation
    #[error("{0}")]
    Internal(String),

    /// Backend failure reported by the role store
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RbacError {
    /// Numeric error code reported to clients
    pub fn code(&self) -> i32 {
        match self {
            RbacError::BadValue(_) | RbacError::InvalidArgument(_) => 2,
            RbacError::CommandNotSupported(_) => 115,
            RbacError::RoleExists(_) => 51002,
            RbacError::RoleNotFound(_) => 31,
            RbacError::Internal(_) | RbacError::Storage(_) => 1,
        }
    }

    /// Symbolic error code name
    pub fn code_name(&self) -> &'static str {
        match self {
            RbacError::BadValue(_) => "BadValue",
            RbacError::InvalidArgument(_) => "InvalidArgument",
            RbacError::CommandNotSupported(_) => "CommandNotSupported",
            RbacError::RoleExists(_) => "Location51002",
            RbacError::RoleNotFound(_) => "RoleNotFound",
            RbacError::Internal(_) | RbacError::Storage(_) => "InternalError",
        }
    }

    /// Error reply document as returned to the client
    pub fn to_error_document(&self) -> Value {
        json!({
            "ok": 0,
            "errmsg": self.to_string(),
            "code": self.code(),
            "codeName": self.code_name(),
        })
    }

    pub(crate) fn bad_value(msg: impl Into<String>) -> Self {
        RbacError::BadValue(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        RbacError::Internal(msg.into())
    }
}

/// Result type for role management operations
pub type Result<T> = std::result::Result<T, RbacError>;
