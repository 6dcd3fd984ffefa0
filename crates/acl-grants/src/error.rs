//! Error types for grants operations
//!
//! This module defines every error the grants engine raises while validating,
//! committing, extending, locking or querying a grants model.

use thiserror::Error;

/// Access control error types.
///
/// Errors are raised at the point of detection and always before the grants
/// model is modified, so a rejected operation leaves the model untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessControlError {
    /// Role or resource name is empty, blank or a reserved keyword
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// A role definition uses a reserved keyword as a resource name
    #[error("Cannot use reserved name for resource: {0:?}")]
    ReservedResourceName(String),

    /// Action is missing or not one of create/read/update/delete
    #[error("Invalid action: {0:?}")]
    InvalidAction(String),

    /// Possession is not one of own/any
    #[error("Invalid action possession: {0:?}")]
    InvalidPossession(String),

    /// Attribute list is neither empty nor a list of non-empty strings
    #[error("Invalid resource attributes: {0}")]
    InvalidAttributes(String),

    /// The `$extend` value of a role is not a non-empty list of role names
    #[error("Invalid extend value for role {role:?}")]
    InvalidExtend {
        /// Role carrying the invalid value
        role: String,
    },

    /// The grants object is neither a role mapping nor a statement list
    #[error("Invalid grants object: {0}")]
    InvalidGrantsObject(String),

    /// Empty or malformed role list
    #[error("Invalid role(s): {0}")]
    InvalidRoleList(String),

    /// Empty or malformed resource list
    #[error("Invalid resource(s): {0}")]
    InvalidResourceList(String),

    /// Referenced role does not exist in the grants model
    #[error("Role not found: {0:?}")]
    RoleNotFound(String),

    /// A role names itself as an extender
    #[error("Cannot extend role {0:?} by itself")]
    SelfExtension(String),

    /// An extension would create an inheritance cycle
    #[error("Cross inheritance is not allowed: role {extender:?} already extends {role:?}")]
    CrossInheritance {
        /// Role being extended
        role: String,
        /// Extender that already inherits from `role`
        extender: String,
    },

    /// Mutation attempted after the grants model was locked
    #[error("Cannot {0}: grants model is locked")]
    Locked(&'static str),

    /// `lock` called on an empty grants model
    #[error("Cannot lock empty or invalid grants model")]
    EmptyOrInvalidGrants,

    /// The grants model failed its final consistency check while locking
    #[error("Could not lock grants: {0}")]
    LockFailed(String),
}

/// Result type for access control operations.
pub type Result<T> = std::result::Result<T, AccessControlError>;

impl AccessControlError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "INVALID_NAME",
            Self::ReservedResourceName(_) => "RESERVED_RESOURCE_NAME",
            Self::InvalidAction(_) => "INVALID_ACTION",
            Self::InvalidPossession(_) => "INVALID_POSSESSION",
            Self::InvalidAttributes(_) => "INVALID_ATTRIBUTES",
            Self::InvalidExtend { .. } => "INVALID_EXTEND",
            Self::InvalidGrantsObject(_) => "INVALID_GRANTS_OBJECT",
            Self::InvalidRoleList(_) => "INVALID_ROLE_LIST",
            Self::InvalidResourceList(_) => "INVALID_RESOURCE_LIST",
            Self::RoleNotFound(_) => "ROLE_NOT_FOUND",
            Self::SelfExtension(_) => "SELF_EXTENSION",
            Self::CrossInheritance { .. } => "CROSS_INHERITANCE",
            Self::Locked(_) => "LOCKED",
            Self::EmptyOrInvalidGrants => "EMPTY_OR_INVALID_GRANTS",
            Self::LockFailed(_) => "LOCK_FAILED",
        }
    }

    /// Check if this error comes from malformed input rather than from the
    /// state of the grants model.
    ///
    /// # Returns
    ///
    /// `true` for name, action, possession, attribute and shape errors
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidName(_)
                | Self::ReservedResourceName(_)
                | Self::InvalidAction(_)
                | Self::InvalidPossession(_)
                | Self::InvalidAttributes(_)
                | Self::InvalidExtend { .. }
                | Self::InvalidGrantsObject(_)
                | Self::InvalidRoleList(_)
                | Self::InvalidResourceList(_)
        )
    }

    /// Check if this error is an inheritance conflict.
    pub fn is_inheritance_error(&self) -> bool {
        matches!(self, Self::SelfExtension(_) | Self::CrossInheritance { .. })
    }
}
