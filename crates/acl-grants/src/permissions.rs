//! # Permissions
//!
//! The answer to a query: whether access is granted, and which attributes of
//! the resource the roles may see or change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::{Action, ActionPossession, Possession};

/// Result of a permission query.
///
/// Access is granted when at least one attribute glob is granted.
///
/// # Example
///
/// ```
/// use acl_grants::{AccessControl, AccessInfo, QueryInfo};
/// use serde_json::json;
///
/// let mut ac = AccessControl::new();
/// ac.commit(
///     &AccessInfo::new("user", "video")
///         .with_action("read:any")
///         .with_attributes(vec!["*", "!secret"]),
/// )
/// .unwrap();
///
/// let permission = ac.permission(&QueryInfo::new("user", "video", "read:own")).unwrap();
/// assert!(permission.granted());
///
/// let visible = permission.filter(&json!({"id": 1, "name": "a", "secret": "x"}));
/// assert_eq!(visible, json!({"id": 1, "name": "a"}));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    /// The queried roles.
    pub roles: Vec<String>,
    /// The queried resource.
    pub resource: String,
    /// The queried action.
    pub action: Action,
    /// The queried possession.
    pub possession: Possession,
    /// Granted attribute globs.
    pub attributes: Vec<String>,
}

impl Permission {
    /// Create a permission from an evaluated query.
    pub fn new(roles: Vec<String>, resource: impl Into<String>, key: ActionPossession, attributes: Vec<String>) -> Self {
        Self {
            roles,
            resource: resource.into(),
            action: key.action,
            possession: key.possession,
            attributes,
        }
    }

    /// Check whether access is granted.
    pub fn granted(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Granted attribute globs.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// The queried roles.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// The queried resource.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Check whether a dotted attribute path is granted.
    pub fn is_allowed(&self, path: &str) -> bool {
        acl_glob::is_allowed(&self.attributes, path)
    }

    /// Project `data` down to the granted attributes.
    ///
    /// Arrays are filtered element by element. The input is left untouched.
    pub fn filter(&self, data: &Value) -> Value {
        acl_glob::filter(data, &self.attributes)
    }
}
