//! # Grants Model
//!
//! The canonical rule table: role → resource → `action:possession` →
//! attribute globs, plus each role's extension list.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::roles::RoleEntry;

/// The grants model.
///
/// Read access is public. Mutation is crate-internal and always goes through
/// the validating operations of [`AccessControl`](crate::AccessControl), which
/// keep every invariant of the model intact (valid names, acyclic
/// inheritance, no self-extension).
///
/// Serializes to the raw mapping shape accepted by
/// [`AccessControl::from_value`](crate::AccessControl::from_value):
///
/// ```text
/// {
///   "admin": {
///     "$extend": ["user"],
///     "video": { "delete:any": ["*"] }
///   },
///   "user": {
///     "video": { "read:any": ["*", "!secret"] }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grants {
    roles: BTreeMap<String, RoleEntry>,
}

impl Grants {
    /// Create an empty grants model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a role entry.
    pub fn role(&self, name: &str) -> Option<&RoleEntry> {
        self.roles.get(name)
    }

    pub(crate) fn role_mut(&mut self, name: &str) -> Option<&mut RoleEntry> {
        self.roles.get_mut(name)
    }

    /// Get a role entry, creating an empty one if missing. Callers validate
    /// the name first.
    pub(crate) fn role_entry(&mut self, name: &str) -> &mut RoleEntry {
        self.roles.entry(name.to_string()).or_default()
    }

    pub(crate) fn insert_role(&mut self, name: impl Into<String>, entry: RoleEntry) {
        self.roles.insert(name.into(), entry);
    }

    pub(crate) fn remove_role(&mut self, name: &str) -> Option<RoleEntry> {
        self.roles.remove(name)
    }

    pub(crate) fn roles_mut(&mut self) -> impl Iterator<Item = &mut RoleEntry> {
        self.roles.values_mut()
    }

    /// Check whether a role exists.
    pub fn contains_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Names of all roles, sorted.
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Iterate over roles and their entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleEntry)> {
        self.roles.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Unique resource names across all roles, sorted.
    ///
    /// # Example
    ///
    /// ```
    /// use acl_grants::AccessControl;
    /// use serde_json::json;
    ///
    /// let ac = AccessControl::from_value(json!({
    ///     "user": { "video": { "read:any": ["*"] } },
    ///     "admin": { "video": { "delete:any": ["*"] }, "user": { "update:any": ["*"] } }
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(ac.grants().resources(), vec!["user", "video"]);
    /// ```
    pub fn resources(&self) -> Vec<String> {
        self.roles
            .values()
            .flat_map(|role| role.resource_names())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Subset of `roles` that does not exist in the model, in input order.
    pub fn non_existent_roles<S: AsRef<str>>(&self, roles: &[S]) -> Vec<String> {
        roles
            .iter()
            .map(|role| role.as_ref())
            .filter(|role| !self.contains_role(role))
            .map(str::to_string)
            .collect()
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
