//! Role entries
//!
//! This module defines what the grants model stores per role: the rules the
//! role holds on each resource, and the roles it extends.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::resources::ResourceEntry;
use crate::validation::EXTEND_KEY;

/// Everything the grants model stores for one role.
///
/// A role inherits every permission of the roles listed in `extends`
/// (transitively). The list is kept in insertion order without duplicates
/// and never names the role itself.
///
/// # Examples
///
/// ```
/// use acl_grants::roles::RoleEntry;
///
/// let mut role = RoleEntry::new();
/// role.add_extends(&["user".to_string(), "editor".to_string()]);
/// role.add_extends(&["editor".to_string(), "auditor".to_string()]);
/// assert_eq!(role.extends(), &["user", "editor", "auditor"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleEntry {
    extends: Vec<String>,
    resources: BTreeMap<String, ResourceEntry>,
}

impl RoleEntry {
    /// Creates an empty role with no rules and no extensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Roles this role directly extends.
    pub fn extends(&self) -> &[String] {
        &self.extends
    }

    /// Append extenders, skipping names already present.
    pub fn add_extends(&mut self, extenders: &[String]) {
        for extender in extenders {
            if !self.extends.contains(extender) {
                self.extends.push(extender.clone());
            }
        }
    }

    /// Drop `role` from the extension list.
    ///
    /// # Returns
    ///
    /// `true` if the role was listed
    pub fn remove_extender(&mut self, role: &str) -> bool {
        let before = self.extends.len();
        self.extends.retain(|r| r != role);
        self.extends.len() != before
    }

    /// Get the rules on a resource.
    pub fn resource(&self, name: &str) -> Option<&ResourceEntry> {
        self.resources.get(name)
    }

    /// Get the rules on a resource, creating an empty entry if missing.
    pub fn resource_entry(&mut self, name: &str) -> &mut ResourceEntry {
        self.resources.entry(name.to_string()).or_default()
    }

    /// Replace the rules on a resource.
    pub fn insert_resource(&mut self, name: impl Into<String>, entry: ResourceEntry) {
        self.resources.insert(name.into(), entry);
    }

    /// Remove a resource.
    ///
    /// # Returns
    ///
    /// The removed rules, if the resource was present
    pub fn remove_resource(&mut self, name: &str) -> Option<ResourceEntry> {
        self.resources.remove(name)
    }

    /// Check whether the role has an entry for a resource.
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Names of the resources this role has entries for.
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}

impl Serialize for RoleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extend_len = usize::from(!self.extends.is_empty());
        let mut map = serializer.serialize_map(Some(self.resources.len() + extend_len))?;
        if !self.extends.is_empty() {
            map.serialize_entry(EXTEND_KEY, &self.extends)?;
        }
        for (name, entry) in &self.resources {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}
