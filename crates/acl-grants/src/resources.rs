//! # Resource Entries
//!
//! A resource entry holds the rules one role has on one resource: a mapping
//! from `action:possession` to the attribute globs the rule allows.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::actions::ActionPossession;

/// Rules of a role on a single resource.
///
/// An empty attribute list is an explicit denial; a missing key means the
/// rule was never granted. Both deny at query time, but they are kept apart.
///
/// # Example
///
/// ```
/// use acl_grants::actions::{Action, ActionPossession, Possession};
/// use acl_grants::resources::ResourceEntry;
///
/// let mut entry = ResourceEntry::new();
/// entry.set(ActionPossession::new(Action::Read, Possession::Any), vec!["*".into()]);
///
/// // `any` satisfies an `own` query
/// let own = ActionPossession::new(Action::Read, Possession::Own);
/// assert_eq!(entry.attributes_for(own), Some(&["*".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceEntry {
    rules: BTreeMap<ActionPossession, Vec<String>>,
}

impl ResourceEntry {
    /// Create an entry with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the attributes stored under exactly `key`.
    pub fn get(&self, key: ActionPossession) -> Option<&[String]> {
        self.rules.get(&key).map(Vec::as_slice)
    }

    /// Get the attributes answering a query for `key`.
    ///
    /// An `own` query falls back to the `any` rule of the same action when no
    /// `own` rule exists. An `any` query never falls back to `own`.
    pub fn attributes_for(&self, key: ActionPossession) -> Option<&[String]> {
        self.get(key).or_else(|| self.get(key.as_any()))
    }

    /// Set the attributes of a rule, replacing any previous value.
    pub fn set(&mut self, key: ActionPossession, attributes: Vec<String>) {
        self.rules.insert(key, attributes);
    }

    /// Remove a rule.
    ///
    /// # Returns
    ///
    /// The removed attributes, if the rule existed
    pub fn remove(&mut self, key: ActionPossession) -> Option<Vec<String>> {
        self.rules.remove(&key)
    }

    /// Check whether a rule exists under exactly `key`.
    pub fn contains(&self, key: ActionPossession) -> bool {
        self.rules.contains_key(&key)
    }

    /// Iterate over the rules in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ActionPossession, &[String])> {
        self.rules.iter().map(|(key, attrs)| (*key, attrs.as_slice()))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Serialize for ResourceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for (key, attrs) in &self.rules {
            map.serialize_entry(&key.to_string(), attrs)?;
        }
        map.end()
    }
}
