//! # Validation
//!
//! Structural validation of names, resource rules, role definitions and raw
//! grants objects.
//!
//! Raw grants come in two shapes, resolved once at the boundary into a
//! [`GrantsSource`]:
//!
//! ```text
//! Mapping:     { "<role>": { "$extend": [..], "<resource>": { "<action>:<possession>": [globs] } } }
//! Statements:  [ { "role": .., "resource": .., "action": .., "attributes": .. }, .. ]
//! ```
//!
//! Validating a mapping never mutates anything: role definitions are checked
//! first, and extensions are registered afterwards in a separate pass, so the
//! order of roles in the mapping does not matter.

use acl_glob::AttributeGlob;
use serde_json::{Map, Value};
use tracing::debug;

use crate::access::{AccessInfo, Grant};
use crate::actions::ActionPossession;
use crate::commit;
use crate::error::{AccessControlError, Result};
use crate::grants::Grants;
use crate::hierarchy;
use crate::resources::ResourceEntry;
use crate::roles::RoleEntry;
use crate::settings::AccessControlSettings;

/// Key under which a role definition lists the roles it extends.
pub const EXTEND_KEY: &str = "$extend";

/// Names no role or resource may use.
pub const RESERVED_KEYWORDS: [&str; 4] = ["*", "!", "$", EXTEND_KEY];

/// Check whether `name` may be used as a role or resource name.
///
/// # Example
///
/// ```
/// use acl_grants::validation::is_valid_name;
///
/// assert!(is_valid_name("admin"));
/// assert!(!is_valid_name("  "));
/// assert!(!is_valid_name("$extend"));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && !RESERVED_KEYWORDS.contains(&name)
}

/// Validate a role or resource name.
///
/// # Errors
///
/// `InvalidName` for empty, blank or reserved names. Use [`is_valid_name`]
/// for a check that does not fail.
pub fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(AccessControlError::InvalidName(name.to_string()))
    }
}

/// Validate an attribute glob list: either empty, or non-empty strings that
/// parse as attribute globs.
pub fn validate_attributes<S: AsRef<str>>(attributes: &[S]) -> Result<()> {
    if attributes.iter().any(|a| a.as_ref().trim().is_empty()) {
        return Err(AccessControlError::InvalidAttributes(
            "attributes must be non-empty strings".to_string(),
        ));
    }
    attributes
        .iter()
        .try_for_each(|a| AttributeGlob::parse(a.as_ref()).map(drop))
        .map_err(|e| AccessControlError::InvalidAttributes(e.to_string()))
}

/// Validate a raw resource definition (`{"<action>:<possession>": [globs]}`).
///
/// # Errors
///
/// - `InvalidAction` / `InvalidPossession` for unknown key parts
/// - `InvalidAttributes` for values that are not lists of non-empty strings
/// - `InvalidGrantsObject` when `raw` is not an object
pub fn validate_resource_entry(raw: &Value) -> Result<ResourceEntry> {
    let rules = raw.as_object().ok_or_else(|| {
        AccessControlError::InvalidGrantsObject(format!("resource definition must be an object, got {}", raw))
    })?;

    let mut entry = ResourceEntry::new();
    for (key, value) in rules {
        let rule = ActionPossession::parse_key(key)?;
        entry.set(rule, attribute_list(key, value)?);
    }
    Ok(entry)
}

fn attribute_list(key: &str, value: &Value) -> Result<Vec<String>> {
    let invalid = || AccessControlError::InvalidAttributes(format!("{}: {}", key, value));

    let items = value.as_array().ok_or_else(invalid)?;
    let globs = items
        .iter()
        .map(|item| match item.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
            _ => Err(invalid()),
        })
        .collect::<Result<Vec<String>>>()?;
    validate_attributes(&globs)?;
    Ok(globs)
}

/// A role definition that passed structural validation.
///
/// Its extensions are not registered yet: they still have to be checked
/// against the rest of the model (existence, self and cross inheritance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRole {
    /// Resource rules of the role, without extensions.
    pub entry: RoleEntry,
    /// Roles named under `$extend`, in order.
    pub extends: Vec<String>,
}

/// Validate a raw role definition.
///
/// # Errors
///
/// - `InvalidExtend` when `$extend` is not a non-empty list of non-empty strings
/// - `ReservedResourceName` for resource keys that are not valid names
/// - `InvalidGrantsObject` when `raw` is not an object
/// - any error of [`validate_resource_entry`]
pub fn validate_role_entry(role: &str, raw: &Value) -> Result<ValidatedRole> {
    let definition = raw.as_object().ok_or_else(|| {
        AccessControlError::InvalidGrantsObject(format!("definition of role {:?} must be an object", role))
    })?;

    let mut validated = ValidatedRole {
        entry: RoleEntry::new(),
        extends: Vec::new(),
    };

    for (key, value) in definition {
        if key == EXTEND_KEY {
            validated.extends = extend_list(role, value)?;
        } else if !is_valid_name(key) {
            return Err(AccessControlError::ReservedResourceName(key.clone()));
        } else {
            validated
                .entry
                .insert_resource(key.clone(), validate_resource_entry(value)?);
        }
    }

    Ok(validated)
}

fn extend_list(role: &str, value: &Value) -> Result<Vec<String>> {
    let invalid = || AccessControlError::InvalidExtend { role: role.to_string() };

    let items = value.as_array().filter(|items| !items.is_empty()).ok_or_else(invalid)?;
    items
        .iter()
        .map(|item| match item.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
            _ => Err(invalid()),
        })
        .collect()
}

/// Raw grants, resolved to one of the two accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum GrantsSource {
    /// A mapping already shaped like the grants model.
    Mapping(Map<String, Value>),
    /// A list of access statements, committed in order.
    Statements(Vec<AccessInfo>),
}

impl GrantsSource {
    /// Resolve the shape of a raw grants value.
    ///
    /// # Errors
    ///
    /// `InvalidGrantsObject` for anything but an object or an array of
    /// statement objects.
    pub fn from_value(raw: Value) -> Result<Self> {
        match raw {
            Value::Object(map) => Ok(Self::Mapping(map)),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    serde_json::from_value::<AccessInfo>(item).map_err(|e| {
                        AccessControlError::InvalidGrantsObject(format!("statement {}: {}", idx, e))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Statements),
            other => Err(AccessControlError::InvalidGrantsObject(format!(
                "expected a role mapping or a list of statements, got {}",
                other
            ))),
        }
    }
}

/// Validate raw grants and build the grants model they describe.
///
/// Mapping sources are validated role by role, then their extensions are
/// registered with the same checks as
/// [`AccessControl::extend_role`](crate::AccessControl::extend_role).
/// Statement sources are normalized and committed one by one.
pub fn validate_grants_structure(source: GrantsSource, settings: &AccessControlSettings) -> Result<Grants> {
    let mut grants = Grants::new();

    match source {
        GrantsSource::Mapping(map) => {
            let mut pending = Vec::new();
            for (role, raw) in &map {
                validate_name(role)?;
                let validated = validate_role_entry(role, raw)?;
                grants.insert_role(role.clone(), validated.entry);
                if !validated.extends.is_empty() {
                    pending.push((role.clone(), validated.extends));
                }
            }

            for (role, extends) in pending {
                hierarchy::extend_role(&mut grants, &[role], &extends)?;
            }
        }
        GrantsSource::Statements(statements) => {
            for info in &statements {
                let grant = Grant::from_access_info(info, settings)?;
                commit::apply_grant(&mut grants, &grant);
            }
        }
    }

    debug!(roles = grants.len(), "Validated grants structure");
    Ok(grants)
}
