//! # Access Statements and Queries
//!
//! Raw input types accepted by the engine and their normalized forms.
//!
//! ```text
//! AccessInfo  --normalize-->  Grant   (written by the rule committer)
//! QueryInfo   --normalize-->  Query   (answered by the query evaluator)
//! ```
//!
//! Role, resource and attribute fields accept a single string, a
//! comma-separated string or a list of strings.

use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionPossession, Possession};
use crate::error::{AccessControlError, Result};
use crate::settings::AccessControlSettings;
use crate::validation::{validate_attributes, validate_name};

/// One or more names given as a string, a comma-separated string or a list.
///
/// # Example
///
/// ```
/// use acl_grants::access::StringList;
///
/// assert_eq!(StringList::from("admin, user").to_vec(), vec!["admin", "user"]);
/// assert_eq!(StringList::from(vec!["admin", "user"]).to_vec(), vec!["admin", "user"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    /// A single string, split on commas.
    One(String),
    /// A list of strings, each taken as a whole.
    Many(Vec<String>),
}

impl StringList {
    /// Trimmed, non-empty entries in order.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            StringList::One(s) => s
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
            StringList::Many(items) => items.iter().map(|item| item.trim().to_string()).collect(),
        }
    }

    /// Whether any entry is blank, as in `["user", ""]` or `"user,,admin"`.
    ///
    /// ```
    /// use acl_grants::access::StringList;
    ///
    /// assert!(StringList::from(vec!["user", " "]).has_blank());
    /// assert!(StringList::from("user,").has_blank());
    /// assert!(!StringList::from("user, admin").has_blank());
    /// ```
    pub fn has_blank(&self) -> bool {
        match self {
            StringList::One(s) => s.split(',').any(|part| part.trim().is_empty()),
            StringList::Many(items) => items.iter().any(|item| item.trim().is_empty()),
        }
    }
}

impl Default for StringList {
    fn default() -> Self {
        StringList::Many(Vec::new())
    }
}

impl From<&str> for StringList {
    fn from(s: &str) -> Self {
        StringList::One(s.to_string())
    }
}

impl From<String> for StringList {
    fn from(s: String) -> Self {
        StringList::One(s)
    }
}

impl<S: Into<String>> From<Vec<S>> for StringList {
    fn from(items: Vec<S>) -> Self {
        StringList::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for StringList {
    fn from(items: [&str; N]) -> Self {
        StringList::Many(items.iter().map(|item| item.to_string()).collect())
    }
}

/// A declarative grant or deny statement.
///
/// # Example
///
/// ```
/// use acl_grants::access::AccessInfo;
///
/// let info: AccessInfo = serde_json::from_value(serde_json::json!({
///     "role": ["admin", "editor"],
///     "resource": "video",
///     "action": "update:own",
///     "attributes": "title, !secret"
/// }))
/// .unwrap();
///
/// assert_eq!(info.role.to_vec(), vec!["admin", "editor"]);
/// assert!(!info.denied);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessInfo {
    /// Role(s) the statement applies to.
    pub role: StringList,

    /// Resource(s) the statement applies to.
    pub resource: StringList,

    /// Action, optionally with an embedded possession (`"create:own"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Possession; takes precedence over one embedded in `action`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possession: Option<String>,

    /// Attribute globs. Defaults to the configured default attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<StringList>,

    /// Deny the action: the stored attribute list is empty.
    pub denied: bool,
}

impl AccessInfo {
    /// Create a statement for the given roles and resources.
    pub fn new(role: impl Into<StringList>, resource: impl Into<StringList>) -> Self {
        Self {
            role: role.into(),
            resource: resource.into(),
            ..Self::default()
        }
    }

    /// Set the action.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the possession.
    pub fn with_possession(mut self, possession: impl Into<String>) -> Self {
        self.possession = Some(possession.into());
        self
    }

    /// Set the attribute globs. A blank string keeps the default attributes;
    /// use an empty list or [`AccessInfo::denied`] to grant nothing.
    pub fn with_attributes(mut self, attributes: impl Into<StringList>) -> Self {
        self.attributes = Some(attributes.into());
        self
    }

    /// Turn the statement into a denial.
    pub fn denied(mut self) -> Self {
        self.denied = true;
        self
    }
}

/// A normalized statement, ready to be written to the grants model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Valid role names, deduplicated.
    pub roles: Vec<String>,
    /// Valid resource names, deduplicated.
    pub resources: Vec<String>,
    /// Granted action.
    pub action: Action,
    /// Possession qualifier.
    pub possession: Possession,
    /// Attribute globs; empty for a denial.
    pub attributes: Vec<String>,
}

impl Grant {
    /// Create a grant from already normalized parts.
    pub fn new(
        roles: Vec<String>,
        resources: Vec<String>,
        key: ActionPossession,
        attributes: Vec<String>,
    ) -> Self {
        Self {
            roles,
            resources,
            action: key.action,
            possession: key.possession,
            attributes,
        }
    }

    /// Normalize a statement.
    ///
    /// # Errors
    ///
    /// - `InvalidRoleList` / `InvalidResourceList` for empty role or resource
    ///   lists, or lists with a blank entry
    /// - `InvalidName` for reserved names
    /// - `InvalidAction` / `InvalidPossession` for unknown action parts
    /// - `InvalidAttributes` for empty attribute entries
    pub fn from_access_info(info: &AccessInfo, settings: &AccessControlSettings) -> Result<Self> {
        let roles = name_list(&info.role, AccessControlError::InvalidRoleList)?;
        let resources = name_list(&info.resource, AccessControlError::InvalidResourceList)?;
        let key = ActionPossession::normalize(
            info.action.as_deref(),
            info.possession.as_deref(),
            settings.default_possession,
        )?;

        let attributes = if info.denied {
            Vec::new()
        } else {
            match &info.attributes {
                Some(StringList::Many(items)) => items.clone(),
                Some(list) => match list.to_vec() {
                    globs if globs.is_empty() => settings.default_attributes.clone(),
                    globs => globs,
                },
                None => settings.default_attributes.clone(),
            }
        };
        validate_attributes(&attributes)?;

        Ok(Self::new(roles, resources, key, attributes))
    }

    /// Check a grant built outside of [`Grant::from_access_info`].
    pub fn validate(&self) -> Result<()> {
        if self.roles.is_empty() {
            return Err(AccessControlError::InvalidRoleList("no role given".to_string()));
        }
        if self.resources.is_empty() {
            return Err(AccessControlError::InvalidResourceList("no resource given".to_string()));
        }
        self.roles.iter().try_for_each(|role| validate_name(role))?;
        self.resources.iter().try_for_each(|resource| validate_name(resource))?;
        validate_attributes(&self.attributes)
    }

    /// Rule key the grant is stored under.
    pub fn key(&self) -> ActionPossession {
        ActionPossession::new(self.action, self.possession)
    }
}

fn name_list(list: &StringList, empty: fn(String) -> AccessControlError) -> Result<Vec<String>> {
    if list.has_blank() {
        return Err(empty(format!("{:?}", list)));
    }

    let mut names: Vec<String> = Vec::new();
    for name in list.to_vec() {
        validate_name(&name)?;
        if !names.contains(&name) {
            names.push(name);
        }
    }

    if names.is_empty() {
        return Err(empty(format!("{:?}", list)));
    }
    Ok(names)
}

/// A permission query.
///
/// # Example
///
/// ```
/// use acl_grants::access::QueryInfo;
///
/// let query = QueryInfo::new("user", "video", "read:own");
/// assert_eq!(query.resource, "video");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryInfo {
    /// Role(s) to query for.
    pub role: StringList,

    /// The resource.
    pub resource: String,

    /// Action, optionally with an embedded possession.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Possession; takes precedence over one embedded in `action`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possession: Option<String>,
}

impl QueryInfo {
    /// Create a query.
    pub fn new(role: impl Into<StringList>, resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            resource: resource.into(),
            action: Some(action.into()),
            possession: None,
        }
    }

    /// Set the possession.
    pub fn with_possession(mut self, possession: impl Into<String>) -> Self {
        self.possession = Some(possession.into());
        self
    }
}

/// A normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Queried roles, deduplicated.
    pub roles: Vec<String>,
    /// Queried resource.
    pub resource: String,
    /// Rule key to look up.
    pub key: ActionPossession,
}

impl Query {
    /// Normalize a query.
    ///
    /// Role names are not validated here: a name that cannot exist in the
    /// grants model is reported as `RoleNotFound` at evaluation.
    pub fn from_query_info(info: &QueryInfo, settings: &AccessControlSettings) -> Result<Self> {
        if info.role.has_blank() {
            return Err(AccessControlError::InvalidRoleList(format!("{:?}", info.role)));
        }

        let mut roles: Vec<String> = Vec::new();
        for role in info.role.to_vec() {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        if roles.is_empty() {
            return Err(AccessControlError::InvalidRoleList(format!("{:?}", info.role)));
        }

        let resource = info.resource.trim();
        if resource.is_empty() {
            return Err(AccessControlError::InvalidResourceList(format!("{:?}", info.resource)));
        }

        let key = ActionPossession::normalize(
            info.action.as_deref(),
            info.possession.as_deref(),
            settings.default_possession,
        )?;

        Ok(Self {
            roles,
            resource: resource.to_string(),
            key,
        })
    }
}
