//! Settings for the access control engine
//!
//! Controls defaults applied to statements and how hierarchies are resolved.

use serde::{Deserialize, Serialize};

use crate::actions::Possession;

/// Engine settings.
///
/// # Examples
///
/// ```
/// use acl_grants::settings::AccessControlSettings;
/// use acl_grants::Possession;
///
/// let settings = AccessControlSettings::from_json(r#"{"default_possession": "own"}"#).unwrap();
/// assert_eq!(settings.default_possession, Possession::Own);
/// assert_eq!(settings.default_attributes, vec!["*"]);
/// assert!(settings.memoize_hierarchy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlSettings {
    /// Reuse role closures across branches while resolving one query
    #[serde(default = "default_memoize_hierarchy")]
    pub memoize_hierarchy: bool,

    /// Attributes of a statement that names none and is not denied
    #[serde(default = "default_attributes")]
    pub default_attributes: Vec<String>,

    /// Possession of a statement or query that names none
    #[serde(default)]
    pub default_possession: Possession,
}

fn default_memoize_hierarchy() -> bool {
    true
}

fn default_attributes() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for AccessControlSettings {
    fn default() -> Self {
        Self {
            memoize_hierarchy: default_memoize_hierarchy(),
            default_attributes: default_attributes(),
            default_possession: Possession::default(),
        }
    }
}

impl AccessControlSettings {
    /// Load settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
