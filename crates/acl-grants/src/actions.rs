//! # Actions
//!
//! Defines the actions and possessions grants are keyed by.
//! A rule in the grants model applies to one `action:possession` pair,
//! e.g. `update:own` or `read:any`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AccessControlError, Result};

/// Actions that can be performed on resources.
///
/// - **Create**: Create new resource instances
/// - **Read**: View resource data
/// - **Update**: Modify existing resource data
/// - **Delete**: Remove resource instances
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create new resource.
    Create,

    /// Read/view resource.
    Read,

    /// Update existing resource.
    Update,

    /// Delete resource.
    Delete,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Parse action from its exact string representation.
    ///
    /// # Example
    ///
    /// ```
    /// use acl_grants::actions::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("READ"), None);
    /// assert_eq!(Action::parse("list"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Action::Create),
            "read" => Some(Action::Read),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![Action::Create, Action::Read, Action::Update, Action::Delete]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a rule covers only resources the actor owns, or any instance.
///
/// An `any` grant also satisfies an `own` query; the reverse does not hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Possession {
    /// Resources owned by the actor.
    Own,

    /// Any instance of the resource.
    #[default]
    Any,
}

impl Possession {
    /// Get the string representation of the possession.
    pub fn as_str(&self) -> &'static str {
        match self {
            Possession::Own => "own",
            Possession::Any => "any",
        }
    }

    /// Parse possession from its exact string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "own" => Some(Possession::Own),
            "any" => Some(Possession::Any),
            _ => None,
        }
    }

    /// Get all possessions.
    pub fn all() -> Vec<Self> {
        vec![Possession::Own, Possession::Any]
    }
}

impl fmt::Display for Possession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite rule key: an action together with a possession.
///
/// # Example
///
/// ```
/// use acl_grants::actions::{Action, ActionPossession, Possession};
///
/// let key = ActionPossession::parse_key("update:own").unwrap();
/// assert_eq!(key, ActionPossession::new(Action::Update, Possession::Own));
/// assert_eq!(key.to_string(), "update:own");
///
/// // A bare action in a grants mapping means `any`.
/// let key = ActionPossession::parse_key("read").unwrap();
/// assert_eq!(key.possession, Possession::Any);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionPossession {
    /// The action of the rule.
    pub action: Action,
    /// The possession qualifier of the rule.
    pub possession: Possession,
}

impl ActionPossession {
    /// Create a new rule key.
    pub fn new(action: Action, possession: Possession) -> Self {
        Self { action, possession }
    }

    /// The same action with the `any` possession.
    pub fn as_any(&self) -> Self {
        Self::new(self.action, Possession::Any)
    }

    /// Parse a key stored in a grants mapping (`action` or `action:possession`).
    ///
    /// Keys are matched exactly; no case folding or trimming is applied.
    ///
    /// # Errors
    ///
    /// `InvalidAction` when the action part is unknown, `InvalidPossession`
    /// when the possession part is present but unknown.
    pub fn parse_key(key: &str) -> Result<Self> {
        let (action_part, possession_part) = match key.split_once(':') {
            Some((action, possession)) => (action, Some(possession)),
            None => (key, None),
        };

        let action =
            Action::parse(action_part).ok_or_else(|| AccessControlError::InvalidAction(key.to_string()))?;
        let possession = match possession_part {
            Some(p) => Possession::parse(p).ok_or_else(|| AccessControlError::InvalidPossession(key.to_string()))?,
            None => Possession::Any,
        };

        Ok(Self { action, possession })
    }

    /// Normalize a statement or query action.
    ///
    /// The action may embed a possession (`"create:own"`). An explicit
    /// `possession` takes precedence over an embedded one; when neither is
    /// given, `default_possession` applies. Both parts are trimmed and
    /// lower-cased before validation.
    ///
    /// # Example
    ///
    /// ```
    /// use acl_grants::actions::{Action, ActionPossession, Possession};
    ///
    /// let key = ActionPossession::normalize(Some(" Create:OWN "), None, Possession::Any).unwrap();
    /// assert_eq!(key, ActionPossession::new(Action::Create, Possession::Own));
    ///
    /// let key = ActionPossession::normalize(Some("read:own"), Some("any"), Possession::Any).unwrap();
    /// assert_eq!(key.possession, Possession::Any);
    ///
    /// assert!(ActionPossession::normalize(None, None, Possession::Any).is_err());
    /// ```
    pub fn normalize(action: Option<&str>, possession: Option<&str>, default_possession: Possession) -> Result<Self> {
        let raw = action
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| AccessControlError::InvalidAction(action.unwrap_or_default().to_string()))?;

        let (action_part, embedded) = match raw.split_once(':') {
            Some((action, possession)) => (action, Some(possession)),
            None => (raw, None),
        };

        let action = Action::parse(&action_part.trim().to_lowercase())
            .ok_or_else(|| AccessControlError::InvalidAction(raw.to_string()))?;

        let requested = possession
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .or_else(|| embedded.map(str::trim).filter(|p| !p.is_empty()));

        let possession = match requested {
            Some(p) => Possession::parse(&p.to_lowercase())
                .ok_or_else(|| AccessControlError::InvalidPossession(p.to_string()))?,
            None => default_possession,
        };

        Ok(Self { action, possession })
    }
}

impl fmt::Display for ActionPossession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.action, self.possession)
    }
}
