//! # ACL Grants
//!
//! Role and attribute based access control over an in-memory grants model.
//!
//! ## Overview
//!
//! The acl-grants crate handles:
//! - **Grants model**: role → resource → `action:possession` → attribute globs
//! - **Validation**: Strict checking of names, rules and raw grants objects
//! - **Hierarchy**: Role inheritance with self and cross inheritance rejected
//! - **Commits**: Turning grant and deny statements into rules
//! - **Queries**: Unioning the attributes granted to every resolved role
//! - **Locking**: Freezing the model for concurrent readers
//!
//! ## Architecture
//!
//! ```text
//! {
//!   "admin": {
//!     "$extend": ["user"],
//!     "video": { "delete:any": ["*"] }
//!   },
//!   "user": {
//!     "video": { "read:any": ["*", "!secret"], "update:own": ["title"] }
//!   }
//! }
//!
//! admin asks read:own on video
//!   -> roles [admin, user]
//!   -> user has no read:own, falls back to read:any
//!   -> ["*", "!secret"]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use acl_grants::{AccessControl, AccessInfo, QueryInfo};
//! use serde_json::json;
//!
//! let mut ac = AccessControl::new();
//! ac.commit(
//!     &AccessInfo::new("user", "video")
//!         .with_action("read:any")
//!         .with_attributes(vec!["*", "!secret"]),
//! )
//! .unwrap();
//! ac.commit(&AccessInfo::new("admin", "video").with_action("delete:any")).unwrap();
//! ac.extend_role(&["admin"], &["user"]).unwrap();
//!
//! let ac = ac.into_shared().unwrap();
//!
//! let permission = ac.permission(&QueryInfo::new("admin", "video", "read:own")).unwrap();
//! assert!(permission.granted());
//! assert_eq!(
//!     permission.filter(&json!({"title": "a", "secret": "x"})),
//!     json!({"title": "a"})
//! );
//! ```
//!
//! ## Possession
//!
//! An `any` rule also answers `own` queries when the role has no `own` rule
//! for the same action. An `own` rule never answers an `any` query.

pub mod access;
pub mod actions;
mod commit;
pub mod control;
pub mod error;
pub mod grants;
pub mod hierarchy;
pub mod permissions;
mod query;
pub mod resources;
pub mod roles;
pub mod settings;
pub mod validation;

// Re-export main types for convenience
pub use access::{AccessInfo, Grant, QueryInfo, StringList};
pub use actions::{Action, ActionPossession, Possession};
pub use control::AccessControl;
pub use error::{AccessControlError, Result};
pub use grants::Grants;
pub use hierarchy::{detect_cross_extension, flatten_roles, resolve_hierarchy, HierarchyResolver};
pub use permissions::Permission;
pub use resources::ResourceEntry;
pub use roles::RoleEntry;
pub use settings::AccessControlSettings;
pub use validation::{is_valid_name, validate_name, GrantsSource};
