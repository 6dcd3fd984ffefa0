//! # ACL Glob
//!
//! Glob attribute matching for the ACL grants engine.
//!
//! ## Overview
//!
//! Grants restrict which object attributes a role may see or change by listing
//! attribute globs. This crate handles:
//! - **Patterns**: Parsing of a single glob (`*`, `!negation`, `nested.path`)
//! - **Decisions**: Whether a property path is allowed by a glob list
//! - **Union**: Combining two glob lists so the result allows what either allows
//! - **Filtering**: Projecting JSON objects down to the allowed attributes
//!
//! ## Pattern Syntax
//!
//! ```text
//! *              every attribute
//! title          the `title` attribute (and everything nested under it)
//! user.*         every attribute nested under `user`
//! !secret        excludes `secret`
//! meta.tag_*     `meta.tag_a`, `meta.tag_b`, ...
//! ```
//!
//! A segment holds at most one `*`.
//!
//! When several patterns match a path, the most specific one decides: deeper
//! patterns first, then patterns with more literal segments, then patterns
//! with more fixed characters around their wildcard, and a negation beats a
//! positive pattern of equal specificity.
//!
//! ## Usage
//!
//! ```rust
//! use acl_glob::{filter, is_allowed, union};
//! use serde_json::json;
//!
//! let attrs = union(&["*", "!secret"], &["secret"]);
//! assert!(is_allowed(&attrs, "secret"));
//!
//! let visible = filter(&json!({"id": 1, "secret": "x"}), &["*", "!secret"]);
//! assert_eq!(visible, json!({"id": 1}));
//! ```

pub mod error;
pub mod filter;
pub mod list;
pub mod pattern;

// Re-export main types for convenience
pub use error::{GlobError, GlobResult};
pub use filter::filter;
pub use list::{is_allowed, normalize, union};
pub use pattern::AttributeGlob;
