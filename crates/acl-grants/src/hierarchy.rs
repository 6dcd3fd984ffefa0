//! # Role Hierarchy
//!
//! Resolves the roles a role inherits from and guards the inheritance graph
//! against cycles.
//!
//! The closure of a role is the role itself followed by the closure of each
//! role it extends, in `extends` order, keeping the first occurrence of every
//! name:
//!
//! ```text
//! admin  -> [editor, auditor]
//! editor -> [user]
//!
//! closure(admin) = [admin, editor, user, auditor]
//! ```
//!
//! Diamonds (two extenders sharing an ancestor) are fine. A role extending
//! itself, directly or through other roles, is rejected.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{AccessControlError, Result};
use crate::grants::Grants;

/// Walks the inheritance graph of a grants model.
///
/// Closures are memoized per resolver unless created with
/// [`HierarchyResolver::without_memo`]. Create a fresh resolver per query so a
/// memo never outlives the model it was computed from.
#[derive(Debug)]
pub struct HierarchyResolver<'a> {
    grants: &'a Grants,
    memo: Option<HashMap<String, Vec<String>>>,
}

impl<'a> HierarchyResolver<'a> {
    /// Create a memoizing resolver.
    pub fn new(grants: &'a Grants) -> Self {
        Self {
            grants,
            memo: Some(HashMap::new()),
        }
    }

    /// Create a resolver that recomputes every closure.
    pub fn without_memo(grants: &'a Grants) -> Self {
        Self { grants, memo: None }
    }

    /// Create a resolver, memoizing or not.
    pub fn with_memo(grants: &'a Grants, memoize: bool) -> Self {
        if memoize {
            Self::new(grants)
        } else {
            Self::without_memo(grants)
        }
    }

    /// Closure of `role`: the role itself first, then everything it inherits.
    ///
    /// # Errors
    ///
    /// - `RoleNotFound` when the role or any extender is missing
    /// - `SelfExtension` when a role lists itself
    /// - `CrossInheritance` when the walk runs into a cycle
    pub fn resolve(&mut self, role: &str) -> Result<Vec<String>> {
        let mut path = Vec::new();
        self.walk(role, &mut path)
    }

    fn walk(&mut self, role: &str, path: &mut Vec<String>) -> Result<Vec<String>> {
        if let Some(closure) = self.memo.as_ref().and_then(|memo| memo.get(role)) {
            return Ok(closure.clone());
        }

        let grants = self.grants;
        let entry = grants
            .role(role)
            .ok_or_else(|| AccessControlError::RoleNotFound(role.to_string()))?;

        path.push(role.to_string());
        let mut closure = vec![role.to_string()];

        for extender in entry.extends() {
            if extender == role {
                return Err(AccessControlError::SelfExtension(role.to_string()));
            }
            if !grants.contains_role(extender) {
                return Err(AccessControlError::RoleNotFound(extender.clone()));
            }
            if path.contains(extender) {
                // `extender` is an ancestor on the current walk, so it
                // already inherits from `role`
                return Err(AccessControlError::CrossInheritance {
                    role: role.to_string(),
                    extender: extender.clone(),
                });
            }

            for inherited in self.walk(extender, path)? {
                if !closure.contains(&inherited) {
                    closure.push(inherited);
                }
            }
        }

        path.pop();
        if let Some(memo) = self.memo.as_mut() {
            memo.insert(role.to_string(), closure.clone());
        }
        Ok(closure)
    }
}

/// Closure of a single role.
///
/// # Example
///
/// ```
/// use acl_grants::{resolve_hierarchy, AccessControl};
/// use serde_json::json;
///
/// let ac = AccessControl::from_value(json!({
///     "a": {"$extend": ["b"]},
///     "b": {"$extend": ["c"]},
///     "c": {}
/// }))
/// .unwrap();
///
/// assert_eq!(resolve_hierarchy(ac.grants(), "a").unwrap(), vec!["a", "b", "c"]);
/// ```
pub fn resolve_hierarchy(grants: &Grants, role: &str) -> Result<Vec<String>> {
    HierarchyResolver::new(grants).resolve(role)
}

/// Union of the closures of `roles`: the given roles first, in order, then
/// the roles they inherit.
///
/// # Errors
///
/// `InvalidRoleList` when `roles` is empty, plus the errors of
/// [`HierarchyResolver::resolve`].
pub fn flatten_roles<S: AsRef<str>>(grants: &Grants, roles: &[S], memoize: bool) -> Result<Vec<String>> {
    if roles.is_empty() {
        return Err(AccessControlError::InvalidRoleList("role list is empty".to_string()));
    }

    let mut flattened: Vec<String> = Vec::new();
    for role in roles {
        let role = role.as_ref().to_string();
        if !flattened.contains(&role) {
            flattened.push(role);
        }
    }

    let mut resolver = HierarchyResolver::with_memo(grants, memoize);
    for role in roles {
        for inherited in resolver.resolve(role.as_ref())? {
            if !flattened.contains(&inherited) {
                flattened.push(inherited);
            }
        }
    }
    Ok(flattened)
}

/// First candidate whose closure already contains `role`.
///
/// Extending `role` by such a candidate would close a cycle. Candidates equal
/// to `role` are skipped; self-extension is reported separately.
pub fn detect_cross_extension<S: AsRef<str>>(grants: &Grants, role: &str, candidates: &[S]) -> Result<Option<String>> {
    let mut resolver = HierarchyResolver::new(grants);
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if candidate == role {
            continue;
        }
        if resolver.resolve(candidate)?.iter().any(|inherited| inherited == role) {
            return Ok(Some(candidate.to_string()));
        }
    }
    Ok(None)
}

/// Make every role in `roles` extend every role in `extenders`.
///
/// All roles and extenders are checked before anything is written, so a
/// rejected call leaves the model unchanged.
///
/// # Errors
///
/// - `InvalidRoleList` for an empty `roles` or `extenders`
/// - `RoleNotFound` for a missing role or extender
/// - `SelfExtension` when a role is among its own extenders
/// - `CrossInheritance` when an extender already inherits from the role
pub(crate) fn extend_role<R, E>(grants: &mut Grants, roles: &[R], extenders: &[E]) -> Result<()>
where
    R: AsRef<str>,
    E: AsRef<str>,
{
    if roles.is_empty() {
        return Err(AccessControlError::InvalidRoleList("no role to extend".to_string()));
    }
    if extenders.is_empty() {
        return Err(AccessControlError::InvalidRoleList("no extender given".to_string()));
    }
    if let Some(missing) = grants.non_existent_roles(extenders).into_iter().next() {
        return Err(AccessControlError::RoleNotFound(missing));
    }

    let extenders: Vec<String> = extenders.iter().map(|e| e.as_ref().to_string()).collect();
    for role in roles {
        let role = role.as_ref();
        if !grants.contains_role(role) {
            return Err(AccessControlError::RoleNotFound(role.to_string()));
        }
        if extenders.iter().any(|extender| extender == role) {
            return Err(AccessControlError::SelfExtension(role.to_string()));
        }
        if let Some(extender) = detect_cross_extension(grants, role, &extenders)? {
            return Err(AccessControlError::CrossInheritance {
                role: role.to_string(),
                extender,
            });
        }
    }

    for role in roles {
        if let Some(entry) = grants.role_mut(role.as_ref()) {
            entry.add_extends(&extenders);
        }
        debug!(role = role.as_ref(), extenders = ?extenders, "Extended role");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RoleEntry;

    fn grants(edges: &[(&str, &[&str])]) -> Grants {
        let mut grants = Grants::new();
        for (role, extends) in edges {
            let mut entry = RoleEntry::new();
            entry.add_extends(&extends.iter().map(|e| e.to_string()).collect::<Vec<_>>());
            grants.insert_role(*role, entry);
        }
        grants
    }

    #[test]
    fn test_role_without_extends() {
        let grants = grants(&[("user", &[])]);
        assert_eq!(resolve_hierarchy(&grants, "user").unwrap(), vec!["user"]);
    }

    #[test]
    fn test_chain() {
        let grants = grants(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        assert_eq!(resolve_hierarchy(&grants, "a").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_depth_first_order() {
        let grants = grants(&[
            ("admin", &["editor", "auditor"]),
            ("editor", &["user"]),
            ("auditor", &[]),
            ("user", &[]),
        ]);
        assert_eq!(
            resolve_hierarchy(&grants, "admin").unwrap(),
            vec!["admin", "editor", "user", "auditor"]
        );
    }

    #[test]
    fn test_diamond_is_allowed() {
        let grants = grants(&[("top", &["left", "right"]), ("left", &["base"]), ("right", &["base"]), ("base", &[])]);
        for mut resolver in [HierarchyResolver::new(&grants), HierarchyResolver::without_memo(&grants)] {
            assert_eq!(resolver.resolve("top").unwrap(), vec!["top", "left", "base", "right"]);
        }
    }

    #[test]
    fn test_missing_roles() {
        let grants = grants(&[("a", &["ghost"])]);
        assert_eq!(
            resolve_hierarchy(&grants, "nobody"),
            Err(AccessControlError::RoleNotFound("nobody".into()))
        );
        assert_eq!(
            resolve_hierarchy(&grants, "a"),
            Err(AccessControlError::RoleNotFound("ghost".into()))
        );
    }

    #[test]
    fn test_self_and_cycles_are_detected_on_resolve() {
        let grants = grants(&[("a", &["a"])]);
        assert_eq!(
            resolve_hierarchy(&grants, "a"),
            Err(AccessControlError::SelfExtension("a".into()))
        );

        let grants = self::grants(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        assert_eq!(
            resolve_hierarchy(&grants, "a"),
            Err(AccessControlError::CrossInheritance {
                role: "c".into(),
                extender: "a".into()
            })
        );
    }

    #[test]
    fn test_flatten_roles() {
        let grants = grants(&[("admin", &["user"]), ("editor", &["user"]), ("user", &[])]);
        assert_eq!(
            flatten_roles(&grants, &["editor", "admin"], true).unwrap(),
            vec!["editor", "admin", "user"]
        );
        assert_eq!(
            flatten_roles(&grants, &["user", "user"], false).unwrap(),
            vec!["user"]
        );
        assert!(matches!(
            flatten_roles::<&str>(&grants, &[], true),
            Err(AccessControlError::InvalidRoleList(_))
        ));
        assert_eq!(
            flatten_roles(&grants, &["admin", "root"], true),
            Err(AccessControlError::RoleNotFound("root".into()))
        );
    }

    #[test]
    fn test_detect_cross_extension() {
        let grants = grants(&[("a", &["b"]), ("b", &["c"]), ("c", &[]), ("d", &[])]);
        assert_eq!(detect_cross_extension(&grants, "c", &["d", "a"]).unwrap(), Some("a".into()));
        assert_eq!(detect_cross_extension(&grants, "c", &["c", "d"]).unwrap(), None);
        assert_eq!(detect_cross_extension(&grants, "a", &["d"]).unwrap(), None);
    }

    #[test]
    fn test_extend_role() {
        let mut grants = grants(&[("a", &[]), ("b", &[]), ("c", &[])]);
        extend_role(&mut grants, &["a"], &["b"]).unwrap();
        extend_role(&mut grants, &["a"], &["c", "b"]).unwrap();
        assert_eq!(grants.role("a").unwrap().extends(), &["b", "c"]);
    }

    #[test]
    fn test_extend_role_rejections_leave_model_unchanged() {
        let mut grants = grants(&[("a", &["b"]), ("b", &[]), ("c", &[])]);
        let before = grants.clone();

        assert_eq!(
            extend_role(&mut grants, &["a"], &["a"]),
            Err(AccessControlError::SelfExtension("a".into()))
        );
        assert_eq!(
            extend_role(&mut grants, &["b"], &["a"]),
            Err(AccessControlError::CrossInheritance {
                role: "b".into(),
                extender: "a".into()
            })
        );
        assert_eq!(
            extend_role(&mut grants, &["c", "ghost"], &["b"]),
            Err(AccessControlError::RoleNotFound("ghost".into()))
        );
        assert_eq!(
            extend_role(&mut grants, &["c"], &["ghost"]),
            Err(AccessControlError::RoleNotFound("ghost".into()))
        );
        assert!(matches!(
            extend_role::<&str, &str>(&mut grants, &["c"], &[]),
            Err(AccessControlError::InvalidRoleList(_))
        ));

        assert_eq!(grants, before);
    }
}
