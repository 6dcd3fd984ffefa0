//! # Access Control
//!
//! [`AccessControl`] owns a grants model and exposes every build-time,
//! query-time and introspection operation on it.
//!
//! ## Lifecycle
//!
//! ```text
//! new / from_value ──► commit, extend_role, ... ──► lock ──► permission, can, ...
//!                      (mutable)                           (read-only, shareable)
//! ```
//!
//! Every mutating operation checks the lock first and validates its input
//! completely before writing, so a rejected call never leaves the model
//! partially modified.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::access::{AccessInfo, Grant, Query, QueryInfo};
use crate::commit;
use crate::error::{AccessControlError, Result};
use crate::grants::Grants;
use crate::hierarchy::{self, HierarchyResolver};
use crate::permissions::Permission;
use crate::query;
use crate::settings::AccessControlSettings;
use crate::validation::{validate_grants_structure, GrantsSource};

/// Grants model together with its settings and lock state.
///
/// # Example
///
/// ```
/// use acl_grants::{AccessControl, AccessInfo, QueryInfo};
///
/// let mut ac = AccessControl::new();
/// ac.commit(&AccessInfo::new("user", "video").with_action("read")).unwrap();
/// ac.commit(&AccessInfo::new("admin", "video").with_action("delete")).unwrap();
/// ac.extend_role(&["admin"], &["user"]).unwrap();
/// ac.lock().unwrap();
///
/// assert!(ac.can(&QueryInfo::new("admin", "video", "read")).unwrap());
/// assert!(!ac.can(&QueryInfo::new("user", "video", "delete")).unwrap());
/// assert!(ac.commit(&AccessInfo::new("user", "video").with_action("update")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    grants: Grants,
    settings: AccessControlSettings,
    locked: bool,
}

impl AccessControl {
    /// Create an empty, unlocked instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty, unlocked instance.
    pub fn with_settings(settings: AccessControlSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Create an instance from raw grants (a role mapping or a statement list).
    pub fn from_value(raw: Value) -> Result<Self> {
        let mut ac = Self::new();
        ac.set_grants(raw)?;
        Ok(ac)
    }

    fn ensure_unlocked(&self, operation: &'static str) -> Result<()> {
        if self.locked {
            warn!(operation, "Rejected mutation of locked grants model");
            return Err(AccessControlError::Locked(operation));
        }
        Ok(())
    }

    // ---- Build time ----

    /// Replace the grants model with `raw`.
    ///
    /// The new model is validated completely before it replaces the current
    /// one; on error the current model is kept.
    pub fn set_grants(&mut self, raw: Value) -> Result<()> {
        self.ensure_unlocked("set grants")?;

        let grants = GrantsSource::from_value(raw)
            .and_then(|source| validate_grants_structure(source, &self.settings))
            .map_err(|e| {
                warn!(error = %e, "Rejected grants object");
                e
            })?;

        self.grants = grants;
        info!(roles = self.grants.len(), "Replaced grants model");
        Ok(())
    }

    /// Remove every role.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_unlocked("reset grants")?;
        self.grants = Grants::new();
        debug!("Reset grants model");
        Ok(())
    }

    /// Normalize a statement and write it.
    pub fn commit(&mut self, info: &AccessInfo) -> Result<()> {
        self.ensure_unlocked("commit")?;
        commit::commit(&mut self.grants, info, &self.settings)
            .map(|_| ())
            .map_err(|e| {
                warn!(error = %e, "Rejected access statement");
                e
            })
    }

    /// Write a pre-normalized grant.
    pub fn commit_grant(&mut self, grant: &Grant) -> Result<()> {
        self.ensure_unlocked("commit grant")?;
        commit::commit_grant(&mut self.grants, grant).map_err(|e| {
            warn!(error = %e, "Rejected grant");
            e
        })
    }

    /// Make sure the roles exist, without granting them anything.
    pub fn pre_create_roles<S: AsRef<str>>(&mut self, roles: &[S]) -> Result<()> {
        self.ensure_unlocked("create roles")?;
        commit::pre_create_roles(&mut self.grants, roles)
    }

    /// Make every role in `roles` inherit from every role in `extenders`.
    ///
    /// # Errors
    ///
    /// - `Locked` when the model is locked
    /// - `RoleNotFound` when a role or extender does not exist
    /// - `SelfExtension` / `CrossInheritance` when the extension would create
    ///   a cycle
    pub fn extend_role<R, E>(&mut self, roles: &[R], extenders: &[E]) -> Result<()>
    where
        R: AsRef<str>,
        E: AsRef<str>,
    {
        self.ensure_unlocked("extend role")?;
        hierarchy::extend_role(&mut self.grants, roles, extenders).map_err(|e| {
            warn!(error = %e, "Rejected role extension");
            e
        })
    }

    /// Remove resources from the given roles, or from every role when
    /// `roles` is `None`.
    ///
    /// # Errors
    ///
    /// - `Locked` when the model is locked
    /// - `InvalidResourceList` / `InvalidRoleList` for empty lists
    /// - `RoleNotFound` when a named role does not exist
    pub fn remove_resources<S, R>(&mut self, resources: &[S], roles: Option<&[R]>) -> Result<()>
    where
        S: AsRef<str>,
        R: AsRef<str>,
    {
        self.ensure_unlocked("remove resources")?;

        if resources.is_empty() {
            return Err(AccessControlError::InvalidResourceList("no resource given".to_string()));
        }

        let targets: Vec<String> = match roles {
            Some(roles) => {
                if roles.is_empty() {
                    return Err(AccessControlError::InvalidRoleList("no role given".to_string()));
                }
                if let Some(missing) = self.grants.non_existent_roles(roles).into_iter().next() {
                    return Err(AccessControlError::RoleNotFound(missing));
                }
                roles.iter().map(|role| role.as_ref().to_string()).collect()
            }
            None => self.grants.role_names().map(str::to_string).collect(),
        };

        for role in &targets {
            if let Some(entry) = self.grants.role_mut(role) {
                for resource in resources {
                    entry.remove_resource(resource.as_ref());
                }
            }
        }

        debug!(
            resources = ?resources.iter().map(|r| r.as_ref()).collect::<Vec<&str>>(),
            roles = ?targets,
            "Removed resources"
        );
        Ok(())
    }

    /// Delete roles and drop them from every other role's extension list.
    pub fn remove_roles<S: AsRef<str>>(&mut self, roles: &[S]) -> Result<()> {
        self.ensure_unlocked("remove roles")?;

        if roles.is_empty() {
            return Err(AccessControlError::InvalidRoleList("no role given".to_string()));
        }
        if let Some(missing) = self.grants.non_existent_roles(roles).into_iter().next() {
            return Err(AccessControlError::RoleNotFound(missing));
        }

        for role in roles {
            let role = role.as_ref();
            self.grants.remove_role(role);
            for entry in self.grants.roles_mut() {
                entry.remove_extender(role);
            }
            debug!(role, "Removed role");
        }
        Ok(())
    }

    /// Freeze the grants model.
    ///
    /// Every role's hierarchy is resolved once more before the model is
    /// frozen. Locking an already locked model succeeds without effect.
    ///
    /// # Errors
    ///
    /// - `EmptyOrInvalidGrants` when there are no roles
    /// - `LockFailed` when a role's hierarchy cannot be resolved
    #[instrument(skip(self))]
    pub fn lock(&mut self) -> Result<()> {
        if self.locked {
            return Ok(());
        }
        if self.grants.is_empty() {
            warn!("Refused to lock empty grants model");
            return Err(AccessControlError::EmptyOrInvalidGrants);
        }

        let mut resolver = HierarchyResolver::new(&self.grants);
        for role in self.grants.role_names() {
            resolver.resolve(role).map_err(|e| {
                warn!(role, error = %e, "Grants model failed lock check");
                AccessControlError::LockFailed(e.to_string())
            })?;
        }

        self.locked = true;
        info!(roles = self.grants.len(), "Locked grants model");
        Ok(())
    }

    /// Lock and wrap for sharing across threads.
    pub fn into_shared(mut self) -> Result<Arc<Self>> {
        self.lock()?;
        Ok(Arc::new(self))
    }

    /// Check whether the model is locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    // ---- Query time ----

    /// Attribute globs granted by a query; empty when access is denied.
    pub fn evaluate(&self, query: &QueryInfo) -> Result<Vec<String>> {
        let query = Query::from_query_info(query, &self.settings)?;
        query::evaluate(&self.grants, &query, self.settings.memoize_hierarchy)
    }

    /// Answer a query.
    pub fn permission(&self, query: &QueryInfo) -> Result<Permission> {
        let query = Query::from_query_info(query, &self.settings)?;
        let attributes = query::evaluate(&self.grants, &query, self.settings.memoize_hierarchy)?;
        Ok(Permission::new(query.roles, query.resource, query.key, attributes))
    }

    /// Check whether a query is granted.
    pub fn can(&self, query: &QueryInfo) -> Result<bool> {
        Ok(self.permission(query)?.granted())
    }

    // ---- Introspection ----

    /// The grants model.
    pub fn grants(&self) -> &Grants {
        &self.grants
    }

    /// The settings in use.
    pub fn settings(&self) -> &AccessControlSettings {
        &self.settings
    }

    /// Export the grants model in the raw mapping shape.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.grants)
    }

    /// All role names, sorted.
    pub fn roles(&self) -> Vec<String> {
        self.grants.role_names().map(str::to_string).collect()
    }

    /// Unique resource names across all roles, sorted.
    pub fn resources(&self) -> Vec<String> {
        self.grants.resources()
    }

    /// Check whether a role exists.
    pub fn has_role(&self, role: &str) -> bool {
        self.grants.contains_role(role)
    }

    /// Check whether all roles exist. False for an empty list.
    pub fn has_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        !roles.is_empty() && self.grants.non_existent_roles(roles).is_empty()
    }

    /// Check whether any role has an entry for the resource.
    pub fn has_resource(&self, resource: &str) -> bool {
        self.grants.iter().any(|(_, role)| role.has_resource(resource))
    }

    /// Check whether all resources exist. False for an empty list.
    pub fn has_resources<S: AsRef<str>>(&self, resources: &[S]) -> bool {
        !resources.is_empty() && resources.iter().all(|resource| self.has_resource(resource.as_ref()))
    }

    /// Subset of `roles` that does not exist, in input order.
    pub fn non_existent_roles<S: AsRef<str>>(&self, roles: &[S]) -> Vec<String> {
        self.grants.non_existent_roles(roles)
    }

    /// Roles `role` directly extends.
    pub fn extended_roles_of(&self, role: &str) -> Result<Vec<String>> {
        self.grants
            .role(role)
            .map(|entry| entry.extends().to_vec())
            .ok_or_else(|| AccessControlError::RoleNotFound(role.to_string()))
    }

    /// Every role `role` inherits from, directly or not.
    pub fn inherited_roles_of(&self, role: &str) -> Result<Vec<String>> {
        let mut closure = HierarchyResolver::with_memo(&self.grants, self.settings.memoize_hierarchy).resolve(role)?;
        closure.retain(|inherited| inherited != role);
        Ok(closure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> AccessControl {
        AccessControl::from_value(json!({
            "user": {"video": {"read:any": ["*", "!secret"], "update:own": ["title"]}},
            "editor": {"$extend": ["user"], "video": {"update:any": ["title", "description"]}},
            "admin": {"$extend": ["editor"], "video": {"delete:any": ["*"]}, "profile": {"read:any": ["*"]}}
        }))
        .unwrap()
    }

    #[test]
    fn test_from_value_and_introspection() {
        let ac = sample();
        assert_eq!(ac.roles(), vec!["admin", "editor", "user"]);
        assert_eq!(ac.resources(), vec!["profile", "video"]);
        assert!(ac.has_role("admin"));
        assert!(ac.has_roles(&["admin", "user"]));
        assert!(!ac.has_roles(&["admin", "root"]));
        assert!(!ac.has_roles::<&str>(&[]));
        assert!(ac.has_resource("profile"));
        assert!(ac.has_resources(&["video", "profile"]));
        assert!(!ac.has_resources(&["video", "audio"]));
        assert_eq!(ac.non_existent_roles(&["root", "user"]), vec!["root"]);
    }

    #[test]
    fn test_extended_and_inherited_roles() {
        let ac = sample();
        assert_eq!(ac.extended_roles_of("admin").unwrap(), vec!["editor"]);
        assert_eq!(ac.inherited_roles_of("admin").unwrap(), vec!["editor", "user"]);
        assert!(ac.inherited_roles_of("user").unwrap().is_empty());
        assert_eq!(
            ac.extended_roles_of("root"),
            Err(AccessControlError::RoleNotFound("root".into()))
        );
    }

    #[test]
    fn test_permission_through_hierarchy() {
        let ac = sample();
        let perm = ac.permission(&QueryInfo::new("admin", "video", "read:own")).unwrap();
        assert!(perm.granted());
        assert!(!perm.is_allowed("secret"));
        assert_eq!(perm.roles(), &["admin"]);

        assert!(ac.can(&QueryInfo::new("editor", "video", "update:any")).unwrap());
        assert!(!ac.can(&QueryInfo::new("user", "video", "update:any")).unwrap());
        assert!(ac.can(&QueryInfo::new("user", "video", "update:own")).unwrap());
        assert_eq!(
            ac.can(&QueryInfo::new("root", "video", "read")),
            Err(AccessControlError::RoleNotFound("root".into()))
        );
    }

    #[test]
    fn test_set_grants_is_atomic() {
        let mut ac = sample();
        let before = ac.grants().clone();

        let err = ac
            .set_grants(json!({"guest": {"video": {"read:any": ["*"]}}, "bad": {"video": {"fly:any": ["*"]}}}))
            .unwrap_err();
        assert!(matches!(err, AccessControlError::InvalidAction(_)));
        assert_eq!(ac.grants(), &before);

        assert!(matches!(
            ac.set_grants(json!("grants")),
            Err(AccessControlError::InvalidGrantsObject(_))
        ));
        assert_eq!(ac.grants(), &before);
    }

    #[test]
    fn test_remove_resources() {
        let mut ac = sample();
        let resources = vec!["video".to_string()];
        ac.remove_resources(&resources, Some(["user"].as_slice())).unwrap();
        assert!(!ac.grants().role("user").unwrap().has_resource("video"));
        assert!(ac.grants().role("admin").unwrap().has_resource("video"));

        ac.remove_resources(&["video"], None::<&[String]>).unwrap();
        assert_eq!(ac.resources(), vec!["profile"]);

        assert_eq!(
            ac.remove_resources(&["profile"], Some(["root"].as_slice())),
            Err(AccessControlError::RoleNotFound("root".into()))
        );
        assert!(matches!(
            ac.remove_resources(&[] as &[&str], None::<&[&str]>),
            Err(AccessControlError::InvalidResourceList(_))
        ));
    }

    #[test]
    fn test_remove_roles_strips_extends() {
        let mut ac = sample();
        ac.remove_roles(&["editor"]).unwrap();

        assert!(!ac.has_role("editor"));
        assert!(ac.extended_roles_of("admin").unwrap().is_empty());
        assert_eq!(
            ac.remove_roles(&["editor"]),
            Err(AccessControlError::RoleNotFound("editor".into()))
        );
    }

    #[test]
    fn test_lock_blocks_every_mutation() {
        let mut ac = sample();
        ac.lock().unwrap();
        ac.lock().unwrap();
        assert!(ac.is_locked());

        assert_eq!(
            ac.commit(&AccessInfo::new("user", "video").with_action("read")),
            Err(AccessControlError::Locked("commit"))
        );
        assert!(matches!(ac.extend_role(&["user"], &["admin"]), Err(AccessControlError::Locked(_))));
        assert!(matches!(ac.pre_create_roles(&["guest"]), Err(AccessControlError::Locked(_))));
        assert!(matches!(ac.remove_roles(&["user"]), Err(AccessControlError::Locked(_))));
        assert!(matches!(ac.remove_resources(&["video"], None::<&[&str]>), Err(AccessControlError::Locked(_))));
        assert!(matches!(ac.reset(), Err(AccessControlError::Locked(_))));
        assert!(matches!(ac.set_grants(json!({})), Err(AccessControlError::Locked(_))));
        assert!(ac.can(&QueryInfo::new("admin", "video", "delete")).unwrap());
    }

    #[test]
    fn test_lock_empty() {
        let mut ac = AccessControl::new();
        assert_eq!(ac.lock(), Err(AccessControlError::EmptyOrInvalidGrants));
        assert!(!ac.is_locked());
    }

    #[test]
    fn test_to_value_round_trip() {
        let ac = sample();
        let exported = ac.to_value().unwrap();
        assert_eq!(exported["admin"]["$extend"], json!(["editor"]));

        let imported = AccessControl::from_value(exported).unwrap();
        assert_eq!(imported.grants(), ac.grants());
    }

    #[test]
    fn test_reset() {
        let mut ac = sample();
        ac.reset().unwrap();
        assert!(ac.grants().is_empty());
    }
}
