//! Query evaluator
//!
//! Answers a normalized query by resolving the role hierarchy and combining
//! the attribute lists of every resolved role with a glob-aware union.

use tracing::debug;

use crate::access::Query;
use crate::error::Result;
use crate::grants::Grants;
use crate::hierarchy::flatten_roles;

/// Attributes granted to the query's roles.
///
/// A role without an entry for the resource, or without a rule for the
/// queried key, contributes nothing. An `own` query falls back to the `any`
/// rule of a role that has no `own` rule. The result is empty when nothing
/// is granted.
///
/// # Errors
///
/// `RoleNotFound` and the inheritance errors of
/// [`flatten_roles`](crate::hierarchy::flatten_roles).
pub(crate) fn evaluate(grants: &Grants, query: &Query, memoize: bool) -> Result<Vec<String>> {
    let roles = flatten_roles(grants, &query.roles, memoize)?;

    let mut granted: Option<Vec<String>> = None;
    for role in &roles {
        let attributes = grants
            .role(role)
            .and_then(|entry| entry.resource(&query.resource))
            .and_then(|resource| resource.attributes_for(query.key))
            .unwrap_or_default();
        if attributes.is_empty() {
            continue;
        }

        granted = Some(match granted {
            None => attributes.to_vec(),
            Some(acc) => acl_glob::union(&acc, attributes),
        });
    }

    let granted = granted.unwrap_or_default();
    debug!(
        roles = ?roles,
        resource = %query.resource,
        action = %query.key,
        attributes = ?granted,
        "Evaluated query"
    );
    Ok(granted)
}
