//! Rule committer
//!
//! Writes normalized statements into the grants model. Every write is
//! preceded by full validation, so a rejected statement never leaves a
//! partial entry behind.

use tracing::debug;

use crate::access::{AccessInfo, Grant};
use crate::error::Result;
use crate::grants::Grants;
use crate::settings::AccessControlSettings;
use crate::validation::validate_name;

/// Normalize a statement and write it.
///
/// # Returns
///
/// The grant that was written
pub(crate) fn commit(grants: &mut Grants, info: &AccessInfo, settings: &AccessControlSettings) -> Result<Grant> {
    let grant = Grant::from_access_info(info, settings)?;
    apply_grant(grants, &grant);
    Ok(grant)
}

/// Validate a pre-normalized grant and write it.
pub(crate) fn commit_grant(grants: &mut Grants, grant: &Grant) -> Result<()> {
    grant.validate()?;
    apply_grant(grants, grant);
    Ok(())
}

/// Write a validated grant: for every role and resource, the rule under the
/// grant's key is replaced. Missing role and resource entries are created.
pub(crate) fn apply_grant(grants: &mut Grants, grant: &Grant) {
    let key = grant.key();
    for role in &grant.roles {
        let entry = grants.role_entry(role);
        for resource in &grant.resources {
            entry.resource_entry(resource).set(key, grant.attributes.clone());
        }
    }

    debug!(
        roles = ?grant.roles,
        resources = ?grant.resources,
        action = %key,
        attributes = ?grant.attributes,
        "Committed grant"
    );
}

/// Make sure every role exists, creating empty entries for missing ones.
pub(crate) fn pre_create_roles<S: AsRef<str>>(grants: &mut Grants, roles: &[S]) -> Result<()> {
    roles.iter().try_for_each(|role| validate_name(role.as_ref()))?;

    for role in roles {
        if !grants.contains_role(role.as_ref()) {
            grants.role_entry(role.as_ref());
            debug!(role = role.as_ref(), "Created role");
        }
    }
    Ok(())
}
