//! API-side authorization guard for exports.

use preset_export_auth::{AuthzError, Permission, Principal, Role, RoleGrants, authorize};

use crate::context::PrincipalContext;

/// Check that the request principal may download preset exports.
pub fn authorize_export(principal: &PrincipalContext) -> Result<(), AuthzError> {
    let principal = Principal {
        principal_id: principal.principal_id(),
        grants: RoleGrants {
            roles: principal.roles().to_vec(),
            permissions: permissions_from_roles(principal.roles()),
        },
    };
    authorize(&principal, &Permission::export_presets())
}

/// Static role→permission mapping.
///
/// `admin` grants everything; store managers may export presets.
fn permissions_from_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(|r| r.as_str() == "admin") {
        return vec![Permission::wildcard()];
    }

    roles
        .iter()
        .filter(|r| r.as_str() == "shop_manager")
        .map(|_| Permission::export_presets())
        .take(1)
        .collect()
}
