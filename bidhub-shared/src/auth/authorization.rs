/// Authorization: the role capability table and permission checks
///
/// All role-based gating in BidHub flows through this one table. Handlers
/// never compare role strings; they ask for a [`Capability`] and get a
/// yes/no. Unrecognized roles (a role string that fails to parse) map to
/// the empty capability set, so the system denies by default.
///
/// # Capability table
///
/// | role | dashboard | messaging | accounts | manage global admins | delete | create auction |
/// |---|---|---|---|---|---|---|
/// | product_owner | yes | yes | yes | yes | yes | yes |
/// | global_admin | yes | yes | yes | no | no | yes |
/// | internal_user | no | no | no | no | no | yes |
/// | external_guest | no | no | no | no | no | no |
///
/// # Example
///
/// ```
/// use bidhub_shared::auth::authorization::{Capabilities, Capability};
/// use bidhub_shared::models::admin::AdminRole;
///
/// let caps = Capabilities::for_role(AdminRole::GlobalAdmin);
/// assert!(caps.allows(Capability::MessagingCenter));
/// assert!(!caps.allows(Capability::Delete));
/// ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::admin::AdminRole;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Principal authenticated as a vendor on an admin-only surface
    #[error("Admin authentication required")]
    NotAdmin,

    /// Principal's role lacks the required capability
    #[error("Missing required capability: {0}")]
    MissingCapability(Capability),

    /// Vendor token is bound to a different auction
    #[error("Not invited to this auction")]
    WrongAuction,

    /// Admin token presented on a vendor-only surface
    #[error("Vendor authentication required")]
    NotVendor,
}

/// Named capabilities, one per column of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Global management dashboard across all auctions
    ManagementDashboard,

    /// Internal messaging center
    MessagingCenter,

    /// Account listing and creation
    Accounts,

    /// Creating/promoting global admin accounts
    ManageGlobalAdmins,

    /// Deleting accounts (the only delete the portal retains)
    Delete,

    /// Creating auctions
    CreateAuction,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::ManagementDashboard => "management_dashboard",
            Capability::MessagingCenter => "messaging_center",
            Capability::Accounts => "accounts",
            Capability::ManageGlobalAdmins => "manage_global_admins",
            Capability::Delete => "delete",
            Capability::CreateAuction => "create_auction",
        };
        f.write_str(name)
    }
}

/// Capability set for a role
///
/// Deterministic lookup, no side effects. `Default` is the empty set
/// (deny everything), used for unrecognized roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_access_management_dashboard: bool,
    pub can_use_messaging_center: bool,
    pub can_access_accounts: bool,
    pub can_manage_global_admins: bool,
    pub can_delete: bool,
    pub can_create_auction: bool,
}

impl Capabilities {
    /// Looks up the capability set for a role
    pub fn for_role(role: AdminRole) -> Self {
        match role {
            AdminRole::ProductOwner => Self {
                can_access_management_dashboard: true,
                can_use_messaging_center: true,
                can_access_accounts: true,
                can_manage_global_admins: true,
                can_delete: true,
                can_create_auction: true,
            },
            AdminRole::GlobalAdmin => Self {
                can_access_management_dashboard: true,
                can_use_messaging_center: true,
                can_access_accounts: true,
                can_manage_global_admins: false,
                can_delete: false,
                can_create_auction: true,
            },
            AdminRole::InternalUser => Self {
                can_create_auction: true,
                ..Self::default()
            },
            AdminRole::ExternalGuest => Self::default(),
        }
    }

    /// Looks up capabilities for an optional role, denying when absent
    ///
    /// This is the entry point for role strings from outside the type
    /// system: `AdminRole::parse` yields None for junk, and None yields
    /// the empty set.
    pub fn for_parsed_role(role: Option<AdminRole>) -> Self {
        role.map(Self::for_role).unwrap_or_default()
    }

    /// Checks a single capability
    pub fn allows(&self, cap: Capability) -> bool {
        match cap {
            Capability::ManagementDashboard => self.can_access_management_dashboard,
            Capability::MessagingCenter => self.can_use_messaging_center,
            Capability::Accounts => self.can_access_accounts,
            Capability::ManageGlobalAdmins => self.can_manage_global_admins,
            Capability::Delete => self.can_delete,
            Capability::CreateAuction => self.can_create_auction,
        }
    }
}

/// Requires that the principal is an internal account
pub fn require_admin(auth: &AuthContext) -> Result<(), AuthzError> {
    if !auth.is_admin() {
        return Err(AuthzError::NotAdmin);
    }
    Ok(())
}

/// Requires that the principal's role grants a capability
///
/// Implies [`require_admin`]: vendor tokens carry ExternalGuest, whose
/// capability set is empty, but the admin check runs first so the error
/// distinguishes "wrong surface" from "insufficient role".
pub fn require_capability(auth: &AuthContext, cap: Capability) -> Result<(), AuthzError> {
    require_admin(auth)?;

    if !Capabilities::for_role(auth.role).allows(cap) {
        return Err(AuthzError::MissingCapability(cap));
    }

    Ok(())
}

/// Requires a vendor token bound to the given auction
pub fn require_vendor(auth: &AuthContext, auction_id: Uuid) -> Result<(), AuthzError> {
    if auth.is_admin() {
        return Err(AuthzError::NotVendor);
    }

    if auth.auction_id != Some(auction_id) {
        return Err(AuthzError::WrongAuction);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{Claims, TokenType};

    fn admin_ctx(role: AdminRole) -> AuthContext {
        let claims = Claims::admin(Uuid::new_v4(), "a@example.com", role, TokenType::Access);
        AuthContext::from_claims(&claims)
    }

    fn vendor_ctx(auction_id: Uuid) -> AuthContext {
        let claims = Claims::vendor(Uuid::new_v4(), "v@example.com", auction_id);
        AuthContext::from_claims(&claims)
    }

    #[test]
    fn test_capability_table() {
        let owner = Capabilities::for_role(AdminRole::ProductOwner);
        assert!(owner.can_access_management_dashboard);
        assert!(owner.can_use_messaging_center);
        assert!(owner.can_access_accounts);
        assert!(owner.can_manage_global_admins);
        assert!(owner.can_delete);
        assert!(owner.can_create_auction);

        let global = Capabilities::for_role(AdminRole::GlobalAdmin);
        assert!(global.can_access_management_dashboard);
        assert!(global.can_use_messaging_center);
        assert!(global.can_access_accounts);
        assert!(!global.can_manage_global_admins);
        assert!(!global.can_delete);
        assert!(global.can_create_auction);

        let internal = Capabilities::for_role(AdminRole::InternalUser);
        assert!(!internal.can_access_management_dashboard);
        assert!(!internal.can_use_messaging_center);
        assert!(!internal.can_access_accounts);
        assert!(!internal.can_manage_global_admins);
        assert!(!internal.can_delete);
        assert!(internal.can_create_auction);

        let guest = Capabilities::for_role(AdminRole::ExternalGuest);
        assert_eq!(guest, Capabilities::default());
    }

    #[test]
    fn test_unrecognized_role_denies_everything() {
        let caps = Capabilities::for_parsed_role(AdminRole::parse("superuser"));
        assert_eq!(caps, Capabilities::default());
        assert!(!caps.allows(Capability::CreateAuction));
    }

    #[test]
    fn test_lookup_is_total_and_deterministic() {
        for role in [
            AdminRole::ProductOwner,
            AdminRole::GlobalAdmin,
            AdminRole::InternalUser,
            AdminRole::ExternalGuest,
        ] {
            assert_eq!(Capabilities::for_role(role), Capabilities::for_role(role));
        }
    }

    #[test]
    fn test_require_capability() {
        let owner = admin_ctx(AdminRole::ProductOwner);
        assert!(require_capability(&owner, Capability::Delete).is_ok());

        let global = admin_ctx(AdminRole::GlobalAdmin);
        assert!(matches!(
            require_capability(&global, Capability::Delete),
            Err(AuthzError::MissingCapability(Capability::Delete))
        ));

        let vendor = vendor_ctx(Uuid::new_v4());
        assert!(matches!(
            require_capability(&vendor, Capability::Accounts),
            Err(AuthzError::NotAdmin)
        ));
    }

    #[test]
    fn test_require_vendor_binding() {
        let auction_id = Uuid::new_v4();

        let vendor = vendor_ctx(auction_id);
        assert!(require_vendor(&vendor, auction_id).is_ok());
        assert!(matches!(
            require_vendor(&vendor, Uuid::new_v4()),
            Err(AuthzError::WrongAuction)
        ));

        let admin = admin_ctx(AdminRole::ProductOwner);
        assert!(matches!(
            require_vendor(&admin, auction_id),
            Err(AuthzError::NotVendor)
        ));
    }
}
