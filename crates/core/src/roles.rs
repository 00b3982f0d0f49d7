//! Well-known role name constants.
//!
//! Roles are flat strings on the user record; there is no role hierarchy
//! beyond the checks the RBAC extractors perform.

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_SUPPLIER: &str = "supplier";
pub const ROLE_AGENT: &str = "agent";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values, in registration-form order.
pub const VALID_ROLES: &[&str] = &[
    ROLE_CLIENT,
    ROLE_MANAGER,
    ROLE_SUPPLIER,
    ROLE_AGENT,
    ROLE_ADMIN,
];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_accepted() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = validate_role("superuser").unwrap_err();
        assert!(err.contains("superuser"));
        assert!(err.contains(ROLE_CLIENT));
    }
}
