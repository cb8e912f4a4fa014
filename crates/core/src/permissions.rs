//! Role and permission checks for the signed-in admin

use chatrizz_domain::{AccessProfile, Permission, Role};

/// Answers access questions for an optional signed-in admin.
///
/// With no profile every check is `false`.
#[derive(Debug, Clone, Copy)]
pub struct Permissions<'a> {
    profile: Option<&'a AccessProfile>,
}

impl<'a> Permissions<'a> {
    #[must_use]
    pub fn new(profile: Option<&'a AccessProfile>) -> Self {
        Self { profile }
    }

    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.profile.is_some_and(|p| p.permissions.contains(&permission))
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.profile.is_some_and(|p| p.role == role)
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.profile.is_some_and(|p| roles.contains(&p.role))
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_any_role(&[Role::SuperAdmin, Role::Admin])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Role, permissions: Vec<Permission>) -> AccessProfile {
        AccessProfile { role, permissions }
    }

    #[test]
    fn anonymous_has_nothing() {
        let perms = Permissions::new(None);
        assert!(!perms.has_permission(Permission::ViewUsers));
        assert!(!perms.is_admin());
        assert!(!perms.has_any_role(&[Role::Viewer]));
    }

    #[test]
    fn super_admin_counts_as_admin() {
        let profile = profile(Role::SuperAdmin, vec![]);
        let perms = Permissions::new(Some(&profile));
        assert!(perms.is_super_admin());
        assert!(perms.is_admin());
    }

    #[test]
    fn moderator_is_not_admin_but_keeps_grants() {
        let profile = profile(Role::Moderator, vec![Permission::ModerateContent]);
        let perms = Permissions::new(Some(&profile));

        assert!(!perms.is_admin());
        assert!(perms.has_role(Role::Moderator));
        assert!(perms.has_permission(Permission::ModerateContent));
        assert!(!perms.has_permission(Permission::ManagePayments));
    }
}
