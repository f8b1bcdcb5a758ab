#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
    System = 4,
    ApiUser = 5,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            4 => Some(Role::System),
            5 => Some(Role::ApiUser),
            _ => None,
        }
    }

    /// Roles allowed to mark attendance and run payroll for anyone.
    pub fn manages_payroll(self) -> bool {
        matches!(self, Role::Admin | Role::Hr | Role::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(Role::from_id(2), Some(Role::Hr));
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(6), None);
    }

    #[test]
    fn only_back_office_roles_manage_payroll() {
        assert!(Role::Admin.manages_payroll());
        assert!(Role::Hr.manages_payroll());
        assert!(Role::System.manages_payroll());
        assert!(!Role::Employee.manages_payroll());
        assert!(!Role::ApiUser.manages_payroll());
    }
}
