use crate::status::string_enum;

string_enum!(
    /// Capabilities a user can hold. `User` is implicit for every account.
    Role, "role" {
        User,
        Photographer,
        Retoucher,
        Admin,
    }
);

impl Role {
    /// Roles obtained through an application reviewed by an admin.
    pub fn is_applicable(self) -> bool {
        matches!(self, Role::Photographer | Role::Retoucher)
    }
}
