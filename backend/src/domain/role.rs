//! Account roles and the permissions the repair workflow grants them.
//!
//! Roles are a closed enumeration; call sites must never compare raw strings.
//! The wire representation uses the lowercase names the account store has
//! always persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role, ordered roughly by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative control, including other admins.
    Superadmin,
    /// Shop administration: intake, status changes, user management.
    Admin,
    /// Performs repairs; the only role allowed to start active work.
    Technician,
    /// Front desk: device intake and customer registration.
    Reception,
    /// Customer account. Default for new sign-ups.
    User,
}

impl Role {
    /// Wire/display form of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Admin => "admin",
            Self::Technician => "technician",
            Self::Reception => "reception",
            Self::User => "user",
        }
    }

    /// Whether this role may register a device intake (create repairs).
    #[must_use]
    pub fn may_register_intake(self) -> bool {
        matches!(self, Self::Reception | Self::Admin | Self::Superadmin)
    }

    /// Whether this role may change a repair's status at all.
    #[must_use]
    pub fn may_change_status(self) -> bool {
        matches!(self, Self::Technician | Self::Admin | Self::Superadmin)
    }

    /// Whether this role may move a repair into active work.
    ///
    /// Only technicians may start a repair; admins supervise but do not
    /// perform the work themselves.
    #[must_use]
    pub fn may_start_repair(self) -> bool {
        matches!(self, Self::Technician)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Self::Superadmin),
            "admin" => Ok(Self::Admin),
            "technician" => Ok(Self::Technician),
            "reception" => Ok(Self::Reception),
            "user" => Ok(Self::User),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Error returned when parsing an unrecognized role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Role::Reception, true)]
    #[case(Role::Admin, true)]
    #[case(Role::Superadmin, true)]
    #[case(Role::Technician, false)]
    #[case(Role::User, false)]
    fn intake_is_front_desk_and_admins(#[case] role: Role, #[case] allowed: bool) {
        assert_eq!(role.may_register_intake(), allowed);
    }

    #[rstest]
    #[case(Role::Technician, true)]
    #[case(Role::Admin, true)]
    #[case(Role::Superadmin, true)]
    #[case(Role::Reception, false)]
    #[case(Role::User, false)]
    fn status_changes_exclude_front_desk_and_customers(#[case] role: Role, #[case] allowed: bool) {
        assert_eq!(role.may_change_status(), allowed);
    }

    #[test]
    fn only_technicians_start_repairs() {
        assert!(Role::Technician.may_start_repair());
        assert!(!Role::Admin.may_start_repair());
        assert!(!Role::Superadmin.may_start_repair());
    }

    #[test]
    fn wire_form_round_trips() {
        for role in [
            Role::Superadmin,
            Role::Admin,
            Role::Technician,
            Role::Reception,
            Role::User,
        ] {
            let parsed: Role = role.as_str().parse().expect("round trip");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Role::Technician).expect("serialize");
        assert_eq!(json, "\"technician\"");
    }
}
