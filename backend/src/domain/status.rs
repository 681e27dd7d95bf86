//! Repair workflow status and priority enumerations.
//!
//! The wire strings are the Spanish long-form workflow names the repair
//! collection has always stored; Rust identifiers are English. Two parallel
//! vocabularies existed historically (an English short enum in older route
//! handlers) — this module is the single canonical set.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Repair lifecycle status.
///
/// The workflow is linear in intent (intake → review → diagnosis → work →
/// finished → pickup) but the engine only hard-enforces two rules: a repair
/// waiting for parts cannot jump straight to finished, and terminal states
/// accept no further transitions. Everything else is left to the humans
/// running the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RepairStatus {
    /// Device received at the front desk.
    #[serde(rename = "Ingresado")]
    Received,
    /// Initial inspection under way.
    #[serde(rename = "En Revisión")]
    UnderReview,
    /// Technician has identified the fault.
    #[serde(rename = "Equipo Diagnosticado")]
    Diagnosed,
    /// Quote sent; waiting for the customer to approve the work.
    #[serde(rename = "Esperando Aprobación del Cliente")]
    AwaitingCustomerApproval,
    /// Work blocked on a replacement part.
    #[serde(rename = "Esperando Repuesto")]
    AwaitingParts,
    /// Technician actively working on the device.
    #[serde(rename = "Reparación en Progreso")]
    InProgress,
    /// Work complete; warranty coverage starts here.
    #[serde(rename = "Reparación Finalizada")]
    Finished,
    /// Customer notified the device can be collected.
    #[serde(rename = "Equipo Listo para Retiro")]
    ReadyForPickup,
    /// Device handed back. Terminal.
    #[serde(rename = "Equipo Retirado")]
    PickedUp,
    /// Customer declined the repair. Terminal.
    #[serde(rename = "Reparación Cancelada por el Cliente")]
    CancelledByCustomer,
    /// Device cannot be repaired. Terminal.
    #[serde(rename = "Reparación Imposible de Realizar")]
    Unrepairable,
    /// Required parts are unobtainable. Terminal.
    #[serde(rename = "No Existen Repuestos Disponibles")]
    PartsUnavailable,
}

impl RepairStatus {
    /// Every status, in workflow order. Used for validation messages.
    pub const ALL: [Self; 12] = [
        Self::Received,
        Self::UnderReview,
        Self::Diagnosed,
        Self::AwaitingCustomerApproval,
        Self::AwaitingParts,
        Self::InProgress,
        Self::Finished,
        Self::ReadyForPickup,
        Self::PickedUp,
        Self::CancelledByCustomer,
        Self::Unrepairable,
        Self::PartsUnavailable,
    ];

    /// Wire/display form of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "Ingresado",
            Self::UnderReview => "En Revisión",
            Self::Diagnosed => "Equipo Diagnosticado",
            Self::AwaitingCustomerApproval => "Esperando Aprobación del Cliente",
            Self::AwaitingParts => "Esperando Repuesto",
            Self::InProgress => "Reparación en Progreso",
            Self::Finished => "Reparación Finalizada",
            Self::ReadyForPickup => "Equipo Listo para Retiro",
            Self::PickedUp => "Equipo Retirado",
            Self::CancelledByCustomer => "Reparación Cancelada por el Cliente",
            Self::Unrepairable => "Reparación Imposible de Realizar",
            Self::PartsUnavailable => "No Existen Repuestos Disponibles",
        }
    }

    /// Terminal states accept no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::PickedUp | Self::CancelledByCustomer | Self::Unrepairable | Self::PartsUnavailable
        )
    }

    /// Comma-separated list of every accepted wire string.
    #[must_use]
    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|status| status.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RepairStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// Error returned when parsing a status string outside the canonical set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown repair status: {0}")]
pub struct UnknownStatus(pub String);

/// Intake priority assigned by the front desk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    /// Regular queue.
    #[default]
    Normal,
    /// Ahead of the regular queue.
    #[serde(rename = "Alta")]
    High,
    /// Same-day attention.
    #[serde(rename = "Urgente")]
    Urgent,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 3] = [Self::Normal, Self::High, Self::Urgent];

    /// Wire/display form of the priority.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::High => "Alta",
            Self::Urgent => "Urgente",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| UnknownPriority(s.to_owned()))
    }
}

/// Error returned when parsing a priority string outside the canonical set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority: {0}")]
pub struct UnknownPriority(pub String);

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn all_statuses_round_trip_through_wire_strings() {
        for status in RepairStatus::ALL {
            let parsed: RepairStatus = status.as_str().parse().expect("round trip");
            assert_eq!(parsed, status);

            let json = serde_json::to_string(&status).expect("serialize");
            let back: RepairStatus = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("Pending".parse::<RepairStatus>().is_err());
        assert!("Pendiente / A revisar".parse::<RepairStatus>().is_err());
    }

    #[rstest]
    #[case(RepairStatus::PickedUp)]
    #[case(RepairStatus::CancelledByCustomer)]
    #[case(RepairStatus::Unrepairable)]
    #[case(RepairStatus::PartsUnavailable)]
    fn terminal_states(#[case] status: RepairStatus) {
        assert!(status.is_terminal());
    }

    #[test]
    fn workflow_states_are_not_terminal() {
        for status in [
            RepairStatus::Received,
            RepairStatus::UnderReview,
            RepairStatus::Diagnosed,
            RepairStatus::AwaitingCustomerApproval,
            RepairStatus::AwaitingParts,
            RepairStatus::InProgress,
            RepairStatus::Finished,
            RepairStatus::ReadyForPickup,
        ] {
            assert!(!status.is_terminal(), "{status} must accept transitions");
        }
    }

    #[test]
    fn allowed_values_lists_the_canonical_set() {
        let listed = RepairStatus::allowed_values();
        assert!(listed.starts_with("Ingresado, "));
        assert!(listed.ends_with("No Existen Repuestos Disponibles"));
    }

    #[test]
    fn priority_defaults_to_normal_and_round_trips() {
        assert_eq!(Priority::default(), Priority::Normal);
        for priority in Priority::ALL {
            let parsed: Priority = priority.as_str().parse().expect("round trip");
            assert_eq!(parsed, priority);
        }
        assert!("Medium".parse::<Priority>().is_err());
    }
}
