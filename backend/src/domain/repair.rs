//! Repair aggregate: the ticket, its immutable timeline, and the fields
//! derived from it.
//!
//! The timeline is the source of truth. `status` always mirrors the most
//! recently appended entry, and the derived fields (processing time,
//! warranty) are recomputed from the timeline on every persist via
//! [`Repair::recompute_derived_fields`]. Mutations go through
//! [`Repair::apply_transition`], an explicit snapshot-in/snapshot-out
//! command, so the write path can attach an optimistic-concurrency check.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;
use super::status::{Priority, RepairStatus};
use super::user::UserId;

/// Repair codes start above this base; the first repair is `TASK-1001`.
pub const REPAIR_CODE_BASE: u64 = 1000;

/// Flaw descriptions that gate the work on explicit customer approval.
///
/// Matched against the trimmed, lower-cased flaw text.
pub const APPROVAL_GATED_FLAWS: [&str; 2] = ["diagnosticar por el tecnico", "no enciende"];

static REPAIR_CODE_RE: OnceLock<Regex> = OnceLock::new();
static SERIAL_NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn repair_code_regex() -> &'static Regex {
    REPAIR_CODE_RE.get_or_init(|| {
        Regex::new(r"^TASK-\d{4,}$")
            .unwrap_or_else(|error| panic!("repair code regex failed to compile: {error}"))
    })
}

fn serial_number_regex() -> &'static Regex {
    SERIAL_NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9]{10,}$")
            .unwrap_or_else(|error| panic!("serial number regex failed to compile: {error}"))
    })
}

/// Unique repair ticket code of the form `TASK-<n>`, n >= 1000.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepairCode(String);

/// Validation error for repair code strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("repair code must match TASK-XXXX: {0}")]
pub struct InvalidRepairCode(pub String);

impl RepairCode {
    /// Validate and construct a [`RepairCode`] from its wire form.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidRepairCode> {
        let value = value.into();
        if !repair_code_regex().is_match(&value) {
            return Err(InvalidRepairCode(value));
        }
        Ok(Self(value))
    }

    /// Allocate the next code given the number of repairs already stored.
    ///
    /// Codes are monotonically assigned by creation count and never reused
    /// after deletion.
    #[must_use]
    pub fn allocate(existing_repairs: u64) -> Self {
        Self(format!("TASK-{}", REPAIR_CODE_BASE + existing_repairs + 1))
    }

    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepairCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RepairCode> for String {
    fn from(value: RepairCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for RepairCode {
    type Error = InvalidRepairCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::str::FromStr for RepairCode {
    type Err = InvalidRepairCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Device snapshot captured at intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device category ("Celular", "Notebook", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Manufacturer, or "Sin especificar".
    pub brand: String,
    /// Model name; optional only when the brand is unspecified.
    #[serde(default)]
    pub model: String,
    /// Manufacturer serial, alphanumeric and at least ten characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Cosmetic state observed at the front desk.
    pub physical_condition: String,
    /// Customer-reported defect description.
    pub flaw: String,
    /// Unlock credential left by the customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_or_pattern: Option<String>,
    /// Free-form intake notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Validation errors for the device snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceValidationError {
    /// A required text field was blank.
    #[error("device {field} is required")]
    MissingField {
        /// Name of the blank field.
        field: &'static str,
    },
    /// Model omitted for a specified brand.
    #[error("device model is required when the brand is specified")]
    MissingModel,
    /// Serial present but not alphanumeric of length >= 10.
    #[error("device serial number must be alphanumeric with at least 10 characters")]
    InvalidSerialNumber,
}

/// Brand sentinel meaning "the customer could not name the brand".
pub const UNSPECIFIED_BRAND: &str = "Sin especificar";

impl Device {
    /// Check the intake invariants of the snapshot.
    pub fn validate(&self) -> Result<(), DeviceValidationError> {
        for (field, value) in [
            ("type", &self.kind),
            ("brand", &self.brand),
            ("physicalCondition", &self.physical_condition),
            ("flaw", &self.flaw),
        ] {
            if value.trim().is_empty() {
                return Err(DeviceValidationError::MissingField { field });
            }
        }
        if self.brand != UNSPECIFIED_BRAND && self.model.trim().is_empty() {
            return Err(DeviceValidationError::MissingModel);
        }
        if let Some(serial) = &self.serial_number {
            if !serial_number_regex().is_match(serial) {
                return Err(DeviceValidationError::InvalidSerialNumber);
            }
        }
        Ok(())
    }
}

/// One immutable audit record of a status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Status entered by this change.
    pub status: RepairStatus,
    /// Status the repair held before this change; absent on the seed entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<RepairStatus>,
    /// Moment the change was recorded.
    pub timestamp: DateTime<Utc>,
    /// Free-form note attached by the actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Account that performed the change.
    #[schema(value_type = String)]
    pub changed_by: UserId,
    /// Role the actor held at the time of the change.
    pub role_at_change: Role,
}

/// File attached to the repair (photos, receipts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Storage location of the file.
    pub url: String,
    /// Caption supplied by the uploader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// Transport used for a customer notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMethod {
    /// Email dispatch.
    Email,
    /// SMS dispatch.
    Sms,
    /// WhatsApp dispatch.
    Whatsapp,
}

/// Record of a message sent to the customer about this repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerNotification {
    /// Message body as sent.
    pub message: String,
    /// Dispatch timestamp.
    pub sent_at: DateTime<Utc>,
    /// Transport the message went out on.
    pub method: NotificationMethod,
}

/// Replacement part consumed by the repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsedPart {
    /// Part description.
    pub part_name: String,
    /// Cost charged for the part.
    pub part_cost: f64,
    /// Supplier the part came from.
    pub part_supplier: String,
}

/// Explicit status-change command applied to a repair snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionCommand {
    /// Target status.
    pub status: RepairStatus,
    /// Optional note recorded on the timeline entry.
    pub note: Option<String>,
    /// Account performing the change.
    pub changed_by: UserId,
    /// Role that account holds right now.
    pub role: Role,
}

/// Status-ordering violations raised by [`Repair::apply_transition`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// A repair waiting on parts must pass through active work first.
    #[error("cannot finish a repair straight from '{}'; it must pass through '{}'",
        RepairStatus::AwaitingParts, RepairStatus::InProgress)]
    FinishWhileAwaitingParts,
    /// The repair already reached a terminal state.
    #[error("repair is closed with terminal status '{0}'")]
    AlreadyTerminal(RepairStatus),
}

/// Details captured by the front desk when registering an intake.
#[derive(Debug, Clone)]
pub struct IntakeDetails {
    /// Short description shown in listings.
    pub title: String,
    /// Queue priority.
    pub priority: Priority,
    /// Owning customer.
    pub customer: UserId,
    /// Staff account that received the device.
    pub received_by: UserId,
    /// Role that staff account holds.
    pub received_by_role: Role,
    /// Device snapshot.
    pub device: Device,
    /// Promised completion date, if one was given.
    pub estimated_completion: Option<DateTime<Utc>>,
}

/// Normalize a flaw description for comparison: trimmed and lower-cased.
#[must_use]
pub fn normalize_flaw(flaw: &str) -> String {
    flaw.trim().to_lowercase()
}

/// Whether the reported flaw requires explicit customer approval before work.
#[must_use]
pub fn requires_customer_approval(flaw: &str) -> bool {
    let normalized = normalize_flaw(flaw);
    APPROVAL_GATED_FLAWS
        .iter()
        .any(|gated| *gated == normalized)
}

/// Repair ticket aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Repair {
    /// Unique ticket code (`TASK-<n>`).
    #[schema(value_type = String, example = "TASK-1001")]
    pub repair_code: RepairCode,
    /// Short description shown in listings.
    pub title: String,
    /// Current status; always equals the last timeline entry's status.
    pub status: RepairStatus,
    /// Queue priority.
    pub priority: Priority,
    /// Whether work is gated on explicit customer approval.
    pub requires_customer_approval: bool,
    /// Owning customer.
    #[schema(value_type = String)]
    pub customer: UserId,
    /// Assigned technician; unset until triage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub technician: Option<UserId>,
    /// Staff account that received the device.
    #[schema(value_type = String)]
    pub received_by: UserId,
    /// Account that verified the completed repair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub repair_verified_by: Option<UserId>,
    /// Promised completion date, if one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<DateTime<Utc>>,
    /// Device snapshot captured at intake.
    pub device: Device,
    /// Whether warranty coverage is currently active.
    pub warranty: bool,
    /// Warranty length in days; assigned when the repair first finishes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_period: Option<u32>,
    /// Warranty expiry; assigned when the repair finishes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_expires_at: Option<DateTime<Utc>>,
    /// Append-only audit trail of status changes.
    pub timeline: Vec<TimelineEntry>,
    /// Files attached to the repair.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Messages sent to the customer about this repair.
    #[serde(default)]
    pub customer_notifications: Vec<CustomerNotification>,
    /// Replacement parts consumed.
    #[serde(default)]
    pub used_parts: Vec<UsedPart>,
    /// Total charged for the repair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    /// Notes visible to the technician.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician_notes: Option<String>,
    /// Notes internal to the shop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_notes: Option<String>,
    /// Whole hours between the first and last timeline entries, floored at 1.
    pub total_processing_time_hours: i64,
    /// Intake timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last change; follows the newest timeline entry.
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency token, incremented on every persist.
    pub version: u64,
}

impl Repair {
    /// Register a new intake, seeding the timeline with one
    /// [`RepairStatus::Received`] entry attributed to the receiving account.
    #[must_use]
    pub fn intake(code: RepairCode, details: IntakeDetails, now: DateTime<Utc>) -> Self {
        let IntakeDetails {
            title,
            priority,
            customer,
            received_by,
            received_by_role,
            device,
            estimated_completion,
        } = details;

        let seed = TimelineEntry {
            status: RepairStatus::Received,
            previous_status: None,
            timestamp: now,
            note: Some("Equipo ingresado".to_owned()),
            changed_by: received_by,
            role_at_change: received_by_role,
        };

        let requires_customer_approval = requires_customer_approval(&device.flaw);

        Self {
            repair_code: code,
            title,
            status: RepairStatus::Received,
            priority,
            requires_customer_approval,
            customer,
            technician: None,
            received_by,
            repair_verified_by: None,
            estimated_completion,
            device,
            warranty: false,
            warranty_period: None,
            warranty_expires_at: None,
            timeline: vec![seed],
            attachments: Vec::new(),
            customer_notifications: Vec::new(),
            used_parts: Vec::new(),
            total_cost: None,
            technician_notes: None,
            internal_notes: None,
            total_processing_time_hours: 1,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// The most recently appended timeline entry.
    ///
    /// The timeline is seeded at intake and append-only, so it is never
    /// empty.
    #[must_use]
    pub fn last_timeline_entry(&self) -> &TimelineEntry {
        self.timeline
            .last()
            .unwrap_or_else(|| panic!("repair {} has an empty timeline", self.repair_code))
    }

    /// Apply an explicit status-change command, producing the next snapshot.
    ///
    /// Enforces the two hard ordering rules (no finish straight from
    /// awaiting-parts, no transitions out of terminal states) and appends the
    /// audit entry. Authorization is the engine's concern, not the
    /// aggregate's. The caller is responsible for recomputing derived fields
    /// before persisting.
    pub fn apply_transition(
        &self,
        command: TransitionCommand,
        now: DateTime<Utc>,
    ) -> Result<Self, TransitionError> {
        let last_status = self.last_timeline_entry().status;
        if last_status.is_terminal() {
            return Err(TransitionError::AlreadyTerminal(last_status));
        }
        if last_status == RepairStatus::AwaitingParts && command.status == RepairStatus::Finished {
            return Err(TransitionError::FinishWhileAwaitingParts);
        }

        let mut next = self.clone();
        next.timeline.push(TimelineEntry {
            status: command.status,
            previous_status: Some(self.status),
            timestamp: now,
            note: command.note,
            changed_by: command.changed_by,
            role_at_change: command.role,
        });
        next.status = command.status;
        Ok(next)
    }

    /// Recompute the fields derived from the timeline. Invoked by the write
    /// path on every persist.
    ///
    /// `draw_warranty_period` supplies the warranty length (in days) used
    /// when the repair reaches [`RepairStatus::Finished`] without one
    /// assigned; production draws 30 or 60 pseudo-randomly.
    ///
    /// Leaving the finished state deactivates the warranty flag but keeps
    /// the period and expiry values as a record of the earlier coverage.
    pub fn recompute_derived_fields(
        &mut self,
        now: DateTime<Utc>,
        draw_warranty_period: impl FnOnce() -> u32,
    ) {
        if self.timeline.len() > 1 {
            let first = self.timeline[0].timestamp;
            let last = self.last_timeline_entry().timestamp;
            self.total_processing_time_hours = rounded_hours_between(first, last).max(1);
            self.updated_at = last;
        } else {
            self.total_processing_time_hours = self.total_processing_time_hours.max(1);
        }

        if self.status == RepairStatus::Finished {
            let period = match self.warranty_period {
                Some(period) => period,
                None => {
                    let drawn = draw_warranty_period();
                    self.warranty_period = Some(drawn);
                    drawn
                }
            };
            self.warranty_expires_at = Some(now + Duration::days(i64::from(period)));
            self.warranty = true;
        } else {
            self.warranty = false;
        }
    }

    /// Hours the intake has waited without an assigned technician.
    ///
    /// `None` once a technician is assigned.
    #[must_use]
    pub fn waiting_time_hours(&self, now: DateTime<Utc>) -> Option<i64> {
        if self.technician.is_some() {
            return None;
        }
        Some((now - self.created_at).num_hours().max(0))
    }
}

/// Whole hours between two instants, rounding half-hours up.
fn rounded_hours_between(first: DateTime<Utc>, last: DateTime<Utc>) -> i64 {
    let minutes = (last - first).num_minutes();
    (minutes + 30).div_euclid(60)
}
