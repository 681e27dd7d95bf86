//! The timeline engine: every legal mutation of a repair goes through here.
//!
//! The service authorizes the actor, delegates state rules to the aggregate's
//! pure [`Repair::apply_transition`] command, recomputes derived fields, and
//! persists with an optimistic-concurrency token. Status-change notifications
//! are dispatched on a detached task: delivery is best-effort and never
//! blocks or fails the transition.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use super::error::Error;
use super::ports::{
    Clock, NotificationDispatcher, RepairFilter, RepairRepository, RepairStoreError,
    UserRepository, UserStoreError,
};
use super::repair::{Device, IntakeDetails, Repair, RepairCode, TransitionCommand};
use super::status::{Priority, RepairStatus};
use super::user::UserId;

/// Warranty lengths (days) drawn when a repair first finishes.
pub const WARRANTY_PERIODS_DAYS: [u32; 2] = [30, 60];

/// Validated intake request accepted by [`RepairService::create_repair`].
#[derive(Debug, Clone)]
pub struct NewRepair {
    /// Short description shown in listings.
    pub title: String,
    /// Queue priority.
    pub priority: Priority,
    /// Owning customer.
    pub customer: UserId,
    /// Staff account registering the intake.
    pub received_by: UserId,
    /// Device snapshot.
    pub device: Device,
    /// Promised completion date, if one was given.
    pub estimated_completion: Option<DateTime<Utc>>,
}

/// Validated status-change request accepted by
/// [`RepairService::transition_status`].
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// Target status.
    pub status: RepairStatus,
    /// Optional note for the timeline entry.
    pub note: Option<String>,
    /// Account performing the change.
    pub changed_by: UserId,
}

/// Listing row: the repair plus how long it has waited for a technician.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepairSummary {
    /// The repair itself.
    #[serde(flatten)]
    pub repair: Repair,
    /// Hours since intake while no technician is assigned; null otherwise.
    pub waiting_time_hours: Option<i64>,
}

/// The Timeline & Status Engine plus the access operations built on it.
pub struct RepairService {
    repairs: Arc<dyn RepairRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    warranty_rng: Mutex<SmallRng>,
}

impl RepairService {
    /// Wire the engine to its collaborators.
    #[must_use]
    pub fn new(
        repairs: Arc<dyn RepairRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repairs,
            users,
            notifier,
            clock,
            warranty_rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Register a device intake.
    ///
    /// Only reception, admin, or superadmin accounts may receive devices.
    /// The repair code is allocated from the current repair count and the
    /// customer-approval flag is derived from the reported flaw.
    pub async fn create_repair(&self, request: NewRepair) -> Result<Repair, Error> {
        if request.title.trim().is_empty() {
            return Err(Error::invalid_request("Title is required"));
        }
        request
            .device
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let receiver = self
            .users
            .find_by_id(&request.received_by)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("Receiving user not found"))?;
        if !receiver.role.may_register_intake() {
            return Err(Error::forbidden(
                "Only reception, admin, or superadmin users can register repairs",
            ));
        }

        self.users
            .find_by_id(&request.customer)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("Customer not found"))?;

        let existing = self.repairs.count().await.map_err(map_repair_store_error)?;
        let code = RepairCode::allocate(existing);

        let now = self.clock.now();
        let mut repair = Repair::intake(
            code,
            IntakeDetails {
                title: request.title,
                priority: request.priority,
                customer: request.customer,
                received_by: receiver.id,
                received_by_role: receiver.role,
                device: request.device,
                estimated_completion: request.estimated_completion,
            },
            now,
        );
        repair.recompute_derived_fields(now, || self.draw_warranty_period());

        self.repairs
            .insert(&repair)
            .await
            .map_err(map_repair_store_error)?;
        Ok(repair)
    }

    /// Apply a status change to a repair.
    ///
    /// See the module docs for the authorization and ordering rules. On
    /// success the new snapshot is persisted under a version-token check and
    /// notifications are dispatched on a detached task.
    pub async fn transition_status(
        &self,
        code: &RepairCode,
        change: StatusChange,
    ) -> Result<Repair, Error> {
        let repair = self.fetch(code).await?;

        let actor = self
            .users
            .find_by_id(&change.changed_by)
            .await
            .map_err(map_user_store_error)?
            .filter(|user| user.role.may_change_status())
            .ok_or_else(|| {
                Error::forbidden("You do not have permission to update this repair")
            })?;

        if change.status == RepairStatus::InProgress && !actor.role.may_start_repair() {
            return Err(Error::forbidden(format!(
                "Only technicians can set the status to '{}'",
                RepairStatus::InProgress
            )));
        }

        let now = self.clock.now();
        let mut next = repair
            .apply_transition(
                TransitionCommand {
                    status: change.status,
                    note: change.note,
                    changed_by: actor.id,
                    role: actor.role,
                },
                now,
            )
            .map_err(|err| Error::invalid_transition(err.to_string()))?;
        next.version = repair.version + 1;
        next.recompute_derived_fields(now, || self.draw_warranty_period());

        self.repairs
            .update(&next, repair.version)
            .await
            .map_err(map_repair_store_error)?;

        self.notify_status_change(&next);
        Ok(next)
    }

    /// List repairs matching the AND-combined filters, each annotated with
    /// its waiting time.
    pub async fn list_repairs(&self, filter: RepairFilter) -> Result<Vec<RepairSummary>, Error> {
        let now = self.clock.now();
        let repairs = self
            .repairs
            .list(&filter)
            .await
            .map_err(map_repair_store_error)?;
        Ok(repairs
            .into_iter()
            .map(|repair| {
                let waiting_time_hours = repair.waiting_time_hours(now);
                RepairSummary {
                    repair,
                    waiting_time_hours,
                }
            })
            .collect())
    }

    /// Fetch a single repair by code.
    pub async fn get_repair(&self, code: &RepairCode) -> Result<Repair, Error> {
        self.fetch(code).await
    }

    /// Repairs owned by the given customer.
    pub async fn repairs_for_customer(&self, customer: UserId) -> Result<Vec<Repair>, Error> {
        let filter = RepairFilter {
            customer: Some(customer),
            ..RepairFilter::default()
        };
        let repairs = self
            .repairs
            .list(&filter)
            .await
            .map_err(map_repair_store_error)?;
        if repairs.is_empty() {
            return Err(Error::not_found("No repairs found for this user"));
        }
        Ok(repairs)
    }

    /// Bulk hard delete by code. Returns the number actually removed.
    pub async fn delete_repairs(&self, codes: &[RepairCode]) -> Result<u64, Error> {
        if codes.is_empty() {
            return Err(Error::invalid_request("Invalid repairCodes provided"));
        }
        let deleted = self
            .repairs
            .delete_by_codes(codes)
            .await
            .map_err(map_repair_store_error)?;
        if deleted == 0 {
            return Err(Error::not_found(
                "No repairs found with the provided repairCodes",
            ));
        }
        Ok(deleted)
    }

    async fn fetch(&self, code: &RepairCode) -> Result<Repair, Error> {
        self.repairs
            .find_by_code(code)
            .await
            .map_err(map_repair_store_error)?
            .ok_or_else(|| Error::not_found("Repair not found"))
    }

    fn draw_warranty_period(&self) -> u32 {
        let mut rng = self
            .warranty_rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if rng.gen_bool(0.5) {
            WARRANTY_PERIODS_DAYS[0]
        } else {
            WARRANTY_PERIODS_DAYS[1]
        }
    }

    /// Dispatch status-change notifications on a detached task.
    fn notify_status_change(&self, repair: &Repair) {
        let users = Arc::clone(&self.users);
        let notifier = Arc::clone(&self.notifier);
        let code = repair.repair_code.clone();
        let status = repair.status;
        let customer = repair.customer;
        let technician = repair.technician;

        tokio::spawn(async move {
            let message =
                format!("El estado de tu reparación ({code}) ha cambiado a \"{status}\".");
            notify_account(users.as_ref(), notifier.as_ref(), customer, &message).await;

            if let Some(technician) = technician {
                let message =
                    format!("El estado de la reparación ({code}) ha cambiado a \"{status}\".");
                notify_account(users.as_ref(), notifier.as_ref(), technician, &message).await;
            }
        });
    }
}

async fn notify_account(
    users: &dyn UserRepository,
    notifier: &dyn NotificationDispatcher,
    id: UserId,
    message: &str,
) {
    match users.find_by_id(&id).await {
        Ok(Some(user)) => {
            if let Err(error) = notifier.send(&user, message).await {
                warn!(%error, user = %id, "status notification dispatch failed");
            }
        }
        Ok(None) => warn!(user = %id, "status notification skipped: account missing"),
        Err(error) => warn!(%error, user = %id, "status notification skipped: user lookup failed"),
    }
}

pub(crate) fn map_repair_store_error(err: RepairStoreError) -> Error {
    match err {
        RepairStoreError::Connection { message } => {
            Error::internal(format!("repair store unavailable: {message}"))
        }
        RepairStoreError::Query { message } => {
            Error::internal(format!("repair store error: {message}"))
        }
        RepairStoreError::DuplicateCode { code } => {
            Error::conflict(format!("Repair code {code} already exists"))
        }
        RepairStoreError::DuplicateSerial { serial } => Error::conflict(format!(
            "A repair for device serial {serial} is already registered"
        )),
        RepairStoreError::VersionConflict { code } => Error::conflict(format!(
            "Repair {code} was modified concurrently; retry with a fresh copy"
        )),
        RepairStoreError::Missing { .. } => Error::not_found("Repair not found"),
    }
}

pub(crate) fn map_user_store_error(err: UserStoreError) -> Error {
    match err {
        UserStoreError::Connection { message } => {
            Error::internal(format!("user store unavailable: {message}"))
        }
        UserStoreError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserStoreError::DuplicateEmail { email } => {
            Error::conflict(format!("Email {email} already registered"))
        }
        UserStoreError::Missing { .. } => Error::not_found("User not found"),
    }
}
