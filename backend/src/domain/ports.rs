//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the engine expects to interact with driven adapters
//! (document store, notification transport, PDF renderer, wall clock). Each
//! trait exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::repair::{Repair, RepairCode};
use super::status::{Priority, RepairStatus};
use super::ticket::TicketDocument;
use super::user::{Email, User, UserId};

/// Errors surfaced by the repair persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepairStoreError {
    /// Store connectivity failure.
    #[error("repair store connection failed: {message}")]
    Connection {
        /// Adapter-reported cause.
        message: String,
    },
    /// Query or write failure inside the store.
    #[error("repair store query failed: {message}")]
    Query {
        /// Adapter-reported cause.
        message: String,
    },
    /// Another repair already holds this code.
    #[error("repair code {code} already exists")]
    DuplicateCode {
        /// Offending code.
        code: String,
    },
    /// Another repair already holds this device serial number.
    #[error("device serial number {serial} already registered")]
    DuplicateSerial {
        /// Offending serial.
        serial: String,
    },
    /// The version token did not match the stored document.
    #[error("repair {code} was modified concurrently")]
    VersionConflict {
        /// Code of the contended repair.
        code: String,
    },
    /// The targeted repair does not exist.
    #[error("repair {code} not found")]
    Missing {
        /// Code that matched nothing.
        code: String,
    },
}

impl RepairStoreError {
    /// Helper for connection-level adapter failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query/write failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// AND-combined listing filters; a missing field leaves that axis
/// unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairFilter {
    /// Match a single status.
    pub status: Option<RepairStatus>,
    /// Match a single priority.
    pub priority: Option<Priority>,
    /// Match the assigned technician.
    pub technician: Option<UserId>,
    /// Match the owning customer.
    pub customer: Option<UserId>,
    /// Match one exact repair code.
    pub repair_code: Option<RepairCode>,
}

/// Persistence port for repair documents.
#[async_trait]
pub trait RepairRepository: Send + Sync {
    /// Number of repairs currently stored; drives code allocation.
    async fn count(&self) -> Result<u64, RepairStoreError>;

    /// Insert a freshly created repair.
    async fn insert(&self, repair: &Repair) -> Result<(), RepairStoreError>;

    /// Fetch one repair by code.
    async fn find_by_code(&self, code: &RepairCode) -> Result<Option<Repair>, RepairStoreError>;

    /// Replace a repair document, guarded by its version token.
    ///
    /// `repair.version` carries the next version; the write only lands when
    /// the stored document still holds `expected_version`.
    async fn update(&self, repair: &Repair, expected_version: u64)
    -> Result<(), RepairStoreError>;

    /// List repairs matching the filter, in creation order.
    async fn list(&self, filter: &RepairFilter) -> Result<Vec<Repair>, RepairStoreError>;

    /// Hard-delete every repair whose code is in `codes`; returns the count
    /// actually removed.
    async fn delete_by_codes(&self, codes: &[RepairCode]) -> Result<u64, RepairStoreError>;
}

/// Errors surfaced by the user persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserStoreError {
    /// Store connectivity failure.
    #[error("user store connection failed: {message}")]
    Connection {
        /// Adapter-reported cause.
        message: String,
    },
    /// Query or write failure inside the store.
    #[error("user store query failed: {message}")]
    Query {
        /// Adapter-reported cause.
        message: String,
    },
    /// Another account already uses this email.
    #[error("email {email} already registered")]
    DuplicateEmail {
        /// Offending address.
        email: String,
    },
    /// The targeted user does not exist.
    #[error("user {id} not found")]
    Missing {
        /// Identifier that matched nothing.
        id: String,
    },
}

impl UserStoreError {
    /// Helper for connection-level adapter failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query/write failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch one account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Fetch one account by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError>;

    /// List every account.
    async fn list(&self) -> Result<Vec<User>, UserStoreError>;

    /// Insert a new account; fails on duplicate email.
    async fn insert(&self, user: &User) -> Result<(), UserStoreError>;

    /// Replace an existing account document.
    async fn update(&self, user: &User) -> Result<(), UserStoreError>;
}

/// Errors surfaced by the notification transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The transport refused or failed to accept the message.
    #[error("notification dispatch failed: {message}")]
    Dispatch {
        /// Adapter-reported cause.
        message: String,
    },
}

impl NotificationError {
    /// Helper for dispatch failures.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch {
            message: message.into(),
        }
    }
}

/// Fire-and-forget message dispatch keyed off repair events.
///
/// The engine never awaits delivery for correctness: failures are logged and
/// must not block or fail the triggering operation.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Send `message` to the given account.
    async fn send(&self, recipient: &User, message: &str) -> Result<(), NotificationError>;

    /// Send a rendered ticket to an arbitrary address.
    async fn send_ticket(
        &self,
        recipient: &Email,
        repair_code: &RepairCode,
        pdf: &[u8],
    ) -> Result<(), NotificationError>;
}

/// Errors surfaced by the ticket renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A field required on the printed ticket is missing from the snapshot.
    #[error("cannot render ticket: missing {field}")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// The rendering backend failed.
    #[error("ticket rendering failed: {message}")]
    Backend {
        /// Adapter-reported cause.
        message: String,
    },
}

impl RenderError {
    /// Helper for backend failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Renders a ticket document into a printable byte stream.
///
/// Pure function of the document: no side effects on the repair.
pub trait TicketRenderer: Send + Sync {
    /// Produce the printable bytes (PDF) for the document.
    fn render(&self, document: &TicketDocument) -> Result<Vec<u8>, RenderError>;
}

/// Wall-clock port so timeline timestamps are testable.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and demos.
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::RwLock::new(now),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self
            .now
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self
            .now
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
