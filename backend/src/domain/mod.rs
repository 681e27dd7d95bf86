//! Domain primitives, aggregates, and the timeline engine.
//!
//! Everything here is transport agnostic: inbound adapters translate HTTP
//! into these calls and outbound adapters implement the [`ports`]. Keep
//! invariants inside the aggregates and services; adapters stay thin.

pub mod error;
pub mod ports;
pub mod repair;
pub mod repair_service;
pub mod role;
pub mod status;
pub mod ticket;
pub mod ticket_service;
pub mod trace_id;
pub mod user;
pub mod user_directory;

pub use self::error::{Error, ErrorCode};
pub use self::repair::{Device, Repair, RepairCode, TimelineEntry};
pub use self::repair_service::{NewRepair, RepairService, RepairSummary, StatusChange};
pub use self::role::Role;
pub use self::status::{Priority, RepairStatus};
pub use self::ticket::TicketDocument;
pub use self::ticket_service::TicketService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, Fullname, User, UserId};
pub use self::user_directory::{NewUser, ProfileUpdate, UserDirectory};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
