//! Shared fixtures for handler tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    Clock, ManualClock, NotificationDispatcher, RepairRepository, TicketRenderer, UserRepository,
};
use crate::domain::{
    Email, Fullname, RepairService, Role, TicketService, User, UserDirectory, UserId,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::notify::TracingNotifier;
use crate::outbound::pdf::PrintpdfTicketRenderer;
use crate::outbound::persistence::{InMemoryRepairRepository, InMemoryUserRepository};

/// Fixed origin for every manual test clock.
pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Fully wired in-memory backend for handler tests.
pub struct TestBackend {
    /// Handler dependency bundle.
    pub state: HttpState,
    /// Direct handle on the repair store.
    pub repairs: Arc<InMemoryRepairRepository>,
    /// Direct handle on the user store.
    pub users: Arc<InMemoryUserRepository>,
    /// Settable clock shared by every service.
    pub clock: Arc<ManualClock>,
}

impl TestBackend {
    /// Assemble services over fresh in-memory stores.
    pub fn new() -> Self {
        let repairs = Arc::new(InMemoryRepairRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let clock = Arc::new(ManualClock::starting_at(test_epoch()));
        let notifier = Arc::new(TracingNotifier);

        let repair_service = Arc::new(RepairService::new(
            Arc::clone(&repairs) as Arc<dyn RepairRepository>,
            Arc::clone(&users) as Arc<dyn UserRepository>,
            Arc::clone(&notifier) as Arc<dyn NotificationDispatcher>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));
        let directory = Arc::new(UserDirectory::new(
            Arc::clone(&users) as Arc<dyn UserRepository>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));
        let tickets = Arc::new(TicketService::new(
            Arc::clone(&repairs) as Arc<dyn RepairRepository>,
            Arc::clone(&users) as Arc<dyn UserRepository>,
            Arc::new(PrintpdfTicketRenderer) as Arc<dyn TicketRenderer>,
            Arc::clone(&notifier) as Arc<dyn NotificationDispatcher>,
        ));

        Self {
            state: HttpState::new(repair_service, directory, tickets),
            repairs,
            users,
            clock,
        }
    }
}

/// Insert an account straight into the store, bypassing the HTTP surface.
pub async fn seed_user(backend: &TestBackend, email: &str, role: Role) -> UserId {
    let user = User::new(
        Email::new(email).expect("valid email"),
        Fullname::new(format!("Cuenta {role}")).expect("valid name"),
        role,
        test_epoch(),
    );
    backend.users.insert(&user).await.expect("seed user");
    user.id
}
