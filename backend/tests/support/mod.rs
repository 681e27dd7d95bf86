//! Shared harness for the HTTP integration suites: a fully wired backend
//! over in-memory adapters with a settable clock.

use std::sync::Arc;

use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, TimeZone, Utc};

use backend::Trace;
use backend::domain::ports::{
    Clock, ManualClock, NotificationDispatcher, RepairRepository, TicketRenderer, UserRepository,
};
use backend::domain::{
    Email, Fullname, RepairService, Role, TicketService, User, UserDirectory, UserId,
};
use backend::inbound::http;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::notify::TracingNotifier;
use backend::outbound::pdf::PrintpdfTicketRenderer;
use backend::outbound::persistence::{InMemoryRepairRepository, InMemoryUserRepository};

/// Fixed origin for the manual clock: 2026-03-02 09:00 UTC.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// In-memory backend plus direct handles for seeding and clock control.
pub struct TestServer {
    pub state: HttpState,
    pub users: Arc<InMemoryUserRepository>,
    pub repairs: Arc<InMemoryRepairRepository>,
    pub clock: Arc<ManualClock>,
}

/// Assemble the services over fresh in-memory stores.
pub fn test_server() -> TestServer {
    let repairs = Arc::new(InMemoryRepairRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(ManualClock::starting_at(epoch()));
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

    TestServer {
        state: HttpState::new(repair_service, directory, tickets),
        users,
        repairs,
        clock,
    }
}

/// Initialise an Actix test service over the full route table.
pub async fn init(
    server: &TestServer,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(server.state.clone()))
            .app_data(health)
            .wrap(Trace)
            .configure(http::configure),
    )
    .await
}

/// Insert an account straight into the store.
pub async fn seed_user(server: &TestServer, email: &str, fullname: &str, role: Role) -> UserId {
    let user = User::new(
        Email::new(email).expect("valid email"),
        Fullname::new(fullname).expect("valid name"),
        role,
        epoch(),
    );
    server.users.insert(&user).await.expect("seed user");
    user.id
}
