//! Server construction: adapter selection and service wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use tracing::info;

use backend::domain::ports::{
    Clock, NotificationDispatcher, RepairRepository, SystemClock, TicketRenderer, UserRepository,
};
use backend::domain::{RepairService, TicketService, UserDirectory};
use backend::inbound::http::state::HttpState;
use backend::outbound::notify::TracingNotifier;
use backend::outbound::pdf::PrintpdfTicketRenderer;
use backend::outbound::persistence::{
    InMemoryRepairRepository, InMemoryUserRepository, MongoRepairRepository, MongoUserRepository,
    connect,
};

/// Build the handler state from the configuration, selecting MongoDB or the
/// in-memory store and seeding example data when requested.
pub async fn build_state(config: &ServerConfig) -> Result<HttpState, String> {
    let (repairs, users): (Arc<dyn RepairRepository>, Arc<dyn UserRepository>) =
        match &config.mongodb_uri {
            Some(uri) => {
                let database = connect(uri, &config.mongodb_database)
                    .await
                    .map_err(|err| format!("failed to connect to MongoDB: {err}"))?;
                info!(database = %config.mongodb_database, "using MongoDB persistence");
                (
                    Arc::new(MongoRepairRepository::new(&database)),
                    Arc::new(MongoUserRepository::new(&database)),
                )
            }
            None => {
                info!("no MongoDB URI configured; using the in-memory store");
                (
                    Arc::new(InMemoryRepairRepository::new()),
                    Arc::new(InMemoryUserRepository::new()),
                )
            }
        };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier: Arc<dyn NotificationDispatcher> = Arc::new(TracingNotifier);
    let renderer: Arc<dyn TicketRenderer> = Arc::new(PrintpdfTicketRenderer);

    let repair_service = Arc::new(RepairService::new(
        Arc::clone(&repairs),
        Arc::clone(&users),
        Arc::clone(&notifier),
        Arc::clone(&clock),
    ));
    let directory = Arc::new(UserDirectory::new(Arc::clone(&users), Arc::clone(&clock)));
    let tickets = Arc::new(TicketService::new(
        Arc::clone(&repairs),
        Arc::clone(&users),
        renderer,
        Arc::clone(&notifier),
    ));

    if config.seed_example_data {
        seed(config, &directory, &repair_service).await?;
    }

    Ok(HttpState::new(repair_service, directory, tickets))
}

#[cfg(feature = "example-data")]
async fn seed(
    config: &ServerConfig,
    directory: &UserDirectory,
    repairs: &RepairService,
) -> Result<(), String> {
    backend::seed::seed_example_data(config.example_data_seed, directory, repairs)
        .await
        .map_err(|err| format!("example data seeding failed: {err}"))
}

#[cfg(not(feature = "example-data"))]
async fn seed(
    _config: &ServerConfig,
    _directory: &UserDirectory,
    _repairs: &RepairService,
) -> Result<(), String> {
    tracing::warn!(
        "seed-example-data requested but the example-data feature is not compiled in"
    );
    Ok(())
}
