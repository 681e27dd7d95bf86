//! Server configuration parsed from flags and environment variables.

use std::net::SocketAddr;

use clap::Parser;

/// Runtime configuration for the repair-shop backend.
#[derive(Debug, Clone, Parser)]
#[command(name = "backend", about = "Repair-shop management backend")]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// MongoDB connection string; omit to run on the in-memory store.
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// MongoDB database holding the `repairs` and `users` collections.
    #[arg(long, env = "MONGODB_DATABASE", default_value = "repair-shop")]
    pub mongodb_database: String,

    /// Seed deterministic example data at startup (requires the
    /// `example-data` build feature).
    #[arg(long, env = "SEED_EXAMPLE_DATA", default_value_t = false)]
    pub seed_example_data: bool,

    /// Seed for the example-data generator.
    #[arg(long, env = "EXAMPLE_DATA_SEED", default_value_t = 42)]
    pub example_data_seed: u64,
}
