//! HTTP handlers translating requests into domain service calls.
//!
//! Handlers validate and parse at the edge, delegate to the domain, and rely
//! on the [`error`] module to turn domain failures into consistent JSON
//! responses.

pub mod error;
pub mod health;
pub mod repairs;
pub mod state;
pub mod tickets;
pub mod users;

#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` route on the given service config.
///
/// The caller provides [`state::HttpState`] (and
/// [`health::HealthState`] for the probes) via `app_data`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(repairs::list_repairs)
            .service(repairs::get_repair)
            .service(repairs::create_repair)
            .service(repairs::update_status)
            .service(repairs::patch_status)
            .service(repairs::delete_repairs)
            .service(users::list_users)
            .service(users::create_user)
            .service(users::find_by_email)
            .service(users::get_user)
            .service(users::update_profile)
            .service(users::list_user_repairs)
            .service(tickets::get_ticket)
            .service(tickets::send_ticket),
    )
    .service(health::ready)
    .service(health::live);
}
