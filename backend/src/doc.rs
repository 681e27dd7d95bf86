//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the wire schemas they
//! exchange. The generated specification backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::error::{Error, ErrorCode};
use crate::domain::repair::{
    Attachment, CustomerNotification, Device, NotificationMethod, Repair, TimelineEntry, UsedPart,
};
use crate::domain::repair_service::RepairSummary;
use crate::domain::role::Role;
use crate::domain::status::{Priority, RepairStatus};
use crate::domain::user::AccountStatus;
use crate::inbound::http::repairs::{
    CreateRepairRequest, DeleteRepairsRequest, DeleteRepairsResponse, DeviceRequest,
    UpdateStatusRequest,
};
use crate::inbound::http::tickets::SendTicketRequest;
use crate::inbound::http::users::{CreateUserRequest, PublicUser, UpdateProfileRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Repair-shop backend API",
        description = "Device intake, repair workflow, user administration, and ticket \
                       generation for a small repair business."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::repairs::list_repairs,
        crate::inbound::http::repairs::get_repair,
        crate::inbound::http::repairs::create_repair,
        crate::inbound::http::repairs::update_status,
        crate::inbound::http::repairs::patch_status,
        crate::inbound::http::repairs::delete_repairs,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::find_by_email,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::list_user_repairs,
        crate::inbound::http::tickets::get_ticket,
        crate::inbound::http::tickets::send_ticket,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Repair,
        RepairSummary,
        Device,
        TimelineEntry,
        Attachment,
        CustomerNotification,
        NotificationMethod,
        UsedPart,
        RepairStatus,
        Priority,
        Role,
        AccountStatus,
        PublicUser,
        CreateRepairRequest,
        DeviceRequest,
        UpdateStatusRequest,
        DeleteRepairsRequest,
        DeleteRepairsResponse,
        CreateUserRequest,
        UpdateProfileRequest,
        SendTicketRequest,
    )),
    tags(
        (name = "repairs", description = "Repair intake, workflow, and deletion"),
        (name = "users", description = "Account administration"),
        (name = "tickets", description = "Printable ticket generation"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_the_repair_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/v1/repairs"));
        assert!(paths.contains_key("/api/v1/repairs/{repairCode}"));
        assert!(paths.contains_key("/api/v1/tickets/{repairCode}"));
        assert!(paths.contains_key("/api/v1/users/{id}/repairs"));
    }

    #[test]
    fn registers_the_core_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        for name in ["Repair", "RepairStatus", "PublicUser", "Error"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}
