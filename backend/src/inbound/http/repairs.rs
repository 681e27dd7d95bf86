//! Repair API handlers.
//!
//! ```text
//! GET    /api/v1/repairs?status=&priority=&technician=&customer=&repairCode=
//! GET    /api/v1/repairs/{repairCode}
//! POST   /api/v1/repairs
//! PUT    /api/v1/repairs/{repairCode}
//! PATCH  /api/v1/repairs/{repairCode}
//! DELETE /api/v1/repairs
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::RepairFilter;
use crate::domain::repair::Device;
use crate::domain::{
    Error, NewRepair, Priority, Repair, RepairCode, RepairStatus, RepairSummary, StatusChange,
    UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Listing filters accepted by `GET /api/v1/repairs`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListRepairsQuery {
    /// Filter by exact status (canonical wire string).
    pub status: Option<String>,
    /// Filter by priority.
    pub priority: Option<String>,
    /// Filter by assigned technician id.
    pub technician: Option<String>,
    /// Filter by owning customer id.
    pub customer: Option<String>,
    /// Filter by exact repair code.
    pub repair_code: Option<String>,
}

impl TryFrom<ListRepairsQuery> for RepairFilter {
    type Error = Error;

    fn try_from(query: ListRepairsQuery) -> Result<Self, Self::Error> {
        let status = query
            .status
            .map(|raw| parse_status(&raw))
            .transpose()?;
        let priority = query
            .priority
            .map(|raw| parse_priority(&raw))
            .transpose()?;
        let technician = query
            .technician
            .map(|raw| parse_user_id(&raw, "technician"))
            .transpose()?;
        let customer = query
            .customer
            .map(|raw| parse_user_id(&raw, "customer"))
            .transpose()?;
        let repair_code = query
            .repair_code
            .map(|raw| {
                RepairCode::new(raw.clone())
                    .map_err(|_| Error::invalid_request("repairCode must match TASK-XXXX"))
            })
            .transpose()?;
        Ok(Self {
            status,
            priority,
            technician,
            customer,
            repair_code,
        })
    }
}

fn parse_status(raw: &str) -> Result<RepairStatus, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request(format!(
            "Invalid status. Allowed statuses are: {}",
            RepairStatus::allowed_values()
        ))
    })
}

fn parse_priority(raw: &str) -> Result<Priority, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request("Invalid priority. Allowed priorities are: Normal, Alta, Urgente")
    })
}

fn parse_user_id(raw: &str, field: &str) -> Result<UserId, Error> {
    raw.parse()
        .map_err(|_| Error::invalid_request(format!("{field} must be a valid user id")))
}

fn parse_path_code(raw: &str) -> Result<RepairCode, Error> {
    // A code outside the TASK-XXXX format cannot match any stored repair.
    RepairCode::new(raw).map_err(|_| Error::not_found("Repair not found"))
}

/// Device fields accepted at intake.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    /// Device category.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Manufacturer, or "Sin especificar".
    pub brand: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Manufacturer serial number.
    pub serial_number: Option<String>,
    /// Cosmetic state observed at the front desk.
    pub physical_condition: Option<String>,
    /// Customer-reported defect description.
    pub flaw: Option<String>,
    /// Unlock credential left by the customer.
    pub password_or_pattern: Option<String>,
    /// Free-form intake notes.
    pub notes: Option<String>,
}

impl From<DeviceRequest> for Device {
    fn from(request: DeviceRequest) -> Self {
        Self {
            kind: request.kind.unwrap_or_default(),
            brand: request.brand.unwrap_or_default(),
            model: request.model.unwrap_or_default(),
            serial_number: request.serial_number,
            physical_condition: request.physical_condition.unwrap_or_default(),
            flaw: request.flaw.unwrap_or_default(),
            password_or_pattern: request.password_or_pattern,
            notes: request.notes,
        }
    }
}

/// Intake request body for `POST /api/v1/repairs`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepairRequest {
    /// Short description shown in listings.
    pub title: Option<String>,
    /// Queue priority; defaults to Normal.
    pub priority: Option<String>,
    /// Owning customer id.
    pub customer: Option<String>,
    /// Staff account registering the intake.
    pub received_by: Option<String>,
    /// Device snapshot.
    pub device: Option<DeviceRequest>,
    /// Promised completion date.
    pub estimated_completion: Option<DateTime<Utc>>,
}

impl TryFrom<CreateRepairRequest> for NewRepair {
    type Error = Error;

    fn try_from(request: CreateRepairRequest) -> Result<Self, Self::Error> {
        let (Some(title), Some(customer), Some(received_by), Some(device)) = (
            request.title,
            request.customer,
            request.received_by,
            request.device,
        ) else {
            return Err(Error::invalid_request(
                "Title, customer, receivedBy, and device are required",
            ));
        };

        let priority = request
            .priority
            .map(|raw| parse_priority(&raw))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            title,
            priority,
            customer: parse_user_id(&customer, "customer")?,
            received_by: parse_user_id(&received_by, "receivedBy")?,
            device: device.into(),
            estimated_completion: request.estimated_completion,
        })
    }
}

/// Status-change request body for `PUT`/`PATCH /api/v1/repairs/{repairCode}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Target status (canonical wire string).
    pub status: Option<String>,
    /// Optional note for the timeline entry.
    pub note: Option<String>,
    /// Account performing the change.
    pub changed_by: Option<String>,
}

impl TryFrom<UpdateStatusRequest> for StatusChange {
    type Error = Error;

    fn try_from(request: UpdateStatusRequest) -> Result<Self, Self::Error> {
        let Some(status) = request.status else {
            return Err(Error::invalid_request("Status is required"));
        };
        let status = parse_status(&status)?;
        let Some(changed_by) = request.changed_by else {
            return Err(Error::invalid_request("changedBy is required"));
        };
        Ok(Self {
            status,
            note: request.note,
            changed_by: parse_user_id(&changed_by, "changedBy")?,
        })
    }
}

/// Bulk delete request body for `DELETE /api/v1/repairs`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRepairsRequest {
    /// Codes of the repairs to remove.
    pub repair_codes: Option<Vec<String>>,
}

/// Bulk delete response body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRepairsResponse {
    /// Outcome description.
    pub message: String,
    /// Number of repairs removed.
    pub deleted_count: u64,
}

/// List repairs matching the AND-combined filters.
#[utoipa::path(
    get,
    path = "/api/v1/repairs",
    params(ListRepairsQuery),
    responses(
        (status = 200, description = "Matching repairs", body = [RepairSummary]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["repairs"],
    operation_id = "listRepairs"
)]
#[get("/repairs")]
pub async fn list_repairs(
    state: web::Data<HttpState>,
    query: web::Query<ListRepairsQuery>,
) -> ApiResult<web::Json<Vec<RepairSummary>>> {
    let filter = RepairFilter::try_from(query.into_inner())?;
    let summaries = state.repairs.list_repairs(filter).await?;
    Ok(web::Json(summaries))
}

/// Fetch a single repair by code.
#[utoipa::path(
    get,
    path = "/api/v1/repairs/{repairCode}",
    params(("repairCode" = String, Path, description = "Repair code, e.g. TASK-1001")),
    responses(
        (status = 200, description = "The repair", body = Repair),
        (status = 404, description = "No such repair", body = Error)
    ),
    tags = ["repairs"],
    operation_id = "getRepair"
)]
#[get("/repairs/{repair_code}")]
pub async fn get_repair(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Repair>> {
    let code = parse_path_code(&path.into_inner())?;
    let repair = state.repairs.get_repair(&code).await?;
    Ok(web::Json(repair))
}

/// Register a device intake.
#[utoipa::path(
    post,
    path = "/api/v1/repairs",
    request_body = CreateRepairRequest,
    responses(
        (status = 201, description = "Repair created", body = Repair),
        (status = 400, description = "Missing or invalid fields", body = Error),
        (status = 403, description = "Receiver role not authorized", body = Error),
        (status = 404, description = "Customer or receiver unknown", body = Error)
    ),
    tags = ["repairs"],
    operation_id = "createRepair"
)]
#[post("/repairs")]
pub async fn create_repair(
    state: web::Data<HttpState>,
    payload: web::Json<CreateRepairRequest>,
) -> ApiResult<HttpResponse> {
    let request = NewRepair::try_from(payload.into_inner())?;
    let repair = state.repairs.create_repair(request).await?;
    Ok(HttpResponse::Created().json(repair))
}

async fn apply_status_change(
    state: &HttpState,
    raw_code: String,
    payload: UpdateStatusRequest,
) -> ApiResult<web::Json<Repair>> {
    let code = parse_path_code(&raw_code)?;
    let change = StatusChange::try_from(payload)?;
    let repair = state.repairs.transition_status(&code, change).await?;
    Ok(web::Json(repair))
}

/// Apply a status change to a repair.
#[utoipa::path(
    put,
    path = "/api/v1/repairs/{repairCode}",
    params(("repairCode" = String, Path, description = "Repair code, e.g. TASK-1001")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated repair", body = Repair),
        (status = 400, description = "Invalid status or ordering rule violated", body = Error),
        (status = 403, description = "Actor not authorized", body = Error),
        (status = 404, description = "No such repair", body = Error),
        (status = 409, description = "Concurrent modification", body = Error)
    ),
    tags = ["repairs"],
    operation_id = "updateRepairStatus"
)]
#[put("/repairs/{repair_code}")]
pub async fn update_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<Repair>> {
    apply_status_change(&state, path.into_inner(), payload.into_inner()).await
}

/// Apply a status change to a repair (PATCH alias of the PUT route).
#[utoipa::path(
    patch,
    path = "/api/v1/repairs/{repairCode}",
    params(("repairCode" = String, Path, description = "Repair code, e.g. TASK-1001")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated repair", body = Repair),
        (status = 400, description = "Invalid status or ordering rule violated", body = Error),
        (status = 403, description = "Actor not authorized", body = Error),
        (status = 404, description = "No such repair", body = Error),
        (status = 409, description = "Concurrent modification", body = Error)
    ),
    tags = ["repairs"],
    operation_id = "patchRepairStatus"
)]
#[patch("/repairs/{repair_code}")]
pub async fn patch_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<Repair>> {
    apply_status_change(&state, path.into_inner(), payload.into_inner()).await
}

/// Bulk hard delete repairs by code.
#[utoipa::path(
    delete,
    path = "/api/v1/repairs",
    request_body = DeleteRepairsRequest,
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteRepairsResponse),
        (status = 400, description = "Malformed code list", body = Error),
        (status = 404, description = "No matching repairs", body = Error)
    ),
    tags = ["repairs"],
    operation_id = "deleteRepairs"
)]
#[delete("/repairs")]
pub async fn delete_repairs(
    state: web::Data<HttpState>,
    payload: web::Json<DeleteRepairsRequest>,
) -> ApiResult<web::Json<DeleteRepairsResponse>> {
    let Some(raw_codes) = payload.into_inner().repair_codes else {
        return Err(Error::invalid_request("Invalid repairCodes provided"));
    };
    let codes: Vec<RepairCode> = raw_codes
        .into_iter()
        .map(|raw| {
            RepairCode::new(raw.clone()).map_err(|_| {
                Error::invalid_request("Invalid repairCodes provided")
                    .with_details(json!({ "repairCode": raw }))
            })
        })
        .collect::<Result<_, _>>()?;

    let deleted_count = state.repairs.delete_repairs(&codes).await?;
    Ok(web::Json(DeleteRepairsResponse {
        message: "Repairs deleted successfully".to_owned(),
        deleted_count,
    }))
}
