//! User API handlers.
//!
//! ```text
//! GET   /api/v1/users
//! POST  /api/v1/users
//! GET   /api/v1/users/by-email?email=
//! GET   /api/v1/users/{id}
//! PATCH /api/v1/users/{id}
//! GET   /api/v1/users/{id}/repairs
//! ```
//!
//! Every response uses the [`PublicUser`] projection; the stored credential
//! hash never leaves the server.

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::user::AccountStatus;
use crate::domain::{
    Email, Error, Fullname, NewUser, ProfileUpdate, Repair, Role, User, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Public projection of an account; excludes the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// Stable account identifier.
    #[schema(value_type = String)]
    pub id: UserId,
    /// Sign-in address.
    #[schema(value_type = String)]
    pub email: Email,
    /// Display name.
    #[schema(value_type = String)]
    pub fullname: Fullname,
    /// Account role.
    pub role: Role,
    /// Account activity state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    /// WhatsApp contact number.
    pub whatsapp: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            fullname: user.fullname,
            role: user.role,
            status: user.status,
            whatsapp: user.whatsapp,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Account-creation request body for `POST /api/v1/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Unique sign-in address.
    pub email: Option<String>,
    /// Display name.
    pub fullname: Option<String>,
    /// Opaque credential hash from the external sign-in flow.
    pub password: Option<String>,
    /// Role; defaults to `user`.
    pub role: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = Error;

    fn try_from(request: CreateUserRequest) -> Result<Self, Self::Error> {
        let (Some(email), Some(fullname)) = (request.email, request.fullname) else {
            return Err(Error::invalid_request("Email and fullname are required"));
        };
        let email = Email::new(email).map_err(|err| Error::invalid_request(err.to_string()))?;
        let fullname =
            Fullname::new(fullname).map_err(|err| Error::invalid_request(err.to_string()))?;
        let role = request
            .role
            .map(|raw| {
                raw.parse::<Role>().map_err(|_| {
                    Error::invalid_request(
                        "Invalid role. Allowed roles are: superadmin, admin, technician, \
                         reception, user",
                    )
                })
            })
            .transpose()?
            .unwrap_or(Role::User);
        Ok(Self {
            email,
            fullname,
            password: request.password,
            role,
        })
    }
}

/// Profile-edit request body for `PATCH /api/v1/users/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New display name.
    pub fullname: Option<String>,
    /// WhatsApp contact number.
    pub whatsapp: Option<String>,
    /// Country of residence.
    pub country: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// City or locality.
    pub locality: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Postal code.
    pub postalcode: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(request: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let fullname = request
            .fullname
            .map(|raw| Fullname::new(raw).map_err(|err| Error::invalid_request(err.to_string())))
            .transpose()?;
        Ok(Self {
            fullname,
            whatsapp: request.whatsapp,
            country: request.country,
            state: request.state,
            locality: request.locality,
            address: request.address,
            postalcode: request.postalcode,
        })
    }
}

/// Query for `GET /api/v1/users/by-email`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ByEmailQuery {
    /// Address to resolve.
    pub email: String,
}

fn parse_user_path(raw: &str) -> Result<UserId, Error> {
    // An id outside the UUID format cannot match any stored account.
    raw.parse().map_err(|_| Error::not_found("User not found"))
}

/// List every account.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All accounts", body = [PublicUser]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<PublicUser>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users.into_iter().map(PublicUser::from).collect()))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = PublicUser),
        (status = 400, description = "Missing or invalid fields", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = NewUser::try_from(payload.into_inner())?;
    let user = state.users.create_user(request).await?;
    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}

/// Resolve an email address to an account id.
#[utoipa::path(
    get,
    path = "/api/v1/users/by-email",
    params(ByEmailQuery),
    responses(
        (status = 200, description = "Owning account id"),
        (status = 404, description = "No account for that address", body = Error)
    ),
    tags = ["users"],
    operation_id = "findUserByEmail"
)]
#[get("/users/by-email")]
pub async fn find_by_email(
    state: web::Data<HttpState>,
    query: web::Query<ByEmailQuery>,
) -> ApiResult<HttpResponse> {
    let email = Email::new(query.into_inner().email)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let user_id = state.users.find_id_by_email(&email).await?;
    Ok(HttpResponse::Ok().json(json!({ "userId": user_id })))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "The account", body = PublicUser),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PublicUser>> {
    let id = parse_user_path(&path.into_inner())?;
    let user = state.users.get_user(&id).await?;
    Ok(web::Json(PublicUser::from(user)))
}

/// Edit an account's profile fields.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "Account id")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = PublicUser),
        (status = 400, description = "Invalid fields", body = Error),
        (status = 404, description = "No such account", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserProfile"
)]
#[patch("/users/{id}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<PublicUser>> {
    let id = parse_user_path(&path.into_inner())?;
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let user = state.users.update_profile(&id, update).await?;
    Ok(web::Json(PublicUser::from(user)))
}

/// Repairs owned by a customer.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/repairs",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Repairs owned by the account", body = [Repair]),
        (status = 404, description = "No repairs for that account", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUserRepairs"
)]
#[get("/users/{id}/repairs")]
pub async fn list_user_repairs(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Repair>>> {
    let id = parse_user_path(&path.into_inner())?;
    let repairs = state.repairs.repairs_for_customer(id).await?;
    Ok(web::Json(repairs))
}
