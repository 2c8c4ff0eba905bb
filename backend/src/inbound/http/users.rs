//! Users API handlers.
//!
//! ```text
//! GET    /api/users
//! POST   /api/users {"name":"Ana","email":"ana@x.com","phone":"555"}
//! GET    /api/users/{id}
//! PUT    /api/users/{id} {"company":"Acme"}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::user_service::INVALID_ID_OR_DATA_MESSAGE;
use crate::domain::{
    Address, AddressInput, Error, GeoInput, GeoPoint, User, UserId, UserInput, UserPatch,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{FailureEnvelope, MessageEnvelope};
use crate::inbound::http::state::HttpState;

/// Message returned when a path id is not a valid identifier.
pub const INVALID_USER_ID_MESSAGE: &str = "Invalid user ID";
/// Message returned after a successful create.
pub const USER_CREATED_MESSAGE: &str = "User created successfully";
/// Message returned after a successful update.
pub const USER_UPDATED_MESSAGE: &str = "User updated successfully";
/// Message returned after a successful delete.
pub const USER_REMOVED_MESSAGE: &str = "User removed successfully";

/// Coordinates as supplied by clients.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct GeoDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "-37.3159")]
    pub lat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "81.1496")]
    pub lng: Option<String>,
}

/// Postal address as supplied by and returned to clients.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct AddressDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoDto>,
}

impl From<AddressDto> for AddressInput {
    fn from(value: AddressDto) -> Self {
        Self {
            street: value.street,
            city: value.city,
            zipcode: value.zipcode,
            geo: value.geo.map(|geo| GeoInput {
                lat: geo.lat,
                lng: geo.lng,
            }),
        }
    }
}

impl From<&GeoPoint> for GeoDto {
    fn from(value: &GeoPoint) -> Self {
        Self {
            lat: value.lat.clone(),
            lng: value.lng.clone(),
        }
    }
}

impl From<&Address> for AddressDto {
    fn from(value: &Address) -> Self {
        Self {
            street: value.street.clone(),
            city: value.city.clone(),
            zipcode: value.zipcode.clone(),
            geo: value.geo.as_ref().map(GeoDto::from),
        }
    }
}

/// Request body for `POST /api/users`.
///
/// Example JSON:
/// `{"name":"Ana","email":"ana@x.com","phone":"555","company":"Acme"}`
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Ana")]
    pub name: Option<String>,
    #[schema(example = "ana@x.com")]
    pub email: Option<String>,
    #[schema(example = "555-0100")]
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<AddressDto>,
}

impl From<CreateUserRequest> for UserInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            company: value.company,
            address: value.address.map(AddressInput::from),
        }
    }
}

/// Request body for `PUT /api/users/{id}`.
///
/// Empty strings leave the stored value unchanged; a supplied `address`
/// replaces the stored one.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "Acme")]
    pub company: Option<String>,
    pub address: Option<AddressDto>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            company: value.company,
            address: value.address.map(AddressInput::from),
        }
    }
}

/// User representation returned to clients.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressDto>,
    #[schema(example = "2024-01-02T03:04:05+00:00")]
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let details = value.details();
        Self {
            id: value.id().to_string(),
            name: details.name().to_owned(),
            email: details.email().to_string(),
            phone: details.phone().to_owned(),
            company: details.company().map(str::to_owned),
            address: details.address().map(AddressDto::from),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

/// Body of `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<UserResponse>,
}

/// Body of `GET /api/users/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UserDataResponse {
    pub success: bool,
    pub data: UserResponse,
}

/// Body of successful create and update calls.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UserMutationResponse {
    pub success: bool,
    pub message: String,
    pub data: UserResponse,
}

impl UserMutationResponse {
    fn ok(message: &str, user: User) -> Self {
        Self {
            success: true,
            message: message.to_owned(),
            data: user.into(),
        }
    }
}

/// Parse a path id, rejecting malformed values with `message`.
fn parse_user_id(raw: &str, message: &'static str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| {
        Error::invalid_request(message).with_details(json!({
            "field": "id",
            "code": "invalid_user_id",
            "reason": err.to_string(),
        }))
    })
}

/// List every user.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users in store order", body = UserListResponse),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<UserListResponse>> {
    let users = state.users_query.list_users().await?;
    let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(web::Json(UserListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "24-digit hexadecimal user id")),
    responses(
        (status = 200, description = "User", body = UserDataResponse),
        (status = 400, description = "Invalid user ID", body = FailureEnvelope),
        (status = 404, description = "User not found", body = FailureEnvelope),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserDataResponse>> {
    let id = parse_user_id(&path, INVALID_USER_ID_MESSAGE)?;
    let user = state.users_query.get_user(&id).await?;
    Ok(web::Json(UserDataResponse {
        success: true,
        data: user.into(),
    }))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserMutationResponse),
        (status = 400, description = "Missing or invalid fields", body = FailureEnvelope),
        (status = 409, description = "Email already exists", body = FailureEnvelope),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users_command
        .create_user(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(UserMutationResponse::ok(USER_CREATED_MESSAGE, user)))
}

/// Merge supplied fields into a user.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "24-digit hexadecimal user id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserMutationResponse),
        (status = 400, description = "Invalid user ID or data", body = FailureEnvelope),
        (status = 404, description = "User not found", body = FailureEnvelope),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserMutationResponse>> {
    let id = parse_user_id(&path, INVALID_ID_OR_DATA_MESSAGE)?;
    let user = state
        .users_command
        .update_user(&id, payload.into_inner().into())
        .await?;
    Ok(web::Json(UserMutationResponse::ok(USER_UPDATED_MESSAGE, user)))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "24-digit hexadecimal user id")),
    responses(
        (status = 200, description = "User removed", body = MessageEnvelope),
        (status = 400, description = "Invalid user ID", body = FailureEnvelope),
        (status = 404, description = "User not found", body = FailureEnvelope),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageEnvelope>> {
    let id = parse_user_id(&path, INVALID_USER_ID_MESSAGE)?;
    state.users_command.delete_user(&id).await?;
    Ok(web::Json(MessageEnvelope::ok(USER_REMOVED_MESSAGE)))
}
