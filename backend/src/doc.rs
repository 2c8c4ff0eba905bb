//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every users and health endpoint plus the request,
//! response, and envelope schemas they reference. The document backs Swagger
//! UI in debug builds and is printed by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{ErrorCodeSchema, FailureEnvelope, MessageEnvelope};
use crate::inbound::http::users::{
    AddressDto, CreateUserRequest, GeoDto, UpdateUserRequest, UserDataResponse, UserListResponse,
    UserMutationResponse, UserResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User registry API",
        description = "CRUD access to user records and health checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        GeoDto,
        AddressDto,
        CreateUserRequest,
        UpdateUserRequest,
        UserResponse,
        UserListResponse,
        UserDataResponse,
        UserMutationResponse,
        MessageEnvelope,
        FailureEnvelope,
        ErrorCodeSchema,
    )),
    tags(
        (name = "users", description = "Operations on user records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
