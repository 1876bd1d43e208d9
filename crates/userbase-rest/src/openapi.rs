//! OpenAPI documentation for the users API.

use crate::controllers::HealthResponse;
use userbase_core::{ErrorResponse, FieldError, UserId};
use userbase_service::{CreateUserRequest, UpdateUserRequest, UserResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Userbase API",
        version = "1.0.0",
        description = "CRUD API for the users resource"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::users_controller::create_user,
        crate::controllers::users_controller::get_all_users,
        crate::controllers::users_controller::show_user,
        crate::controllers::users_controller::update_user,
        crate::controllers::users_controller::delete_user,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            ErrorResponse,
            FieldError,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "users", description = "User management"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
