//! Users resource controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::debug;
use userbase_core::{ErrorResponse, UserId, UserbaseError};
use userbase_service::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Creates the users router, mounted under `/api/v1/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_users).post(create_user))
        .route("/:id", get(show_user).put(update_user).delete(delete_user))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Email is already in use", body = ErrorResponse),
        (status = 422, description = "Invalid request body", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    debug!(email = %request.email, "Create user request");

    let response = state.users_service.create(request).await?;
    Ok(created(response))
}

/// List every user.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 404, description = "Empty user list", body = ErrorResponse)
    )
)]
pub async fn get_all_users(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    debug!("List users request");

    let response = state.users_service.get_all().await?;
    ok(response)
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn show_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserResponse> {
    debug!("Show user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let response = state.users_service.show(user_id).await?;
    ok(response)
}

/// Update a user's name, phone or city.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Phone number is already in use", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    debug!("Update user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let response = state.users_service.update(user_id, request).await?;
    ok(response)
}

/// Delete a user and return the removed record.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserResponse> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let response = state.users_service.delete(user_id).await?;
    ok(response)
}

fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id).map_err(|_| AppError(UserbaseError::validation(format!("Invalid user ID: {id}"))))
}
