use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    middleware::auth::Principal,
    models::WorkingShift,
    response::ApiResponse,
    routes::params::ShiftQuery,
    services::shift_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShiftRequest {
    pub employee_id: i32,
    pub position: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShiftRequest {
    pub employee_id: Option<i32>,
    pub position: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShiftList {
    pub items: Vec<WorkingShift>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shifts))
        .route("/", post(create_shift))
        .route("/{id}", get(get_shift))
        .route("/{id}", put(update_shift))
        .route("/{id}", delete(delete_shift))
}

#[utoipa::path(
    get,
    path = "/api/shifts",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("employee_id" = Option<i32>, Query, description = "Filter by employee"),
        ("position" = Option<String>, Query, description = "Filter by position"),
        ("day" = Option<String>, Query, description = "Filter by UTC start day (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "List working shifts", body = ApiResponse<ShiftList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn list_shifts(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ShiftQuery>,
) -> AppResult<Json<ApiResponse<ShiftList>>> {
    let resp = shift_service::list_shifts(&state, &principal, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shifts/{id}",
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Get working shift", body = ApiResponse<WorkingShift>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn get_shift(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<WorkingShift>>> {
    let resp = shift_service::get_shift(&state, &principal, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shifts",
    request_body = CreateShiftRequest,
    responses(
        (status = 200, description = "Create working shift", body = ApiResponse<WorkingShift>),
        (status = 400, description = "Outside business hours or bad input"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Overlapping shift for the position"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn create_shift(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateShiftRequest>,
) -> AppResult<Json<ApiResponse<WorkingShift>>> {
    let resp = shift_service::create_shift(&state, &principal, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/shifts/{id}",
    params(("id" = i32, Path, description = "Shift ID")),
    request_body = UpdateShiftRequest,
    responses(
        (status = 200, description = "Update working shift", body = ApiResponse<WorkingShift>),
        (status = 400, description = "Outside business hours or bad input"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Overlapping shift for the position"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn update_shift(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateShiftRequest>,
) -> AppResult<Json<ApiResponse<WorkingShift>>> {
    let resp = shift_service::update_shift(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/shifts/{id}",
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Delete working shift"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shifts"
)]
pub async fn delete_shift(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = shift_service::delete_shift(&state, &principal, id).await?;
    Ok(Json(resp))
}
