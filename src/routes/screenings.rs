use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::tickets::RefundSummary,
    error::AppResult,
    middleware::auth::Principal,
    models::Screening,
    response::ApiResponse,
    routes::params::ScreeningQuery,
    services::screening_service,
    state::AppState,
};

/// `end_time` is never accepted from the client; it is derived from the
/// movie's runtime.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScreeningRequest {
    pub movie_id: i32,
    pub room_id: i32,
    pub start_time: DateTime<Utc>,
    pub ticket_price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateScreeningRequest {
    pub movie_id: Option<i32>,
    pub room_id: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    pub ticket_price: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScreeningList {
    pub items: Vec<Screening>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_screenings))
        .route("/", post(create_screening))
        .route("/{id}", get(get_screening))
        .route("/{id}", put(update_screening))
        .route("/{id}", delete(delete_screening))
}

#[utoipa::path(
    get,
    path = "/api/screenings",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("movie_id" = Option<i32>, Query, description = "Filter by movie"),
        ("room_id" = Option<i32>, Query, description = "Filter by room"),
        ("day" = Option<String>, Query, description = "Filter by UTC start day (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "List screenings", body = ApiResponse<ScreeningList>)
    ),
    tag = "Screenings"
)]
pub async fn list_screenings(
    State(state): State<AppState>,
    Query(query): Query<ScreeningQuery>,
) -> AppResult<Json<ApiResponse<ScreeningList>>> {
    let resp = screening_service::list_screenings(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/screenings/{id}",
    params(("id" = i32, Path, description = "Screening ID")),
    responses(
        (status = 200, description = "Get screening", body = ApiResponse<Screening>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Screenings"
)]
pub async fn get_screening(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Screening>>> {
    let resp = screening_service::get_screening(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/screenings",
    request_body = CreateScreeningRequest,
    responses(
        (status = 200, description = "Create screening", body = ApiResponse<Screening>),
        (status = 400, description = "Room closed or bad input"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Movie or room not found"),
        (status = 409, description = "Overlapping screening in the room"),
    ),
    security(("bearer_auth" = [])),
    tag = "Screenings"
)]
pub async fn create_screening(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateScreeningRequest>,
) -> AppResult<Json<ApiResponse<Screening>>> {
    let resp = screening_service::create_screening(&state, &principal, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/screenings/{id}",
    params(("id" = i32, Path, description = "Screening ID")),
    request_body = UpdateScreeningRequest,
    responses(
        (status = 200, description = "Update screening", body = ApiResponse<Screening>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Overlapping screening in the room"),
    ),
    security(("bearer_auth" = [])),
    tag = "Screenings"
)]
pub async fn update_screening(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateScreeningRequest>,
) -> AppResult<Json<ApiResponse<Screening>>> {
    let resp = screening_service::update_screening(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/screenings/{id}",
    params(("id" = i32, Path, description = "Screening ID")),
    responses(
        (status = 200, description = "Delete screening and refund sold tickets", body = ApiResponse<RefundSummary>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Screenings"
)]
pub async fn delete_screening(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<RefundSummary>>> {
    let resp = screening_service::delete_screening(&state, &principal, id).await?;
    Ok(Json(resp))
}
