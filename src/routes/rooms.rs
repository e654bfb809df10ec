use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    middleware::auth::Principal,
    models::Room,
    response::ApiResponse,
    routes::params::ListQuery,
    services::room_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    pub name: String,
    pub capacity: i32,
    pub kind: String,
    pub open: Option<bool>,
    pub accessible: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoomRequest {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub kind: Option<String>,
    pub open: Option<bool>,
    pub accessible: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomList {
    pub items: Vec<Room>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms))
        .route("/", post(create_room))
        .route("/{id}", get(get_room))
        .route("/{id}", put(update_room))
        .route("/{id}", delete(delete_room))
}

#[utoipa::path(
    get,
    path = "/api/rooms",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List rooms", body = ApiResponse<RoomList>)
    ),
    tag = "Rooms"
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<RoomList>>> {
    let resp = room_service::list_rooms(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Get room", body = ApiResponse<Room>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Rooms"
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Room>>> {
    let resp = room_service::get_room(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Create room", body = ApiResponse<Room>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Name already taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
pub async fn create_room(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateRoomRequest>,
) -> AppResult<Json<ApiResponse<Room>>> {
    let resp = room_service::create_room(&state, &principal, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Update room", body = ApiResponse<Room>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
pub async fn update_room(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoomRequest>,
) -> AppResult<Json<ApiResponse<Room>>> {
    let resp = room_service::update_room(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Delete room"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Room still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Rooms"
)]
pub async fn delete_room(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = room_service::delete_room(&state, &principal, id).await?;
    Ok(Json(resp))
}
