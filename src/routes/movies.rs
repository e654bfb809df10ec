use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::tickets::RefundSummary,
    error::AppResult,
    middleware::auth::Principal,
    models::Movie,
    response::ApiResponse,
    routes::params::MovieQuery,
    services::movie_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    pub release_date: NaiveDate,
    pub duration_minutes: i32,
    pub status: String,
    pub category_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub duration_minutes: Option<i32>,
    pub status: Option<String>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieList {
    pub items: Vec<Movie>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movies))
        .route("/", post(create_movie))
        .route("/{id}", get(get_movie))
        .route("/{id}", put(update_movie))
        .route("/{id}", delete(delete_movie))
}

#[utoipa::path(
    get,
    path = "/api/movies",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Title search"),
        ("category_id" = Option<i32>, Query, description = "Filter by category"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_by" = Option<String>, Query, description = "Sort key: created_at, title, release_date"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc"),
    ),
    responses(
        (status = 200, description = "List movies", body = ApiResponse<MovieList>)
    ),
    tag = "Movies"
)]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieQuery>,
) -> AppResult<Json<ApiResponse<MovieList>>> {
    let resp = movie_service::list_movies(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/movies/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Get movie", body = ApiResponse<Movie>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Movies"
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Movie>>> {
    let resp = movie_service::get_movie(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 200, description = "Create movie", body = ApiResponse<Movie>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Title already taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn create_movie(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateMovieRequest>,
) -> AppResult<Json<ApiResponse<Movie>>> {
    let resp = movie_service::create_movie(&state, &principal, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/movies/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Update movie", body = ApiResponse<Movie>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn update_movie(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMovieRequest>,
) -> AppResult<Json<ApiResponse<Movie>>> {
    let resp = movie_service::update_movie(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/movies/{id}",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Delete movie and refund its screenings", body = ApiResponse<RefundSummary>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Movies"
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<RefundSummary>>> {
    let resp = movie_service::delete_movie(&state, &principal, id).await?;
    Ok(Json(resp))
}
