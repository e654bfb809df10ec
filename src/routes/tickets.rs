use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};

use crate::{
    dto::tickets::{BuyTicketRequest, CreateTicketRequest, TicketList},
    error::AppResult,
    middleware::auth::Principal,
    models::Ticket,
    response::ApiResponse,
    routes::params::{ListQuery, TicketListQuery},
    services::ticket_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tickets))
        .route("/", post(create_ticket))
        .route("/mine", get(my_tickets))
        .route("/{id}", get(get_ticket))
        .route("/{id}", delete(delete_ticket))
        .route("/{id}/buy", post(buy_ticket))
        .route("/{id}/use", post(use_ticket))
        .route("/{id}/refund", post(refund_ticket))
}

#[utoipa::path(
    get,
    path = "/api/tickets",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("screening_id" = Option<i32>, Query, description = "Filter by screening"),
        ("sold" = Option<bool>, Query, description = "Filter by sold state"),
    ),
    responses(
        (status = 200, description = "List tickets", body = ApiResponse<TicketList>)
    ),
    tag = "Tickets"
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<TicketListQuery>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let resp = ticket_service::list_tickets(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tickets/mine",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List the caller's tickets", body = ApiResponse<TicketList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn my_tickets(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let resp = ticket_service::my_tickets(&state, &principal, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    params(("id" = i32, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Get ticket", body = ApiResponse<Ticket>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Tickets"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = ticket_service::get_ticket(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/tickets",
    request_body = CreateTicketRequest,
    responses(
        (status = 200, description = "Create unsold ticket", body = ApiResponse<Ticket>),
        (status = 400, description = "Seat outside room capacity"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Screening not found"),
        (status = 409, description = "Ticket for that seat exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateTicketRequest>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = ticket_service::create_ticket(&state, &principal, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/buy",
    params(("id" = i32, Path, description = "Ticket ID")),
    request_body = BuyTicketRequest,
    responses(
        (status = 200, description = "Buy ticket", body = ApiResponse<Ticket>),
        (status = 402, description = "Insufficient funds"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Seat already booked"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn buy_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<BuyTicketRequest>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = ticket_service::buy_ticket(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/use",
    params(("id" = i32, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Mark ticket used", body = ApiResponse<Ticket>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Ticket not sold"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn use_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = ticket_service::use_ticket(&state, &principal, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/refund",
    params(("id" = i32, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Refund ticket", body = ApiResponse<Ticket>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Ticket not sold or already used"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn refund_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = ticket_service::refund_ticket(&state, &principal, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/tickets/{id}",
    params(("id" = i32, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Delete ticket"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn delete_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = ticket_service::delete_ticket(&state, &principal, id).await?;
    Ok(Json(resp))
}
