use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};

use crate::{
    dto::super_tickets::{
        BookSeatRequest, BookingList, BuySuperTicketRequest, CreateSuperTicketRequest,
        RemainingUses, SuperTicketList, UpdateSuperTicketRequest,
    },
    error::AppResult,
    middleware::auth::Principal,
    models::SuperTicket,
    response::ApiResponse,
    routes::params::{ListQuery, SuperTicketQuery},
    services::super_ticket_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_super_tickets))
        .route("/", post(create_super_ticket))
        .route("/mine", get(my_super_tickets))
        .route("/{id}", get(get_super_ticket))
        .route("/{id}", put(update_super_ticket))
        .route("/{id}", delete(delete_super_ticket))
        .route("/{id}/buy", post(buy_super_ticket))
        .route("/{id}/book", post(book_seat))
        .route("/{id}/cancel", post(cancel_booking))
        .route("/{id}/bookings", get(list_bookings))
}

#[utoipa::path(
    get,
    path = "/api/super-tickets",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("owned" = Option<bool>, Query, description = "Filter by ownership state"),
    ),
    responses(
        (status = 200, description = "List super tickets", body = ApiResponse<SuperTicketList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn list_super_tickets(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<SuperTicketQuery>,
) -> AppResult<Json<ApiResponse<SuperTicketList>>> {
    let resp = super_ticket_service::list_super_tickets(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/super-tickets/mine",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List the caller's super tickets", body = ApiResponse<SuperTicketList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn my_super_tickets(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<SuperTicketList>>> {
    let resp = super_ticket_service::my_super_tickets(&state, &principal, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/super-tickets/{id}",
    params(("id" = i32, Path, description = "Super ticket ID")),
    responses(
        (status = 200, description = "Get super ticket", body = ApiResponse<SuperTicket>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn get_super_ticket(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<SuperTicket>>> {
    let resp = super_ticket_service::get_super_ticket(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/super-tickets",
    request_body = CreateSuperTicketRequest,
    responses(
        (status = 200, description = "Create super ticket", body = ApiResponse<SuperTicket>),
        (status = 400, description = "Negative price or uses"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn create_super_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateSuperTicketRequest>,
) -> AppResult<Json<ApiResponse<SuperTicket>>> {
    let resp = super_ticket_service::create_super_ticket(&state, &principal, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/super-tickets/{id}/buy",
    params(("id" = i32, Path, description = "Super ticket ID")),
    request_body = BuySuperTicketRequest,
    responses(
        (status = 200, description = "Buy super ticket", body = ApiResponse<SuperTicket>),
        (status = 402, description = "Insufficient funds"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Already owned"),
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn buy_super_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<BuySuperTicketRequest>,
) -> AppResult<Json<ApiResponse<SuperTicket>>> {
    let resp = super_ticket_service::buy_super_ticket(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/super-tickets/{id}/book",
    params(("id" = i32, Path, description = "Super ticket ID")),
    request_body = BookSeatRequest,
    responses(
        (status = 200, description = "Book a seat with the pass", body = ApiResponse<RemainingUses>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Seat taken or no uses remaining"),
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn book_seat(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<BookSeatRequest>,
) -> AppResult<Json<ApiResponse<RemainingUses>>> {
    let resp = super_ticket_service::book_seat(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/super-tickets/{id}/cancel",
    params(("id" = i32, Path, description = "Super ticket ID")),
    request_body = BookSeatRequest,
    responses(
        (status = 200, description = "Cancel a booking and return the use", body = ApiResponse<RemainingUses>),
        (status = 403, description = "Not the holder of the pass"),
        (status = 404, description = "No such booking held by this pass"),
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<BookSeatRequest>,
) -> AppResult<Json<ApiResponse<RemainingUses>>> {
    let resp = super_ticket_service::cancel_booking(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/super-tickets/{id}/bookings",
    params(("id" = i32, Path, description = "Super ticket ID")),
    responses(
        (status = 200, description = "List the pass's seat bookings", body = ApiResponse<BookingList>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<BookingList>>> {
    let resp = super_ticket_service::list_bookings(&state, &principal, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/super-tickets/{id}",
    params(("id" = i32, Path, description = "Super ticket ID")),
    request_body = UpdateSuperTicketRequest,
    responses(
        (status = 200, description = "Override super ticket fields", body = ApiResponse<SuperTicket>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn update_super_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSuperTicketRequest>,
) -> AppResult<Json<ApiResponse<SuperTicket>>> {
    let resp = super_ticket_service::update_super_ticket(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/super-tickets/{id}",
    params(("id" = i32, Path, description = "Super ticket ID")),
    responses(
        (status = 200, description = "Delete super ticket and its bookings"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Super tickets"
)]
pub async fn delete_super_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = super_ticket_service::delete_super_ticket(&state, &principal, id).await?;
    Ok(Json(resp))
}
