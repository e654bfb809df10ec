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
    models::Employee,
    response::ApiResponse,
    routes::params::ListQuery,
    services::employee_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeList {
    pub items: Vec<Employee>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees))
        .route("/", post(create_employee))
        .route("/me", get(my_profile))
        .route("/{id}", get(get_employee))
        .route("/{id}", put(update_employee))
        .route("/{id}", delete(delete_employee))
}

#[utoipa::path(
    get,
    path = "/api/employees/me",
    responses(
        (status = 200, description = "The caller's employee account", body = ApiResponse<Employee>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn my_profile(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let resp = employee_service::me(&state, &principal).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List employees", body = ApiResponse<EmployeeList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<EmployeeList>>> {
    let resp = employee_service::list_employees(&state, &principal, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Get employee", body = ApiResponse<Employee>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let resp = employee_service::get_employee(&state, &principal, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 200, description = "Create employee", body = ApiResponse<Employee>),
        (status = 400, description = "Unknown role"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Email already taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<CreateEmployeeRequest>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let resp = employee_service::create_employee(&state, &principal, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = i32, Path, description = "Employee ID")),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Update employee", body = ApiResponse<Employee>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let resp = employee_service::update_employee(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Delete employee and their shifts"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = employee_service::delete_employee(&state, &principal, id).await?;
    Ok(Json(resp))
}
