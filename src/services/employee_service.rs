use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

use crate::{
    entity::{
        employees::{ActiveModel as EmployeeActive, Column as EmployeeCol, Entity as Employees},
        working_shifts::{Column as ShiftCol, Entity as WorkingShifts},
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, PrincipalKind, ensure_admin},
    models::Employee,
    response::{ApiResponse, Meta},
    routes::employees::{CreateEmployeeRequest, EmployeeList, UpdateEmployeeRequest},
    routes::params::ListQuery,
    services::auth_service,
    state::AppState,
};

/// Roles an employee account can hold; customers are always plain `user`.
pub const EMPLOYEE_ROLES: &[&str] = &["staff", "admin"];

fn validate_role(role: &str) -> AppResult<()> {
    if !EMPLOYEE_ROLES.contains(&role) {
        return Err(AppError::validation(format!(
            "role must be one of: {}",
            EMPLOYEE_ROLES.join(", ")
        )));
    }
    Ok(())
}

pub async fn me(state: &AppState, principal: &Principal) -> AppResult<ApiResponse<Employee>> {
    if principal.kind != PrincipalKind::Employee {
        return Err(AppError::Forbidden);
    }
    let employee = Employees::find_by_id(principal.id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Ok",
        employee.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_employees(
    state: &AppState,
    principal: &Principal,
    query: ListQuery,
) -> AppResult<ApiResponse<EmployeeList>> {
    ensure_admin(principal)?;
    let (page, per_page, offset) = query.pagination().normalize();

    let finder = Employees::find().order_by_asc(EmployeeCol::Id);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Employee::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success(
        "Ok",
        EmployeeList { items },
        Some(meta),
    ))
}

pub async fn get_employee(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<Employee>> {
    ensure_admin(principal)?;

    let employee = Employees::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Ok",
        employee.into(),
        Some(Meta::empty()),
    ))
}

pub async fn create_employee(
    state: &AppState,
    principal: &Principal,
    payload: CreateEmployeeRequest,
) -> AppResult<ApiResponse<Employee>> {
    ensure_admin(principal)?;

    validate_role(&payload.role)?;

    let exists = Employees::find()
        .filter(EmployeeCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::conflict("email is already taken"));
    }

    let password_hash = auth_service::hash_password(&payload.password)?;

    let employee = EmployeeActive {
        id: NotSet,
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        phone: Set(payload.phone),
        email: Set(payload.email),
        password_hash: Set(password_hash),
        role: Set(payload.role),
        current_token: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Employee created",
        employee.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_employee(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: UpdateEmployeeRequest,
) -> AppResult<ApiResponse<Employee>> {
    ensure_admin(principal)?;

    let existing = Employees::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(role) = payload.role.as_ref() {
        validate_role(role)?;
    }
    if let Some(email) = payload.email.as_ref() {
        let clash = Employees::find()
            .filter(EmployeeCol::Email.eq(email.as_str()))
            .filter(EmployeeCol::Id.ne(id))
            .one(&state.orm)
            .await?;
        if clash.is_some() {
            return Err(AppError::conflict("email is already taken"));
        }
    }

    let mut active: EmployeeActive = existing.into();
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(password) = payload.password {
        active.password_hash = Set(auth_service::hash_password(&password)?);
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }

    let employee = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        employee.into(),
        Some(Meta::empty()),
    ))
}

/// Removing an employee takes their scheduled shifts with them.
pub async fn delete_employee(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(principal)?;

    let txn = state.orm.begin().await?;

    Employees::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    WorkingShifts::delete_many()
        .filter(ShiftCol::EmployeeId.eq(id))
        .exec(&txn)
        .await?;
    Employees::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::deleted())
}
