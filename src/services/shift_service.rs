use chrono::{DateTime, Duration, NaiveTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

use crate::{
    entity::{
        employees::Entity as Employees,
        working_shifts::{ActiveModel as ShiftActive, Column as ShiftCol, Entity as WorkingShifts},
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, ensure_admin},
    models::WorkingShift,
    response::{ApiResponse, Meta},
    routes::params::ShiftQuery,
    routes::shifts::{CreateShiftRequest, ShiftList, UpdateShiftRequest},
    services::scheduling,
    state::AppState,
};

/// Positions a shift can be scheduled for; one person per position at a time.
pub const SHIFT_POSITIONS: &[&str] = &["reception", "confectionery", "projection"];

fn validate_position(position: &str) -> AppResult<()> {
    if !SHIFT_POSITIONS.contains(&position) {
        return Err(AppError::validation(format!(
            "position must be one of: {}",
            SHIFT_POSITIONS.join(", ")
        )));
    }
    Ok(())
}

pub async fn list_shifts(
    state: &AppState,
    principal: &Principal,
    query: ShiftQuery,
) -> AppResult<ApiResponse<ShiftList>> {
    ensure_admin(principal)?;
    let (page, per_page, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(employee_id) = query.employee_id {
        condition = condition.add(ShiftCol::EmployeeId.eq(employee_id));
    }
    if let Some(position) = query.position.as_ref().filter(|p| !p.is_empty()) {
        condition = condition.add(ShiftCol::Position.eq(position.clone()));
    }
    if let Some(day) = query.day {
        let from = day.and_time(NaiveTime::MIN).and_utc();
        let to = from + Duration::days(1);
        condition = condition
            .add(ShiftCol::StartTime.gte(DateTimeWithTimeZone::from(from)))
            .add(ShiftCol::StartTime.lt(DateTimeWithTimeZone::from(to)));
    }

    let finder = WorkingShifts::find()
        .filter(condition)
        .order_by_asc(ShiftCol::StartTime);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(WorkingShift::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Ok", ShiftList { items }, Some(meta)))
}

pub async fn get_shift(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<WorkingShift>> {
    ensure_admin(principal)?;

    let shift = WorkingShifts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Ok", shift.into(), Some(Meta::empty())))
}

pub async fn create_shift(
    state: &AppState,
    principal: &Principal,
    payload: CreateShiftRequest,
) -> AppResult<ApiResponse<WorkingShift>> {
    ensure_admin(principal)?;

    validate_position(&payload.position)?;
    scheduling::validate_shift_window(payload.start_time, payload.end_time)?;

    Employees::find_by_id(payload.employee_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let txn = state.orm.begin().await?;

    if scheduling::shift_overlap_exists(
        &txn,
        &payload.position,
        payload.start_time,
        payload.end_time,
        None,
    )
    .await?
    {
        return Err(AppError::conflict(
            "another shift overlaps that time slot for this position",
        ));
    }

    let shift = ShiftActive {
        id: NotSet,
        employee_id: Set(payload.employee_id),
        position: Set(payload.position),
        start_time: Set(payload.start_time.into()),
        end_time: Set(payload.end_time.into()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Shift created",
        shift.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_shift(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: UpdateShiftRequest,
) -> AppResult<ApiResponse<WorkingShift>> {
    ensure_admin(principal)?;

    let txn = state.orm.begin().await?;

    let existing = WorkingShifts::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let employee_id = payload.employee_id.unwrap_or(existing.employee_id);
    let position = payload
        .position
        .clone()
        .unwrap_or_else(|| existing.position.clone());
    let start_time: DateTime<Utc> = payload
        .start_time
        .unwrap_or_else(|| existing.start_time.with_timezone(&Utc));
    let end_time: DateTime<Utc> = payload
        .end_time
        .unwrap_or_else(|| existing.end_time.with_timezone(&Utc));

    validate_position(&position)?;
    scheduling::validate_shift_window(start_time, end_time)?;

    if payload.employee_id.is_some() {
        Employees::find_by_id(employee_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
    }

    let reschedule = payload.position.is_some()
        || payload.start_time.is_some()
        || payload.end_time.is_some();
    if reschedule
        && scheduling::shift_overlap_exists(&txn, &position, start_time, end_time, Some(id))
            .await?
    {
        return Err(AppError::conflict(
            "another shift overlaps that time slot for this position",
        ));
    }

    let mut active: ShiftActive = existing.into();
    active.employee_id = Set(employee_id);
    active.position = Set(position);
    active.start_time = Set(start_time.into());
    active.end_time = Set(end_time.into());
    let shift = active.update(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Updated",
        shift.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_shift(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(principal)?;

    let result = WorkingShifts::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::deleted())
}
