use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    entity::{
        super_tickets::{Column as SuperTicketCol, Entity as SuperTickets},
        tickets::{Column as TicketCol, Entity as Tickets},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, PrincipalKind, ensure_admin},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    routes::users::{AmountRequest, BalanceResponse, UserList},
    services::balance,
    state::AppState,
};

pub async fn me(state: &AppState, principal: &Principal) -> AppResult<ApiResponse<User>> {
    if principal.kind != PrincipalKind::User {
        return Err(AppError::Forbidden);
    }
    let user = Users::find_by_id(principal.id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Ok", user.into(), Some(Meta::empty())))
}

pub async fn list_users(
    state: &AppState,
    principal: &Principal,
    query: ListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(principal)?;
    let (page, per_page, offset) = query.pagination().normalize();

    let finder = Users::find().order_by_asc(UserCol::Id);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Ok", UserList { items }, Some(meta)))
}

pub async fn get_user(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(principal)?;

    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Ok", user.into(), Some(Meta::empty())))
}

/// An account holding live bookings cannot be removed; refund or reassign
/// those first, otherwise the paid-for claims would vanish with the owner.
pub async fn delete_user(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(principal)?;

    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let owns_tickets = Tickets::find()
        .filter(TicketCol::OwnerId.eq(id))
        .count(&state.orm)
        .await?;
    if owns_tickets > 0 {
        return Err(AppError::conflict("user still owns tickets"));
    }
    let owns_passes = SuperTickets::find()
        .filter(SuperTicketCol::OwnerId.eq(id))
        .count(&state.orm)
        .await?;
    if owns_passes > 0 {
        return Err(AppError::conflict("user still owns super tickets"));
    }

    Users::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::deleted())
}

pub async fn deposit(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: AmountRequest,
) -> AppResult<ApiResponse<BalanceResponse>> {
    let is_self = principal.kind == PrincipalKind::User && principal.id == id;
    if !is_self && !principal.is_admin() {
        return Err(AppError::Forbidden);
    }

    let money = balance::credit(&state.orm, id, payload.amount).await?;
    tracing::info!(user_id = id, amount = payload.amount, "balance deposit");

    Ok(ApiResponse::success(
        "Deposit applied",
        BalanceResponse { money },
        Some(Meta::empty()),
    ))
}

pub async fn withdraw(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: AmountRequest,
) -> AppResult<ApiResponse<BalanceResponse>> {
    ensure_admin(principal)?;

    let money = balance::debit(&state.orm, id, payload.amount).await?;
    tracing::info!(user_id = id, amount = payload.amount, "balance withdrawal");

    Ok(ApiResponse::success(
        "Withdrawal applied",
        BalanceResponse { money },
        Some(Meta::empty()),
    ))
}
