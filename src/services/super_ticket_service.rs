use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::{
    db::for_update,
    dto::super_tickets::{
        BookSeatRequest, BookingList, BuySuperTicketRequest, CreateSuperTicketRequest,
        RemainingUses, SuperTicketList, UpdateSuperTicketRequest,
    },
    entity::{
        rooms::Entity as Rooms,
        screenings::Entity as Screenings,
        super_ticket_sessions::{
            ActiveModel as SessionActive, Column as SessionCol, Entity as SuperTicketSessions,
        },
        super_tickets::{
            self, ActiveModel as SuperTicketActive, Column as SuperTicketCol,
            Entity as SuperTickets,
        },
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, PrincipalKind, ensure_admin, ensure_staff, resolve_buyer},
    models::{SuperTicket, SuperTicketSession},
    response::{ApiResponse, Meta},
    routes::params::{ListQuery, SuperTicketQuery},
    services::{balance, seats},
    state::AppState,
};

pub async fn list_super_tickets(
    state: &AppState,
    query: SuperTicketQuery,
) -> AppResult<ApiResponse<SuperTicketList>> {
    let (page, per_page, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(owned) = query.owned {
        condition = match owned {
            true => condition.add(SuperTicketCol::OwnerId.is_not_null()),
            false => condition.add(SuperTicketCol::OwnerId.is_null()),
        };
    }

    let finder = SuperTickets::find()
        .filter(condition)
        .order_by_asc(SuperTicketCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(SuperTicket::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success(
        "Ok",
        SuperTicketList { items },
        Some(meta),
    ))
}

pub async fn my_super_tickets(
    state: &AppState,
    principal: &Principal,
    query: ListQuery,
) -> AppResult<ApiResponse<SuperTicketList>> {
    if principal.kind != PrincipalKind::User {
        return Err(AppError::Forbidden);
    }
    let (page, per_page, offset) = query.pagination().normalize();

    let finder = SuperTickets::find()
        .filter(SuperTicketCol::OwnerId.eq(principal.id))
        .order_by_asc(SuperTicketCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(SuperTicket::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success(
        "Ok",
        SuperTicketList { items },
        Some(meta),
    ))
}

pub async fn get_super_ticket(state: &AppState, id: i32) -> AppResult<ApiResponse<SuperTicket>> {
    let super_ticket = SuperTickets::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Ok",
        super_ticket.into(),
        Some(Meta::empty()),
    ))
}

pub async fn create_super_ticket(
    state: &AppState,
    principal: &Principal,
    payload: CreateSuperTicketRequest,
) -> AppResult<ApiResponse<SuperTicket>> {
    ensure_staff(principal)?;

    if payload.price < 0 {
        return Err(AppError::validation("price must not be negative"));
    }
    if payload.uses < 0 {
        return Err(AppError::validation("uses must not be negative"));
    }

    let super_ticket = SuperTicketActive {
        id: NotSet,
        price: Set(payload.price),
        uses: Set(payload.uses),
        owner_id: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Super ticket created",
        super_ticket.into(),
        Some(Meta::empty()),
    ))
}

/// Unsold -> Owned, exactly once. Owner claim and debit commit together.
pub async fn buy_super_ticket(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: BuySuperTicketRequest,
) -> AppResult<ApiResponse<SuperTicket>> {
    let buyer_id = resolve_buyer(principal, payload.user_id)?;

    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    let super_ticket = for_update(SuperTickets::find_by_id(id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if super_ticket.owner_id.is_some() {
        return Err(AppError::conflict("super ticket is already owned"));
    }

    let claimed = SuperTickets::update_many()
        .col_expr(SuperTicketCol::OwnerId, Expr::value(Some(buyer_id)))
        .filter(SuperTicketCol::Id.eq(id))
        .filter(SuperTicketCol::OwnerId.is_null())
        .exec(&txn)
        .await?;
    if claimed.rows_affected == 0 {
        return Err(AppError::conflict("super ticket is already owned"));
    }

    balance::debit(&txn, buyer_id, super_ticket.price).await?;

    txn.commit().await?;
    tracing::info!(
        super_ticket_id = id,
        buyer_id,
        price = super_ticket.price,
        "super ticket sold"
    );

    let mut super_ticket = super_ticket;
    super_ticket.owner_id = Some(buyer_id);
    Ok(ApiResponse::success(
        "Super ticket purchased",
        super_ticket.into(),
        Some(Meta::empty()),
    ))
}

/// Spends one use to hold a seat. The pass counter and the session row move
/// together; the UNIQUE (screening_id, seat) index decides insert races.
pub async fn book_seat(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: BookSeatRequest,
) -> AppResult<ApiResponse<RemainingUses>> {
    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    // The screening row anchors the cross-ledger seat check and is always
    // locked before the pass row.
    let screening = for_update(Screenings::find_by_id(payload.screening_id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let super_ticket = for_update(SuperTickets::find_by_id(id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_pass_owner(principal, &super_ticket)?;
    if super_ticket.uses <= 0 {
        return Err(AppError::NoUsesRemaining);
    }

    let room = Rooms::find_by_id(screening.room_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    seats::validate_seat(&room, payload.seat)?;

    if seats::seat_taken(&txn, payload.screening_id, payload.seat).await? {
        return Err(AppError::conflict("seat is already booked"));
    }

    let spent = SuperTickets::update_many()
        .col_expr(
            SuperTicketCol::Uses,
            Expr::col(SuperTicketCol::Uses).sub(1),
        )
        .filter(SuperTicketCol::Id.eq(id))
        .filter(SuperTicketCol::Uses.gt(0))
        .exec(&txn)
        .await?;
    if spent.rows_affected == 0 {
        return Err(AppError::NoUsesRemaining);
    }

    let inserted = SessionActive {
        id: NotSet,
        super_ticket_id: Set(id),
        screening_id: Set(payload.screening_id),
        seat: Set(payload.seat),
        created_at: NotSet,
    }
    .insert(&txn)
    .await;
    if let Err(e) = inserted {
        if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
            return Err(AppError::conflict("seat is already booked"));
        }
        return Err(e.into());
    }

    txn.commit().await?;

    let remaining = super_ticket.uses - 1;
    tracing::info!(
        super_ticket_id = id,
        screening_id = payload.screening_id,
        seat = payload.seat,
        remaining,
        "seat booked"
    );
    Ok(ApiResponse::success(
        "Seat booked",
        RemainingUses { uses: remaining },
        Some(Meta::empty()),
    ))
}

/// Inverse of [`book_seat`]: releases the held seat and returns the use.
/// A seat this pass does not hold, including one held by a different pass,
/// reads as no booking at all.
pub async fn cancel_booking(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: BookSeatRequest,
) -> AppResult<ApiResponse<RemainingUses>> {
    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    for_update(Screenings::find_by_id(payload.screening_id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let super_ticket = for_update(SuperTickets::find_by_id(id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_pass_owner(principal, &super_ticket)?;

    // The delete is scoped to this pass; zero rows affected means it holds
    // no such booking, and the use only comes back for a row it removed.
    let released = SuperTicketSessions::delete_many()
        .filter(SessionCol::SuperTicketId.eq(id))
        .filter(SessionCol::ScreeningId.eq(payload.screening_id))
        .filter(SessionCol::Seat.eq(payload.seat))
        .exec(&txn)
        .await?;
    if released.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    SuperTickets::update_many()
        .col_expr(
            SuperTicketCol::Uses,
            Expr::col(SuperTicketCol::Uses).add(1),
        )
        .filter(SuperTicketCol::Id.eq(id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    let remaining = super_ticket.uses + 1;
    tracing::info!(
        super_ticket_id = id,
        screening_id = payload.screening_id,
        seat = payload.seat,
        remaining,
        "booking cancelled"
    );
    Ok(ApiResponse::success(
        "Booking cancelled",
        RemainingUses { uses: remaining },
        Some(Meta::empty()),
    ))
}

pub async fn list_bookings(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<BookingList>> {
    let super_ticket = SuperTickets::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let is_owner =
        principal.kind == PrincipalKind::User && super_ticket.owner_id == Some(principal.id);
    if !is_owner && !principal.is_staff() {
        return Err(AppError::Forbidden);
    }

    let items = SuperTicketSessions::find()
        .filter(SessionCol::SuperTicketId.eq(id))
        .order_by_asc(SessionCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(SuperTicketSession::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        BookingList { items },
        Some(Meta::empty()),
    ))
}

/// Administrative override; fields are written as given without replaying the
/// lifecycle rules.
pub async fn update_super_ticket(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: UpdateSuperTicketRequest,
) -> AppResult<ApiResponse<SuperTicket>> {
    ensure_admin(principal)?;

    let existing = SuperTickets::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: SuperTicketActive = existing.into();
    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::validation("price must not be negative"));
        }
        active.price = Set(price);
    }
    if let Some(uses) = payload.uses {
        if uses < 0 {
            return Err(AppError::validation("uses must not be negative"));
        }
        active.uses = Set(uses);
    }
    if let Some(owner_id) = payload.owner_id {
        if let Some(user_id) = owner_id {
            Users::find_by_id(user_id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?;
        }
        active.owner_id = Set(owner_id);
    }

    let super_ticket = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        super_ticket.into(),
        Some(Meta::empty()),
    ))
}

/// Drops the pass together with every seat it still holds.
pub async fn delete_super_ticket(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(principal)?;

    let txn = state.orm.begin().await?;

    SuperTickets::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    SuperTicketSessions::delete_many()
        .filter(SessionCol::SuperTicketId.eq(id))
        .exec(&txn)
        .await?;
    SuperTickets::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::deleted())
}

fn ensure_pass_owner(principal: &Principal, pass: &super_tickets::Model) -> AppResult<()> {
    let is_owner = principal.kind == PrincipalKind::User && pass.owner_id == Some(principal.id);
    if !is_owner {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
