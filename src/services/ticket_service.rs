use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::{
    db::for_update,
    dto::tickets::{BuyTicketRequest, CreateTicketRequest, TicketList},
    entity::{
        rooms::Entity as Rooms,
        screenings::Entity as Screenings,
        tickets::{ActiveModel as TicketActive, Column as TicketCol, Entity as Tickets},
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, PrincipalKind, ensure_staff, resolve_buyer},
    models::Ticket,
    response::{ApiResponse, Meta},
    routes::params::{ListQuery, TicketListQuery},
    services::{balance, seats},
    state::AppState,
};

pub async fn list_tickets(
    state: &AppState,
    query: TicketListQuery,
) -> AppResult<ApiResponse<TicketList>> {
    let (page, per_page, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(screening_id) = query.screening_id {
        condition = condition.add(TicketCol::ScreeningId.eq(screening_id));
    }
    if let Some(sold) = query.sold {
        condition = match sold {
            true => condition.add(TicketCol::OwnerId.is_not_null()),
            false => condition.add(TicketCol::OwnerId.is_null()),
        };
    }

    let finder = Tickets::find()
        .filter(condition)
        .order_by_asc(TicketCol::ScreeningId)
        .order_by_asc(TicketCol::Seat);

    let total = finder.clone().count(&state.orm).await? as i64;

    let tickets = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Ticket::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success(
        "Ok",
        TicketList { items: tickets },
        Some(meta),
    ))
}

pub async fn my_tickets(
    state: &AppState,
    principal: &Principal,
    query: ListQuery,
) -> AppResult<ApiResponse<TicketList>> {
    if principal.kind != PrincipalKind::User {
        return Err(AppError::Forbidden);
    }
    let (page, per_page, offset) = query.pagination().normalize();

    let finder = Tickets::find()
        .filter(TicketCol::OwnerId.eq(principal.id))
        .order_by_asc(TicketCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let tickets = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Ticket::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success(
        "Ok",
        TicketList { items: tickets },
        Some(meta),
    ))
}

pub async fn get_ticket(state: &AppState, id: i32) -> AppResult<ApiResponse<Ticket>> {
    let ticket = Tickets::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Ok",
        ticket.into(),
        Some(Meta::empty()),
    ))
}

pub async fn create_ticket(
    state: &AppState,
    principal: &Principal,
    payload: CreateTicketRequest,
) -> AppResult<ApiResponse<Ticket>> {
    ensure_staff(principal)?;

    if payload.price < 0 {
        return Err(AppError::validation("price must not be negative"));
    }

    let screening = Screenings::find_by_id(payload.screening_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let room = Rooms::find_by_id(screening.room_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    seats::validate_seat(&room, payload.seat)?;

    let result = TicketActive {
        id: NotSet,
        screening_id: Set(payload.screening_id),
        seat: Set(payload.seat),
        price: Set(payload.price),
        used: Set(false),
        owner_id: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await;

    let ticket = match result {
        Ok(t) => t,
        Err(e) if e.sql_err().is_some_and(|err| {
            matches!(err, sea_orm::SqlErr::UniqueConstraintViolation(_))
        }) =>
        {
            return Err(AppError::conflict("a ticket for that seat already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(ApiResponse::success(
        "Ticket created",
        ticket.into(),
        Some(Meta::empty()),
    ))
}

/// Unsold -> Sold. Seat claim and debit commit together or not at all.
pub async fn buy_ticket(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: BuyTicketRequest,
) -> AppResult<ApiResponse<Ticket>> {
    let buyer_id = resolve_buyer(principal, payload.user_id)?;

    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    // An unlocked read first, to learn the screening: the screening row
    // anchors the cross-ledger seat check and is always locked before the
    // ticket row. A ticket never moves to another screening once minted.
    let ticket = Tickets::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    for_update(Screenings::find_by_id(ticket.screening_id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let ticket = for_update(Tickets::find_by_id(id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if ticket.owner_id.is_some() {
        return Err(AppError::conflict("ticket is already sold"));
    }
    if seats::held_by_session(&txn, ticket.screening_id, ticket.seat).await? {
        return Err(AppError::conflict("seat is held by a super ticket booking"));
    }

    // Conditional claim: a concurrent buyer who got here first makes this a no-op.
    let claimed = Tickets::update_many()
        .col_expr(TicketCol::OwnerId, Expr::value(Some(buyer_id)))
        .filter(TicketCol::Id.eq(id))
        .filter(TicketCol::OwnerId.is_null())
        .exec(&txn)
        .await?;
    if claimed.rows_affected == 0 {
        return Err(AppError::conflict("ticket is already sold"));
    }

    balance::debit(&txn, buyer_id, ticket.price).await?;

    txn.commit().await?;
    tracing::info!(ticket_id = id, buyer_id, price = ticket.price, "ticket sold");

    let mut ticket = ticket;
    ticket.owner_id = Some(buyer_id);
    Ok(ApiResponse::success(
        "Ticket purchased",
        ticket.into(),
        Some(Meta::empty()),
    ))
}

pub async fn use_ticket(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<Ticket>> {
    ensure_staff(principal)?;

    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    let ticket = for_update(Tickets::find_by_id(id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if ticket.owner_id.is_none() {
        return Err(AppError::NotSold);
    }
    if ticket.used {
        return Ok(ApiResponse::success(
            "Ticket already used",
            ticket.into(),
            Some(Meta::empty()),
        ));
    }

    let mut active: TicketActive = ticket.into();
    active.used = Set(true);
    let ticket = active.update(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Ticket used",
        ticket.into(),
        Some(Meta::empty()),
    ))
}

/// Sold -> Unsold: clears the owner and returns the ticket's current price.
/// Used tickets stay final; only the bulk screening refund touches those.
pub async fn refund_ticket(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<Ticket>> {
    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    let ticket = for_update(Tickets::find_by_id(id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let owner_id = ticket.owner_id.ok_or(AppError::NotSold)?;

    let is_owner = principal.kind == PrincipalKind::User && owner_id == principal.id;
    if !is_owner && !principal.is_staff() {
        return Err(AppError::Forbidden);
    }
    if ticket.used {
        return Err(AppError::conflict("used tickets cannot be refunded"));
    }

    balance::credit(&txn, owner_id, ticket.price).await?;

    let mut active: TicketActive = ticket.into();
    active.owner_id = Set(None);
    active.used = Set(false);
    let ticket = active.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(ticket_id = id, owner_id, "ticket refunded");

    Ok(ApiResponse::success(
        "Ticket refunded",
        ticket.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_ticket(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(principal)?;
    let result = Tickets::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::deleted())
}

/// Refunds every owned ticket of a screening, used ones included, and clears
/// their owners. Runs inside the caller's transaction so the refunds land
/// together with whatever cascade triggered them. Returns the refund count.
///
/// The sold rows are read under lock, and each one is released with an update
/// keyed on the owner it was read with; a row a concurrent refund already
/// cleared matches nothing and is not credited again.
pub async fn refund_screening_tickets<C: ConnectionTrait>(
    conn: &C,
    screening_id: i32,
) -> AppResult<u64> {
    let backend = conn.get_database_backend();
    let sold = for_update(
        Tickets::find()
            .filter(TicketCol::ScreeningId.eq(screening_id))
            .filter(TicketCol::OwnerId.is_not_null()),
        backend,
    )
    .all(conn)
    .await?;

    let mut refunded: u64 = 0;
    for ticket in &sold {
        let Some(owner_id) = ticket.owner_id else {
            continue;
        };
        let released = Tickets::update_many()
            .col_expr(TicketCol::OwnerId, Expr::value(Option::<i32>::None))
            .col_expr(TicketCol::Used, Expr::value(false))
            .filter(TicketCol::Id.eq(ticket.id))
            .filter(TicketCol::OwnerId.eq(owner_id))
            .exec(conn)
            .await?;
        if released.rows_affected == 1 {
            balance::credit(conn, owner_id, ticket.price).await?;
            refunded += 1;
        }
    }

    Ok(refunded)
}
