use chrono::{DateTime, Duration, NaiveTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::{
    db::for_update,
    dto::tickets::RefundSummary,
    entity::{
        movies::Entity as Movies,
        rooms::Entity as Rooms,
        screenings::{ActiveModel as ScreeningActive, Column as ScreeningCol, Entity as Screenings},
        super_ticket_sessions::{Column as SessionCol, Entity as SuperTicketSessions},
        super_tickets::{Column as SuperTicketCol, Entity as SuperTickets},
        tickets::{Column as TicketCol, Entity as Tickets},
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, ensure_staff},
    models::Screening,
    response::{ApiResponse, Meta},
    routes::params::ScreeningQuery,
    routes::screenings::{CreateScreeningRequest, ScreeningList, UpdateScreeningRequest},
    services::{scheduling, ticket_service},
    state::AppState,
};

pub async fn list_screenings(
    state: &AppState,
    query: ScreeningQuery,
) -> AppResult<ApiResponse<ScreeningList>> {
    let (page, per_page, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(movie_id) = query.movie_id {
        condition = condition.add(ScreeningCol::MovieId.eq(movie_id));
    }
    if let Some(room_id) = query.room_id {
        condition = condition.add(ScreeningCol::RoomId.eq(room_id));
    }
    if let Some(day) = query.day {
        let from = day.and_time(NaiveTime::MIN).and_utc();
        let to = from + Duration::days(1);
        condition = condition
            .add(ScreeningCol::StartTime.gte(DateTimeWithTimeZone::from(from)))
            .add(ScreeningCol::StartTime.lt(DateTimeWithTimeZone::from(to)));
    }

    let finder = Screenings::find()
        .filter(condition)
        .order_by_asc(ScreeningCol::StartTime);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Screening::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success(
        "Ok",
        ScreeningList { items },
        Some(meta),
    ))
}

pub async fn get_screening(state: &AppState, id: i32) -> AppResult<ApiResponse<Screening>> {
    let screening = Screenings::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Ok",
        screening.into(),
        Some(Meta::empty()),
    ))
}

pub async fn create_screening(
    state: &AppState,
    principal: &Principal,
    payload: CreateScreeningRequest,
) -> AppResult<ApiResponse<Screening>> {
    ensure_staff(principal)?;

    if payload.ticket_price < 0 {
        return Err(AppError::validation("ticket_price must not be negative"));
    }

    let movie = Movies::find_by_id(payload.movie_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let end_time = payload.start_time + Duration::minutes(movie.duration_minutes as i64);

    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    // The room row anchors concurrent schedule changes for that room.
    let room = for_update(Rooms::find_by_id(payload.room_id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if !room.open {
        return Err(AppError::validation(format!(
            "room {} is closed",
            room.name
        )));
    }

    if scheduling::screening_overlap_exists(&txn, room.id, payload.start_time, end_time, None)
        .await?
    {
        return Err(AppError::conflict(
            "another screening overlaps that time slot in this room",
        ));
    }

    let screening = ScreeningActive {
        id: NotSet,
        movie_id: Set(movie.id),
        room_id: Set(room.id),
        start_time: Set(payload.start_time.into()),
        end_time: Set(end_time.into()),
        ticket_price: Set(payload.ticket_price),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    tracing::info!(screening_id = screening.id, room_id = room.id, "screening created");

    Ok(ApiResponse::success(
        "Screening created",
        screening.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_screening(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: UpdateScreeningRequest,
) -> AppResult<ApiResponse<Screening>> {
    ensure_staff(principal)?;

    if let Some(price) = payload.ticket_price {
        if price < 0 {
            return Err(AppError::validation("ticket_price must not be negative"));
        }
    }

    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    let existing = for_update(Screenings::find_by_id(id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let movie_id = payload.movie_id.unwrap_or(existing.movie_id);
    let room_id = payload.room_id.unwrap_or(existing.room_id);
    let start_time: DateTime<Utc> = payload
        .start_time
        .unwrap_or_else(|| existing.start_time.with_timezone(&Utc));

    let movie = Movies::find_by_id(movie_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let end_time = start_time + Duration::minutes(movie.duration_minutes as i64);

    let reschedule = payload.movie_id.is_some()
        || payload.room_id.is_some()
        || payload.start_time.is_some();
    if reschedule {
        let room = for_update(Rooms::find_by_id(room_id), backend)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;
        if payload.room_id.is_some() && !room.open {
            return Err(AppError::validation(format!(
                "room {} is closed",
                room.name
            )));
        }
        if scheduling::screening_overlap_exists(&txn, room_id, start_time, end_time, Some(id))
            .await?
        {
            return Err(AppError::conflict(
                "another screening overlaps that time slot in this room",
            ));
        }
    }

    let mut active: ScreeningActive = existing.into();
    active.movie_id = Set(movie_id);
    active.room_id = Set(room_id);
    active.start_time = Set(start_time.into());
    active.end_time = Set(end_time.into());
    if let Some(price) = payload.ticket_price {
        active.ticket_price = Set(price);
    }
    let screening = active.update(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Updated",
        screening.into(),
        Some(Meta::empty()),
    ))
}

/// Refunds every sold ticket, then removes the screening and everything
/// hanging off it. The response reports how many refunds were paid out.
pub async fn delete_screening(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<RefundSummary>> {
    ensure_staff(principal)?;

    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    for_update(Screenings::find_by_id(id), backend)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let refunded = delete_screening_cascade(&txn, id).await?;

    txn.commit().await?;
    tracing::info!(screening_id = id, refunded, "screening deleted");

    Ok(ApiResponse::success(
        "Screening deleted",
        RefundSummary { refunded },
        Some(Meta::empty()),
    ))
}

/// Tears one screening down inside the caller's transaction: refunds sold
/// tickets, hands seats held by passes back as uses, then deletes the
/// tickets, the sessions and the screening row. Returns the refund count.
///
/// Callers hold the screening row lock, which keeps new sales and bookings
/// out while the teardown runs.
pub async fn delete_screening_cascade<C: ConnectionTrait>(
    conn: &C,
    screening_id: i32,
) -> AppResult<u64> {
    let refunded = ticket_service::refund_screening_tickets(conn, screening_id).await?;

    // Sessions go one row at a time; the use only comes back for a row this
    // delete removed, so a booking cancelled in the meantime is not credited
    // a second time.
    let sessions = SuperTicketSessions::find()
        .filter(SessionCol::ScreeningId.eq(screening_id))
        .all(conn)
        .await?;
    for session in &sessions {
        let dropped = SuperTicketSessions::delete_by_id(session.id)
            .exec(conn)
            .await?;
        if dropped.rows_affected == 1 {
            SuperTickets::update_many()
                .col_expr(
                    SuperTicketCol::Uses,
                    Expr::col(SuperTicketCol::Uses).add(1),
                )
                .filter(SuperTicketCol::Id.eq(session.super_ticket_id))
                .exec(conn)
                .await?;
        }
    }

    Tickets::delete_many()
        .filter(TicketCol::ScreeningId.eq(screening_id))
        .exec(conn)
        .await?;
    Screenings::delete_by_id(screening_id).exec(conn).await?;

    Ok(refunded)
}
