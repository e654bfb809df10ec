use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{
    entity::{
        rooms, super_ticket_sessions::Column as SessionCol, tickets::Column as TicketCol,
        SuperTicketSessions, Tickets,
    },
    error::{AppError, AppResult},
};

/// True iff the seat is held by a sold ticket or by a super-ticket booking.
/// Both ledgers must be consulted before any reservation commits.
pub async fn seat_taken<C: ConnectionTrait>(
    conn: &C,
    screening_id: i32,
    seat: i32,
) -> AppResult<bool> {
    if held_by_ticket(conn, screening_id, seat).await? {
        return Ok(true);
    }
    held_by_session(conn, screening_id, seat).await
}

/// True iff a ticket row for this seat exists and is sold.
pub async fn held_by_ticket<C: ConnectionTrait>(
    conn: &C,
    screening_id: i32,
    seat: i32,
) -> AppResult<bool> {
    let count = Tickets::find()
        .filter(TicketCol::ScreeningId.eq(screening_id))
        .filter(TicketCol::Seat.eq(seat))
        .filter(TicketCol::OwnerId.is_not_null())
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// True iff a super-ticket booking holds this seat.
pub async fn held_by_session<C: ConnectionTrait>(
    conn: &C,
    screening_id: i32,
    seat: i32,
) -> AppResult<bool> {
    let count = SuperTicketSessions::find()
        .filter(SessionCol::ScreeningId.eq(screening_id))
        .filter(SessionCol::Seat.eq(seat))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Seats are numbered 1..=capacity.
pub fn validate_seat(room: &rooms::Model, seat: i32) -> AppResult<()> {
    if seat < 1 || seat > room.capacity {
        return Err(AppError::validation(format!(
            "seat {} does not exist in room {} (capacity {})",
            seat, room.name, room.capacity
        )));
    }
    Ok(())
}
