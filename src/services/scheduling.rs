use chrono::{DateTime, NaiveTime, Timelike, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{
    entity::{
        screenings::Column as ScreeningCol, working_shifts::Column as ShiftCol, Screenings,
        WorkingShifts,
    },
    error::{AppError, AppResult},
};

/// Business hours for working shifts, in UTC.
pub const OPENING_HOUR: u32 = 9;
pub const CLOSING_HOUR: u32 = 20;

/// Half-open interval intersection: [s1, e1) and [s2, e2) overlap iff
/// `s1 < e2 && s2 < e1`. Touching endpoints do not overlap.
pub fn intervals_overlap<T: PartialOrd>(start_a: T, end_a: T, start_b: T, end_b: T) -> bool {
    start_a < end_b && start_b < end_a
}

/// True iff another screening in the room intersects [start, end).
/// `exclude` skips the screening currently being updated.
pub async fn screening_overlap_exists<C: ConnectionTrait>(
    conn: &C,
    room_id: i32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<i32>,
) -> AppResult<bool> {
    let start: sea_orm::prelude::DateTimeWithTimeZone = start.into();
    let end: sea_orm::prelude::DateTimeWithTimeZone = end.into();

    let mut finder = Screenings::find()
        .filter(ScreeningCol::RoomId.eq(room_id))
        .filter(ScreeningCol::StartTime.lt(end))
        .filter(ScreeningCol::EndTime.gt(start));
    if let Some(id) = exclude {
        finder = finder.filter(ScreeningCol::Id.ne(id));
    }

    Ok(finder.count(conn).await? > 0)
}

/// True iff another shift with the same position intersects [start, end).
pub async fn shift_overlap_exists<C: ConnectionTrait>(
    conn: &C,
    position: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<i32>,
) -> AppResult<bool> {
    let start: sea_orm::prelude::DateTimeWithTimeZone = start.into();
    let end: sea_orm::prelude::DateTimeWithTimeZone = end.into();

    let mut finder = WorkingShifts::find()
        .filter(ShiftCol::Position.eq(position))
        .filter(ShiftCol::StartTime.lt(end))
        .filter(ShiftCol::EndTime.gt(start));
    if let Some(id) = exclude {
        finder = finder.filter(ShiftCol::Id.ne(id));
    }

    Ok(finder.count(conn).await? > 0)
}

/// Shift policy: start before end, both within business hours on the same
/// UTC calendar day. An end of exactly 20:00 is allowed; 20:01 is not.
pub fn validate_shift_window(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if start >= end {
        return Err(AppError::validation("shift must start before it ends"));
    }
    if start.date_naive() != end.date_naive() {
        return Err(AppError::validation(
            "shift must start and end on the same day",
        ));
    }
    if start.hour() < OPENING_HOUR || start.hour() > CLOSING_HOUR {
        return Err(AppError::validation(
            "shift must start within business hours (09:00-20:00)",
        ));
    }
    if end.hour() < OPENING_HOUR || end.time() > closing_time() {
        return Err(AppError::validation(
            "shift must end within business hours (09:00-20:00)",
        ));
    }
    Ok(())
}

fn closing_time() -> NaiveTime {
    NaiveTime::from_hms_opt(CLOSING_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
    }

    #[test]
    fn overlapping_intervals_are_detected() {
        // [14:00, 16:00) vs [15:00, 17:00)
        assert!(intervals_overlap(at(14, 0), at(16, 0), at(15, 0), at(17, 0)));
        // containment
        assert!(intervals_overlap(at(14, 0), at(18, 0), at(15, 0), at(16, 0)));
        // identical
        assert!(intervals_overlap(at(14, 0), at(16, 0), at(14, 0), at(16, 0)));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!intervals_overlap(at(14, 0), at(16, 0), at(16, 0), at(18, 0)));
        assert!(!intervals_overlap(at(16, 0), at(18, 0), at(14, 0), at(16, 0)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!intervals_overlap(at(9, 0), at(10, 0), at(12, 0), at(13, 0)));
    }

    #[test]
    fn shift_within_business_hours_is_accepted() {
        assert!(validate_shift_window(at(9, 0), at(17, 0)).is_ok());
        assert!(validate_shift_window(at(12, 30), at(19, 45)).is_ok());
    }

    #[test]
    fn shift_ending_exactly_at_closing_is_accepted() {
        assert!(validate_shift_window(at(13, 0), at(20, 0)).is_ok());
    }

    #[test]
    fn shift_ending_past_closing_is_rejected() {
        assert!(validate_shift_window(at(13, 0), at(20, 1)).is_err());
    }

    #[test]
    fn shift_starting_before_opening_is_rejected() {
        assert!(validate_shift_window(at(8, 59), at(12, 0)).is_err());
    }

    #[test]
    fn inverted_or_empty_shift_is_rejected() {
        assert!(validate_shift_window(at(15, 0), at(14, 0)).is_err());
        assert!(validate_shift_window(at(15, 0), at(15, 0)).is_err());
    }

    #[test]
    fn shift_crossing_midnight_is_rejected() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 19, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        assert!(validate_shift_window(start, end).is_err());
    }
}
