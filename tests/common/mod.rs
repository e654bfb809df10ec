#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, EntityTrait};
use sea_orm_migration::MigratorTrait;

use cinema_booking_api::{
    db,
    entity::{categories, employees, movies, rooms, screenings, super_tickets, tickets, users},
    middleware::auth::{Principal, PrincipalKind},
    migrator::Migrator,
    state::AppState,
};

/// Fresh in-memory database per test. The single-connection pool keeps the
/// SQLite database alive for the whole test.
pub async fn setup() -> anyhow::Result<AppState> {
    let orm = db::connect_single("sqlite::memory:").await?;
    Migrator::up(&orm, None).await?;
    Ok(AppState { orm })
}

pub fn customer(id: i32) -> Principal {
    Principal {
        id,
        role: "user".into(),
        kind: PrincipalKind::User,
    }
}

pub fn staff(id: i32) -> Principal {
    Principal {
        id,
        role: "staff".into(),
        kind: PrincipalKind::Employee,
    }
}

pub fn admin(id: i32) -> Principal {
    Principal {
        id,
        role: "admin".into(),
        kind: PrincipalKind::Employee,
    }
}

/// Fixed reference day so overlap scenarios read as wall-clock times.
pub fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 14, hour, min, 0).unwrap()
}

pub async fn create_user(state: &AppState, email: &str, money: i64) -> anyhow::Result<i32> {
    let user = users::ActiveModel {
        id: NotSet,
        first_name: Set("Test".into()),
        last_name: Set("User".into()),
        email: Set(email.to_string()),
        password_hash: Set("hash".into()),
        money: Set(money),
        role: Set("user".into()),
        current_token: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(user.id)
}

pub async fn create_employee(state: &AppState, email: &str, role: &str) -> anyhow::Result<i32> {
    let employee = employees::ActiveModel {
        id: NotSet,
        first_name: Set("Test".into()),
        last_name: Set("Employee".into()),
        phone: Set("555-0100".into()),
        email: Set(email.to_string()),
        password_hash: Set("hash".into()),
        role: Set(role.to_string()),
        current_token: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(employee.id)
}

pub async fn user_money(state: &AppState, id: i32) -> anyhow::Result<i64> {
    let user = users::Entity::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user {id} not found"))?;
    Ok(user.money)
}

pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<i32> {
    let category = categories::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

pub async fn create_movie(
    state: &AppState,
    category_id: i32,
    title: &str,
    duration_minutes: i32,
) -> anyhow::Result<i32> {
    let movie = movies::ActiveModel {
        id: NotSet,
        title: Set(title.to_string()),
        description: Set(None),
        author: Set("Tester".into()),
        release_date: Set(Utc::now().date_naive()),
        duration_minutes: Set(duration_minutes),
        status: Set("showing".into()),
        category_id: Set(category_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(movie.id)
}

pub async fn create_room(
    state: &AppState,
    name: &str,
    capacity: i32,
    open: bool,
) -> anyhow::Result<i32> {
    let room = rooms::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        capacity: Set(capacity),
        kind: Set("standard".into()),
        open: Set(open),
        accessible: Set(false),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(room.id)
}

pub async fn create_screening(
    state: &AppState,
    movie_id: i32,
    room_id: i32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    ticket_price: i64,
) -> anyhow::Result<i32> {
    let screening = screenings::ActiveModel {
        id: NotSet,
        movie_id: Set(movie_id),
        room_id: Set(room_id),
        start_time: Set(start.into()),
        end_time: Set(end.into()),
        ticket_price: Set(ticket_price),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(screening.id)
}

pub async fn create_ticket(
    state: &AppState,
    screening_id: i32,
    seat: i32,
    price: i64,
) -> anyhow::Result<i32> {
    let ticket = tickets::ActiveModel {
        id: NotSet,
        screening_id: Set(screening_id),
        seat: Set(seat),
        price: Set(price),
        used: Set(false),
        owner_id: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(ticket.id)
}

pub async fn create_super_ticket(
    state: &AppState,
    price: i64,
    uses: i32,
    owner_id: Option<i32>,
) -> anyhow::Result<i32> {
    let pass = super_tickets::ActiveModel {
        id: NotSet,
        price: Set(price),
        uses: Set(uses),
        owner_id: Set(owner_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(pass.id)
}

/// One movie of the given runtime, one open room, ready for screenings.
pub async fn seed_cinema(
    state: &AppState,
    duration_minutes: i32,
    capacity: i32,
) -> anyhow::Result<(i32, i32)> {
    let category_id = create_category(state, "Drama").await?;
    let movie_id = create_movie(state, category_id, "The Long Night", duration_minutes).await?;
    let room_id = create_room(state, "Screen 1", capacity, true).await?;
    Ok((movie_id, room_id))
}
