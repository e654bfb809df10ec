use chrono::{Duration, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use sea_orm_migration::MigratorTrait;

use cinema_booking_api::{
    config::AppConfig,
    db,
    entity::{categories, employees, movies, rooms, screenings, super_tickets, tickets, users},
    migrator::Migrator,
    services::auth_service::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = db::connect(&config.database_url).await?;
    // Ensure migrations are applied.
    Migrator::up(&orm, None).await?;

    let admin_id = ensure_employee(
        &orm,
        ("Ada", "Marsh", "555-0100"),
        "admin@example.com",
        "admin123",
        "admin",
    )
    .await?;
    let staff_id = ensure_employee(
        &orm,
        ("Ben", "Okafor", "555-0101"),
        "staff@example.com",
        "staff123",
        "staff",
    )
    .await?;
    let user_id = ensure_customer(&orm, ("Clara", "Ness"), "user@example.com", "user123").await?;
    seed_catalog(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, Staff ID: {staff_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_employee(
    orm: &DatabaseConnection,
    (first_name, last_name, phone): (&str, &str, &str),
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<i32> {
    let existing = employees::Entity::find()
        .filter(employees::Column::Email.eq(email))
        .one(orm)
        .await?;
    let id = match existing {
        Some(employee) => employee.id,
        None => {
            let employee = employees::ActiveModel {
                id: NotSet,
                first_name: Set(first_name.to_string()),
                last_name: Set(last_name.to_string()),
                phone: Set(phone.to_string()),
                email: Set(email.to_string()),
                password_hash: Set(hash_password(password)?),
                role: Set(role.to_string()),
                current_token: Set(None),
                created_at: NotSet,
            }
            .insert(orm)
            .await?;
            employee.id
        }
    };

    println!("Ensured employee {email} (role={role})");
    Ok(id)
}

async fn ensure_customer(
    orm: &DatabaseConnection,
    (first_name, last_name): (&str, &str),
    email: &str,
    password: &str,
) -> anyhow::Result<i32> {
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?;
    let id = match existing {
        Some(user) => user.id,
        None => {
            let user = users::ActiveModel {
                id: NotSet,
                first_name: Set(first_name.to_string()),
                last_name: Set(last_name.to_string()),
                email: Set(email.to_string()),
                password_hash: Set(hash_password(password)?),
                money: Set(10_000),
                role: Set("user".to_string()),
                current_token: Set(None),
                created_at: NotSet,
            }
            .insert(orm)
            .await?;
            user.id
        }
    };

    println!("Ensured user {email}");
    Ok(id)
}

/// Seed a small catalog: one category, one movie, two rooms, a screening
/// tomorrow evening with ten tickets, and one unsold multi-use pass.
async fn seed_catalog(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let category = match categories::Entity::find()
        .filter(categories::Column::Name.eq("Drama"))
        .one(orm)
        .await?
    {
        Some(category) => category,
        None => {
            categories::ActiveModel {
                id: NotSet,
                name: Set("Drama".to_string()),
                created_at: NotSet,
            }
            .insert(orm)
            .await?
        }
    };

    let movie = match movies::Entity::find()
        .filter(movies::Column::Title.eq("The Grand Finale"))
        .one(orm)
        .await?
    {
        Some(movie) => movie,
        None => {
            movies::ActiveModel {
                id: NotSet,
                title: Set("The Grand Finale".to_string()),
                description: Set(Some("A conductor's last season.".to_string())),
                author: Set("M. Petrov".to_string()),
                release_date: Set(Utc::now().date_naive()),
                duration_minutes: Set(120),
                status: Set("showing".to_string()),
                category_id: Set(category.id),
                created_at: NotSet,
            }
            .insert(orm)
            .await?
        }
    };

    let rooms_to_seed = [("Screen 1", 120, "standard", false), ("Studio", 40, "imax", true)];
    let mut first_room_id = None;
    for (name, capacity, kind, accessible) in rooms_to_seed {
        let room = match rooms::Entity::find()
            .filter(rooms::Column::Name.eq(name))
            .one(orm)
            .await?
        {
            Some(room) => room,
            None => {
                rooms::ActiveModel {
                    id: NotSet,
                    name: Set(name.to_string()),
                    capacity: Set(capacity),
                    kind: Set(kind.to_string()),
                    open: Set(true),
                    accessible: Set(accessible),
                    created_at: NotSet,
                }
                .insert(orm)
                .await?
            }
        };
        first_room_id.get_or_insert(room.id);
    }
    let room_id = first_room_id
        .ok_or_else(|| anyhow::anyhow!("no room was seeded"))?;

    let screening = match screenings::Entity::find()
        .filter(screenings::Column::MovieId.eq(movie.id))
        .filter(screenings::Column::RoomId.eq(room_id))
        .one(orm)
        .await?
    {
        Some(screening) => screening,
        None => {
            let start = (Utc::now() + Duration::days(1))
                .date_naive()
                .and_hms_opt(18, 0, 0)
                .ok_or_else(|| anyhow::anyhow!("invalid screening start time"))?
                .and_utc();
            let end = start + Duration::minutes(movie.duration_minutes as i64);
            screenings::ActiveModel {
                id: NotSet,
                movie_id: Set(movie.id),
                room_id: Set(room_id),
                start_time: Set(start.into()),
                end_time: Set(end.into()),
                ticket_price: Set(50),
                created_at: NotSet,
            }
            .insert(orm)
            .await?
        }
    };

    for seat in 1..=10 {
        let exists = tickets::Entity::find()
            .filter(tickets::Column::ScreeningId.eq(screening.id))
            .filter(tickets::Column::Seat.eq(seat))
            .one(orm)
            .await?;
        if exists.is_none() {
            tickets::ActiveModel {
                id: NotSet,
                screening_id: Set(screening.id),
                seat: Set(seat),
                price: Set(screening.ticket_price),
                used: Set(false),
                owner_id: Set(None),
                created_at: NotSet,
            }
            .insert(orm)
            .await?;
        }
    }

    let pass_exists = super_tickets::Entity::find().one(orm).await?;
    if pass_exists.is_none() {
        super_tickets::ActiveModel {
            id: NotSet,
            price: Set(400),
            uses: Set(10),
            owner_id: Set(None),
            created_at: NotSet,
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}
