use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    pub release_date: NaiveDate,
    pub duration_minutes: i32,
    pub status: String,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub capacity: i32,
    pub kind: String,
    pub open: bool,
    pub accessible: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Screening {
    pub id: i32,
    pub movie_id: i32,
    pub room_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub ticket_price: i64,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user account; the password hash never leaves the store.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub money: i64,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkingShift {
    pub id: i32,
    pub employee_id: i32,
    pub position: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    pub id: i32,
    pub screening_id: i32,
    pub seat: i32,
    pub price: i64,
    pub used: bool,
    pub owner_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuperTicket {
    pub id: i32,
    pub price: i64,
    pub uses: i32,
    pub owner_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuperTicketSession {
    pub id: i32,
    pub super_ticket_id: i32,
    pub screening_id: i32,
    pub seat: i32,
    pub created_at: DateTime<Utc>,
}

impl From<entity::categories::Model> for Category {
    fn from(model: entity::categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::movies::Model> for Movie {
    fn from(model: entity::movies::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            author: model.author,
            release_date: model.release_date,
            duration_minutes: model.duration_minutes,
            status: model.status,
            category_id: model.category_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::rooms::Model> for Room {
    fn from(model: entity::rooms::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            capacity: model.capacity,
            kind: model.kind,
            open: model.open,
            accessible: model.accessible,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::screenings::Model> for Screening {
    fn from(model: entity::screenings::Model) -> Self {
        Self {
            id: model.id,
            movie_id: model.movie_id,
            room_id: model.room_id,
            start_time: model.start_time.with_timezone(&Utc),
            end_time: model.end_time.with_timezone(&Utc),
            ticket_price: model.ticket_price,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            money: model.money,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::employees::Model> for Employee {
    fn from(model: entity::employees::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            email: model.email,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::working_shifts::Model> for WorkingShift {
    fn from(model: entity::working_shifts::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            position: model.position,
            start_time: model.start_time.with_timezone(&Utc),
            end_time: model.end_time.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::tickets::Model> for Ticket {
    fn from(model: entity::tickets::Model) -> Self {
        Self {
            id: model.id,
            screening_id: model.screening_id,
            seat: model.seat,
            price: model.price,
            used: model.used,
            owner_id: model.owner_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::super_tickets::Model> for SuperTicket {
    fn from(model: entity::super_tickets::Model) -> Self {
        Self {
            id: model.id,
            price: model.price,
            uses: model.uses,
            owner_id: model.owner_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::super_ticket_sessions::Model> for SuperTicketSession {
    fn from(model: entity::super_ticket_sessions::Model) -> Self {
        Self {
            id: model.id,
            super_ticket_id: model.super_ticket_id,
            screening_id: model.screening_id,
            seat: model.seat,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
