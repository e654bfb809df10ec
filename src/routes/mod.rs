use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod doc;
pub mod employees;
pub mod health;
pub mod movies;
pub mod params;
pub mod rooms;
pub mod screenings;
pub mod shifts;
pub mod super_tickets;
pub mod tickets;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/movies", movies::router())
        .nest("/rooms", rooms::router())
        .nest("/screenings", screenings::router())
        .nest("/shifts", shifts::router())
        .nest("/tickets", tickets::router())
        .nest("/super-tickets", super_tickets::router())
        .nest("/users", users::router())
        .nest("/employees", employees::router())
}
