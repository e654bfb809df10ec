pub mod auth;
pub mod super_tickets;
pub mod tickets;
