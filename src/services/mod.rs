pub mod auth_service;
pub mod balance;
pub mod category_service;
pub mod employee_service;
pub mod movie_service;
pub mod room_service;
pub mod scheduling;
pub mod screening_service;
pub mod seats;
pub mod shift_service;
pub mod super_ticket_service;
pub mod ticket_service;
pub mod user_service;
