pub mod categories;
pub mod employees;
pub mod movies;
pub mod rooms;
pub mod screenings;
pub mod super_ticket_sessions;
pub mod super_tickets;
pub mod tickets;
pub mod users;
pub mod working_shifts;

pub use categories::Entity as Categories;
pub use employees::Entity as Employees;
pub use movies::Entity as Movies;
pub use rooms::Entity as Rooms;
pub use screenings::Entity as Screenings;
pub use super_ticket_sessions::Entity as SuperTicketSessions;
pub use super_tickets::Entity as SuperTickets;
pub use tickets::Entity as Tickets;
pub use users::Entity as Users;
pub use working_shifts::Entity as WorkingShifts;
