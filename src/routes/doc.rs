use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        super_tickets::{
            BookSeatRequest, BookingList, BuySuperTicketRequest, CreateSuperTicketRequest,
            RemainingUses, SuperTicketList, UpdateSuperTicketRequest,
        },
        tickets::{BuyTicketRequest, CreateTicketRequest, RefundSummary, TicketList},
    },
    models::{
        Category, Employee, Movie, Room, Screening, SuperTicket, SuperTicketSession, Ticket, User,
        WorkingShift,
    },
    response::{ApiResponse, Meta},
    routes::{
        auth, categories, employees, health, movies, params, rooms, screenings, shifts,
        super_tickets, tickets, users,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::employee_login,
        auth::logout,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        movies::list_movies,
        movies::get_movie,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        screenings::list_screenings,
        screenings::get_screening,
        screenings::create_screening,
        screenings::update_screening,
        screenings::delete_screening,
        shifts::list_shifts,
        shifts::get_shift,
        shifts::create_shift,
        shifts::update_shift,
        shifts::delete_shift,
        tickets::list_tickets,
        tickets::my_tickets,
        tickets::get_ticket,
        tickets::create_ticket,
        tickets::buy_ticket,
        tickets::use_ticket,
        tickets::refund_ticket,
        tickets::delete_ticket,
        super_tickets::list_super_tickets,
        super_tickets::my_super_tickets,
        super_tickets::get_super_ticket,
        super_tickets::create_super_ticket,
        super_tickets::buy_super_ticket,
        super_tickets::book_seat,
        super_tickets::cancel_booking,
        super_tickets::list_bookings,
        super_tickets::update_super_ticket,
        super_tickets::delete_super_ticket,
        users::me,
        users::list_users,
        users::get_user,
        users::delete_user,
        users::deposit,
        users::withdraw,
        employees::my_profile,
        employees::list_employees,
        employees::get_employee,
        employees::create_employee,
        employees::update_employee,
        employees::delete_employee
    ),
    components(
        schemas(
            Category,
            Movie,
            Room,
            Screening,
            User,
            Employee,
            WorkingShift,
            Ticket,
            SuperTicket,
            SuperTicketSession,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateTicketRequest,
            BuyTicketRequest,
            TicketList,
            RefundSummary,
            CreateSuperTicketRequest,
            BuySuperTicketRequest,
            BookSeatRequest,
            UpdateSuperTicketRequest,
            RemainingUses,
            SuperTicketList,
            BookingList,
            categories::CreateCategoryRequest,
            categories::UpdateCategoryRequest,
            categories::CategoryList,
            movies::CreateMovieRequest,
            movies::UpdateMovieRequest,
            movies::MovieList,
            rooms::CreateRoomRequest,
            rooms::UpdateRoomRequest,
            rooms::RoomList,
            screenings::CreateScreeningRequest,
            screenings::UpdateScreeningRequest,
            screenings::ScreeningList,
            shifts::CreateShiftRequest,
            shifts::UpdateShiftRequest,
            shifts::ShiftList,
            users::AmountRequest,
            users::BalanceResponse,
            users::UserList,
            employees::CreateEmployeeRequest,
            employees::UpdateEmployeeRequest,
            employees::EmployeeList,
            params::Pagination,
            params::MovieQuery,
            params::ScreeningQuery,
            params::TicketListQuery,
            params::ShiftQuery,
            params::SuperTicketQuery,
            Meta,
            ApiResponse<Ticket>,
            ApiResponse<TicketList>,
            ApiResponse<RefundSummary>,
            ApiResponse<RemainingUses>,
            ApiResponse<LoginResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Categories", description = "Movie category endpoints"),
        (name = "Movies", description = "Movie catalog endpoints"),
        (name = "Rooms", description = "Cinema room endpoints"),
        (name = "Screenings", description = "Screening schedule endpoints"),
        (name = "Shifts", description = "Working shift endpoints"),
        (name = "Tickets", description = "Ticket sale endpoints"),
        (name = "Super tickets", description = "Multi-use pass endpoints"),
        (name = "Users", description = "Customer account endpoints"),
        (name = "Employees", description = "Employee account endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
