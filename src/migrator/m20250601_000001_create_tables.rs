use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Movies::Title)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Movies::Description).string())
                    .col(ColumnDef::new(Movies::Author).string().not_null())
                    .col(ColumnDef::new(Movies::ReleaseDate).date().not_null())
                    .col(ColumnDef::new(Movies::DurationMinutes).integer().not_null())
                    .col(ColumnDef::new(Movies::Status).string().not_null())
                    .col(ColumnDef::new(Movies::CategoryId).integer().not_null())
                    .col(
                        ColumnDef::new(Movies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_category_id")
                            .from(Movies::Table, Movies::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Rooms::Capacity).integer().not_null())
                    .col(ColumnDef::new(Rooms::Kind).string().not_null())
                    .col(ColumnDef::new(Rooms::Open).boolean().not_null())
                    .col(ColumnDef::new(Rooms::Accessible).boolean().not_null())
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Screenings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Screenings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Screenings::MovieId).integer().not_null())
                    .col(ColumnDef::new(Screenings::RoomId).integer().not_null())
                    .col(
                        ColumnDef::new(Screenings::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Screenings::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Screenings::TicketPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Screenings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screenings_movie_id")
                            .from(Screenings::Table, Screenings::MovieId)
                            .to(Movies::Table, Movies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screenings_room_id")
                            .from(Screenings::Table, Screenings::RoomId)
                            .to(Rooms::Table, Rooms::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_screenings_room_start")
                    .table(Screenings::Table)
                    .col(Screenings::RoomId)
                    .col(Screenings::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Money)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CurrentToken).string())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::FirstName).string().not_null())
                    .col(ColumnDef::new(Employees::LastName).string().not_null())
                    .col(ColumnDef::new(Employees::Phone).string().not_null())
                    .col(
                        ColumnDef::new(Employees::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employees::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Employees::Role).string().not_null())
                    .col(ColumnDef::new(Employees::CurrentToken).string())
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkingShifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkingShifts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkingShifts::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(WorkingShifts::Position).string().not_null())
                    .col(
                        ColumnDef::new(WorkingShifts::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkingShifts::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkingShifts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_working_shifts_employee_id")
                            .from(WorkingShifts::Table, WorkingShifts::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tickets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tickets::ScreeningId).integer().not_null())
                    .col(ColumnDef::new(Tickets::Seat).integer().not_null())
                    .col(ColumnDef::new(Tickets::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Tickets::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Tickets::OwnerId).integer())
                    .col(
                        ColumnDef::new(Tickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_screening_id")
                            .from(Tickets::Table, Tickets::ScreeningId)
                            .to(Screenings::Table, Screenings::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_owner_id")
                            .from(Tickets::Table, Tickets::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One ticket row per seat per screening.
        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_screening_seat")
                    .table(Tickets::Table)
                    .col(Tickets::ScreeningId)
                    .col(Tickets::Seat)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SuperTickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SuperTickets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SuperTickets::Price).big_integer().not_null())
                    .col(ColumnDef::new(SuperTickets::Uses).integer().not_null())
                    .col(ColumnDef::new(SuperTickets::OwnerId).integer())
                    .col(
                        ColumnDef::new(SuperTickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_super_tickets_owner_id")
                            .from(SuperTickets::Table, SuperTickets::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SuperTicketSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SuperTicketSessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SuperTicketSessions::SuperTicketId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuperTicketSessions::ScreeningId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SuperTicketSessions::Seat).integer().not_null())
                    .col(
                        ColumnDef::new(SuperTicketSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_super_ticket_sessions_super_ticket_id")
                            .from(
                                SuperTicketSessions::Table,
                                SuperTicketSessions::SuperTicketId,
                            )
                            .to(SuperTickets::Table, SuperTickets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_super_ticket_sessions_screening_id")
                            .from(SuperTicketSessions::Table, SuperTicketSessions::ScreeningId)
                            .to(Screenings::Table, Screenings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // A seat is held by at most one booking; concurrent inserts race on
        // this index rather than on the application check.
        manager
            .create_index(
                Index::create()
                    .name("idx_super_ticket_sessions_screening_seat")
                    .table(SuperTicketSessions::Table)
                    .col(SuperTicketSessions::ScreeningId)
                    .col(SuperTicketSessions::Seat)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SuperTicketSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SuperTickets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkingShifts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Screenings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Description,
    Author,
    ReleaseDate,
    DurationMinutes,
    Status,
    CategoryId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
    Name,
    Capacity,
    Kind,
    Open,
    Accessible,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Screenings {
    Table,
    Id,
    MovieId,
    RoomId,
    StartTime,
    EndTime,
    TicketPrice,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PasswordHash,
    Money,
    Role,
    CurrentToken,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FirstName,
    LastName,
    Phone,
    Email,
    PasswordHash,
    Role,
    CurrentToken,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WorkingShifts {
    Table,
    Id,
    EmployeeId,
    Position,
    StartTime,
    EndTime,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    ScreeningId,
    Seat,
    Price,
    Used,
    OwnerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SuperTickets {
    Table,
    Id,
    Price,
    Uses,
    OwnerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SuperTicketSessions {
    Table,
    Id,
    SuperTicketId,
    ScreeningId,
    Seat,
    CreatedAt,
}
