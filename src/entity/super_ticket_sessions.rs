use sea_orm::entity::prelude::*;

/// One seat held on one screening by a super-ticket booking.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "super_ticket_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub super_ticket_id: i32,
    pub screening_id: i32,
    pub seat: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::super_tickets::Entity",
        from = "Column::SuperTicketId",
        to = "super::super_tickets::Column::Id"
    )]
    SuperTickets,
    #[sea_orm(
        belongs_to = "super::screenings::Entity",
        from = "Column::ScreeningId",
        to = "super::screenings::Column::Id"
    )]
    Screenings,
}

impl Related<super::super_tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuperTickets.def()
    }
}

impl Related<super::screenings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Screenings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
