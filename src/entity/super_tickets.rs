use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "super_tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub price: i64,
    pub uses: i32,
    pub owner_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::super_ticket_sessions::Entity")]
    SuperTicketSessions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::super_ticket_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuperTicketSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
