use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub current_token: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::working_shifts::Entity")]
    WorkingShifts,
}

impl Related<super::working_shifts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkingShifts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
