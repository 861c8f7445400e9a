use sea_orm::entity::prelude::*;

/// A favorite saved by a user. Rows are never shared between users.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(256))")]
    pub description: String,
    #[sea_orm(column_name = "type", column_type = "String(StringLen::N(50))")]
    pub activity_type: String,
    pub participants: i32,
    #[sea_orm(indexed)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
