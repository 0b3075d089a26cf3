use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

/// A customer goods can be assigned to.
///
/// `email` is either empty or a Gmail address and `phone` is either empty
/// or a Philippine mobile number; both rules are enforced by the forms in
/// `common` before a row is written.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub created_at: DateTimeUtc,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::goods::Entity")]
    Goods,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::goods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Customers owned by `user_id`, newest first.
    pub fn find_owned(user_id: i32) -> Select<Entity> {
        Self::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
    }

    pub fn find_owned_by_id(user_id: i32, id: i32) -> Select<Entity> {
        Self::find_by_id(id).filter(Column::UserId.eq(user_id))
    }
}
