use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{Condition, QueryOrder, SelectTwo};

use super::category;

/// Barcode given to goods created without one.
pub const DEFAULT_BARCODE: &str = "000000";

/// A product kept in stock.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "goods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub barcode: String,
    pub category_id: Option<i32>,
    pub customer_id: Option<i32>,
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
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_delete = "Cascade"
    )]
    Customer,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stock value of this row: `price * quantity`.
    pub fn total_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl Entity {
    /// A single good, only if `user_id` owns it.
    pub fn find_owned_by_id(user_id: i32, id: i32) -> Select<Entity> {
        Self::find_by_id(id).filter(Column::UserId.eq(user_id))
    }

    /// Goods owned by `user_id` together with their category, newest first.
    ///
    /// A non-blank `query` keeps only goods whose name, description or
    /// category name contains it, ignoring case.
    pub fn search(user_id: i32, query: Option<&str>) -> SelectTwo<Entity, category::Entity> {
        let mut select = Self::find()
            .find_also_related(category::Entity)
            .filter(Column::UserId.eq(user_id));

        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
            select = select.filter(
                Condition::any()
                    .add(contains_lowercase(Expr::col((Entity, Column::Name)), &pattern))
                    .add(contains_lowercase(Expr::col((Entity, Column::Description)), &pattern))
                    .add(contains_lowercase(
                        Expr::col((category::Entity, category::Column::Name)),
                        &pattern,
                    )),
            );
        }

        select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
    }

    /// Goods owned by `user_id` carrying `barcode`, newest first.
    pub fn find_by_barcode(user_id: i32, barcode: &str) -> Select<Entity> {
        Self::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Barcode.eq(barcode))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
    }
}

fn contains_lowercase(column: Expr, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(column)).like(LikeExpr::new(pattern).escape('\\'))
}

/// Escapes LIKE wildcards so user input only matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
