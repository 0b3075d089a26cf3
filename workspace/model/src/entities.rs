//! SeaORM entities of the inventory.
//!
//! `user` is the tenancy boundary: every other table carries a `user_id`
//! and every lookup in the application filters on it.

pub mod category;
pub mod customer;
pub mod goods;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::category::Entity as Category;
    pub use super::customer::Entity as Customer;
    pub use super::goods::Entity as Goods;
    pub use super::user::Entity as User;
}
