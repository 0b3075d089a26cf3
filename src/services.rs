//! Use cases of the inventory, one function per operation.
//!
//! Every function takes the owning user's id explicitly and never touches
//! rows of another user. HTTP concerns stay in `handlers`.

pub mod accounts;
pub mod barcode;
pub mod categories;
pub mod customers;
mod error;
pub mod goods;

pub use error::{ServiceError, ServiceResult};
