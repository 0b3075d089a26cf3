pub mod accounts;
pub mod barcode;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod goods;
pub mod health;
pub mod id_path;
