pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod middleware;
pub mod router;
pub mod schemas;
pub mod services;
pub mod views;

mod openapi_tests;
mod tests;
