pub mod auth;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod forms;
pub mod models;
pub mod payments;
pub mod plans;
pub mod routes;
pub mod schema;
pub mod state;
