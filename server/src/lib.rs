//! Fyyur: venues, artists and the shows that book one onto the other.

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod queries;
pub mod routes;
pub mod state;
pub mod utils;
