pub mod api;
pub mod config;
pub mod convert;
pub mod db;
pub mod models;
pub mod search;
pub mod state;
