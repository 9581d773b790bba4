pub mod aggregation;
pub mod app;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod dates;
pub mod error;
pub mod export;
pub mod handlers;
pub mod journal;
pub mod middleware;
pub mod models;
pub mod streak;
