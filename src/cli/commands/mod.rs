pub mod auth;
pub mod calendar;
pub mod card;
pub mod config;
pub mod export;
pub mod praise;
pub mod stamp;
pub mod status;
