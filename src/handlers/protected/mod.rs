// Protected handlers: require a valid bearer JWT (see middleware::auth)
pub mod calendar;
pub mod day_card;
pub mod export;
pub mod praises;
pub mod stamps;
pub mod streak;
