pub mod auth;
pub mod calendar;
pub mod error;
pub mod health;
