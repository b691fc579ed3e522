pub mod appointment;
pub mod block_period;
pub mod calendar;
pub mod doctor;
pub mod health;
pub mod patient;
pub mod profile;
pub mod user;
