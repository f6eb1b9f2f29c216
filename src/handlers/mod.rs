pub mod auth;
pub mod bookings;
pub mod services;
pub mod users;
