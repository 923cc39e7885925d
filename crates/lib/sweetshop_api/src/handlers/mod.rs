//! Request handlers.

pub mod auth;
pub mod sweets;
pub mod users;
