// handlers/public/mod.rs - endpoints that need no bearer token
pub mod auth;
pub mod status;

pub use auth::{login, register};
pub use status::{health, root};
