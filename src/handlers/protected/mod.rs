// handlers/protected/mod.rs - endpoints under jwt_auth_middleware
pub mod items;
