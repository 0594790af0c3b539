// handlers/elevated/mod.rs - admin-only endpoints under /admin
pub mod admin;
