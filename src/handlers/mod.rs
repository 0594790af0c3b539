// handlers/mod.rs - 3-tier handler layout
//
// Public (no auth) → Protected (bearer token) → Elevated (bearer token + admin role)
//
// Protected and elevated handlers receive the caller's `Identity` from
// `jwt_auth_middleware`. Admin checks happen in the services, so a missing or bad
// token is always reported as 401 before a role mismatch is reported as 403.
pub mod elevated;
pub mod protected;
pub mod public;
