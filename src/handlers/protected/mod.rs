// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: bearer token verified by `jwt_auth_middleware`
// Route Prefix: /api/notes

pub mod notes;
