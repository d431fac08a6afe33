// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Middleware: None beyond the global CORS and trace layers

pub mod auth;
