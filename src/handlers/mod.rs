// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token)
pub mod public;    // /api/auth/*
pub mod protected; // /api/notes/*
