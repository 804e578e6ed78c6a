// handlers/protected/mod.rs - handlers behind JWT authentication
//
// Route Prefix: /api/*
// Middleware: bearer JWT validation + free-usage lookup -> AuthContext

pub mod ai;
pub mod user;
