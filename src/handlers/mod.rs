// handlers/mod.rs - HTTP handlers
//
// Public (no auth) endpoints only: service banner, health probe and sign-up.
pub mod health; // GET / and GET /health
pub mod users;  // POST /api/users

pub use health::{health, root};
pub use users::register;
