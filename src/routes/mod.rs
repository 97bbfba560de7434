pub mod auth_handlers;
pub mod extract;
pub mod health;
mod helpers;
pub mod log_handlers;
mod router;
pub mod types;
pub mod url_handlers;

pub use router::create_router;

// Re-export AppState for convenience
pub use crate::state::AppState;
