use crate::auth::AuthService;
use crate::config::PaginationConfig;
use crate::services::short_code::ShortCodeGenerator;
use crate::store::{LogStore, UrlStore, UserStore};
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all HTTP handlers.
///
/// Wrapped in `Arc` and handed to every handler through Axum's `State`
/// extraction. Stores are trait objects so the router can run against
/// PostgreSQL/MongoDB in production and in-memory stores in tests.
#[derive(Clone)]
pub struct AppState {
    /// Short url persistence
    pub urls: Arc<dyn UrlStore>,

    /// User accounts
    pub users: Arc<dyn UserStore>,

    /// Request log documents
    pub logs: Arc<dyn LogStore>,

    /// JWT authentication service for token generation and validation
    pub auth_service: AuthService,

    /// Allocates collision-free short codes
    pub short_codes: ShortCodeGenerator,

    pub pagination: PaginationConfig,

    /// Base URL for constructing short URLs (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Whether only http:// and https:// targets are accepted
    pub strict_url_validation: bool,

    /// Upper bound on a single request's handling time
    pub request_timeout: Duration,

    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
}
