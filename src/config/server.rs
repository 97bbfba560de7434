use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,

    /// Port number to bind to (e.g., 3000)
    pub port: u16,

    /// Upper bound on the time spent handling a single request
    pub request_timeout_seconds: u64,
}

impl ServerConfig {
    /// Validate server configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_seconds == 0 {
            return Err("REQUEST_TIMEOUT_SECONDS must be greater than 0".to_string());
        }

        Ok(())
    }
}
