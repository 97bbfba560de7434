use serde::Deserialize;

/// Defaults and bounds applied to `page`/`limit` query parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when `limit` is absent
    pub default_limit: u64,

    /// Largest accepted `limit`
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.default_limit == 0 {
            return Err("PAGINATION_DEFAULT_LIMIT must be greater than 0".to_string());
        }

        if self.default_limit > self.max_limit {
            return Err(
                "PAGINATION_DEFAULT_LIMIT cannot be greater than PAGINATION_MAX_LIMIT".to_string(),
            );
        }

        Ok(())
    }
}
