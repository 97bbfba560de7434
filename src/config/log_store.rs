use serde::Deserialize;

/// MongoDB settings for the request log collection
#[derive(Debug, Clone, Deserialize)]
pub struct LogStoreConfig {
    /// MongoDB connection string
    pub uri: String,

    /// Database holding the log collection
    pub database: String,

    /// Collection name
    pub collection: String,
}

impl LogStoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.uri.starts_with("mongodb://") && !self.uri.starts_with("mongodb+srv://") {
            return Err("MONGODB_URI must start with mongodb:// or mongodb+srv://".to_string());
        }

        if self.database.is_empty() || self.collection.is_empty() {
            return Err("MONGODB_DATABASE and MONGODB_LOG_COLLECTION must not be empty".to_string());
        }

        Ok(())
    }
}
