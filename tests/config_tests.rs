//! Configuration validation tests.

use linkforge::config::{
    AuthConfig, CorsConfig, DatabaseConfig, LogStoreConfig, PaginationConfig, RateLimitConfig,
    ServerConfig, UrlConfig,
};

fn database(url: &str) -> DatabaseConfig {
    DatabaseConfig {
        url: url.to_string(),
        max_connections: 10,
        min_connections: 1,
        acquire_timeout_seconds: 30,
    }
}

#[test]
fn test_database_url_scheme() {
    assert!(database("postgres://localhost/linkforge").validate().is_ok());
    assert!(database("postgresql://localhost/linkforge").validate().is_ok());
    assert!(database("mysql://localhost/linkforge").validate().is_err());
}

#[test]
fn test_database_connection_limits() {
    let mut config = database("postgres://localhost/linkforge");
    config.min_connections = 20;
    assert!(config.validate().is_err());
}

#[test]
fn test_log_store_uri() {
    let mut config = LogStoreConfig {
        uri: "mongodb+srv://cluster.example.net".to_string(),
        database: "linkforge".to_string(),
        collection: "logs".to_string(),
    };
    assert!(config.validate().is_ok());

    config.uri = "http://127.0.0.1:27017".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_short_code_attempt_bounds() {
    let mut config = UrlConfig {
        short_code_length: 6,
        base_url: "https://sho.rt".to_string(),
        short_code_max_attempts: 10,
        strict_url_validation: true,
    };
    assert!(config.validate().is_ok());

    config.short_code_max_attempts = 0;
    assert!(config.validate().is_err());
    config.short_code_max_attempts = 101;
    assert!(config.validate().is_err());
}

#[test]
fn test_base_url_must_parse() {
    let config = UrlConfig {
        short_code_length: 6,
        base_url: "not a url".to_string(),
        short_code_max_attempts: 10,
        strict_url_validation: true,
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_pagination_defaults() {
    let config = PaginationConfig::default();
    assert_eq!(config.default_limit, 10);
    assert_eq!(config.max_limit, 100);
    assert!(config.validate().is_ok());
}

#[test]
fn test_rate_limit_interval() {
    let config = RateLimitConfig {
        requests_per_minute: 60,
        burst_size: 10,
    };
    assert_eq!(config.replenish_interval_ms(), 1000);

    let fast = RateLimitConfig {
        requests_per_minute: 60_000,
        burst_size: 10,
    };
    assert_eq!(fast.replenish_interval_ms(), 1);
}

#[test]
fn test_bcrypt_cost_bounds() {
    let mut config = AuthConfig {
        jwt_secret: "a".repeat(32),
        jwt_expiration_hours: 24,
        bcrypt_cost: 3,
    };
    assert!(config.validate().is_err());

    config.bcrypt_cost = 12;
    assert!(config.validate().is_ok());
}

#[test]
fn test_server_timeout() {
    let config = ServerConfig {
        host: "0.0.0.0".to_string(),
        port: 8080,
        request_timeout_seconds: 20,
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_origin_list_allows_any() {
    assert!(CorsConfig::from_list("").allows_any());
    assert!(CorsConfig::from_list(" , ").allows_any());
}
