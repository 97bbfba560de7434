//! In-memory stores and an application builder for router tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use linkforge::auth::AuthService;
use linkforge::config::{CorsConfig, PaginationConfig, RateLimitConfig};
use linkforge::error::{AppError, AppResult};
use linkforge::logs::{LogFilter, LogRecord};
use linkforge::models::{NewUrl, NewUser, UrlEntry, UrlStats, User};
use linkforge::routes::{create_router, AppState};
use linkforge::services::pagination::PageRequest;
use linkforge::services::short_code::ShortCodeGenerator;
use linkforge::store::{LogStore, UrlStore, UserStore};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "http://sho.rt";
pub const JWT_SECRET: &str = "integration_test_secret_0123456789abcdef";

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.skip() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

#[derive(Default)]
pub struct InMemoryUrlStore {
    urls: Mutex<Vec<UrlEntry>>,
}

impl InMemoryUrlStore {
    pub fn get(&self, short_code: &str) -> Option<UrlEntry> {
        self.urls
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.short_code == short_code)
            .cloned()
    }
}

#[async_trait]
impl UrlStore for InMemoryUrlStore {
    async fn short_code_exists(&self, short_code: &str) -> AppResult<bool> {
        Ok(self.get(short_code).is_some())
    }

    async fn insert_url(&self, new_url: NewUrl) -> AppResult<UrlEntry> {
        let mut urls = self.urls.lock().unwrap();
        if urls.iter().any(|u| u.short_code == new_url.short_code) {
            return Err(AppError::ShortCodeExists(new_url.short_code));
        }

        let entry = UrlEntry {
            id: urls.len() as i64 + 1,
            short_code: new_url.short_code,
            original_url: new_url.original_url,
            user_id: new_url.user_id,
            click_count: 0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        urls.push(entry.clone());
        Ok(entry)
    }

    async fn record_click(&self, short_code: &str) -> AppResult<Option<UrlEntry>> {
        let mut urls = self.urls.lock().unwrap();
        Ok(urls
            .iter_mut()
            .find(|u| u.short_code == short_code && u.is_active)
            .map(|u| {
                u.click_count += 1;
                u.clone()
            }))
    }

    async fn list_by_owner(&self, user_id: i64, page: PageRequest) -> AppResult<(Vec<UrlEntry>, u64)> {
        let mut owned: Vec<UrlEntry> = self
            .urls
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.user_id == Some(user_id) && u.is_active)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok((page_of(&owned, page), owned.len() as u64))
    }

    async fn update_target(&self, id: i64, user_id: i64, original_url: &str) -> AppResult<Option<UrlEntry>> {
        let mut urls = self.urls.lock().unwrap();
        Ok(urls
            .iter_mut()
            .find(|u| u.id == id && u.user_id == Some(user_id) && u.is_active)
            .map(|u| {
                u.original_url = original_url.to_string();
                u.updated_at = Some(Utc::now());
                u.clone()
            }))
    }

    async fn deactivate(&self, id: i64, user_id: i64) -> AppResult<bool> {
        let mut urls = self.urls.lock().unwrap();
        match urls
            .iter_mut()
            .find(|u| u.id == id && u.user_id == Some(user_id) && u.is_active)
        {
            Some(u) => {
                u.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn stats(&self) -> AppResult<UrlStats> {
        let urls = self.urls.lock().unwrap();
        Ok(UrlStats {
            total_urls: urls.len() as i64,
            active_urls: urls.iter().filter(|u| u.is_active).count() as i64,
            total_clicks: urls.iter().map(|u| u.click_count).sum(),
            total_users: 0,
        })
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let user = User {
            id: users.len() as i64 + 1,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == user_id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryLogStore {
    logs: Mutex<Vec<LogRecord>>,
}

impl InMemoryLogStore {
    pub fn seed(&self, mut record: LogRecord) -> LogRecord {
        let mut logs = self.logs.lock().unwrap();
        record.id = Some(format!("{:024x}", logs.len() + 1));
        logs.push(record.clone());
        record
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn insert_log(&self, record: LogRecord) -> AppResult<LogRecord> {
        Ok(self.seed(record))
    }

    async fn find_log(&self, id: &str) -> AppResult<Option<LogRecord>> {
        if id.len() != 24 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::Validation("Invalid log ID format".to_string()));
        }
        Ok(self
            .logs
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id.as_deref() == Some(id))
            .cloned())
    }

    async fn find_logs(&self, filter: LogFilter, page: PageRequest) -> AppResult<(Vec<LogRecord>, u64)> {
        let mut matching: Vec<LogRecord> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp_utc.cmp(&a.timestamp_utc).then(b.id.cmp(&a.id)));

        Ok((page_of(&matching, page), matching.len() as u64))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// A log store that never answers in time.
pub struct StalledLogStore;

#[async_trait]
impl LogStore for StalledLogStore {
    async fn insert_log(&self, record: LogRecord) -> AppResult<LogRecord> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(record)
    }

    async fn find_log(&self, _id: &str) -> AppResult<Option<LogRecord>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(None)
    }

    async fn find_logs(&self, _filter: LogFilter, _page: PageRequest) -> AppResult<(Vec<LogRecord>, u64)> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok((Vec::new(), 0))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::ServiceUnavailable("stalled".to_string()))
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub urls: Arc<InMemoryUrlStore>,
    pub logs: Arc<InMemoryLogStore>,
}

fn state(
    urls: Arc<dyn UrlStore>,
    logs: Arc<dyn LogStore>,
    request_timeout: Duration,
) -> Arc<AppState> {
    Arc::new(AppState {
        urls,
        users: Arc::new(InMemoryUserStore::default()),
        logs,
        auth_service: AuthService::new(JWT_SECRET.to_string(), 1),
        short_codes: ShortCodeGenerator::new(6, 10),
        pagination: PaginationConfig::default(),
        base_url: BASE_URL.to_string(),
        strict_url_validation: true,
        request_timeout,
        bcrypt_cost: 4,
    })
}

fn server(state: Arc<AppState>) -> TestServer {
    let rate_limit = RateLimitConfig {
        requests_per_minute: 60_000,
        burst_size: 10_000,
    };
    let app = create_router(state, &CorsConfig::from_list("*"), rate_limit).unwrap();
    TestServer::new(app).unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        let urls = Arc::new(InMemoryUrlStore::default());
        let logs = Arc::new(InMemoryLogStore::default());
        let state = state(urls.clone(), logs.clone(), Duration::from_secs(20));

        TestApp {
            server: server(state),
            urls,
            logs,
        }
    }

    /// An app whose log store stalls past a short request timeout.
    pub fn stalled(request_timeout: Duration) -> TestServer {
        server(state(
            Arc::new(InMemoryUrlStore::default()),
            Arc::new(StalledLogStore),
            request_timeout,
        ))
    }

    /// Register a user and return a bearer token for it.
    pub async fn login_as(&self, email: &str) -> String {
        self.server
            .post("/register")
            .json(&json!({ "name": "John Doe", "email": email, "password": "password123" }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let body: Value = self
            .server
            .post("/login")
            .json(&json!({ "email": email, "password": "password123" }))
            .await
            .json();

        body["token"].as_str().unwrap().to_string()
    }

    /// Shorten `url` and return the generated code.
    pub async fn shorten(&self, url: &str, token: Option<&str>) -> String {
        let mut request = self.server.post("/urls").json(&json!({ "url": url }));
        if let Some(token) = token {
            request = request.authorization_bearer(token);
        }
        let body: Value = request.await.json();

        body["url"]
            .as_str()
            .unwrap()
            .trim_start_matches(BASE_URL)
            .trim_start_matches('/')
            .to_string()
    }
}
