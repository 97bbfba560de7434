//! Page requests, result pages and the two response envelopes.
//!
//! A listing endpoint turns untrusted `page`/`limit` strings into a
//! [`PageRequest`], asks a store for the slice and the total match count,
//! wraps both in a [`Page`] and renders it with [`Paginated`] either in the
//! body or in the `X-Total-Items`/`X-Current-Page`/`X-Total-Pages` headers.

use crate::config::PaginationConfig;
use crate::error::{AppError, AppResult};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::{Map, Value};

pub const X_TOTAL_ITEMS: HeaderName = HeaderName::from_static("x-total-items");
pub const X_CURRENT_PAGE: HeaderName = HeaderName::from_static("x-current-page");
pub const X_TOTAL_PAGES: HeaderName = HeaderName::from_static("x-total-pages");

/// A validated page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a request from already-numeric values.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when `page` or `limit` is zero, when
    /// `limit` exceeds `max_limit`, or when the offset would not fit a signed
    /// 64-bit store offset.
    pub fn new(page: u64, limit: u64, max_limit: u64) -> AppResult<Self> {
        if page == 0 {
            return Err(AppError::Validation("Invalid page number".to_string()));
        }

        if limit == 0 {
            return Err(AppError::Validation("Invalid limit number".to_string()));
        }

        if limit > max_limit {
            return Err(AppError::Validation(format!(
                "Limit must not be greater than {}",
                max_limit
            )));
        }

        (page - 1)
            .checked_mul(limit)
            .filter(|skip| i64::try_from(*skip).is_ok())
            .ok_or_else(|| AppError::Validation("Page number is out of range".to_string()))?;

        Ok(Self { page, limit })
    }

    /// Parse raw query values, applying the configured defaults when absent.
    pub fn parse(page: Option<&str>, limit: Option<&str>, config: &PaginationConfig) -> AppResult<Self> {
        let page = match page {
            Some(raw) => parse_positive(raw, "page")?,
            None => 1,
        };
        let limit = match limit {
            Some(raw) => parse_positive(raw, "limit")?,
            None => config.default_limit,
        };

        Self::new(page, limit, config.max_limit)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of items before this page: `(page - 1) * limit`.
    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// [`Self::skip`] as a SQL `OFFSET`; always in range after validation.
    pub fn offset_i64(&self) -> i64 {
        self.skip() as i64
    }

    pub fn limit_i64(&self) -> i64 {
        self.limit as i64
    }
}

fn parse_positive(raw: &str, name: &str) -> AppResult<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::Validation(format!("Invalid {} number", name)))
}

/// `ceil(total_items / limit)`
pub fn total_pages(total_items: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_items.div_ceil(limit)
}

/// One page of results together with the totals it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total_items,
            current_page: request.page(),
            total_pages: total_pages(total_items, request.limit()),
        }
    }

    /// Zero matches overall is reported as not found. A page past the end
    /// of a non-empty result set is an ordinary empty page.
    pub fn require_items(self, not_found_message: &str) -> AppResult<Self> {
        if self.total_items == 0 {
            return Err(AppError::NotFound(not_found_message.to_string()));
        }
        Ok(self)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

/// Where pagination metadata goes in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    Body,
    Header,
}

impl PaginationMode {
    /// Parse the `paginated` selector; it must be `body` or `header`.
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw {
            Some("body") => Ok(PaginationMode::Body),
            Some("header") => Ok(PaginationMode::Header),
            _ => Err(AppError::Validation(
                "The PAGINATED parameter is required and must be either \"body\" or \"header\"."
                    .to_string(),
            )),
        }
    }
}

/// A [`Page`] ready to be rendered, with its items under `items_key`.
#[derive(Debug)]
pub struct Paginated<T> {
    page: Page<T>,
    mode: PaginationMode,
    items_key: &'static str,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(page: Page<T>, mode: PaginationMode, items_key: &'static str) -> Self {
        Self {
            page,
            mode,
            items_key,
        }
    }

    fn render(self) -> AppResult<Response> {
        let mut body = Map::new();

        if self.mode == PaginationMode::Body {
            body.insert("totalItems".to_string(), self.page.total_items.into());
            body.insert("currentPage".to_string(), self.page.current_page.into());
            body.insert("totalPages".to_string(), self.page.total_pages.into());
        }
        body.insert(self.items_key.to_string(), serde_json::to_value(&self.page.items)?);

        let mut response = (StatusCode::OK, Json(Value::Object(body))).into_response();

        if self.mode == PaginationMode::Header {
            let headers = response.headers_mut();
            headers.insert(X_TOTAL_ITEMS, HeaderValue::from(self.page.total_items));
            headers.insert(X_CURRENT_PAGE, HeaderValue::from(self.page.current_page));
            headers.insert(X_TOTAL_PAGES, HeaderValue::from(self.page.total_pages));
        }

        Ok(response)
    }
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        self.render().unwrap_or_else(|e| e.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig::default()
    }

    #[test]
    fn test_defaults() {
        let request = PageRequest::parse(None, None, &config()).unwrap();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
        assert_eq!(request.skip(), 0);
    }

    #[test]
    fn test_skip_and_total_pages_example() {
        let request = PageRequest::parse(Some("2"), Some("10"), &config()).unwrap();
        assert_eq!(request.skip(), 10);

        let page = Page::new(vec![(); 10], 25, &request);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn test_skip_formula_over_a_grid() {
        for page in 1..=20u64 {
            for limit in 1..=100u64 {
                let request = PageRequest::new(page, limit, 100).unwrap();
                assert_eq!(request.skip(), (page - 1) * limit);
            }
        }
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        for total in 0..500u64 {
            for limit in 1..=25u64 {
                let expected = (total as f64 / limit as f64).ceil() as u64;
                assert_eq!(total_pages(total, limit), expected);
            }
        }
    }

    #[test]
    fn test_rejects_non_positive_and_non_numeric() {
        for bad in ["0", "-1", "abc", "1.5", ""] {
            assert!(PageRequest::parse(Some(bad), None, &config()).is_err(), "page={bad}");
            assert!(PageRequest::parse(None, Some(bad), &config()).is_err(), "limit={bad}");
        }
    }

    #[test]
    fn test_limit_cap() {
        assert!(PageRequest::parse(None, Some("100"), &config()).is_ok());
        let err = PageRequest::parse(None, Some("101"), &config()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_offset_overflow_rejected() {
        assert!(PageRequest::new(u64::MAX, 100, 100).is_err());
    }

    #[test]
    fn test_empty_page_is_not_found() {
        let request = PageRequest::new(1, 10, 100).unwrap();
        let page: Page<u32> = Page::new(Vec::new(), 0, &request);
        let err = page.require_items("No logs found").unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "No logs found"));
    }

    #[test]
    fn test_page_past_the_end_is_not_an_error() {
        let request = PageRequest::new(4, 10, 100).unwrap();
        let page: Page<u32> = Page::new(Vec::new(), 25, &request)
            .require_items("No logs found")
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 25);
        assert_eq!(page.current_page, 4);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_mode_selector() {
        assert_eq!(PaginationMode::parse(Some("body")).unwrap(), PaginationMode::Body);
        assert_eq!(PaginationMode::parse(Some("header")).unwrap(), PaginationMode::Header);
        assert!(PaginationMode::parse(Some("footer")).is_err());
        assert!(PaginationMode::parse(None).is_err());
    }

    async fn rendered(mode: PaginationMode) -> (Response, Value) {
        let request = PageRequest::new(2, 2, 100).unwrap();
        let page = Page::new(vec!["c", "d"], 5, &request);
        let response = Paginated::new(page, mode, "logs").into_response();
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        (
            Response::from_parts(parts, axum::body::Body::empty()),
            serde_json::from_slice(&bytes).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_body_mode_envelope() {
        let (response, body) = rendered(PaginationMode::Body).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body["totalItems"], 5);
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["totalPages"], 3);
        assert!(response.headers().get(X_TOTAL_ITEMS).is_none());
    }

    #[tokio::test]
    async fn test_header_mode_envelope() {
        let (response, body) = rendered(PaginationMode::Header).await;
        assert_eq!(response.headers()[X_TOTAL_ITEMS], "5");
        assert_eq!(response.headers()[X_CURRENT_PAGE], "2");
        assert_eq!(response.headers()[X_TOTAL_PAGES], "3");
        assert!(body.get("totalItems").is_none());
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_modes_carry_the_same_items() {
        let (_, body) = rendered(PaginationMode::Body).await;
        let (_, header) = rendered(PaginationMode::Header).await;
        assert_eq!(body["logs"], header["logs"]);
        assert_eq!(body["logs"], serde_json::json!(["c", "d"]));
    }
}
