//! Turns raw query strings into validated listing queries.

use crate::config::PaginationConfig;
use crate::error::{AppError, AppResult};
use crate::logs::{LogFilter, Period};
use crate::services::pagination::{PageRequest, PaginationMode};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;
use std::net::IpAddr;

const PAGE: &str = "page";
const LIMIT: &str = "limit";
const START_DATE: &str = "startDate";
const END_DATE: &str = "endDate";
const IP: &str = "ip";
const USER: &str = "user";
const DESCRIPTION: &str = "description";
const PAGINATED: &str = "paginated";

/// Untrusted query parameters of a single request.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl From<HashMap<String, String>> for QueryParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self { params }
    }
}

impl QueryParams {
    /// Reject any key outside `allowed`.
    pub fn allow_only(self, allowed: &[&str]) -> AppResult<Self> {
        let mut unexpected: Vec<&str> = self
            .params
            .keys()
            .map(String::as_str)
            .filter(|key| !allowed.contains(key))
            .collect();

        if unexpected.is_empty() {
            return Ok(self);
        }

        unexpected.sort_unstable();
        Err(AppError::Validation(format!(
            "Unexpected parameters: {}. Only the following parameters are accepted: {}.",
            unexpected.join(", "),
            allowed.join(", ")
        )))
    }

    /// A parameter's value; blank values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn page_request(&self, config: &PaginationConfig) -> AppResult<PageRequest> {
        PageRequest::parse(
            self.params.get(PAGE).map(String::as_str),
            self.params.get(LIMIT).map(String::as_str),
            config,
        )
    }

    pub fn mode(&self) -> AppResult<PaginationMode> {
        PaginationMode::parse(self.get(PAGINATED))
    }

    /// The `startDate`/`endDate` window.
    ///
    /// Both ends must be present together; when `required` is set, absence
    /// is an error too.
    pub fn period(&self, required: bool) -> AppResult<Option<Period>> {
        let (start, end) = match (self.get(START_DATE), self.get(END_DATE)) {
            (Some(start), Some(end)) => (start, end),
            (None, None) if !required => return Ok(None),
            _ => {
                return Err(AppError::Validation(
                    "Both \"startDate\" and \"endDate\" are required for period-based search."
                        .to_string(),
                ))
            }
        };

        let start = parse_date(start)?;
        let end = parse_date(end)?;

        if start > end {
            return Err(AppError::Validation(
                "startDate cannot be greater than endDate.".to_string(),
            ));
        }

        Ok(Some(Period { start, end }))
    }

    pub fn ip(&self) -> AppResult<Option<String>> {
        match self.get(IP) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<IpAddr>()
                .map(|_| Some(raw.to_string()))
                .map_err(|_| {
                    AppError::Validation(
                        "The IP must be a valid IPv4 or IPv6 address.".to_string(),
                    )
                }),
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(raw: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(
            "Invalid date format. Dates must be valid ISO strings.".to_string(),
        )
    })?;

    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// A validated log listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct LogQuery {
    pub filter: LogFilter,
    pub page: PageRequest,
    pub mode: PaginationMode,
}

impl LogQuery {
    /// Every log, unfiltered.
    pub fn all(params: QueryParams, mode: PaginationMode, config: &PaginationConfig) -> AppResult<Self> {
        let params = params.allow_only(&[PAGE, LIMIT])?;

        Ok(Self {
            filter: LogFilter::default(),
            page: params.page_request(config)?,
            mode,
        })
    }

    /// Logs inside a mandatory `startDate`/`endDate` window.
    pub fn period(params: QueryParams, mode: PaginationMode, config: &PaginationConfig) -> AppResult<Self> {
        let params = params.allow_only(&[START_DATE, END_DATE, PAGE, LIMIT])?;

        Ok(Self {
            filter: LogFilter {
                period: params.period(true)?,
                ..LogFilter::default()
            },
            page: params.page_request(config)?,
            mode,
        })
    }

    /// Logs matching every given exact `ip`/`user`/`description` filter.
    pub fn search(params: QueryParams, config: &PaginationConfig) -> AppResult<Self> {
        let params = params.allow_only(&[IP, USER, DESCRIPTION, PAGE, LIMIT])?;

        Ok(Self {
            filter: LogFilter {
                period: None,
                ip: params.ip()?,
                user: params.text(USER),
                description: params.text(DESCRIPTION),
            },
            page: params.page_request(config)?,
            mode: PaginationMode::Body,
        })
    }

    /// Period, exact filters and a required `paginated=body|header` selector.
    pub fn dynamic(params: QueryParams, config: &PaginationConfig) -> AppResult<Self> {
        let params = params.allow_only(&[
            PAGINATED,
            START_DATE,
            END_DATE,
            IP,
            USER,
            DESCRIPTION,
            PAGE,
            LIMIT,
        ])?;

        let mode = params.mode()?;

        Ok(Self {
            filter: LogFilter {
                period: params.period(false)?,
                ip: params.ip()?,
                user: params.text(USER),
                description: params.text(DESCRIPTION),
            },
            page: params.page_request(config)?,
            mode,
        })
    }
}

/// Query for the owner-scoped url listing; only `page` and `limit` are accepted.
pub fn url_page_request(params: QueryParams, config: &PaginationConfig) -> AppResult<PageRequest> {
    params.allow_only(&[PAGE, LIMIT])?.page_request(config)
}
