//! Request log records and the filters used to list them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How serious a logged event is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
}

/// A stored log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "timestampUTC")]
    pub timestamp_utc: DateTime<Utc>,
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<Geolocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_metadata: Option<NavMetadata>,
    #[serde(rename = "extraMetaData", skip_serializing_if = "Option::is_none")]
    pub extra_meta_data: Option<String>,
    pub severity: Severity,
}

/// Body of `POST /logs`
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateLogRequest {
    #[validate(ip(message = "The IP is mandatory and must be a valid IPv4 or IPv6 address."))]
    pub ip: String,

    #[validate(length(min = 1, message = "The USER must be a valid string."))]
    pub user: Option<String>,

    #[validate(length(
        min = 1,
        message = "The DESCRIPTION is mandatory and must be a valid string."
    ))]
    pub description: String,

    pub geolocation: Option<Geolocation>,

    pub nav_metadata: Option<NavMetadata>,

    #[serde(rename = "extraMetaData")]
    pub extra_meta_data: Option<String>,

    pub severity: Option<Severity>,
}

impl CreateLogRequest {
    /// Stamp the request with the current time and default severity.
    pub fn into_record(self, now: DateTime<Utc>) -> LogRecord {
        LogRecord {
            id: None,
            timestamp_utc: now,
            ip: self.ip,
            user: self.user,
            description: self.description,
            geolocation: self.geolocation,
            nav_metadata: self.nav_metadata,
            extra_meta_data: self.extra_meta_data,
            severity: self.severity.unwrap_or_default(),
        }
    }
}

/// Inclusive time window over `timestampUTC`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Exact-match criteria for listing logs. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    pub period: Option<Period>,
    pub ip: Option<String>,
    pub user: Option<String>,
    pub description: Option<String>,
}

impl LogFilter {
    /// Whether `record` satisfies every set criterion.
    pub fn matches(&self, record: &LogRecord) -> bool {
        self.period.is_none_or(|p| p.contains(record.timestamp_utc))
            && self.ip.as_deref().is_none_or(|ip| record.ip == ip)
            && self
                .user
                .as_deref()
                .is_none_or(|user| record.user.as_deref() == Some(user))
            && self
                .description
                .as_deref()
                .is_none_or(|d| record.description == d)
    }
}
