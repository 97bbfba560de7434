//! MongoDB-backed [`LogStore`].

use crate::config::LogStoreConfig;
use crate::error::{AppError, AppResult};
use crate::logs::{Geolocation, LogFilter, LogRecord, NavMetadata, Severity};
use crate::services::pagination::PageRequest;
use crate::store::LogStore;
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

/// A log record as stored in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(rename = "timestampUTC")]
    timestamp_utc: BsonDateTime,
    ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geolocation: Option<Geolocation>,
    #[serde(rename = "navMetadata", default, skip_serializing_if = "Option::is_none")]
    nav_metadata: Option<NavMetadata>,
    #[serde(rename = "extraMetaData", default, skip_serializing_if = "Option::is_none")]
    extra_meta_data: Option<String>,
    #[serde(default)]
    severity: Severity,
}

fn to_bson_date(at: chrono::DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(at.timestamp_millis())
}

impl From<LogRecord> for LogDocument {
    fn from(record: LogRecord) -> Self {
        LogDocument {
            id: record.id.and_then(|id| ObjectId::parse_str(id).ok()),
            timestamp_utc: to_bson_date(record.timestamp_utc),
            ip: record.ip,
            user: record.user,
            description: record.description,
            geolocation: record.geolocation,
            nav_metadata: record.nav_metadata,
            extra_meta_data: record.extra_meta_data,
            severity: record.severity,
        }
    }
}

impl From<LogDocument> for LogRecord {
    fn from(document: LogDocument) -> Self {
        LogRecord {
            id: document.id.map(|id| id.to_hex()),
            timestamp_utc: chrono::DateTime::from_timestamp_millis(
                document.timestamp_utc.timestamp_millis(),
            )
            .unwrap_or_default(),
            ip: document.ip,
            user: document.user,
            description: document.description,
            geolocation: document.geolocation,
            nav_metadata: document.nav_metadata,
            extra_meta_data: document.extra_meta_data,
            severity: document.severity,
        }
    }
}

/// Translate a [`LogFilter`] into a MongoDB query document.
fn filter_document(filter: &LogFilter) -> Document {
    let mut query = Document::new();

    if let Some(period) = filter.period {
        query.insert(
            "timestampUTC",
            doc! { "$gte": to_bson_date(period.start), "$lte": to_bson_date(period.end) },
        );
    }
    if let Some(ip) = &filter.ip {
        query.insert("ip", ip.as_str());
    }
    if let Some(user) = &filter.user {
        query.insert("user", user.as_str());
    }
    if let Some(description) = &filter.description {
        query.insert("description", description.as_str());
    }

    query
}

fn parse_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::Validation("Invalid log ID format".to_string()))
}

/// Log records in a single MongoDB collection
#[derive(Clone)]
pub struct MongoLogStore {
    database: Database,
    collection: Collection<LogDocument>,
}

impl MongoLogStore {
    pub async fn connect(config: &LogStoreConfig) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let database = client.database(&config.database);
        let collection = database.collection::<LogDocument>(&config.collection);

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "Log store client created"
        );

        Ok(Self {
            database,
            collection,
        })
    }
}

#[async_trait]
impl LogStore for MongoLogStore {
    async fn insert_log(&self, record: LogRecord) -> AppResult<LogRecord> {
        let mut document = LogDocument::from(record);
        document.id = None;

        let result = self.collection.insert_one(&document).await?;
        document.id = result.inserted_id.as_object_id();

        Ok(document.into())
    }

    async fn find_log(&self, id: &str) -> AppResult<Option<LogRecord>> {
        let id = parse_id(id)?;
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(LogRecord::from))
    }

    async fn find_logs(&self, filter: LogFilter, page: PageRequest) -> AppResult<(Vec<LogRecord>, u64)> {
        let query = filter_document(&filter);

        let items = async {
            let cursor = self
                .collection
                .find(query.clone())
                .sort(doc! { "timestampUTC": -1, "_id": -1 })
                .skip(page.skip())
                .limit(page.limit_i64())
                .await?;
            let documents: Vec<LogDocument> = cursor.try_collect().await?;
            Ok::<_, AppError>(documents.into_iter().map(LogRecord::from).collect())
        };
        let total = async { Ok::<_, AppError>(self.collection.count_documents(query.clone()).await?) };

        tokio::try_join!(items, total)
    }

    async fn ping(&self) -> AppResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
