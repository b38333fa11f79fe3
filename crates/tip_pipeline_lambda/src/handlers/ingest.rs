use std::fs;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tip_pipeline_core::config::IngestConfig;
use tip_pipeline_core::feed::{FeedRecord, ParseError};

use crate::adapters::document_store::{DocumentSession, DocumentStore};
use crate::adapters::http::{FeedSource, TrustBundleSource};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("feed request failed: {0}")]
    FeedRequest(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("trust bundle unavailable: {0}")]
    TrustBundle(String),
    #[error("document store connection failed: {0}")]
    Connect(String),
    #[error("document insert failed: {0}")]
    Insert(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestSummary {
    pub status: String,
    pub database: String,
    pub collection: String,
    pub fields_inserted: usize,
    pub query_status: Option<String>,
    pub ingested_at: String,
}

/// Fetches the feed once and stores the response as a single document.
///
/// Every call inserts a new document; repeated responses are not deduplicated.
/// A response that does not parse stops the invocation before the trust bundle
/// is fetched or a session is opened.
pub fn handle_ingest<S: DocumentStore>(
    config: &IngestConfig,
    feed: &impl FeedSource,
    trust_bundle: &impl TrustBundleSource,
    store: &S,
) -> Result<IngestSummary, IngestError> {
    let started_at = Instant::now();
    tracing::info!(
        component = "ingest_handler",
        event = "ingest_started",
        database = %config.database,
        collection = %config.collection,
        "ingest started"
    );

    let result = ingest_once(config, feed, trust_bundle, store);
    match &result {
        Ok(summary) => tracing::info!(
            component = "ingest_handler",
            event = "ingest_completed",
            fields_inserted = summary.fields_inserted,
            query_status = summary.query_status.as_deref().unwrap_or(""),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "ingest completed"
        ),
        Err(error) => tracing::error!(
            component = "ingest_handler",
            event = "ingest_failed",
            duration_ms = started_at.elapsed().as_millis() as u64,
            error = %error,
            "ingest failed"
        ),
    }
    result
}

fn ingest_once<S: DocumentStore>(
    config: &IngestConfig,
    feed: &impl FeedSource,
    trust_bundle: &impl TrustBundleSource,
    store: &S,
) -> Result<IngestSummary, IngestError> {
    let body = feed.fetch_feed().map_err(IngestError::FeedRequest)?;
    let record = FeedRecord::parse(&body)?;
    tracing::info!(
        component = "ingest_handler",
        event = "feed_fetched",
        bytes = body.len(),
        fields = record.field_count(),
        "feed fetched"
    );

    let bundle = trust_bundle
        .fetch_trust_bundle()
        .map_err(IngestError::TrustBundle)?;
    fs::write(&config.trust_bundle_path, &bundle).map_err(|error| {
        IngestError::TrustBundle(format!(
            "failed to write {}: {error}",
            config.trust_bundle_path.display()
        ))
    })?;

    let connection_string = config
        .connection
        .connection_string(&config.trust_bundle_path.to_string_lossy());
    let mut session = store
        .open_session(&connection_string)
        .map_err(IngestError::Connect)?;

    let fields_inserted = record.field_count();
    let query_status = record.query_status().map(str::to_string);
    session
        .insert_one(&config.database, &config.collection, record.into_fields())
        .map_err(IngestError::Insert)?;
    tracing::info!(
        component = "ingest_handler",
        event = "document_inserted",
        collection = %config.collection,
        "document inserted"
    );
    session.close();

    Ok(IngestSummary {
        status: "ok".to_string(),
        database: config.database.clone(),
        collection: config.collection.clone(),
        fields_inserted,
        query_status,
        ingested_at: chrono::Utc::now().to_rfc3339(),
    })
}
