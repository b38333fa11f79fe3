use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tip_pipeline_core::config::IngestConfig;
use tip_pipeline_core::feed::FEED_URL;
use tip_pipeline_lambda::adapters::document_store::MongoDocumentStore;
use tip_pipeline_lambda::adapters::http::{HttpFeedSource, HttpTrustBundleSource};
use tip_pipeline_lambda::handlers::ingest::{handle_ingest, IngestSummary};
use tip_pipeline_lambda::logging::init_tracing;

async fn handle_request(_event: LambdaEvent<Value>) -> Result<IngestSummary, Error> {
    let config = IngestConfig::from_env(|key| std::env::var(key).ok())?;

    let http_client = reqwest::Client::new();
    let feed = HttpFeedSource::new(http_client.clone(), FEED_URL);
    let trust_bundle = HttpTrustBundleSource::new(http_client, &config.trust_bundle_url);

    let summary = handle_ingest(&config, &feed, &trust_bundle, &MongoDocumentStore)?;
    Ok(summary)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
