use reqwest::Client;
use tip_pipeline_core::feed::FEED_QUERY_PARAMS;

use super::block_on;

pub trait FeedSource {
    /// Raw response body of one feed query.
    fn fetch_feed(&self) -> Result<String, String>;
}

pub trait TrustBundleSource {
    /// PEM bytes of the certificate chain for the document store endpoint.
    fn fetch_trust_bundle(&self) -> Result<Vec<u8>, String>;
}

/// Posts the recent-samples query to the feed endpoint.
///
/// The body is returned whatever the HTTP status; callers decide what it means.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
    endpoint: String,
}

impl HttpFeedSource {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch_feed(&self) -> Result<String, String> {
        let request = self
            .client
            .post(&self.endpoint)
            .form(&FEED_QUERY_PARAMS[..]);

        block_on(async move {
            let response = request
                .send()
                .await
                .map_err(|error| format!("failed to query feed endpoint: {error}"))?;
            tracing::debug!(status = %response.status(), "feed endpoint responded");
            response
                .text()
                .await
                .map_err(|error| format!("failed to read feed response body: {error}"))
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpTrustBundleSource {
    client: Client,
    url: String,
}

impl HttpTrustBundleSource {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

impl TrustBundleSource for HttpTrustBundleSource {
    fn fetch_trust_bundle(&self) -> Result<Vec<u8>, String> {
        let request = self.client.get(&self.url);

        block_on(async move {
            let response = request
                .send()
                .await
                .map_err(|error| format!("failed to download trust bundle: {error}"))?;
            response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|error| format!("failed to read trust bundle body: {error}"))
        })
    }
}
