use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tip_pipeline_core::provisioning::CustomResourceResponse;

use super::block_on;

pub trait ProvisioningResponder {
    fn send(&self, response_url: &str, response: &CustomResourceResponse) -> Result<(), String>;
}

/// Uploads the custom-resource response to the pre-signed URL from the request.
#[derive(Debug, Clone)]
pub struct HttpProvisioningResponder {
    client: Client,
}

impl HttpProvisioningResponder {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ProvisioningResponder for HttpProvisioningResponder {
    fn send(&self, response_url: &str, response: &CustomResourceResponse) -> Result<(), String> {
        let body = serde_json::to_string(response)
            .map_err(|error| format!("failed to serialize provisioning response: {error}"))?;
        // The pre-signed URL is signed without a content type.
        let request = self
            .client
            .put(response_url)
            .header(CONTENT_TYPE, "")
            .body(body);

        let status = block_on(request.send())
            .map_err(|error| format!("failed to send provisioning response: {error}"))?
            .status();

        if !status.is_success() {
            return Err(format!("provisioning endpoint returned {status}"));
        }
        Ok(())
    }
}
