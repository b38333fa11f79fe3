use std::fs;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tip_pipeline_core::config::LayerConfig;
use tip_pipeline_core::layer::bundle_digest;
use tip_pipeline_core::provisioning::{CustomResourceEvent, CustomResourceResponse};

use crate::adapters::installer::PackageInstaller;
use crate::adapters::object_store::ObjectStore;
use crate::adapters::provisioning::ProvisioningResponder;
use crate::archive::{archive_directory, ArchiveError};

#[derive(Debug, Error)]
pub enum LayerSetupError {
    #[error("invalid provisioning event: {0}")]
    InvalidEvent(String),
    #[error("failed to install {package}: {message}")]
    Install { package: String, message: String },
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("bundle upload failed: {0}")]
    Upload(String),
    #[error("provisioning callback failed: {0}")]
    Callback(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerSetupSummary {
    pub status: String,
    pub bucket: String,
    pub object_key: String,
    pub packages: Vec<String>,
    pub archive_bytes: usize,
    pub archive_sha256: String,
}

/// Builds the dependency bundle, uploads it and reports success to the
/// provisioning stack.
///
/// Any failure returns early, so the callback is only sent after a successful
/// upload. Create, Update and Delete requests all rebuild the bundle.
pub fn handle_layer_setup(
    event: Value,
    log_stream: &str,
    config: &LayerConfig,
    installer: &impl PackageInstaller,
    object_store: &impl ObjectStore,
    responder: &impl ProvisioningResponder,
) -> Result<LayerSetupSummary, LayerSetupError> {
    let started_at = Instant::now();
    let event: CustomResourceEvent = serde_json::from_value(event)
        .map_err(|error| LayerSetupError::InvalidEvent(error.to_string()))?;
    tracing::info!(
        component = "layer_setup_handler",
        event = "layer_setup_started",
        request_type = ?event.request_type,
        logical_resource_id = %event.logical_resource_id,
        "layer setup started"
    );

    let result = publish_bundle(config, installer, object_store).and_then(|summary| {
        let response = CustomResourceResponse::success(&event, log_stream);
        responder
            .send(&event.response_url, &response)
            .map_err(LayerSetupError::Callback)?;
        tracing::info!(
            component = "layer_setup_handler",
            event = "callback_sent",
            status = ?response.status,
            "provisioning callback sent"
        );
        Ok(summary)
    });

    match &result {
        Ok(summary) => tracing::info!(
            component = "layer_setup_handler",
            event = "layer_setup_completed",
            archive_sha256 = %summary.archive_sha256,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "layer setup completed"
        ),
        Err(error) => tracing::error!(
            component = "layer_setup_handler",
            event = "layer_setup_failed",
            duration_ms = started_at.elapsed().as_millis() as u64,
            error = %error,
            "layer setup failed"
        ),
    }
    result
}

fn publish_bundle(
    config: &LayerConfig,
    installer: &impl PackageInstaller,
    object_store: &impl ObjectStore,
) -> Result<LayerSetupSummary, LayerSetupError> {
    for package in &config.packages {
        installer
            .install(package, &config.staging_dir)
            .map_err(|message| LayerSetupError::Install {
                package: package.clone(),
                message,
            })?;
        tracing::info!(
            component = "layer_setup_handler",
            event = "package_installed",
            package = %package,
            "package installed"
        );
    }

    let archive = archive_directory(&config.staging_dir, &config.archive_path)?;
    let body = fs::read(&config.archive_path).map_err(ArchiveError::from)?;
    let archive_sha256 = bundle_digest(&body);
    tracing::info!(
        component = "layer_setup_handler",
        event = "bundle_archived",
        files = archive.files,
        directories = archive.directories,
        bytes = body.len(),
        sha256 = %archive_sha256,
        "bundle archived"
    );

    object_store
        .write_object(&config.object_key, &body)
        .map_err(LayerSetupError::Upload)?;
    tracing::info!(
        component = "layer_setup_handler",
        event = "bundle_uploaded",
        bucket = %config.bucket,
        key = %config.object_key,
        "bundle uploaded"
    );

    Ok(LayerSetupSummary {
        status: "ok".to_string(),
        bucket: config.bucket.clone(),
        object_key: config.object_key.clone(),
        packages: config.packages.clone(),
        archive_bytes: body.len(),
        archive_sha256,
    })
}
