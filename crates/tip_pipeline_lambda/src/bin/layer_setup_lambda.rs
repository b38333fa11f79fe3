use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tip_pipeline_core::config::LayerConfig;
use tip_pipeline_lambda::adapters::installer::CommandInstaller;
use tip_pipeline_lambda::adapters::object_store::S3ObjectStore;
use tip_pipeline_lambda::adapters::provisioning::HttpProvisioningResponder;
use tip_pipeline_lambda::handlers::layer_setup::{handle_layer_setup, LayerSetupSummary};
use tip_pipeline_lambda::logging::init_tracing;

async fn handle_request(event: LambdaEvent<Value>) -> Result<LayerSetupSummary, Error> {
    let config = LayerConfig::from_env(|key| std::env::var(key).ok())?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let object_store =
        S3ObjectStore::new(config.bucket.clone(), aws_sdk_s3::Client::new(&aws_config));
    let installer = CommandInstaller::new(config.installer.clone());
    let responder = HttpProvisioningResponder::new(reqwest::Client::new());

    let summary = handle_layer_setup(
        event.payload,
        &event.context.env_config.log_stream,
        &config,
        &installer,
        &object_store,
        &responder,
    )?;
    Ok(summary)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
