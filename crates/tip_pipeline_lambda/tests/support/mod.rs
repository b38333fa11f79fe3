#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tip_pipeline_core::config::{ConnectionConfig, IngestConfig, LayerConfig};
use tip_pipeline_core::provisioning::CustomResourceResponse;
use tip_pipeline_lambda::adapters::document_store::{DocumentSession, DocumentStore};
use tip_pipeline_lambda::adapters::http::{FeedSource, TrustBundleSource};
use tip_pipeline_lambda::adapters::installer::PackageInstaller;
use tip_pipeline_lambda::adapters::object_store::ObjectStore;
use tip_pipeline_lambda::adapters::provisioning::ProvisioningResponder;
use zip::ZipArchive;

pub struct FixedFeed(pub String);

impl FeedSource for FixedFeed {
    fn fetch_feed(&self) -> Result<String, String> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
pub struct CountingTrustBundle {
    pub fetches: RefCell<usize>,
}

impl TrustBundleSource for CountingTrustBundle {
    fn fetch_trust_bundle(&self) -> Result<Vec<u8>, String> {
        *self.fetches.borrow_mut() += 1;
        Ok(b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n".to_vec())
    }
}

/// Collections keyed by `database.collection`, shared across sessions.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    pub collections: RefCell<HashMap<String, Vec<Map<String, Value>>>>,
    pub sessions_opened: RefCell<usize>,
    pub sessions_closed: RefCell<usize>,
}

impl InMemoryDocumentStore {
    pub fn documents(&self, database: &str, collection: &str) -> Vec<Map<String, Value>> {
        self.collections
            .borrow()
            .get(&format!("{database}.{collection}"))
            .cloned()
            .unwrap_or_default()
    }
}

pub struct InMemorySession<'a> {
    store: &'a InMemoryDocumentStore,
}

impl<'a> DocumentStore for &'a InMemoryDocumentStore {
    type Session = InMemorySession<'a>;

    fn open_session(&self, _connection_string: &str) -> Result<Self::Session, String> {
        *self.sessions_opened.borrow_mut() += 1;
        Ok(InMemorySession { store: *self })
    }
}

impl DocumentSession for InMemorySession<'_> {
    fn insert_one(
        &mut self,
        database: &str,
        collection: &str,
        document: Map<String, Value>,
    ) -> Result<(), String> {
        self.store
            .collections
            .borrow_mut()
            .entry(format!("{database}.{collection}"))
            .or_default()
            .push(document);
        Ok(())
    }

    fn close(self) {
        *self.store.sessions_closed.borrow_mut() += 1;
    }
}

pub fn ingest_config(dir: &Path) -> IngestConfig {
    IngestConfig {
        connection: ConnectionConfig {
            username: "tipadmin".to_string(),
            password: "secret".to_string(),
            cluster: "tip.cluster.local".to_string(),
        },
        database: "tip".to_string(),
        collection: "tip_collection".to_string(),
        trust_bundle_url: "https://truststore.invalid/global-bundle.pem".to_string(),
        trust_bundle_path: dir.join("global-bundle.pem"),
    }
}

/// Writes a package folder with a module and a dist-info marker.
pub struct FolderInstaller;

impl PackageInstaller for FolderInstaller {
    fn install(&self, package: &str, staging_dir: &Path) -> Result<(), String> {
        let package_dir = staging_dir.join(package);
        let dist_info = staging_dir.join(format!("{package}-1.0.dist-info"));
        for dir in [&package_dir, &dist_info] {
            fs::create_dir_all(dir).map_err(|error| error.to_string())?;
        }
        fs::write(package_dir.join("__init__.py"), format!("# {package}\n"))
            .map_err(|error| error.to_string())?;
        fs::write(dist_info.join("METADATA"), format!("Name: {package}\n"))
            .map_err(|error| error.to_string())
    }
}

#[derive(Default)]
pub struct MemoryBucket {
    pub objects: RefCell<HashMap<String, Vec<u8>>>,
    pub writes: RefCell<usize>,
}

impl ObjectStore for MemoryBucket {
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String> {
        *self.writes.borrow_mut() += 1;
        self.objects
            .borrow_mut()
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }
}

pub struct UnreachableBucket;

impl ObjectStore for UnreachableBucket {
    fn write_object(&self, _key: &str, _body: &[u8]) -> Result<(), String> {
        Err("failed to write object to s3: dispatch failure".to_string())
    }
}

#[derive(Default)]
pub struct RecordingResponder {
    pub sent: RefCell<Vec<(String, CustomResourceResponse)>>,
}

impl ProvisioningResponder for RecordingResponder {
    fn send(&self, response_url: &str, response: &CustomResourceResponse) -> Result<(), String> {
        self.sent
            .borrow_mut()
            .push((response_url.to_string(), response.clone()));
        Ok(())
    }
}

pub fn layer_config(dir: &Path) -> LayerConfig {
    LayerConfig {
        bucket: "tip-layerbucket".to_string(),
        object_key: "layer.zip".to_string(),
        installer: "pip".to_string(),
        packages: vec!["requests".to_string(), "pymongo".to_string()],
        staging_dir: dir.join("python"),
        archive_path: dir.join("layer.zip"),
    }
}

pub fn provisioning_event(request_type: &str) -> Value {
    serde_json::json!({
        "RequestType": request_type,
        "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:tip-layer-setup",
        "ResponseURL": "https://cloudformation-custom-resource-response-useast1.s3.amazonaws.com/signed",
        "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/tip/1",
        "RequestId": "b0d4e7c2",
        "LogicalResourceId": "LayerSetup",
        "ResourceType": "Custom::LayerSetup",
        "ResourceProperties": {}
    })
}

pub fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes.to_vec())).expect("body should be a zip");
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

pub fn staging_root(dir: &Path) -> PathBuf {
    dir.join("python")
}
