use std::path::Path;

use sha2::{Digest, Sha256};

/// Packages installed into the dependency bundle, in install order.
pub const LAYER_PACKAGES: [&str; 2] = ["requests", "pymongo"];

/// Staging directory; its name becomes the archive's top-level folder.
pub const STAGING_DIR: &str = "/tmp/python";
pub const ARCHIVE_PATH: &str = "/tmp/layer.zip";
pub const LAYER_OBJECT_KEY: &str = "layer.zip";

/// Installer arguments for one package, e.g.
/// `install requests -t /tmp/python/ --no-cache-dir`.
pub fn install_args(package: &str, staging_dir: &Path) -> Vec<String> {
    let mut target = staging_dir.display().to_string();
    if !target.ends_with('/') {
        target.push('/');
    }
    vec![
        "install".to_string(),
        package.to_string(),
        "-t".to_string(),
        target,
        "--no-cache-dir".to_string(),
    ]
}

/// Archive entry name for a path relative to the staging directory.
///
/// Entries are rooted at the staging directory's own name and always use `/`.
pub fn archive_entry_name(root_name: &str, relative: &Path) -> String {
    let mut name = root_name.trim_matches('/').to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

pub fn bundle_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
