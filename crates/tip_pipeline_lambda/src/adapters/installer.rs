use std::path::Path;
use std::process::Command;

use tip_pipeline_core::layer::install_args;

pub trait PackageInstaller {
    fn install(&self, package: &str, staging_dir: &Path) -> Result<(), String>;
}

/// Runs an external package installer (`pip` by default) as a child process.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: String,
}

impl CommandInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PackageInstaller for CommandInstaller {
    fn install(&self, package: &str, staging_dir: &Path) -> Result<(), String> {
        let args = install_args(package, staging_dir);
        tracing::debug!(program = %self.program, args = ?args, "running package installer");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|error| format!("failed to execute {}: {error}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ));
        }

        Ok(())
    }
}
