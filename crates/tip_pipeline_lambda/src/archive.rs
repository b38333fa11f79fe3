use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tip_pipeline_core::layer::archive_entry_name;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive source directory '{}' does not exist", .0.display())]
    MissingSource(PathBuf),
    #[error("archive i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("archive write failed: {0}")]
    Zip(#[from] ZipError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub files: usize,
    pub directories: usize,
}

/// Zips `source_dir` into `archive_path`, replacing any existing archive.
///
/// Entries are prefixed with the source directory's own name, so
/// `/tmp/python/requests/api.py` is stored as `python/requests/api.py`.
/// Directory contents are visited in sorted order. Symlinked files are stored
/// with their target's contents; symlinked directories become empty entries.
pub fn archive_directory(
    source_dir: &Path,
    archive_path: &Path,
) -> Result<ArchiveSummary, ArchiveError> {
    if !source_dir.is_dir() {
        return Err(ArchiveError::MissingSource(source_dir.to_path_buf()));
    }

    let root_name = source_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = fs::File::create(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let mut summary = ArchiveSummary {
        files: 0,
        directories: 0,
    };

    if !root_name.is_empty() {
        zip.add_directory(root_name.as_str(), entry_options(&fs::metadata(source_dir)?))?;
        summary.directories += 1;
    }

    add_directory_contents(&mut zip, source_dir, Path::new(""), &root_name, &mut summary)?;
    zip.finish()?;
    Ok(summary)
}

fn add_directory_contents(
    zip: &mut ZipWriter<fs::File>,
    source_dir: &Path,
    relative: &Path,
    root_name: &str,
    summary: &mut ArchiveSummary,
) -> Result<(), ArchiveError> {
    let mut entries = fs::read_dir(source_dir.join(relative))?
        .map(|entry| entry.map(|value| value.file_name()))
        .collect::<Result<Vec<_>, io::Error>>()?;
    entries.sort();

    for name in entries {
        let child = relative.join(&name);
        let path = source_dir.join(&child);
        let link_metadata = fs::symlink_metadata(&path)?;
        let is_symlink = link_metadata.file_type().is_symlink();
        let metadata = if is_symlink {
            // Dangling links have nothing to archive.
            match fs::metadata(&path) {
                Ok(target) => target,
                Err(_) => continue,
            }
        } else {
            link_metadata
        };
        let entry_name = archive_entry_name(root_name, &child);
        let entry_name = entry_name.trim_start_matches('/');

        if metadata.is_dir() {
            zip.add_directory(entry_name, entry_options(&metadata))?;
            summary.directories += 1;
            // Linked directories are recorded but never walked.
            if !is_symlink {
                add_directory_contents(zip, source_dir, &child, root_name, summary)?;
            }
        } else {
            zip.start_file(entry_name, entry_options(&metadata))?;
            let mut source = fs::File::open(&path)?;
            io::copy(&mut source, zip)?;
            summary.files += 1;
        }
    }

    Ok(())
}

fn entry_options(metadata: &fs::Metadata) -> FileOptions {
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode() & 0o7777)
    }

    #[cfg(not(unix))]
    {
        let _ = metadata;
        options
    }
}
