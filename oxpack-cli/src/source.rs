//! Source location
//!
//! Turns the user-supplied source argument into something the build
//! service can fetch: remote references pass through unchanged, local
//! directories are archived into a gzipped tar and uploaded.

use anyhow::{Context, Result};
use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use oxpack_client::RegistryClient;
use oxpack_core::domain::registry::Registry;

use crate::submit::SourceLocator;

/// VCS metadata directories never shipped to the build service
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Remote reference prefixes accepted as-is
const REMOTE_PREFIXES: &[&str] = &["http://", "https://", "git://"];

/// Remote reference suffixes accepted as-is
const REMOTE_SUFFIXES: &[&str] = &[".git", ".tar.gz", ".tgz"];

/// Uploads local source trees and passes remote references through
pub struct ArchiveUploader {
    client: RegistryClient,
}

impl ArchiveUploader {
    /// Creates a new uploader backed by the given client
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceLocator for ArchiveUploader {
    async fn locate_source(
        &self,
        source: &str,
        registry: &Registry,
    ) -> Result<Option<String>> {
        let source = source.trim();
        if source.is_empty() {
            return Ok(None);
        }

        if is_remote_source(source) {
            debug!("Using remote source {}", source);
            return Ok(Some(source.to_string()));
        }

        let dir = Path::new(source);
        if !dir.is_dir() {
            return Ok(None);
        }

        let archive = archive_source_dir(dir)
            .with_context(|| format!("Failed to archive source directory {}", dir.display()))?;
        debug!("Archived {} ({} bytes)", dir.display(), archive.len());

        let upload = self
            .client
            .request_source_upload(&registry.name)
            .await
            .context("Failed to request a source upload slot")?;

        self.client
            .upload_source(&upload.upload_url, archive)
            .await
            .context("Failed to upload source archive")?;

        Ok(Some(upload.relative_path))
    }
}

/// Whether the source argument already points at a fetchable remote
fn is_remote_source(source: &str) -> bool {
    REMOTE_PREFIXES.iter().any(|p| source.starts_with(p))
        || REMOTE_SUFFIXES.iter().any(|s| source.ends_with(s))
}

/// Archive a directory into a gzipped tar held in memory
///
/// Paths inside the archive are relative to `dir`. VCS metadata
/// directories are skipped entirely.
pub fn archive_source_dir(dir: &Path) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let walker = WalkDir::new(dir).min_depth(1).into_iter().filter_entry(|e| {
        !(e.file_type().is_dir()
            && SKIPPED_DIRS.contains(&e.file_name().to_string_lossy().as_ref()))
    });

    for entry in walker {
        let entry = entry.context("Failed to walk source directory")?;
        let relative = entry
            .path()
            .strip_prefix(dir)
            .context("Walked entry is outside the source directory")?;

        if entry.file_type().is_dir() {
            builder
                .append_dir(relative, entry.path())
                .with_context(|| format!("Failed to archive directory {}", relative.display()))?;
        } else if entry.file_type().is_file() {
            builder
                .append_path_with_name(entry.path(), relative)
                .with_context(|| format!("Failed to archive file {}", relative.display()))?;
        }
    }

    let encoder = builder
        .into_inner()
        .context("Failed to finish source archive")?;
    let bytes = encoder.finish().context("Failed to finish gzip stream")?;

    Ok(bytes)
}
