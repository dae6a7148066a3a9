use crate::error::{FileWriteSnafu, Result, StorageUnavailableSnafu};
use crate::storage::constants::{DEFAULT_CHUNK_SIZE, PROGRESS_UPDATE_INTERVAL};
use crate::storage::container::Container;
use crate::storage::utils::error::object_error;
use crate::storage::utils::path::validate_object_name;
use crate::storage::utils::progress::ConsoleProgressReporter;
use opendal::Operator;
use snafu::ResultExt;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Trait for downloading objects to local files.
pub trait Downloader {
    /// Download one object, creating or truncating the local file.
    ///
    /// # Arguments
    /// * `container` - Container holding the object
    /// * `object_name` - Object to fetch
    /// * `local_path` - Destination file on the local filesystem
    ///
    /// # Returns
    /// * `Result<u64>` - Number of bytes written to `local_path`
    async fn download(
        &self,
        container: &Container,
        object_name: &str,
        local_path: &Path,
    ) -> Result<u64>;
}

/// Implementation of Downloader for OpenDAL Operator.
pub struct OpenDalDownloader {
    operator: Operator,
}

impl OpenDalDownloader {
    /// Create a new downloader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Downloader for OpenDalDownloader {
    async fn download(
        &self,
        container: &Container,
        object_name: &str,
        local_path: &Path,
    ) -> Result<u64> {
        validate_object_name(object_name)?;
        let key = container.key(object_name);

        // Resolve the object before touching the local file so a missing
        // object leaves no empty file behind.
        let meta = self
            .operator
            .stat(&key)
            .await
            .map_err(|e| object_error(e, container.name(), object_name, "download"))?;
        let total = meta.content_length();
        let reader = self
            .operator
            .reader(&key)
            .await
            .map_err(|e| object_error(e, container.name(), object_name, "download"))?;

        let mut file = fs::File::create(local_path)
            .await
            .context(FileWriteSnafu { path: local_path })?;

        let reporter = ConsoleProgressReporter::new(
            format!("Downloading {key}"),
            total,
            DEFAULT_CHUNK_SIZE * PROGRESS_UPDATE_INTERVAL / 10,
        );
        let mut offset = 0u64;
        while offset < total {
            let end = (offset + DEFAULT_CHUNK_SIZE).min(total);
            let chunk = reader
                .read(offset..end)
                .await
                .with_context(|_| StorageUnavailableSnafu {
                    operation: format!("read {key}"),
                })?;
            if chunk.is_empty() {
                break;
            }
            file.write_all(&chunk.to_bytes())
                .await
                .context(FileWriteSnafu { path: local_path })?;
            offset += chunk.len() as u64;
            reporter.maybe_report(offset);
        }
        file.flush()
            .await
            .context(FileWriteSnafu { path: local_path })?;
        reporter.finish();

        log::info!("downloaded {key} to {} ({offset} bytes)", local_path.display());
        Ok(offset)
    }
}
