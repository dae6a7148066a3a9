use crate::error::{
    FileNotFoundSnafu, FileReadSnafu, NotAFileSnafu, Result, StorageUnavailableSnafu,
};
use crate::storage::constants::{DEFAULT_BUFFER_SIZE, PROGRESS_UPDATE_INTERVAL};
use crate::storage::container::Container;
use crate::storage::operations::list::ObjectDescriptor;
use crate::storage::utils::path::{base_name, validate_object_name};
use crate::storage::utils::progress::ConsoleProgressReporter;
use opendal::Operator;
use snafu::{OptionExt, ResultExt, ensure};
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncReadExt, BufReader};

/// Trait for uploading local files as objects.
pub trait Uploader {
    /// Upload a single local file into a container, overwriting any object of the same name.
    ///
    /// # Arguments
    /// * `container` - Destination container
    /// * `local_path` - Source file on the local filesystem
    /// * `object_name` - Object name; defaults to the file's base name
    ///
    /// # Returns
    /// * `Result<ObjectDescriptor>` - The object as written
    async fn upload(
        &self,
        container: &Container,
        local_path: &Path,
        object_name: Option<&str>,
    ) -> Result<ObjectDescriptor>;
}

/// Implementation of Uploader for OpenDAL Operator.
pub struct OpenDalUploader {
    operator: Operator,
}

impl OpenDalUploader {
    /// Create a new uploader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Stream a single file into `key`, returning the number of bytes written.
    async fn upload_file_streaming(&self, local_path: &Path, key: &str) -> Result<u64> {
        let file = fs::File::open(local_path)
            .await
            .context(FileReadSnafu { path: local_path })?;
        let file_size = file
            .metadata()
            .await
            .context(FileReadSnafu { path: local_path })?
            .len();
        let mut reader = BufReader::new(file);
        let mut buffer = vec![0u8; DEFAULT_BUFFER_SIZE];
        let mut total_bytes = 0u64;
        let mut writer = self
            .operator
            .writer(key)
            .await
            .with_context(|_| StorageUnavailableSnafu {
                operation: format!("open writer for {key}"),
            })?;

        let step_bytes = DEFAULT_BUFFER_SIZE as u64 * PROGRESS_UPDATE_INTERVAL;
        let reporter = ConsoleProgressReporter::new(
            format!("Uploading {}", local_path.display()),
            file_size,
            step_bytes,
        );

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .await
                .context(FileReadSnafu { path: local_path })?;
            if bytes_read == 0 {
                break;
            }
            writer
                .write(buffer[..bytes_read].to_vec())
                .await
                .with_context(|_| StorageUnavailableSnafu {
                    operation: format!("write {key}"),
                })?;
            total_bytes += bytes_read as u64;
            reporter.maybe_report(total_bytes);
        }
        writer.close().await.with_context(|_| StorageUnavailableSnafu {
            operation: format!("close writer for {key}"),
        })?;
        reporter.finish();

        Ok(total_bytes)
    }
}

impl Uploader for OpenDalUploader {
    async fn upload(
        &self,
        container: &Container,
        local_path: &Path,
        object_name: Option<&str>,
    ) -> Result<ObjectDescriptor> {
        ensure!(
            local_path.exists(),
            FileNotFoundSnafu {
                path: local_path.to_path_buf()
            }
        );
        ensure!(
            local_path.is_file(),
            NotAFileSnafu {
                path: local_path.to_path_buf()
            }
        );

        let name = match object_name {
            Some(name) => name.to_string(),
            None => base_name(local_path).context(NotAFileSnafu {
                path: local_path.to_path_buf(),
            })?,
        };
        validate_object_name(&name)?;

        let key = container.key(&name);
        let size = self.upload_file_streaming(local_path, &key).await?;
        log::info!(
            "uploaded {} to {key} ({size} bytes)",
            local_path.display()
        );

        Ok(ObjectDescriptor {
            address: container.address(&name),
            name,
            key,
            size,
        })
    }
}

