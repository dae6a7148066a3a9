use crate::error::{Error, Result};
use opendal::Operator;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod constants;
mod container;
mod operations;
pub(crate) mod utils;

pub use self::container::{Container, ContainerAccess};
pub use self::operations::list::{ListItem, ObjectDescriptor};

use self::constants::DEFAULT_FS_ROOT;
use self::operations::container::OpenDalContainerCreator;
use self::operations::delete::OpenDalDeleter;
use self::operations::download::OpenDalDownloader;
use self::operations::list::OpenDalLister;
use self::operations::upload::OpenDalUploader;
use self::operations::{ContainerCreator, Deleter, Downloader, Lister, Uploader};

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Oss,
    S3,
    Azblob,
    Fs,
}

impl StorageProvider {
    /// URL scheme used when no endpoint is configured.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Oss => "oss",
            Self::S3 => "s3",
            Self::Azblob => "azblob",
            Self::Fs => "file",
        }
    }
}

impl fmt::Display for StorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "oss" => Ok(Self::Oss),
            "s3" | "minio" => Ok(Self::S3),
            "azblob" | "azure" => Ok(Self::Azblob),
            "fs" | "local" => Ok(Self::Fs),
            _ => Err(Error::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Unified storage configuration for different providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub root_path: Option<String>,
}

impl StorageConfig {
    pub fn oss(
        bucket: String,
        access_key_id: String,
        access_key_secret: String,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::Oss,
            bucket,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(access_key_secret),
            endpoint: None,
            region,
            root_path: None,
        }
    }

    pub fn s3(
        bucket: String,
        access_key_id: String,
        secret_access_key: String,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::S3,
            bucket,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(secret_access_key),
            endpoint: None,
            region,
            root_path: None,
        }
    }

    /// Azure Blob storage; `bucket` is the Azure container holding our prefixes.
    pub fn azblob(
        bucket: String,
        account_name: String,
        account_key: String,
        endpoint: String,
    ) -> Self {
        Self {
            provider: StorageProvider::Azblob,
            bucket,
            access_key_id: Some(account_name),
            access_key_secret: Some(account_key),
            endpoint: Some(endpoint),
            region: None,
            root_path: None,
        }
    }

    pub fn fs(root_path: String) -> Self {
        Self {
            provider: StorageProvider::Fs,
            bucket: "local".to_string(),
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: Some(root_path),
        }
    }

    /// Printable location of the bucket root, used to build object addresses.
    pub fn base_address(&self) -> String {
        match (&self.provider, &self.endpoint) {
            (StorageProvider::Fs, _) => {
                let root = self.root_path.as_deref().unwrap_or(DEFAULT_FS_ROOT);
                format!("file://{}", root.trim_end_matches('/'))
            }
            (_, Some(endpoint)) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            (provider, None) => format!("{}://{}", provider.scheme(), self.bucket),
        }
    }
}

/// Unified storage client using OpenDAL
#[derive(Clone)]
pub struct StorageClient {
    operator: Operator,
    provider: StorageProvider,
    base_address: String,
    fs_root: Option<PathBuf>,
}

impl StorageClient {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let operator = Self::build_operator(&config)?;
        let fs_root = match config.provider {
            StorageProvider::Fs => Some(PathBuf::from(
                config.root_path.as_deref().unwrap_or(DEFAULT_FS_ROOT),
            )),
            _ => None,
        };
        log::debug!(
            "storage client ready provider={:?} bucket={}",
            config.provider,
            config.bucket
        );
        Ok(Self {
            operator,
            provider: config.provider,
            base_address: config.base_address(),
            fs_root,
        })
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    fn build_operator(config: &StorageConfig) -> Result<Operator> {
        match &config.provider {
            StorageProvider::Oss => {
                #[cfg(feature = "oss")]
                {
                    let mut builder = opendal::services::Oss::default().bucket(&config.bucket);
                    if let Some(access_key_id) = &config.access_key_id {
                        builder = builder.access_key_id(access_key_id);
                    }
                    if let Some(access_key_secret) = &config.access_key_secret {
                        builder = builder.access_key_secret(access_key_secret);
                    }
                    if let Some(endpoint) = &config.endpoint {
                        builder = builder.endpoint(endpoint);
                    }
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "oss"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "oss (feature disabled)".to_string(),
                    })
                }
            }
            StorageProvider::S3 => {
                #[cfg(feature = "s3")]
                {
                    let mut builder = opendal::services::S3::default().bucket(&config.bucket);
                    if let Some(access_key_id) = &config.access_key_id {
                        builder = builder.access_key_id(access_key_id);
                    }
                    if let Some(secret_access_key) = &config.access_key_secret {
                        builder = builder.secret_access_key(secret_access_key);
                    }
                    if let Some(region) = &config.region {
                        builder = builder.region(region);
                    }
                    if let Some(endpoint) = &config.endpoint {
                        builder = builder.endpoint(endpoint);
                    }
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "s3"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "s3 (feature disabled)".to_string(),
                    })
                }
            }
            StorageProvider::Azblob => {
                #[cfg(feature = "azblob")]
                {
                    let mut builder =
                        opendal::services::Azblob::default().container(&config.bucket);
                    if let Some(account_name) = &config.access_key_id {
                        builder = builder.account_name(account_name);
                    }
                    if let Some(account_key) = &config.access_key_secret {
                        builder = builder.account_key(account_key);
                    }
                    if let Some(endpoint) = &config.endpoint {
                        builder = builder.endpoint(endpoint);
                    }
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "azblob"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "azblob (feature disabled)".to_string(),
                    })
                }
            }
            StorageProvider::Fs => {
                #[cfg(feature = "fs")]
                {
                    let root = config.root_path.as_deref().unwrap_or(DEFAULT_FS_ROOT);
                    let builder = opendal::services::Fs::default().root(root);
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "fs"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "fs (feature disabled)".to_string(),
                    })
                }
            }
        }
    }

    /// Reference a container by name without touching the service.
    pub fn container(&self, name: &str) -> Result<Container> {
        Container::new(name, &self.base_address)
    }

    /// Create the container if it does not exist yet and apply the access policy.
    pub async fn ensure_container(&self, name: &str, access: ContainerAccess) -> Result<Container> {
        log::debug!(
            "ensure_container provider={:?} name={} access={:?}",
            self.provider,
            name,
            access
        );
        let container = self.container(name)?;
        let creator =
            OpenDalContainerCreator::new(self.operator.clone(), self.provider, self.fs_root.clone());
        let created = creator.ensure(&container, access).await?;
        log::info!(
            "container {} {}",
            container.name(),
            if created { "created" } else { "already exists" }
        );
        Ok(container)
    }

    /// Upload a local file; the object is named after the file when `object_name` is `None`.
    pub async fn upload_object(
        &self,
        container: &Container,
        local_path: &Path,
        object_name: Option<&str>,
    ) -> Result<ObjectDescriptor> {
        log::debug!(
            "upload_object provider={:?} container={} local_path={} object_name={:?}",
            self.provider,
            container.name(),
            local_path.display(),
            object_name
        );
        let uploader = OpenDalUploader::new(self.operator.clone());
        uploader.upload(container, local_path, object_name).await
    }

    pub async fn list_objects(&self, container: &Container) -> Result<Vec<ObjectDescriptor>> {
        log::debug!(
            "list_objects provider={:?} container={}",
            self.provider,
            container.name()
        );
        let lister = OpenDalLister::new(self.operator.clone());
        lister.list(container).await
    }

    /// Download an object into `local_path`, returning the number of bytes written.
    pub async fn download_object(
        &self,
        container: &Container,
        object_name: &str,
        local_path: &Path,
    ) -> Result<u64> {
        log::debug!(
            "download_object provider={:?} container={} object_name={} local_path={}",
            self.provider,
            container.name(),
            object_name,
            local_path.display()
        );
        let downloader = OpenDalDownloader::new(self.operator.clone());
        downloader.download(container, object_name, local_path).await
    }

    pub async fn delete_object(&self, container: &Container, object_name: &str) -> Result<()> {
        log::debug!(
            "delete_object provider={:?} container={} object_name={}",
            self.provider,
            container.name(),
            object_name
        );
        let deleter = OpenDalDeleter::new(self.operator.clone());
        deleter.delete(container, object_name).await
    }
}
