// Container creation operation trait and implementation
use crate::error::{Error, PublicAccessUnsupportedSnafu, Result};
use crate::storage::StorageProvider;
use crate::storage::container::{Container, ContainerAccess};
use opendal::{ErrorKind, Operator};
use std::path::PathBuf;

/// Trait for making sure a container exists before objects are written to it.
pub trait ContainerCreator {
    /// Create the container if absent and apply `access`.
    ///
    /// # Arguments
    /// * `container` - Container to create
    /// * `access` - Access policy for the container's objects
    ///
    /// # Returns
    /// * `Result<bool>` - `true` if the container was created by this call
    async fn ensure(&self, container: &Container, access: ContainerAccess) -> Result<bool>;
}

/// Implementation of ContainerCreator for OpenDAL Operator.
pub struct OpenDalContainerCreator {
    operator: Operator,
    provider: StorageProvider,
    fs_root: Option<PathBuf>,
}

impl OpenDalContainerCreator {
    /// Create a new container creator with the given OpenDAL operator.
    pub fn new(operator: Operator, provider: StorageProvider, fs_root: Option<PathBuf>) -> Self {
        Self {
            operator,
            provider,
            fs_root,
        }
    }

    async fn container_exists(&self, container: &Container) -> Result<bool> {
        match self.operator.stat(container.prefix()).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::StorageUnavailable {
                operation: format!("stat container {}", container.name()),
                source: e,
            }),
        }
    }

    async fn create(&self, container: &Container) -> Result<bool> {
        match self.operator.create_dir(container.prefix()).await {
            Ok(_) => Ok(true),
            // Someone else created it between our stat and create.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(Error::StorageUnavailable {
                operation: format!("create container {}", container.name()),
                source: e,
            }),
        }
    }

    async fn apply_access(&self, container: &Container, access: ContainerAccess) -> Result<()> {
        if access == ContainerAccess::Private {
            return Ok(());
        }

        match (&self.provider, &self.fs_root) {
            (StorageProvider::Fs, Some(root)) => {
                set_public_blob_mode(root.join(container.name())).await
            }
            (provider, _) => PublicAccessUnsupportedSnafu {
                provider: provider.to_string(),
            }
            .fail(),
        }
    }
}

#[cfg(unix)]
async fn set_public_blob_mode(dir: PathBuf) -> Result<()> {
    use crate::error::FileWriteSnafu;
    use crate::storage::constants::PUBLIC_BLOB_DIR_MODE;
    use snafu::ResultExt;
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(&dir, Permissions::from_mode(PUBLIC_BLOB_DIR_MODE))
        .await
        .context(FileWriteSnafu { path: dir })
}

#[cfg(not(unix))]
async fn set_public_blob_mode(_dir: PathBuf) -> Result<()> {
    PublicAccessUnsupportedSnafu {
        provider: "fs on this platform",
    }
    .fail()
}

impl ContainerCreator for OpenDalContainerCreator {
    async fn ensure(&self, container: &Container, access: ContainerAccess) -> Result<bool> {
        let created = if self.container_exists(container).await? {
            false
        } else {
            self.create(container).await?
        };
        self.apply_access(container, access).await?;
        Ok(created)
    }
}
