// Delete operation trait and implementation
use crate::error::{ObjectNotFoundSnafu, Result, StorageUnavailableSnafu};
use crate::storage::container::Container;
use crate::storage::utils::error::object_error;
use crate::storage::utils::path::validate_object_name;
use opendal::Operator;
use snafu::{ResultExt, ensure};

/// Trait for deleting objects from storage.
///
/// Deleting an absent object is an error, not a no-op.
pub trait Deleter {
    /// Delete one object from a container.
    ///
    /// # Arguments
    /// * `container` - Container holding the object
    /// * `object_name` - Object to remove
    ///
    /// # Returns
    /// * `Result<()>` - Success or detailed error information
    async fn delete(&self, container: &Container, object_name: &str) -> Result<()>;
}

/// Implementation of Deleter for OpenDAL Operator.
pub struct OpenDalDeleter {
    operator: Operator,
}

impl OpenDalDeleter {
    /// Create a new deleter with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Deleter for OpenDalDeleter {
    async fn delete(&self, container: &Container, object_name: &str) -> Result<()> {
        validate_object_name(object_name)?;
        let key = container.key(object_name);

        let meta = self
            .operator
            .stat(&key)
            .await
            .map_err(|e| object_error(e, container.name(), object_name, "delete"))?;
        ensure!(
            !meta.mode().is_dir(),
            ObjectNotFoundSnafu {
                container: container.name(),
                object: object_name,
            }
        );

        self.operator
            .delete(&key)
            .await
            .with_context(|_| StorageUnavailableSnafu {
                operation: format!("delete {key}"),
            })?;
        log::info!("deleted {key}");
        Ok(())
    }
}
