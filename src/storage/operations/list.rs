use crate::error::{Error, Result, StorageUnavailableSnafu};
use crate::storage::container::Container;
use crate::storage::utils::path::relative_name;
use futures::stream::TryStreamExt;
use opendal::{EntryMode, Operator};
use serde::Serialize;
use snafu::ResultExt;
use std::fmt;

/// Trait for listing the objects of a container.
pub trait Lister {
    /// List every object currently stored in a container.
    ///
    /// Each call re-queries the service; order is whatever the service returns.
    ///
    /// # Arguments
    /// * `container` - Container to enumerate
    ///
    /// # Returns
    /// * `Result<Vec<ObjectDescriptor>>` - One descriptor per object
    async fn list(&self, container: &Container) -> Result<Vec<ObjectDescriptor>>;
}

/// An object stored in a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectDescriptor {
    /// Name relative to the container.
    pub name: String,
    /// Full storage key, including the container prefix.
    pub key: String,
    /// Content length in bytes.
    pub size: u64,
    pub address: String,
}

impl fmt::Display for ObjectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object of length {}: {}", self.size, self.address)
    }
}

/// One entry yielded while enumerating a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// A plain object with its content.
    Object(ObjectDescriptor),
    /// A directory or virtual folder, including the container's own marker.
    Prefix(String),
    /// An entry whose kind the backend could not tell.
    Unknown(String),
}

impl ListItem {
    /// Classify a raw list entry of `container`.
    pub fn classify(container: &Container, path: &str, mode: EntryMode, size: u64) -> Self {
        match (mode, relative_name(path, container.prefix())) {
            (EntryMode::FILE, Some(name)) => ListItem::Object(ObjectDescriptor {
                name: name.to_string(),
                key: container.key(name),
                size,
                address: container.address(name),
            }),
            (EntryMode::FILE, None) => ListItem::Unknown(path.to_string()),
            (EntryMode::DIR, _) => ListItem::Prefix(path.to_string()),
            _ => ListItem::Unknown(path.to_string()),
        }
    }
}

/// Implementation of Lister for OpenDAL Operator.
pub struct OpenDalLister {
    operator: Operator,
}

impl OpenDalLister {
    /// Create a new lister with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Fill in the size of an object whose listing entry carried none.
    async fn resolve_size(&self, mut object: ObjectDescriptor) -> Result<ObjectDescriptor> {
        if object.size == 0 {
            let meta = self
                .operator
                .stat(&object.key)
                .await
                .with_context(|_| StorageUnavailableSnafu {
                    operation: format!("stat {}", object.key),
                })?;
            object.size = meta.content_length();
        }
        Ok(object)
    }
}

impl Lister for OpenDalLister {
    async fn list(&self, container: &Container) -> Result<Vec<ObjectDescriptor>> {
        let lister = self
            .operator
            .lister_with(container.prefix())
            .recursive(true)
            .await
            .with_context(|_| StorageUnavailableSnafu {
                operation: format!("list container {}", container.name()),
            })?;

        let items: Vec<ListItem> = lister
            .map_err(|e| Error::StorageUnavailable {
                operation: format!("list container {}", container.name()),
                source: e,
            })
            .map_ok(|entry| {
                let meta = entry.metadata();
                ListItem::classify(container, entry.path(), meta.mode(), meta.content_length())
            })
            .try_collect()
            .await?;

        let mut objects = Vec::new();
        for item in items {
            match item {
                ListItem::Object(object) => objects.push(self.resolve_size(object).await?),
                ListItem::Prefix(path) => log::trace!("skipping prefix {path}"),
                ListItem::Unknown(path) => log::debug!("skipping entry of unknown kind {path}"),
            }
        }
        Ok(objects)
    }
}
