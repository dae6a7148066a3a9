use crate::error::Result;
use crate::storage::utils::path::{object_key, validate_container_name};

/// Access policy applied when a container is ensured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerAccess {
    /// Only authenticated callers can read objects.
    #[default]
    Private,
    /// Object contents are publicly readable; the listing stays private.
    Blob,
}

impl ContainerAccess {
    pub fn from_public_flag(public: bool) -> Self {
        if public { Self::Blob } else { Self::Private }
    }
}

/// A named grouping of objects: the top-level prefix `"<name>/"` of the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    name: String,
    prefix: String,
    base_address: String,
}

impl Container {
    pub(crate) fn new(name: &str, base_address: &str) -> Result<Self> {
        validate_container_name(name)?;
        Ok(Self {
            name: name.to_string(),
            prefix: format!("{name}/"),
            base_address: base_address.trim_end_matches('/').to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory-style prefix every object key in this container starts with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Storage key of `object_name` inside this container.
    pub fn key(&self, object_name: &str) -> String {
        object_key(&self.prefix, object_name)
    }

    /// Printable address of `object_name`.
    pub fn address(&self, object_name: &str) -> String {
        format!("{}/{}", self.base_address, self.key(object_name))
    }
}
