// Name and path helpers shared across storage operations
use crate::error::{InvalidContainerNameSnafu, InvalidObjectNameSnafu, Result};
use snafu::ensure;
use std::path::Path;

/// Check that a container name can be used as a single top-level prefix.
pub fn validate_container_name(name: &str) -> Result<()> {
    ensure!(
        !name.trim().is_empty(),
        InvalidContainerNameSnafu {
            name,
            reason: "name must not be empty"
        }
    );
    ensure!(
        !name.contains('/'),
        InvalidContainerNameSnafu {
            name,
            reason: "name must not contain '/'"
        }
    );
    ensure!(
        !is_relative_segment(name),
        InvalidContainerNameSnafu {
            name,
            reason: "name must not be '.' or '..'"
        }
    );
    Ok(())
}

/// Check that an object name addresses a file, not a directory.
pub fn validate_object_name(name: &str) -> Result<()> {
    ensure!(
        !name.trim_matches('/').is_empty(),
        InvalidObjectNameSnafu {
            name,
            reason: "name must not be empty"
        }
    );
    ensure!(
        !name.ends_with('/'),
        InvalidObjectNameSnafu {
            name,
            reason: "name must not end with '/'"
        }
    );
    ensure!(
        !name.split('/').any(is_relative_segment),
        InvalidObjectNameSnafu {
            name,
            reason: "name must not contain '.' or '..' segments"
        }
    );
    Ok(())
}

// Such segments would resolve outside the container prefix.
fn is_relative_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Join a container prefix (`"name/"`) and an object name into a storage key.
pub fn object_key(prefix: &str, object_name: &str) -> String {
    format!("{prefix}{}", object_name.trim_start_matches('/'))
}

/// Object name of `key` relative to `prefix`, or `None` if it lies outside it.
pub fn relative_name<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    key.trim_start_matches('/')
        .strip_prefix(prefix)
        .filter(|name| !name.is_empty())
}

/// Base name of a local file, used as the default object name.
pub fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().to_string())
}
