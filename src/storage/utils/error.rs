// Error conversion helpers and wrapping macro for Snafu-based errors
use crate::error::Error;
use opendal::ErrorKind;

/// Convert different error types into our unified Error type.
pub trait IntoBlobtourError {
    fn into_error(self) -> Error;
}

impl IntoBlobtourError for Error {
    fn into_error(self) -> Error {
        self
    }
}

impl IntoBlobtourError for opendal::Error {
    fn into_error(self) -> Error {
        self.into()
    }
}

/// Classify a collaborator error raised while touching a single object.
///
/// `NotFound` means the object is absent; anything else is a service failure.
pub fn object_error(
    err: opendal::Error,
    container: &str,
    object: &str,
    operation: &str,
) -> Error {
    if err.kind() == ErrorKind::NotFound {
        Error::ObjectNotFound {
            container: container.to_string(),
            object: object.to_string(),
        }
    } else {
        Error::StorageUnavailable {
            operation: operation.to_string(),
            source: err,
        }
    }
}

/// Macro to wrap a Result-producing expression into a Snafu variant with `source: Box<Error>`.
/// Example:
/// wrap_err!(op.await, StepFailed { step: title })?
#[macro_export]
macro_rules! wrap_err {
    ($expr:expr, $variant:ident { $($field:ident : $value:expr),* $(,)? }) => {{
        $expr.map_err(|e| {
            let src: $crate::error::Error = $crate::storage::utils::error::IntoBlobtourError::into_error(e);
            $crate::error::Error::$variant { $($field: $value),*, source: Box::new(src) }
        })
    }};
}
