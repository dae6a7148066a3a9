use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Environment variable '{key}' is required but not found"))]
    MissingEnvVar { key: String },

    #[snafu(display("Invalid connection string: {reason}"))]
    InvalidConnectionString { reason: String },

    #[snafu(display("Unsupported storage provider: {provider}"))]
    UnsupportedProvider { provider: String },

    #[snafu(display("Invalid container name '{name}': {reason}"))]
    InvalidContainerName { name: String, reason: String },

    #[snafu(display("Invalid object name '{name}': {reason}"))]
    InvalidObjectName { name: String, reason: String },

    #[snafu(display("Storage service unavailable during {operation}: {source}"))]
    StorageUnavailable {
        operation: String,
        source: opendal::Error,
    },

    #[snafu(display("Public access policies are not supported by the {provider} provider"))]
    PublicAccessUnsupported { provider: String },

    #[snafu(display("Object '{object}' not found in container '{container}'"))]
    ObjectNotFound { container: String, object: String },

    #[snafu(display("File not found: {}", path.display()))]
    FileNotFound { path: PathBuf },

    #[snafu(display("Not a regular file: {}", path.display()))]
    NotAFile { path: PathBuf },

    #[snafu(display("Failed to read '{}': {source}", path.display()))]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to write '{}': {source}", path.display()))]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("{step} failed: {source}"))]
    StepFailed { step: String, source: Box<Error> },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl Error {
    /// Follow boxed `StepFailed` sources down to the error that started the chain.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::StepFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this error belongs to startup configuration rather than a storage call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.root_cause(),
            Error::MissingEnvVar { .. }
                | Error::InvalidConnectionString { .. }
                | Error::UnsupportedProvider { .. }
                | Error::InvalidContainerName { .. }
                | Error::InvalidObjectName { .. }
        )
    }
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::StorageUnavailable {
            operation: "storage request".to_string(),
            source: error,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}
