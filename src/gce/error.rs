use crate::gce::OperationName;
use std::result;
use std::time::Duration;
use thiserror::Error;

pub type GceResult<T> = result::Result<T, GceError>;

#[derive(Debug, Error)]
pub enum GceError {
    #[error("Invalid request: {reason}")]
    Validation { reason: String },

    #[error("No such {resource}")]
    NotFound {
        resource: String,

        #[source]
        cause: anyhow::Error,
    },

    #[error("Couldn't reach the compute API")]
    Transient(#[source] anyhow::Error),

    #[error("Error during {label}: [Code: {code}]: {message} (operation `{operation}`)")]
    Provider {
        label: String,
        operation: String,
        code: String,
        message: String,
    },

    #[error(
        "Timed out during {label}: `{target}` didn't finish within {}",
        humantime::format_duration(*.elapsed)
    )]
    Timeout {
        label: String,
        target: String,
        elapsed: Duration,
    },

    #[error("Stopped waiting for {label} of `{target}` (the remote operation keeps running)")]
    Cancelled { label: String, target: String },
}

impl GceError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn provider(
        label: &str,
        operation: &OperationName,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            label: label.into(),
            operation: operation.to_string(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether retrying the same call later might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<anyhow::Error> for GceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Transient(err)
    }
}

#[cfg(test)]
impl PartialEq<GceError> for GceError {
    fn eq(&self, other: &GceError) -> bool {
        self.to_string() == other.to_string()
    }
}
