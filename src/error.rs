use thiserror::Error;

/// Errors raised while building or addressing the asynchronous client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid pool size: {0}")]
    InvalidPoolSize(usize),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the wrapped synchronous client.
///
/// The asynchronous layer never creates these for an operation on its own
/// account; it hands them to the callback and the handle exactly as the
/// blocking call returned them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrganizationsError {
    #[error("Rate exceeded: {message}")]
    Throttling { message: String },

    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("Access denied: {message}")]
    AccessDenied { message: String },

    #[error("{resource} not found: {message}")]
    NotFound { resource: String, message: String },

    #[error("Concurrent modification: {message}")]
    ConcurrentModification { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Operation {operation} is not supported by this client")]
    Unsupported { operation: &'static str },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OrganizationsError {
    pub fn throttling(message: impl Into<String>) -> Self {
        Self::Throttling {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Service error code, as the service would report it.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Throttling { .. } => "TooManyRequestsException",
            Self::Validation { .. } => "InvalidInputException",
            Self::AccessDenied { .. } => "AccessDeniedException",
            Self::NotFound { .. } => "NotFoundException",
            Self::ConcurrentModification { .. } => "ConcurrentModificationException",
            Self::ServiceUnavailable { .. } => "ServiceException",
            Self::Transport(_) => "TransportError",
            Self::Unsupported { .. } => "UnsupportedOperation",
            Self::Serialization(_) => "SerializationError",
        }
    }

    #[must_use]
    pub fn is_throttling(&self) -> bool {
        matches!(self, Self::Throttling { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether a caller could reasonably try the same request again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Throttling { .. }
                | Self::ConcurrentModification { .. }
                | Self::ServiceUnavailable { .. }
                | Self::Transport(_)
        )
    }
}

/// Terminal outcome of a dispatched task that did not produce a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error(transparent)]
    Service(#[from] OrganizationsError),

    #[error("Task was cancelled before it started")]
    Cancelled,

    #[error("Task was rejected: executor is shut down")]
    Rejected,

    #[error("Task was abandoned by executor shutdown")]
    Abandoned,

    #[error("Task panicked: {0}")]
    Panicked(String),
}

impl TaskError {
    /// The operation's own error, if that is what ended the task.
    pub fn service_error(&self) -> Option<&OrganizationsError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_service_error(self) -> Option<OrganizationsError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

pub type TaskResult<T> = std::result::Result<T, TaskError>;
