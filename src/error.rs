use thiserror::Error;

/// Failure reported by the remote store for a single command.
/// The store speaks in human-readable messages, so that is all we carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RemoteError(pub String);

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Errors surfaced by the sync components to their callers.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Input rejected before anything reached the store; the user corrects it and retries.
    #[error("{0}")]
    Validation(String),

    /// PO code already belongs to another supplier.
    #[error("PO {po} is already used by {holder}")]
    Conflict { po: String, holder: String },

    #[error("remote command `{command}` failed: {message}")]
    Transport {
        command: &'static str,
        message: String,
    },

    #[error("editing is disabled for this session")]
    PermissionDenied,

    #[error("supplier {0} is not loaded")]
    UnknownEntity(String),

    /// Local file IO (picker, import payload, export target), with its context chain.
    #[error("{0}")]
    File(String),
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        SyncError::File(format!("{err:#}"))
    }
}

impl SyncError {
    pub fn transport(command: &'static str, err: RemoteError) -> Self {
        SyncError::Transport {
            command,
            message: err.0,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
