use reqwest::StatusCode;

pub const TRANSPORT_FAILURE_MESSAGE: &str = "Fail, please check connection.";
pub const FORMAT_FAILURE_MESSAGE: &str = "Fail, please check file format.";

/// Failure while retrieving or decoding the catalog document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("fetch {source_name}: {kind}")]
    Transport {
        source_name: String,
        kind: TransportFailure,
    },
    #[error("decode {source_name}: {reason}")]
    Format { source_name: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum TransportFailure {
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Text shown in place of the table body. The error kind is otherwise not exposed.
    pub fn user_message(&self) -> &'static str {
        match self {
            LoadError::Transport { .. } => TRANSPORT_FAILURE_MESSAGE,
            LoadError::Format { .. } => FORMAT_FAILURE_MESSAGE,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, LoadError::Transport { .. })
    }
}

/// A user action that was rejected before touching any state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a book first")]
    NoSelection,
    #[error("Invalid quantity! Please enter 1-99")]
    InvalidQuantity,
}
