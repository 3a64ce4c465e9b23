use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Fallback banner text when the backend gives no message.
pub const GENERIC_FETCH_MESSAGE: &str = "Failed to load documents";

/// Failure of a DataSource call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error(
        "Transport failure (status {:?}): {}",
        .status,
        .message.as_deref().unwrap_or(GENERIC_FETCH_MESSAGE)
    )]
    Transport {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("Request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn transport(status: Option<u16>, message: Option<String>) -> Self {
        FetchError::Transport { status, message }
    }

    /// Text shown to the user. Server-provided messages are used verbatim.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::AuthenticationRequired => "Authentication required".to_string(),
            FetchError::Transport {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            FetchError::Transport { .. } | FetchError::Decode(_) => {
                GENERIC_FETCH_MESSAGE.to_string()
            }
            FetchError::Timeout { .. } => "Request timed out".to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            FetchError::AuthenticationRequired => Severity::Blocking,
            _ => Severity::Dismissible,
        }
    }
}

/// How the view presents an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Stays until the user acts on the cause (e.g. signs in).
    Blocking,
    /// Shown as a banner the user can close.
    Dismissible,
}

/// Error held by the list state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListError {
    pub message: String,
    pub severity: Severity,
}

impl From<&FetchError> for ListError {
    fn from(err: &FetchError) -> Self {
        ListError {
            message: err.user_message(),
            severity: err.severity(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Both title and content are required")]
    MissingTitleAndContent,

    #[error("Title is required")]
    MissingTitle,

    #[error("Content is required")]
    MissingContent,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] DraftError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
