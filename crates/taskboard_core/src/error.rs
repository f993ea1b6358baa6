use thiserror::Error;

/// Every failure the core can report. `code()` is stable and is what the CLI
/// prints in `--json` mode and what tests match on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("io_error - {0}")]
    Io(String),
    #[error("malformed_task - {0}")]
    MalformedTask(String),
    #[error("transport_error - {0}")]
    Transport(String),
    #[error("fetch_failed - {0}")]
    FetchFailed(String),
    #[error("create_failed - {0}")]
    CreateFailed(String),
    #[error("update_failed - {0}")]
    UpdateFailed(String),
    #[error("delete_failed - {0}")]
    DeleteFailed(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn malformed_task<M: Into<String>>(message: M) -> Self {
        Self::MalformedTask(message.into())
    }

    pub fn transport<M: Into<String>>(message: M) -> Self {
        Self::Transport(message.into())
    }

    pub fn fetch_failed<M: Into<String>>(message: M) -> Self {
        Self::FetchFailed(message.into())
    }

    pub fn create_failed<M: Into<String>>(message: M) -> Self {
        Self::CreateFailed(message.into())
    }

    pub fn update_failed<M: Into<String>>(message: M) -> Self {
        Self::UpdateFailed(message.into())
    }

    pub fn delete_failed<M: Into<String>>(message: M) -> Self {
        Self::DeleteFailed(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::MalformedTask(_) => "malformed_task",
            Self::Transport(_) => "transport_error",
            Self::FetchFailed(_) => "fetch_failed",
            Self::CreateFailed(_) => "create_failed",
            Self::UpdateFailed(_) => "update_failed",
            Self::DeleteFailed(_) => "delete_failed",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message)
            | Self::InvalidData(message)
            | Self::Io(message)
            | Self::MalformedTask(message)
            | Self::Transport(message)
            | Self::FetchFailed(message)
            | Self::CreateFailed(message)
            | Self::UpdateFailed(message)
            | Self::DeleteFailed(message) => message,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
