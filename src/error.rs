use thiserror::Error;

/// Application-boundary error: a message plus the process exit code.
///
/// Exit codes:
/// - `2`: invalid input or configuration (preset, date range, flags, files)
/// - `3`: the payload held no usable prediction data
/// - `4`: runtime failures (network, terminal, upstream errors)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Reasons a prediction request can fail to produce a plottable series.
///
/// None of these are fatal to the process: the CLI prints them and exits,
/// the TUI shows them in the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorReason {
    /// The payload itself signals failure (or the fetcher wrapped a transport error).
    #[error("{0}")]
    UpstreamError(String),
    #[error("Unable to parse prediction payload")]
    UnparseablePayload,
    #[error("No prediction data to plot")]
    EmptySeries,
    #[error("Unknown preset '{0}'")]
    InvalidPreset(String),
    #[error("{0}")]
    InvalidDateRange(String),
}

impl ErrorReason {
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorReason::InvalidPreset(_) | ErrorReason::InvalidDateRange(_) => 2,
            ErrorReason::UnparseablePayload | ErrorReason::EmptySeries => 3,
            ErrorReason::UpstreamError(_) => 4,
        }
    }
}

impl From<ErrorReason> for AppError {
    fn from(reason: ErrorReason) -> Self {
        AppError::new(reason.exit_code(), format!("Error: {reason}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_map_to_exit_codes() {
        let err: AppError = ErrorReason::UpstreamError("timeout".to_string()).into();
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "Error: timeout");

        let err: AppError = ErrorReason::InvalidPreset("Yesterday".to_string()).into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Error: Unknown preset 'Yesterday'");

        assert_eq!(ErrorReason::EmptySeries.exit_code(), 3);
        assert_eq!(ErrorReason::UnparseablePayload.exit_code(), 3);
    }
}
