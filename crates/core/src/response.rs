use chrono::{DateTime, Utc};

/// The uniform envelope every gateway operation returns.
///
/// Failures of any kind (validation, configuration, transport) are folded
/// into the `Err` variant as a human-readable message, so consumers match on
/// the outcome once instead of branching on exception types.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Ok { data: T, timestamp: DateTime<Utc> },
    Err { message: String },
}

impl<T> ApiResponse<T> {
    /// Successful envelope stamped with the current time.
    pub fn ok(data: T) -> Self {
        Self::Ok {
            data,
            timestamp: Utc::now(),
        }
    }

    /// Failed envelope carrying a human-readable message.
    pub fn err(message: impl Into<String>) -> Self {
        Self::Err {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ok { data, .. } => Some(data),
            Self::Err { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Ok { .. } => None,
            Self::Err { message } => Some(message),
        }
    }

    /// Collapse the envelope into a plain `Result`, dropping the timestamp.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Ok { data, .. } => Ok(data),
            Self::Err { message } => Err(message),
        }
    }
}
