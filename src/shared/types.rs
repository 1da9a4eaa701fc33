use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status PostgREST answers with when a single-row query matched zero rows
pub const NO_ROWS_STATUS: u16 = 406;

/// `{data, error, status}` triple returned by every backend call and passed
/// through to API clients unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BackendResponse<T> {
    pub data: Option<T>,
    pub error: Option<BackendError>,
    pub status: u16,
}

/// Error reported by the backend (REST, auth or storage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BackendError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
            hint: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl<T> BackendResponse<T> {
    pub fn ok(status: u16, data: Option<T>) -> Self {
        Self {
            data,
            error: None,
            status,
        }
    }

    pub fn failed(status: u16, error: BackendError) -> Self {
        Self {
            data: None,
            error: Some(error),
            status,
        }
    }

    /// Zero rows matched a single-row query
    pub fn is_no_rows(&self) -> bool {
        self.status == NO_ROWS_STATUS
    }

    /// The error, unless it is the no-rows sentinel
    pub fn failure(&self) -> Option<&BackendError> {
        match &self.error {
            Some(_) if self.is_no_rows() => None,
            other => other.as_ref(),
        }
    }
}
