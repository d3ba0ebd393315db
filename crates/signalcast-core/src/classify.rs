//! Maps internal acquisition failures to user-facing categories.

use std::fmt::{Display, Formatter};

use crate::backend::{BackendError, BackendErrorKind};
use crate::error::AcquisitionError;

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    EmptyResponse,
    PermissionDenied,
    RateLimited,
    MalformedPayload,
    MissingField,
    InvalidRequest,
    Unknown,
}

impl ErrorCategory {
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyResponse => "acquisition.empty_response",
            Self::PermissionDenied => "acquisition.permission_denied",
            Self::RateLimited => "acquisition.rate_limited",
            Self::MalformedPayload => "acquisition.malformed_payload",
            Self::MissingField => "acquisition.missing_field",
            Self::InvalidRequest => "acquisition.invalid_request",
            Self::Unknown => "acquisition.unknown",
        }
    }
}

/// Façade entry point a failure came from; selects the noun of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Briefing,
    Signal,
    News,
    Chat,
}

impl Surface {
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Briefing => "market briefing",
            Self::Signal => "analysis",
            Self::News => "news",
            Self::Chat => "a response from the AI assistant",
        }
    }
}

pub const PERMISSION_DENIED_MESSAGE: &str =
    "Permission Denied. Please check your API key and project settings.";
pub const RATE_LIMITED_MESSAGE: &str =
    "The service is currently busy due to high demand. Please wait a moment and try again.";

/// The only error returned by [`crate::AnalystClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    category: ErrorCategory,
    message: String,
}

impl ClassifiedError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    /// Message safe to show verbatim; never contains raw model output.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        self.category.code()
    }
}

impl Display for ClassifiedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ClassifiedError {}

/// Classifies a terminal failure of `surface`.
///
/// Precedence: empty response, permission denied, rate limited, malformed
/// payload, missing field, invalid request, unknown. Empty responses are
/// checked first since they carry no message to match against.
pub fn classify(error: &AcquisitionError, surface: Surface) -> ClassifiedError {
    let category = categorize(error);
    let message = match category {
        ErrorCategory::InvalidRequest => error.to_string(),
        other => user_message(other, surface),
    };

    ClassifiedError::new(category, message)
}

/// Canonical message shown for `category` on `surface`.
pub fn user_message(category: ErrorCategory, surface: Surface) -> String {
    if surface == Surface::Chat {
        return String::from(match category {
            ErrorCategory::EmptyResponse => {
                "The AI assistant did not provide a response. It may have been blocked or the model returned an empty response."
            }
            ErrorCategory::PermissionDenied => PERMISSION_DENIED_MESSAGE,
            ErrorCategory::RateLimited => "The AI assistant is busy. Please wait a moment and try again.",
            _ => "Failed to get a response from the AI assistant.",
        });
    }

    let noun = surface.noun();
    match category {
        ErrorCategory::EmptyResponse => format!(
            "Failed to get a valid {noun} from AI. The content may have been blocked or the model returned an empty response."
        ),
        ErrorCategory::PermissionDenied => String::from(PERMISSION_DENIED_MESSAGE),
        ErrorCategory::RateLimited => String::from(RATE_LIMITED_MESSAGE),
        ErrorCategory::MalformedPayload | ErrorCategory::MissingField => {
            format!("Failed to get valid {noun} from AI. The model returned an unexpected format.")
        }
        ErrorCategory::InvalidRequest | ErrorCategory::Unknown => format!(
            "Failed to get {noun} from AI. The model may be overloaded or the content may have been blocked."
        ),
    }
}

fn categorize(error: &AcquisitionError) -> ErrorCategory {
    match error {
        AcquisitionError::EmptyResponse => ErrorCategory::EmptyResponse,
        AcquisitionError::Backend(backend) => categorize_backend(backend),
        AcquisitionError::Extraction(_) => ErrorCategory::MalformedPayload,
        AcquisitionError::MissingField { .. } => ErrorCategory::MissingField,
        AcquisitionError::Validation(_) => ErrorCategory::InvalidRequest,
    }
}

fn categorize_backend(error: &BackendError) -> ErrorCategory {
    if error.kind() == BackendErrorKind::EmptyResponse {
        ErrorCategory::EmptyResponse
    } else if error.mentions_permission_denied() {
        ErrorCategory::PermissionDenied
    } else if error.mentions_rate_limit() {
        ErrorCategory::RateLimited
    } else if error.kind() == BackendErrorKind::Decode {
        ErrorCategory::MalformedPayload
    } else {
        ErrorCategory::Unknown
    }
}
