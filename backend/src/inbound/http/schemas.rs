//! Response envelope shared by every failing endpoint, plus OpenAPI schema
//! wrappers for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror them for documentation only.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested user does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The email is already registered.
    #[schema(rename = "conflict")]
    Conflict,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureEnvelope {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    #[schema(example = "User not found")]
    pub message: String,
    /// Stable machine-readable error code.
    #[schema(value_type = ErrorCodeSchema, example = "not_found")]
    pub code: ErrorCode,
    /// Correlation identifier for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub trace_id: Option<String>,
    /// Field-level failure details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for FailureEnvelope {
    fn from(error: &Error) -> Self {
        Self {
            success: false,
            message: error.message().to_owned(),
            code: error.code(),
            trace_id: error.trace_id().map(str::to_owned),
            details: error.details().cloned(),
        }
    }
}

/// Body returned when an operation succeeds without a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome.
    #[schema(example = "User removed successfully")]
    pub message: String,
}

impl MessageEnvelope {
    /// Successful outcome with `message`.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn failure_envelope_uses_camel_case_and_omits_empty_fields() {
        let envelope = FailureEnvelope::from(&Error::not_found("User not found"));
        let value = serde_json::to_value(&envelope).expect("serialise");

        assert_eq!(
            value,
            json!({"success": false, "message": "User not found", "code": "not_found"})
        );
    }

    #[rstest]
    fn failure_envelope_carries_trace_id_and_details() {
        let error = Error::invalid_request("Invalid user data")
            .with_trace_id("00000000-0000-0000-0000-000000000000")
            .with_details(json!({"errors": []}));
        let value = serde_json::to_value(FailureEnvelope::from(&error)).expect("serialise");

        assert_eq!(value["traceId"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(value["details"], json!({"errors": []}));
    }
}
