use crate::app_lib::AppError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

/// Body of a 2xx verify/resend response. Both fields are optional because
/// the services answer with anything from an empty body to
/// `{ "success": true, "message": "..." }`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ServiceReply {
    pub success: Option<bool>,
    pub message: Option<String>,
}

impl ServiceReply {
    /// Parses a 2xx body. Empty bodies, plain text and JSON that is not an
    /// object count as a bare acknowledgement; an object whose fields have
    /// the wrong types is a `Parse` error.
    pub fn from_body(body: &str) -> Result<Self, AppError> {
        let trimmed = body.trim();
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(value @ serde_json::Value::Object(_)) => serde_json::from_value(value)
                .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}"))),
            _ => Ok(Self::default()),
        }
    }

    /// Only an explicit `"success": false` turns a 2xx into a failure.
    pub fn into_result(self) -> Result<Option<String>, AppError> {
        match self.success {
            Some(false) => Err(AppError::Rejected(self.message.unwrap_or_default())),
            _ => Ok(self.message.filter(|message| !message.trim().is_empty())),
        }
    }
}
