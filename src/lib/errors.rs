use serde::Deserialize;
use std::fmt;

/// Message shown when a failure carries nothing the user can act on.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";
/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Parse(String),
    Serialization(String),
    /// The service answered 2xx but reported the operation as unsuccessful.
    Rejected(String),
}

impl AppError {
    /// Text for a one-shot notification. Remote failures keep the server's
    /// message; transport and decoding failures collapse to the generic one.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http { message, .. } | AppError::Rejected(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            AppError::Config(message) if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Network(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
            AppError::Rejected(message) => write!(formatter, "Rejected: {message}"),
        }
    }
}

impl std::error::Error for AppError {}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Builds the `Http` error for a non-2xx response. The `message` field of a
/// JSON body wins; plain-text bodies are trimmed and truncated; empty bodies
/// fall back to the generic message.
pub fn http_error(status: u16, body: &str) -> AppError {
    let message = server_message(body)
        .or_else(|| {
            let trimmed = body.trim();
            // JSON bodies without a message are never shown raw.
            (!trimmed.is_empty() && !trimmed.starts_with('{'))
                .then(|| truncate(trimmed))
        })
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());

    AppError::Http { status, message }
}

/// Extracts a non-blank `message` string from a JSON body.
pub fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .map(|message| truncate(&message))
}

fn truncate(value: &str) -> String {
    value.chars().take(MAX_ERROR_CHARS).collect()
}
