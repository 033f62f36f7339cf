//! Error-body parsing and transport error mapping.

use serde::Deserialize;

use cskit_core::error::TransportError;

/// Code and message pulled from a non-2xx body.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ErrorDetails {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// The error body shapes used across the container and identity services.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Iam {
        #[serde(rename = "errorCode")]
        error_code: String,
        #[serde(rename = "errorMessage", default)]
        error_message: Option<String>,
    },
    Container {
        #[serde(default)]
        code: Option<String>,
        description: String,
    },
    Nested {
        error: ErrorEntry,
    },
    List {
        errors: Vec<ErrorEntry>,
    },
    Message {
        #[serde(default)]
        code: Option<String>,
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Best-effort extraction of a code and message from an error body.
///
/// Falls back to the raw text as the message when the body is not one of the
/// known JSON shapes.
pub(crate) fn parse_error_body(body: &[u8]) -> ErrorDetails {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody::Iam {
            error_code,
            error_message,
        }) => ErrorDetails {
            code: Some(error_code),
            message: error_message,
        },
        Ok(ErrorBody::Container { code, description }) => ErrorDetails {
            code,
            message: Some(description),
        },
        Ok(ErrorBody::Nested { error }) => ErrorDetails {
            code: error.code,
            message: error.message,
        },
        Ok(ErrorBody::List { errors }) => errors
            .into_iter()
            .next()
            .map(|e| ErrorDetails {
                code: e.code,
                message: e.message,
            })
            .unwrap_or_default(),
        Ok(ErrorBody::Message { code, message }) => ErrorDetails {
            code,
            message: Some(message),
        },
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            ErrorDetails {
                code: None,
                message: (!text.is_empty()).then_some(text),
            }
        }
    }
}

/// Map a reqwest failure to a transport error tagged with `url`.
pub(crate) fn transport_error(url: &str, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
