use reqwest::StatusCode;
use serde::Deserialize;

/// Failure of a single remote call, classified the way the screens react to it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not authenticated{}", suffix(.message))]
    Unauthorized { message: Option<String> },
    #[error("forbidden{}", suffix(.message))]
    Forbidden { message: Option<String> },
    #[error("not found{}", suffix(.message))]
    NotFound { message: Option<String> },
    #[error("conflict{}", suffix(.message))]
    Conflict { message: Option<String> },
    #[error("validation failed: {}", .messages.join("; "))]
    Validation { messages: Vec<String> },
    #[error("server responded with {status}{}", suffix(.message))]
    Status { status: u16, message: Option<String> },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<MessageField>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

impl ApiError {
    /// Builds the error for a non-success response from its status and body.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let mut messages = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => match parsed.message {
                Some(MessageField::One(m)) => vec![m],
                Some(MessageField::Many(list)) => list,
                None => parsed.error.into_iter().collect(),
            },
            Err(_) => Vec::new(),
        };
        messages.retain(|m| !m.trim().is_empty());
        let message = if messages.is_empty() {
            None
        } else {
            Some(messages.join("; "))
        };

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized { message },
            StatusCode::FORBIDDEN => Self::Forbidden { message },
            StatusCode::NOT_FOUND => Self::NotFound { message },
            StatusCode::CONFLICT => Self::Conflict { message },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::Validation { messages }
            }
            other => Self::Status {
                status: other.as_u16(),
                message,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// The message the server supplied, if any.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Status { message, .. } => message.clone(),
            Self::Validation { messages } if !messages.is_empty() => Some(messages.join("; ")),
            _ => None,
        }
    }

    /// Server-provided message, or `fallback` when the server gave none.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Returns the first of `fields` named in a validation or conflict message.
    ///
    /// Matching ignores case so `userName should not be empty` attributes to
    /// `username`.
    pub fn attributed_field<'a>(&self, fields: &[&'a str]) -> Option<&'a str> {
        let text = match self {
            Self::Validation { messages } => messages.join(" "),
            Self::Conflict { message: Some(m) } => m.clone(),
            _ => return None,
        };
        let lowered = text.to_lowercase();
        fields
            .iter()
            .copied()
            .find(|field| lowered.contains(&field.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_list_becomes_validation() {
        let body = br#"{"statusCode":400,"message":["userName must be longer","password too short"]}"#;
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, body);
        match &err {
            ApiError::Validation { messages } => assert_eq!(messages.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            err.attributed_field(&["email", "userName", "password"]),
            Some("userName")
        );
    }

    #[test]
    fn fallback_used_without_server_message() {
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, b"not json");
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message("Login failed"), "Login failed");

        let err = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            br#"{"message":"Invalid credentials"}"#,
        );
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    }

    #[test]
    fn conflict_attribution_is_case_insensitive() {
        let err = ApiError::from_response(
            StatusCode::CONFLICT,
            br#"{"message":"Username already exists"}"#,
        );
        assert!(err.is_conflict());
        assert_eq!(err.attributed_field(&["email", "userName"]), Some("userName"));
        assert_eq!(err.attributed_field(&["email"]), None);
    }

    #[test]
    fn other_statuses_keep_their_code() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, b"");
        assert_eq!(err.to_string(), "server responded with 502");
        assert_eq!(err.server_message(), None);
    }
}
