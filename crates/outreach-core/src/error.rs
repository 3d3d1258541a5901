use serde_json::Value;
use thiserror::Error;

/// Failures talking to the dashboard backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS and the like.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `detail` is the backend's own explanation when it sent one.
    #[error("Request failed with status code {status}")]
    Backend { status: u16, detail: Option<String> },

    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Build a backend error from a failed response's status and raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        ApiError::Backend {
            status,
            detail: extract_detail(body),
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Backend { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Text shown to the user: the backend detail when present, else this error's own message.
    pub fn user_message(&self) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }
}

/// Pull `detail` out of an error body. Validation errors carry a list of `{msg}` objects.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail_is_surfaced() {
        let err = ApiError::from_response(500, r#"{"detail":"Message generation failed: quota"}"#);
        assert_eq!(err.detail(), Some("Message generation failed: quota"));
        assert_eq!(err.user_message(), "Message generation failed: quota");
    }

    #[test]
    fn test_validation_detail_list_is_joined() {
        let body = r#"{"detail":[{"loc":["body","name"],"msg":"field required"},{"loc":["body","title"],"msg":"field required"}]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(err.user_message(), "field required; field required");
    }

    #[test]
    fn test_missing_detail_falls_back_to_status_text() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message(), "Request failed with status code 502");
    }

    #[test]
    fn test_config_error_message() {
        let err = ApiError::Config("relative URL without a base".to_string());
        assert_eq!(
            err.user_message(),
            "Invalid client configuration: relative URL without a base"
        );
    }
}
