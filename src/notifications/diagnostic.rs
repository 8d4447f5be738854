//! Developer-facing details attached to error notifications.

use std::error::Error as StdError;
use std::fmt;

/// Diagnostic input for an error notification.
///
/// Callers hand over whatever they have: a plain string, a Rust error, or a
/// JSON value from somewhere else. [`Diagnostic::message`] turns each into
/// the one-line string stored on the notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    Text(String),
    Error {
        message: String,
        /// Source chain of the error, outermost cause first.
        trace: Option<String>,
    },
    Value(serde_json::Value),
}

impl Diagnostic {
    /// Captures an error's message and the messages of its sources.
    pub fn from_error<E: StdError + ?Sized>(err: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        Self::Error {
            message: err.to_string(),
            trace: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }

    /// Best-effort string form of the diagnostic.
    ///
    /// JSON objects that carry a `message` or `description` string yield
    /// that string; other values are rendered as compact JSON.
    pub fn message(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Error { message, .. } => message.clone(),
            Self::Value(serde_json::Value::String(text)) => text.clone(),
            Self::Value(value) => ["message", "description"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()))
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
        }
    }

    pub fn trace(&self) -> Option<&str> {
        match self {
            Self::Error { trace, .. } => trace.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<&str> for Diagnostic {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Diagnostic {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<serde_json::Value> for Diagnostic {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

impl From<std::io::Error> for Diagnostic {
    fn from(err: std::io::Error) -> Self {
        Self::from_error(&err)
    }
}

/// Writes the developer-only record for an error notification and returns
/// the extracted message to store on it.
pub(crate) fn record_error(user_message: &str, details: Option<&Diagnostic>) -> Option<String> {
    let Some(details) = details else {
        tracing::error!(user_message, "Error occurred");
        return None;
    };

    let technical_details = details.message();
    match details.trace() {
        Some(trace) => tracing::error!(
            user_message,
            technical_details = %technical_details,
            trace,
            "Error occurred"
        ),
        None => tracing::error!(
            user_message,
            technical_details = %technical_details,
            "Error occurred"
        ),
    }
    Some(technical_details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Wrapped(std::io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("save failed")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn text_is_used_verbatim() {
        assert_eq!(Diagnostic::from("timeout").message(), "timeout");
    }

    #[test]
    fn errors_keep_message_and_source_chain() {
        let err = Wrapped(std::io::Error::other("network down"));
        let diagnostic = Diagnostic::from_error(&err);

        assert_eq!(diagnostic.message(), "save failed");
        assert_eq!(diagnostic.trace(), Some("caused by: network down"));
    }

    #[test]
    fn errors_without_sources_have_no_trace() {
        let diagnostic = Diagnostic::from(std::io::Error::other("network down"));
        assert_eq!(diagnostic.message(), "network down");
        assert!(diagnostic.trace().is_none());
    }

    #[test]
    fn json_values_prefer_message_fields() {
        assert_eq!(Diagnostic::from(json!({"message": "boom", "code": 7})).message(), "boom");
        assert_eq!(Diagnostic::from(json!({"description": "bad input"})).message(), "bad input");
        assert_eq!(Diagnostic::from(json!("plain")).message(), "plain");
        assert_eq!(Diagnostic::from(json!({"code": 7})).message(), r#"{"code":7}"#);
        assert_eq!(Diagnostic::from(json!(42)).message(), "42");
        assert_eq!(Diagnostic::from(json!(null)).message(), "null");
    }
}
