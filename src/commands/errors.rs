//! # Command Error Handling
//!
//! Error types reach the user through [`UserError`], extracted with the `handled` crate so that
//! every failure prints a message and, where one helps, a hint.

use handled::Handle;

use crate::http_utils::HttpError;
use crate::{ConfigError, IdParseError, ValidationError};

/// User-friendly error information that can be extracted from various error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    /// The main error message to display to the user
    pub message: String,
    /// Optional usage hint to help the user correct the error
    pub usage_hint: Option<String>,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Handle<UserError> for UserError {
    fn handle(&self) -> Option<UserError> {
        Some(self.clone())
    }
}

impl Handle<UserError> for IdParseError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: self.to_string(),
            usage_hint: Some(format!(
                "{} ids are UUIDs such as 67e55044-10b1-426f-9247-bb680e5fe0c8",
                capitalize(self.kind())
            )),
        })
    }
}

impl Handle<UserError> for HttpError {
    fn handle(&self) -> Option<UserError> {
        let mut message = self.to_string();
        if let HttpError::Status { errors, .. } = self {
            for error in errors {
                message.push_str("\n  - ");
                message.push_str(error);
            }
        }

        let usage_hint = match self.status() {
            Some(400) => Some("Invalid request. Check your input data and try again.".to_string()),
            Some(404) => Some(
                "The requested resource was not found. Check the ID and try again.".to_string(),
            ),
            Some(409) => Some("That name is already taken. Pick another one.".to_string()),
            Some(500..=599) => {
                Some("Server error. The service may be temporarily unavailable.".to_string())
            }
            None => Some("Is dynaschemad running? Check --base-url.".to_string()),
            _ => None,
        };

        Some(UserError {
            message,
            usage_hint,
        })
    }
}

impl Handle<UserError> for ValidationError {
    fn handle(&self) -> Option<UserError> {
        let mut message = self.to_string();
        for error in self.errors() {
            message.push_str("\n  - ");
            message.push_str(error);
        }
        Some(UserError {
            message,
            usage_hint: Some(
                "Valid types are: string, number, boolean, date, array, object".to_string(),
            ),
        })
    }
}

impl Handle<UserError> for ConfigError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: self.to_string(),
            usage_hint: None,
        })
    }
}

impl Handle<UserError> for serde_json::Error {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: format!("JSON parsing error: {}", self),
            usage_hint: Some(
                "Ensure the JSON is properly formatted and contains all required fields"
                    .to_string(),
            ),
        })
    }
}

impl Handle<UserError> for serde_yml::Error {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: format!("YAML parsing error: {}", self),
            usage_hint: Some("Check indentation and quoting in the YAML document".to_string()),
        })
    }
}

impl Handle<UserError> for std::io::Error {
    fn handle(&self) -> Option<UserError> {
        let hint = match self.kind() {
            std::io::ErrorKind::NotFound => Some("Check that the file path exists".to_string()),
            std::io::ErrorKind::PermissionDenied => {
                Some("Check that you have permission to read the file".to_string())
            }
            _ => None,
        };
        Some(UserError {
            message: format!("I/O error: {}", self),
            usage_hint: hint,
        })
    }
}

/// Formats an error for CLI output, appending its hint on a separate line.
pub fn format_cli_error<E>(error: &E) -> String
where
    E: Handle<UserError> + std::fmt::Display,
{
    match error.handle() {
        Some(user_error) => {
            let mut output = user_error.message;
            if let Some(hint) = user_error.usage_hint {
                output.push_str(&format!("\nHint: {}", hint));
            }
            output
        }
        None => error.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaId;

    #[test]
    fn id_error_hint_names_kind() {
        let err = "abc".parse::<SchemaId>().unwrap_err();
        let user_error = err.handle().unwrap();
        assert_eq!(user_error.message, "Invalid schema id \"abc\"");
        assert!(user_error.usage_hint.unwrap().starts_with("Schema ids are UUIDs"));
    }

    #[test]
    fn http_error_lists_validation_errors() {
        let err = HttpError::Status {
            status: 400,
            message: "Invalid data format".to_string(),
            errors: vec!["Invalid value for field: age".to_string()],
        };
        let formatted = format_cli_error(&err);
        assert_eq!(
            formatted,
            "HTTP 400: Invalid data format\n  - Invalid value for field: age\nHint: Invalid request. Check your input data and try again."
        );
    }

    #[test]
    fn conflict_hint() {
        let err = HttpError::Status {
            status: 409,
            message: "Schema with this name already exists".to_string(),
            errors: Vec::new(),
        };
        assert_eq!(
            err.handle().unwrap().usage_hint.as_deref(),
            Some("That name is already taken. Pick another one.")
        );
    }

    #[test]
    fn validation_error_lists_each_violation() {
        let err = ValidationError::Structural {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.handle().unwrap().message,
            "Invalid schema structure\n  - a\n  - b"
        );
    }
}
