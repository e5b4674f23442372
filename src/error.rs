use std::fmt;

use serde::Serialize;

/// Structured error type for every command. Callers match on `code`; the
/// `Display` form (`"<code>: <detail>"`) is what goes into the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts-bindings", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts-bindings", ts(export))]
#[serde(tag = "code", content = "detail")]
pub enum AppError {
    MissingParameter { field: String },
    InvalidParameter { message: String },
    UnknownCommand { name: String },
    NotFound { what: String },
    InvalidTarget { target: String },
    UnsupportedType { type_name: String },
    CreationFailed { message: String },
    ConnectionFailed { message: String },
    ValidationError { message: String },
    IoError { message: String },
}

impl AppError {
    /// Stable taxonomy token for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingParameter { .. } => "missing_parameter",
            AppError::InvalidParameter { .. } => "invalid_parameter",
            AppError::UnknownCommand { .. } => "unknown_command",
            AppError::NotFound { .. } => "not_found",
            AppError::InvalidTarget { .. } => "invalid_target",
            AppError::UnsupportedType { .. } => "unsupported_type",
            AppError::CreationFailed { .. } => "creation_failed",
            AppError::ConnectionFailed { .. } => "connection_failed",
            AppError::ValidationError { .. } => "validation_error",
            AppError::IoError { .. } => "io_error",
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound { what: what.into() }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        AppError::MissingParameter {
            field: field.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code();
        match self {
            AppError::MissingParameter { field } => write!(f, "{code}: {field}"),
            AppError::InvalidParameter { message } => write!(f, "{code}: {message}"),
            AppError::UnknownCommand { name } => write!(f, "{code}: {name}"),
            AppError::NotFound { what } => write!(f, "{code}: {what}"),
            AppError::InvalidTarget { target } => write!(f, "{code}: {target}"),
            AppError::UnsupportedType { type_name } => write!(f, "{code}: {type_name}"),
            AppError::CreationFailed { message }
            | AppError::ConnectionFailed { message }
            | AppError::ValidationError { message }
            | AppError::IoError { message } => write!(f, "{code}: {message}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::IoError {
            message: e.to_string(),
        }
    }
}

impl From<crate::project::ProjectError> for AppError {
    fn from(e: crate::project::ProjectError) -> Self {
        match e {
            crate::project::ProjectError::Io(io_err) => AppError::IoError {
                message: io_err.to_string(),
            },
            crate::project::ProjectError::Json(json_err) => AppError::ValidationError {
                message: json_err.to_string(),
            },
            crate::project::ProjectError::InvalidProject(msg) => {
                AppError::ValidationError { message: msg }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_code() {
        let err = AppError::missing("blueprint_name");
        assert_eq!(err.to_string(), "missing_parameter: blueprint_name");

        let err = AppError::UnknownCommand {
            name: "explode".into(),
        };
        assert_eq!(err.to_string(), "unknown_command: explode");
    }

    #[test]
    fn test_serializes_with_code_tag() {
        let err = AppError::UnsupportedType {
            type_name: "Quaternion".into(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "UnsupportedType");
        assert_eq!(json["detail"]["type_name"], "Quaternion");
    }

    #[test]
    fn test_project_errors_map_to_codes() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(AppError::from(crate::project::ProjectError::Io(io)).code(), "io_error");
        let invalid = crate::project::ProjectError::InvalidProject("bad".into());
        assert_eq!(AppError::from(invalid).to_string(), "validation_error: bad");
    }
}
