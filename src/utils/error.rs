use crate::validation::{ClubValidation, PersonValidation};
use thiserror::Error;

/// Per-field validation failure codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field is required")]
    Empty,

    #[error("Must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Must be at most {max} characters")]
    TooLong { max: usize },

    #[error("Contains characters that are not allowed")]
    InvalidCharacters,

    #[error("Contains consecutive special characters")]
    ConsecutiveSpecialCharacters,

    #[error("Must not contain line breaks")]
    ContainsNewline,

    #[error("Must be between {min} and {max}")]
    OutOfRange { min: i32, max: i32 },

    #[error("Selection is required")]
    Required,

    #[error("Invalid format")]
    InvalidFormat,

    #[error("Password is too weak")]
    WeakPassword,

    #[error("Values do not match")]
    Mismatch,
}

impl ValidationError {
    /// Lookup key for the localized message catalog.
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::Empty => "error_field_empty",
            ValidationError::TooShort { .. } => "error_field_too_short",
            ValidationError::TooLong { .. } => "error_field_too_long",
            ValidationError::InvalidCharacters => "error_invalid_characters",
            ValidationError::ConsecutiveSpecialCharacters => "error_consecutive_special_characters",
            ValidationError::ContainsNewline => "error_contains_newline",
            ValidationError::OutOfRange { .. } => "error_out_of_range",
            ValidationError::Required => "error_selection_required",
            ValidationError::InvalidFormat => "error_invalid_format",
            ValidationError::WeakPassword => "error_weak_password",
            ValidationError::Mismatch => "error_mismatch",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No account exists for this email")]
    UserNotFound,

    #[error("Email is already in use")]
    EmailAlreadyInUse,

    #[error("Network error")]
    Network,

    #[error("Unknown authentication error: {0}")]
    Unknown(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClubError {
    #[error("Invite code is invalid")]
    InvalidInviteCode,

    #[error("Invite code has expired")]
    ExpiredInviteCode,

    #[error("Already a member of this club")]
    AlreadyMember,

    #[error("Club not found")]
    NotFound,

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Network error")]
    Network,

    #[error("Unknown club error: {0}")]
    Unknown(String),
}

/// Failures reported by backend ports. Never surfaced past a use case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Network unavailable: {0}")]
    Network(String),

    #[error("Malformed document: {0}")]
    Decode(String),

    #[error("Backend error: {0}")]
    Other(String),
}

impl From<BackendError> for ClubError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(_) => ClubError::NotFound,
            BackendError::PermissionDenied => ClubError::PermissionDenied,
            BackendError::Unauthenticated => ClubError::Unauthenticated,
            BackendError::Network(_) => ClubError::Network,
            other => ClubError::Unknown(other.to_string()),
        }
    }
}

impl From<BackendError> for AuthError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(_) => AuthError::UserNotFound,
            BackendError::PermissionDenied | BackendError::Unauthenticated => {
                AuthError::InvalidCredentials
            }
            BackendError::Network(_) => AuthError::Network,
            other => AuthError::Unknown(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Person data is invalid")]
    InvalidPerson(PersonValidation),

    #[error("Club data is invalid")]
    InvalidClub(ClubValidation),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Club(#[from] ClubError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Storage,
    Validation,
    Authentication,
    Club,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::ConfigError { .. } | AppError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            AppError::IoError(_) | AppError::SerializationError(_) | AppError::StorageError { .. } => {
                ErrorCategory::Storage
            }
            AppError::InvalidPerson(_) | AppError::InvalidClub(_) => ErrorCategory::Validation,
            AppError::Auth(_) => ErrorCategory::Authentication,
            AppError::Club(_) => ErrorCategory::Club,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::InvalidPerson(_) | AppError::InvalidClub(_) => ErrorSeverity::Low,
            AppError::Auth(_) | AppError::Club(_) => ErrorSeverity::Medium,
            AppError::ConfigError { .. } | AppError::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
            AppError::IoError(_) | AppError::SerializationError(_) | AppError::StorageError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    /// True when retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::Auth(AuthError::Network) | AppError::Club(ClubError::Network)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_map_to_club_errors() {
        assert_eq!(
            ClubError::from(BackendError::NotFound("clubs/1".to_string())),
            ClubError::NotFound
        );
        assert_eq!(
            ClubError::from(BackendError::Network("offline".to_string())),
            ClubError::Network
        );
        assert_eq!(
            ClubError::from(BackendError::PermissionDenied),
            ClubError::PermissionDenied
        );
        assert!(matches!(
            ClubError::from(BackendError::Decode("bad".to_string())),
            ClubError::Unknown(_)
        ));
    }

    #[test]
    fn test_backend_errors_map_to_auth_errors() {
        assert_eq!(
            AuthError::from(BackendError::NotFound("users/x".to_string())),
            AuthError::UserNotFound
        );
        assert_eq!(
            AuthError::from(BackendError::Unauthenticated),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_category_and_severity() {
        let err = AppError::Club(ClubError::Network);
        assert_eq!(err.category(), ErrorCategory::Club);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.is_transient());

        let err = AppError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_message_keys_are_distinct() {
        let errors = [
            ValidationError::Empty,
            ValidationError::TooShort { min: 1 },
            ValidationError::TooLong { max: 1 },
            ValidationError::InvalidCharacters,
            ValidationError::ConsecutiveSpecialCharacters,
            ValidationError::ContainsNewline,
            ValidationError::OutOfRange { min: 0, max: 1 },
            ValidationError::Required,
            ValidationError::InvalidFormat,
            ValidationError::WeakPassword,
            ValidationError::Mismatch,
        ];
        let keys: std::collections::HashSet<_> = errors.iter().map(|e| e.message_key()).collect();
        assert_eq!(keys.len(), errors.len());
    }
}
