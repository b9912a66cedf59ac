//! Error types for orgform

use thiserror::Error;

/// Result type alias for orgform operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error code returned by DescribeOrganization when the caller's account
/// is not a member of any organization.
pub const NOT_IN_USE_CODE: &str = "AWSOrganizationsNotInUseException";

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error creating organization: {0}")]
    CreateOrganization(#[source] ApiError),

    #[error("Error deleting Organization: {0}")]
    DeleteOrganization(#[source] ApiError),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Errors returned by the Organizations control plane or the transport
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{code}: {message} (status {status})")]
    Service {
        code: String,
        message: String,
        status: u16,
    },

    #[error("Request throttled by AWS Organizations: {0}")]
    Throttled(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Service error code, if the control plane returned one
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True when the account no longer belongs to an organization
    pub fn is_not_in_use(&self) -> bool {
        self.code() == Some(NOT_IN_USE_CODE)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to AWS Organizations".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `orgform init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error(
        "AWS credentials not configured. Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY or run `orgform init`."
    )]
    MissingCredentials,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Resource configuration rejected by the schema
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("expected {field} to be one of {allowed:?}, got {value}")]
    NotInSlice {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("unknown attribute \"{0}\"")]
    UnknownField(String),

    #[error("attribute \"{0}\" is computed and cannot be set")]
    ComputedField(String),

    #[error("attribute \"{0}\" is required")]
    MissingRequired(String),
}

/// Local state store errors
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Could not determine home directory for state storage")]
    NoHome,

    #[error("State I/O error: {0}")]
    Io(String),

    #[error("State database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("State serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
