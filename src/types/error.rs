use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuiverError>;

/// Structural errors raised by batch factories, schemata, column layouts, and
/// sort binding.
///
/// These are raised at the call that caused them. Failures of individual
/// requests are recorded on the request as a [`RequestError`] instead.
#[derive(Debug, Error)]
pub enum QuiverError {
    /// Bad input to a factory or builder.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A schemata lookup named a selector or column that was never registered.
    #[error("unknown column '{column}' on selector '{selector}'")]
    UnknownColumn {
        /// Selector that was looked up.
        selector: String,
        /// Column that was looked up.
        column: String,
    },
    /// Inconsistent column layout or an ordering that cannot be bound.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Option file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Option file could not be parsed.
    #[error("malformed options: {0}")]
    Options(#[from] toml::de::Error),
}

impl QuiverError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        QuiverError::InvalidArgument(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        QuiverError::Configuration(msg.into())
    }

    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            QuiverError::InvalidArgument(_) => "InvalidArgument",
            QuiverError::UnknownColumn { .. } => "InvalidArgument",
            QuiverError::Configuration(_) => "ConfigurationError",
            QuiverError::Io(_) => "Io",
            QuiverError::Options(_) => "MalformedOptions",
        }
    }
}

/// Failure recorded on a single request by the connector that processed it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The target node does not exist.
    #[error("node not found at {0}")]
    NodeNotFound(String),
    /// The target property does not exist.
    #[error("property '{property}' not found on {location}")]
    PropertyNotFound {
        /// Node the property was read from.
        location: String,
        /// Missing property name.
        property: String,
    },
    /// The connector refused the operation.
    #[error("operation not supported by connector: {0}")]
    Unsupported(String),
    /// The dispatcher cancelled or timed out the request.
    #[error("request cancelled")]
    Cancelled,
    /// Any other connector-specific failure.
    #[error("connector error: {0}")]
    Connector(String),
}

impl RequestError {
    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::NodeNotFound(_) => "NodeNotFound",
            RequestError::PropertyNotFound { .. } => "PropertyNotFound",
            RequestError::Unsupported(_) => "Unsupported",
            RequestError::Cancelled => "Cancelled",
            RequestError::Connector(_) => "Connector",
        }
    }
}
