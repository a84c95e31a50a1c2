//! Error types for the LoF filter library.

use thiserror::Error;

/// Errors that can occur while parsing, splitting, filtering or querying variants.
#[derive(Error, Debug)]
pub enum LofFilterError {
    /// A raw variant record could not be parsed.
    #[error("Record parse error: {0}")]
    RecordParseError(String),

    /// An annotation string does not match the declared column schema.
    #[error("Annotation format error for {key}: expected {expected} fields, found {found}")]
    AnnotationFormatError {
        key: String,
        expected: usize,
        found: usize,
    },

    /// Failed to parse an annotation header line.
    #[error("Header parse error: {0}")]
    HeaderParseError(String),

    /// A filter expression does not split into `attribute op value`.
    #[error("Filter configuration error: {0}")]
    FilterConfigurationError(String),

    /// A filter references an INFO key the variant does not carry.
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    /// A predefined filter name is not declared by the database configuration.
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// The queried range does not exist in a database file.
    #[error("Range not found: {0}")]
    RangeNotFound(String),

    /// The database configuration is missing a required entry.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for LoF filter operations.
pub type Result<T> = std::result::Result<T, LofFilterError>;
