//! Error types for the converter.
//!
//! Only two data conditions are fatal: a first section without a version or
//! publication date, and a section without a header marker. Everything else
//! in the policy text is recovered from locally. The remaining variants cover
//! configuration, I/O, and serialization at the edges of the crate.

use thiserror::Error;

/// Main error type for the converter library.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// The first section did not yield a version and/or publication date.
    #[error("Introduction is missing {}", missing_fields(.version, .published))]
    MissingMetadata {
        /// Whether the version string was missing.
        version: bool,
        /// Whether the publication date was missing.
        published: bool,
    },

    /// A section does not start with a header line.
    #[error("Section does not have a title: '{line}'")]
    MalformedSection { line: String },

    /// The selected parser produced a document without a catalog.
    #[error("Could not parse catalog")]
    EmptyDocument,

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// TOML configuration could not be parsed.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlConfig(#[from] toml::de::Error),

    /// YAML configuration could not be parsed, or YAML output failed.
    #[error("YAML processing failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn missing_fields(version: &bool, published: &bool) -> &'static str {
    match (*version, *published) {
        (true, true) => "Version and Publication Date",
        (true, false) => "Version",
        (false, true) => "Publication Date",
        (false, false) => "nothing",
    }
}

impl ConverterError {
    /// Whether this error means mandatory metadata could not be recovered.
    #[must_use]
    pub fn is_missing_metadata(&self) -> bool {
        matches!(self, Self::MissingMetadata { .. })
    }
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConverterError>;
