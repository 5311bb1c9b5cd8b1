//! Configuration constants, configuration types, and validation.
//!
//! A conversion is driven by two configuration groups, normally kept in a
//! TOML file next to the policy:
//!
//! ```toml
//! [parser-configuration]
//! metadata_in_first_section = true
//! title = "Example Certificate Policy"
//! toc_marker = "Table of Contents"
//! backmatter_sections = ["References"]
//! normative_keywords = ["SHALL", "MUST"]
//! version_marker = "Version"
//! publication_date_format = "%B %d, %Y"
//!
//! [revision-table]
//! id_column = 0
//! date_column = 1
//! detail_column = 2
//! ```

use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{ConverterError, Result};

/// Character that marks a header line; its repeat count is the depth.
pub const HEADER_MARKER: char = '#';

/// OSCAL schema version written into catalog metadata.
pub const OSCAL_VERSION: &str = "1.1.2";

/// Date pattern used in revision history tables ("May 1, 2020").
pub const REVISION_DATE_FORMAT: &str = "%B %d, %Y";

/// Complete configuration for one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Settings for the structural parser.
    #[serde(rename = "parser-configuration")]
    pub parser: ParserConfig,

    /// Column layout of the revision history table.
    #[serde(
        rename = "revision-table",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub revision_table: Option<RevisionTableConfig>,
}

/// The `parser-configuration` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Whether the first section holds version, date and revision history.
    pub metadata_in_first_section: bool,

    /// Catalog title; not parsed from the policy.
    pub title: String,

    /// Literal that identifies the table of contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc_marker: Option<String>,

    /// Header substrings that identify reference sections.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backmatter_sections: Vec<String>,

    /// Substrings that make a line a requirement (case-sensitive).
    pub normative_keywords: Vec<String>,

    /// Literal that precedes the version number in the introduction.
    pub version_marker: String,

    /// strftime-style pattern for the publication date.
    pub publication_date_format: String,
}

/// The `revision-table` group: cell indices within a revision row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionTableConfig {
    pub id_column: usize,
    pub date_column: usize,
    pub detail_column: usize,
}

impl ConverterConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, everything else
    /// as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        tracing::debug!(path = %path.display(), yaml = is_yaml, "Loading configuration");

        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Check values that deserialization alone cannot catch.
    pub fn validate(&self) -> Result<()> {
        let parser = &self.parser;

        if parser.normative_keywords.iter().all(|k| k.is_empty()) {
            tracing::warn!("normative_keywords is empty; all content will be informative");
        }
        if parser.version_marker.trim().is_empty() {
            return Err(ConverterError::Config(
                "version_marker must not be empty".to_string(),
            ));
        }
        if parser.toc_marker.as_deref().is_some_and(str::is_empty) {
            return Err(ConverterError::Config(
                "toc_marker must not be empty when set".to_string(),
            ));
        }
        if parser.backmatter_sections.iter().any(String::is_empty) {
            return Err(ConverterError::Config(
                "backmatter_sections must not contain empty markers".to_string(),
            ));
        }
        validate_date_format(&parser.publication_date_format)
    }

    /// Create a configuration builder, mainly for tests.
    pub fn builder(title: impl Into<String>) -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            parser: ParserConfig {
                metadata_in_first_section: true,
                title: title.into(),
                toc_marker: None,
                backmatter_sections: Vec::new(),
                normative_keywords: vec!["SHALL".to_string(), "MUST".to_string()],
                version_marker: "Version".to_string(),
                publication_date_format: "%B %d, %Y".to_string(),
            },
            revision_table: Some(RevisionTableConfig {
                id_column: 0,
                date_column: 1,
                detail_column: 2,
            }),
        }
    }
}

/// Validate a strftime-style date format.
///
/// # Examples
/// ```
/// use pki_policy_converter::config::validate_date_format;
///
/// assert!(validate_date_format("%B %d, %Y").is_ok());
/// assert!(validate_date_format("%Q").is_err());
/// assert!(validate_date_format("").is_err());
/// ```
pub fn validate_date_format(format: &str) -> Result<()> {
    if format.trim().is_empty() {
        return Err(ConverterError::Config(
            "publication_date_format must not be empty".to_string(),
        ));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConverterError::Config(format!(
            "publication_date_format '{format}' is not a valid date format"
        )));
    }
    Ok(())
}

/// Builder for constructing `ConverterConfig` in tests.
pub struct ConverterConfigBuilder {
    parser: ParserConfig,
    revision_table: Option<RevisionTableConfig>,
}

impl ConverterConfigBuilder {
    pub fn metadata_in_first_section(mut self, value: bool) -> Self {
        self.parser.metadata_in_first_section = value;
        self
    }

    pub fn toc_marker(mut self, marker: impl Into<String>) -> Self {
        self.parser.toc_marker = Some(marker.into());
        self
    }

    pub fn backmatter_sections(
        mut self,
        markers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.parser.backmatter_sections = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn normative_keywords(
        mut self,
        keywords: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.parser.normative_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn version_marker(mut self, marker: impl Into<String>) -> Self {
        self.parser.version_marker = marker.into();
        self
    }

    pub fn publication_date_format(mut self, format: impl Into<String>) -> Self {
        self.parser.publication_date_format = format.into();
        self
    }

    pub fn revision_table(mut self, columns: Option<RevisionTableConfig>) -> Self {
        self.revision_table = columns;
        self
    }

    pub fn build(self) -> ConverterConfig {
        ConverterConfig {
            parser: self.parser,
            revision_table: self.revision_table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TOML: &str = r#"
[parser-configuration]
metadata_in_first_section = true
title = "Test Certificate Policy"
toc_marker = "Table of Contents"
backmatter_sections = ["References"]
normative_keywords = ["SHALL", "MUST", "REQUIRED"]
version_marker = "Version"
publication_date_format = "%B %d, %Y"

[revision-table]
id_column = 0
date_column = 2
detail_column = 1
"#;

    #[test]
    fn test_from_toml_str() {
        let config = ConverterConfig::from_toml_str(SAMPLE_TOML).unwrap();
        assert!(config.parser.metadata_in_first_section);
        assert_eq!(config.parser.title, "Test Certificate Policy");
        assert_eq!(config.parser.toc_marker.as_deref(), Some("Table of Contents"));
        assert_eq!(config.parser.backmatter_sections, vec!["References"]);
        assert_eq!(config.parser.normative_keywords.len(), 3);
        assert_eq!(
            config.revision_table,
            Some(RevisionTableConfig {
                id_column: 0,
                date_column: 2,
                detail_column: 1,
            })
        );
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
parser-configuration:
  metadata_in_first_section: true
  title: YAML Policy
  normative_keywords: [SHALL]
  version_marker: Version
  publication_date_format: "%Y-%m-%d"
"#;
        let config = ConverterConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.parser.title, "YAML Policy");
        assert!(config.parser.toc_marker.is_none());
        assert!(config.parser.backmatter_sections.is_empty());
        assert!(config.revision_table.is_none());
    }

    #[test]
    fn test_missing_required_key_fails() {
        let toml = r#"
[parser-configuration]
metadata_in_first_section = true
title = "No keywords"
version_marker = "Version"
publication_date_format = "%B %d, %Y"
"#;
        let err = ConverterConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConverterError::TomlConfig(_)));
    }

    #[test]
    fn test_incomplete_revision_table_fails() {
        let toml = SAMPLE_TOML.replace("detail_column = 1", "");
        assert!(ConverterConfig::from_toml_str(&toml).is_err());
    }

    #[test]
    fn test_validate_accepts_empty_keywords() {
        let config = ConverterConfig::builder("t")
            .normative_keywords(Vec::<String>::new())
            .build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_keyword_list_parses() {
        let toml = SAMPLE_TOML.replace(
            r#"normative_keywords = ["SHALL", "MUST", "REQUIRED"]"#,
            "normative_keywords = []",
        );
        let config = ConverterConfig::from_toml_str(&toml).unwrap();
        assert!(config.parser.normative_keywords.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_date_format() {
        let config = ConverterConfig::builder("t")
            .publication_date_format("%Q-%Y")
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_backmatter_marker() {
        let config = ConverterConfig::builder("t")
            .backmatter_sections([""])
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_defaults_are_valid() {
        let config = ConverterConfig::builder("Policy").build();
        assert!(config.validate().is_ok());
        assert_eq!(config.parser.title, "Policy");
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("policy.toml");
        std::fs::write(&toml_path, SAMPLE_TOML).unwrap();
        assert!(ConverterConfig::load(&toml_path).is_ok());

        let yaml_path = dir.path().join("policy.yml");
        std::fs::write(&yaml_path, SAMPLE_TOML).unwrap();
        assert!(matches!(
            ConverterConfig::load(&yaml_path),
            Err(ConverterError::Yaml(_))
        ));
    }
}
