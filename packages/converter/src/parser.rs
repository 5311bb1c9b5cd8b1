//! Parsers turning a tokenized policy into a catalog document.
//!
//! The `simple` parser is the structural converter. The `empty` parser
//! produces a document without a catalog and exists so callers can select a
//! parser by name without special-casing unknown layouts.

use std::fmt;

use clap::ValueEnum;
use uuid::Uuid;

use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::hierarchy::build_hierarchy;
use crate::metadata::parse_metadata;
use crate::segment::{segment_sections, Section};
use crate::types::{Catalog, Document};

/// Available parser implementations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ParserKind {
    /// Header-driven structural parser.
    #[default]
    Simple,
    /// Produces an empty document.
    Empty,
}

impl ParserKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts policy lines into a document.
pub trait PolicyParser {
    /// Which implementation this is.
    fn kind(&self) -> ParserKind;

    /// Convert the policy lines into a document.
    ///
    /// # Errors
    /// Fails when mandatory metadata is missing or a section is malformed.
    fn policy_to_catalog(&self, lines: &[String]) -> Result<Document>;
}

/// Parser that never produces a catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyParser;

impl PolicyParser for EmptyParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Empty
    }

    fn policy_to_catalog(&self, lines: &[String]) -> Result<Document> {
        tracing::debug!(lines = lines.len(), "Empty parser ignores input");
        Ok(Document::empty())
    }
}

/// Structural parser driven by header depth.
///
/// The first section is the introduction and yields the metadata. Every
/// following section becomes a group, except the table of contents and the
/// back-matter sections named in the configuration.
#[derive(Debug, Clone)]
pub struct SimpleParser {
    config: ConverterConfig,
}

impl SimpleParser {
    #[must_use]
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }
}

impl PolicyParser for SimpleParser {
    fn kind(&self) -> ParserKind {
        ParserKind::Simple
    }

    fn policy_to_catalog(&self, lines: &[String]) -> Result<Document> {
        let sections = segment_sections(lines);
        tracing::info!(
            lines = lines.len(),
            sections = sections.len(),
            "Converting policy"
        );

        let Some((introduction, rest)) = sections.split_first() else {
            return Err(missing_all_metadata());
        };
        if !self.config.parser.metadata_in_first_section {
            tracing::warn!("metadata_in_first_section is disabled; no metadata source");
            return Err(missing_all_metadata());
        }

        let metadata = parse_metadata(&introduction_lines(introduction), &self.config)?;
        let hierarchy = build_hierarchy(rest, &self.config.parser)?;

        tracing::info!(
            version = %metadata.version,
            groups = hierarchy.groups.len(),
            resources = hierarchy.back_matter.resources.len(),
            "Built catalog"
        );

        Ok(Document::new(Catalog {
            uuid: Uuid::new_v4(),
            metadata,
            groups: hierarchy.groups,
            back_matter: hierarchy.back_matter,
        }))
    }
}

/// The introduction's lines, header included.
fn introduction_lines(section: &Section) -> Vec<&str> {
    section
        .header
        .as_deref()
        .into_iter()
        .chain(section.body.iter().map(String::as_str))
        .collect()
}

fn missing_all_metadata() -> ConverterError {
    ConverterError::MissingMetadata {
        version: true,
        published: true,
    }
}

/// Create the parser for `kind`.
#[must_use]
pub fn choose_parser(kind: ParserKind, config: ConverterConfig) -> Box<dyn PolicyParser> {
    match kind {
        ParserKind::Simple => Box::new(SimpleParser::new(config)),
        ParserKind::Empty => Box::new(EmptyParser),
    }
}
