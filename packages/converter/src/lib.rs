//! PKI Policy Converter - Convert tokenized certificate policies into OSCAL catalogs.
//!
//! The input is an RFC 3647 style Certificate Policy converted to markdown
//! and tokenized to one sentence or structural line per line. Header depth
//! drives the catalog hierarchy; requirement keywords decide which text
//! becomes control statements.
//!
//! # Example
//!
//! ```
//! use pki_policy_converter::config::ConverterConfig;
//! use pki_policy_converter::parser::{PolicyParser, SimpleParser};
//!
//! let config = ConverterConfig::builder("Example CP").build();
//! let lines: Vec<String> = [
//!     "# Example Certificate Policy",
//!     "Version 1.0",
//!     "May 1, 2020",
//!     "# 1 Introduction",
//!     "The CA SHALL follow this policy.",
//! ]
//! .iter()
//! .map(|line| line.to_string())
//! .collect();
//!
//! let document = SimpleParser::new(config).policy_to_catalog(&lines).unwrap();
//! let catalog = document.catalog.unwrap();
//! assert_eq!(catalog.metadata.version, "1.0");
//! assert_eq!(catalog.groups[0].title, "1 Introduction");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration types, loading and validation
//! - [`types`]: OSCAL catalog data model
//! - [`error`]: Error types and Result alias
//! - [`markup`]: Inline markup cleanup and table extraction
//! - [`segment`]: Splitting lines into header-delimited sections
//! - [`classify`]: Normative keyword classification
//! - [`metadata`]: Version, publication date and revision history
//! - [`backmatter`]: Reference resources
//! - [`hierarchy`]: Group construction and nesting
//! - [`parser`]: Parser selection and the structural parser
//! - [`output`]: JSON/YAML rendering and file output
//! - [`cli`]: Command-line interface

pub mod backmatter;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod markup;
pub mod metadata;
pub mod output;
pub mod parser;
pub mod segment;
pub mod types;

pub use config::ConverterConfig;
pub use error::{ConverterError, Result};
pub use parser::{choose_parser, ParserKind, PolicyParser, SimpleParser};
pub use types::{Catalog, Document, Metadata};
