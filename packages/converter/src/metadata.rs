//! Metadata extraction from the policy's introductory section.
//!
//! The introduction (title page, version block, revision history, and
//! sometimes the table of contents) yields:
//! - the version string, from the line carrying the version marker
//! - the publication date, from a line that parses with the configured format
//! - revisions, from the revision history table
//!
//! Version and publication date are mandatory; without them the conversion
//! fails.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

use crate::config::{ConverterConfig, RevisionTableConfig, REVISION_DATE_FORMAT};
use crate::error::{ConverterError, Result};
use crate::markup::{extract_table, plain_text, strip_emphasis, table_boundary, TableBoundary};
use crate::types::{Metadata, Revision};

/// Classification of one introduction line.
///
/// Precedence: table state, then table of contents, then version and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntroLine {
    /// Opens a table.
    TableOpen,
    /// Inside an open table.
    TableLine,
    /// Closes the open table.
    TableClose,
    /// Opens and closes a table on the same line.
    TableComplete,
    /// Contains the table-of-contents marker.
    TocMarker,
    /// A reference-style entry inside the table of contents.
    TocEntry,
    /// Carries the version marker; holds the extracted version.
    Version(String),
    /// Parses as the publication date.
    Date(DateTime<Utc>),
    /// Anything else; assumed to be unrelated prose.
    Unrecognized,
}

/// Line-by-line scanner over the introduction.
pub struct IntroductionScanner<'a> {
    toc_marker: Option<&'a str>,
    version_marker: &'a str,
    version_pattern: Regex,
    date_format: &'a str,
    revision_columns: Option<RevisionTableConfig>,

    in_table: bool,
    table: Vec<String>,
    in_toc: bool,
    toc_entries_seen: bool,

    version: Option<String>,
    published: Option<DateTime<Utc>>,
    revisions: Vec<Revision>,
}

impl<'a> IntroductionScanner<'a> {
    /// Create a scanner for the given configuration.
    pub fn new(config: &'a ConverterConfig) -> Result<Self> {
        let parser = &config.parser;
        let pattern = format!(r"^{}[\s\-\d]*\s", regex::escape(&parser.version_marker));
        let version_pattern = Regex::new(&pattern)
            .map_err(|e| ConverterError::Config(format!("invalid version_marker: {e}")))?;

        Ok(Self {
            toc_marker: parser.toc_marker.as_deref(),
            version_marker: &parser.version_marker,
            version_pattern,
            date_format: &parser.publication_date_format,
            revision_columns: config.revision_table,
            in_table: false,
            table: Vec::new(),
            in_toc: false,
            toc_entries_seen: false,
            version: None,
            published: None,
            revisions: Vec::new(),
        })
    }

    /// Classify a line against the current scanner state.
    pub fn classify(&self, line: &str) -> IntroLine {
        match (self.in_table, table_boundary(line)) {
            (true, Some(TableBoundary::Close | TableBoundary::OpenAndClose)) => {
                return IntroLine::TableClose
            }
            (true, _) => return IntroLine::TableLine,
            (false, Some(TableBoundary::Open)) => return IntroLine::TableOpen,
            (false, Some(TableBoundary::OpenAndClose)) => return IntroLine::TableComplete,
            (false, Some(TableBoundary::Close) | None) => {}
        }

        if self.toc_marker.is_some_and(|marker| line.contains(marker)) {
            return IntroLine::TocMarker;
        }

        let is_entry = line.starts_with('[');
        let in_toc = self.in_toc && (is_entry || !self.toc_entries_seen);
        if in_toc && is_entry {
            return IntroLine::TocEntry;
        }

        if !in_toc && line.contains(self.version_marker) {
            if let Some(version) = self.extract_version(line) {
                return IntroLine::Version(version);
            }
        }

        match parse_date(line, self.date_format) {
            Some(published) => IntroLine::Date(published),
            None => IntroLine::Unrecognized,
        }
    }

    /// Classify a line and update the scanner state.
    pub fn feed(&mut self, line: &str) -> IntroLine {
        let outcome = self.classify(line);

        if self.in_toc
            && self.toc_entries_seen
            && !matches!(outcome, IntroLine::TocEntry | IntroLine::TocMarker)
        {
            tracing::debug!("Left table of contents");
            self.in_toc = false;
        }

        match &outcome {
            IntroLine::TableOpen => {
                self.in_table = true;
                self.table.clear();
                self.table.push(line.to_string());
            }
            IntroLine::TableLine => self.table.push(line.to_string()),
            IntroLine::TableClose => {
                self.table.push(line.to_string());
                self.in_table = false;
                let table = std::mem::take(&mut self.table);
                self.read_revision_table(&table);
            }
            IntroLine::TableComplete => self.read_revision_table(&[line]),
            IntroLine::TocMarker => {
                self.in_toc = true;
                self.toc_entries_seen = false;
            }
            IntroLine::TocEntry => self.toc_entries_seen = true,
            IntroLine::Version(version) => {
                tracing::debug!(version = %version, "Found version");
                self.version = Some(version.clone());
            }
            IntroLine::Date(published) => {
                tracing::debug!(published = %published, "Found publication date");
                self.published = Some(*published);
            }
            IntroLine::Unrecognized => {}
        }

        outcome
    }

    /// Finish scanning and build the metadata.
    pub fn finish(self, title: &str) -> Result<Metadata> {
        match (self.version, self.published) {
            (Some(version), Some(published)) => {
                Ok(Metadata::new(title, version, published).with_revisions(self.revisions))
            }
            (version, published) => Err(ConverterError::MissingMetadata {
                version: version.is_none(),
                published: published.is_none(),
            }),
        }
    }

    fn extract_version(&self, line: &str) -> Option<String> {
        let text = strip_emphasis(&plain_text(line));
        let text = text.trim();

        let version = match self.version_pattern.find(text) {
            Some(prefix) => &text[prefix.end()..],
            None => {
                let start = text.find(self.version_marker)? + self.version_marker.len();
                &text[start..]
            }
        };
        let version = version.trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '-');
        (!version.is_empty()).then(|| version.to_string())
    }

    fn read_revision_table<S: AsRef<str>>(&mut self, lines: &[S]) {
        let Some(columns) = self.revision_columns else {
            tracing::warn!("Table in introduction ignored: no revision-table configuration");
            return;
        };

        let rows = extract_table(lines);
        let revisions = revisions_from_rows(&rows, &columns);
        if revisions.is_empty() {
            tracing::debug!(rows = rows.len(), "Table in introduction has no revisions");
        } else {
            self.revisions = revisions;
        }
    }
}

/// Parse the introduction lines into catalog metadata.
///
/// # Errors
/// `ConverterError::MissingMetadata` when no version or no publication date
/// is found.
pub fn parse_metadata<S: AsRef<str>>(lines: &[S], config: &ConverterConfig) -> Result<Metadata> {
    let mut scanner = IntroductionScanner::new(config)?;
    for line in lines {
        scanner.feed(line.as_ref());
    }
    scanner.finish(&config.parser.title)
}

/// Parse a publication date line with a strftime-style format.
///
/// Markdown emphasis is removed first. Formats without a time component
/// produce midnight UTC.
///
/// # Examples
/// ```
/// use pki_policy_converter::metadata::parse_date;
///
/// let date = parse_date("**May 1, 2020**", "%B %d, %Y").unwrap();
/// assert_eq!(date.to_rfc3339(), "2020-05-01T00:00:00+00:00");
/// assert!(parse_date("Not a date", "%B %d, %Y").is_none());
/// ```
pub fn parse_date(line: &str, format: &str) -> Option<DateTime<Utc>> {
    let text = strip_emphasis(line);
    let text = text.trim();

    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
        return Some(datetime.and_utc());
    }
    NaiveDate::parse_from_str(text, format)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Convert revision table rows into revisions.
///
/// The first row is the header and is skipped. Rows whose date cell does not
/// parse as `Month Day, Year`, or that lack a configured column, are skipped.
pub fn revisions_from_rows(rows: &[Vec<String>], columns: &RevisionTableConfig) -> Vec<Revision> {
    rows.iter()
        .skip(1)
        .filter_map(|row| {
            let version = row.get(columns.id_column)?;
            let date = row.get(columns.date_column)?;
            let remarks = row.get(columns.detail_column)?;

            let Some(published) = parse_date(date, REVISION_DATE_FORMAT) else {
                tracing::debug!(date = %date, "Skipping revision row with unparsable date");
                return None;
            };

            Some(Revision {
                version: version.clone(),
                published,
                remarks: remarks.clone(),
            })
        })
        .collect()
}
