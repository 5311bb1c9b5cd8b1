//! Splitting the tokenized line stream into header-delimited sections.

use crate::config::HEADER_MARKER;
use crate::markup::{plain_text, strip_header_markers};

/// A header line plus the body lines that follow it.
///
/// Lines before the first header form a headerless leading section with
/// depth 0 and no header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Number of leading header markers; 0 for the leading block.
    pub depth: usize,
    /// Header text with markers and inline tags stripped, references decoded.
    pub title: String,
    /// The raw header line, if the section has one.
    pub header: Option<String>,
    /// Body lines in order.
    pub body: Vec<String>,
}

impl Section {
    /// Build a section from its lines; the first line may be a header.
    fn from_lines(mut lines: Vec<String>) -> Self {
        let header = lines
            .first()
            .filter(|line| line.starts_with(HEADER_MARKER))
            .cloned();

        match header {
            Some(header) => {
                lines.remove(0);
                let (depth, rest) = strip_header_markers(&header).unwrap_or((0, header.as_str()));
                let title = plain_text(rest);
                Self {
                    depth,
                    title,
                    header: Some(header),
                    body: lines,
                }
            }
            None => Self {
                depth: 0,
                title: String::new(),
                header: None,
                body: lines,
            },
        }
    }

    /// Whether the header text is empty after stripping.
    #[must_use]
    pub fn has_empty_title(&self) -> bool {
        self.title.is_empty()
    }

    /// The header line, or an empty string for the leading block.
    #[must_use]
    pub fn header_line(&self) -> &str {
        self.header.as_deref().unwrap_or_default()
    }
}

/// Split lines into sections.
///
/// Blank lines are dropped. Every line starting with a header marker opens
/// a new section.
///
/// # Examples
/// ```
/// use pki_policy_converter::segment::segment_sections;
///
/// let lines = ["Intro", "", "# 1 Introduction", "Text.", "## 1.1 Overview"];
/// let sections = segment_sections(&lines);
/// assert_eq!(sections.len(), 3);
/// assert_eq!(sections[0].depth, 0);
/// assert_eq!(sections[1].title, "1 Introduction");
/// assert_eq!(sections[2].depth, 2);
/// assert!(sections[2].body.is_empty());
/// ```
pub fn segment_sections<S: AsRef<str>>(lines: &[S]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in lines.iter().map(|line| line.as_ref()) {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(HEADER_MARKER) && !current.is_empty() {
            sections.push(Section::from_lines(std::mem::take(&mut current)));
        }
        current.push(line.to_string());
    }
    if !current.is_empty() {
        sections.push(Section::from_lines(current));
    }

    tracing::debug!(sections = sections.len(), "Segmented policy into sections");
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_segment_starting_with_header() {
        let lines = ["# Title Page", "Version 1.0", "# 1 Introduction", "Body"];
        let sections = segment_sections(&lines);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Title Page");
        assert_eq!(sections[0].body, vec!["Version 1.0"]);
        assert_eq!(sections[1].depth, 1);
        assert_eq!(sections[1].body, vec!["Body"]);
    }

    #[test]
    fn test_blank_lines_dropped() {
        let lines = ["# A", "", "   ", "text", ""];
        let sections = segment_sections(&lines);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, vec!["text"]);
    }

    #[test]
    fn test_marker_only_header_has_empty_title() {
        let lines = ["# A", "###   ", "orphan text"];
        let sections = segment_sections(&lines);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].depth, 3);
        assert!(sections[1].has_empty_title());
        assert_eq!(sections[1].body, vec!["orphan text"]);
    }

    #[test]
    fn test_title_tags_stripped() {
        let lines = ["## <span id=\"x\"></span>1.2 Document Name"];
        let sections = segment_sections(&lines);
        assert_eq!(sections[0].title, "1.2 Document Name");
        assert_eq!(sections[0].depth, 2);
    }

    #[test]
    fn test_title_references_decoded() {
        let lines = ["### 9.6.1 CA&rsquo;s Representations &amp; Warranties"];
        let sections = segment_sections(&lines);
        assert_eq!(sections[0].title, "9.6.1 CA\u{2019}s Representations & Warranties");
    }

    #[test]
    fn test_header_without_body() {
        let lines = ["# A", "## B", "## C"];
        let sections = segment_sections(&lines);
        assert_eq!(sections.len(), 3);
        assert!(sections.iter().all(|s| s.body.is_empty()));
    }

    #[test]
    fn test_leading_block_without_header() {
        let lines = ["Certificate Policy", "Version 2.0", "# 1"];
        let sections = segment_sections(&lines);
        assert_eq!(sections[0].header, None);
        assert_eq!(sections[0].header_line(), "");
        assert_eq!(sections[0].body.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let lines: [&str; 0] = [];
        assert!(segment_sections(&lines).is_empty());
    }
}
