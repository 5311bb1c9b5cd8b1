//! Text cleanup for markup left behind by the markdown conversion.

use crate::config::HEADER_MARKER;

use super::html::text_content;

/// Remove markdown bold/italic (`*`, `**`) and underline (`__`) markers.
///
/// # Examples
/// ```
/// use pki_policy_converter::markup::strip_emphasis;
///
/// assert_eq!(strip_emphasis("**Version 2.1**"), "Version 2.1");
/// assert_eq!(strip_emphasis("__May 1, 2020__"), "May 1, 2020");
/// ```
pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', "").replace("__", "")
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tags removed, character references decoded, whitespace collapsed.
///
/// # Examples
/// ```
/// use pki_policy_converter::markup::plain_text;
///
/// assert_eq!(plain_text("<span id=\"a\"></span>1.1  Overview"), "1.1 Overview");
/// assert_eq!(plain_text("The CA&rsquo;s key &mdash; see &sect;6"), "The CA\u{2019}s key \u{2014} see \u{a7}6");
/// ```
pub fn plain_text(text: &str) -> String {
    collapse_whitespace(&text_content(text))
}

/// Split a header line into its depth and the text after the markers.
///
/// Returns `None` when the line does not start with a header marker.
///
/// # Examples
/// ```
/// use pki_policy_converter::markup::strip_header_markers;
///
/// assert_eq!(strip_header_markers("## 1.2 Document Name"), Some((2, " 1.2 Document Name")));
/// assert_eq!(strip_header_markers("Plain text"), None);
/// ```
pub fn strip_header_markers(line: &str) -> Option<(usize, &str)> {
    let rest = line.trim_start_matches(HEADER_MARKER);
    let depth = line.len() - rest.len();
    (depth > 0).then_some((depth, rest))
}
