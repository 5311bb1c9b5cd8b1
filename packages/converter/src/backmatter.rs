//! Back-matter extraction from the references section.
//!
//! The references section holds a table whose first cell names the document
//! and whose second cell holds a description followed by a URL.

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::markup::extract_table;
use crate::types::{BackMatter, Resource, ResourceLink};

/// Regex splitting a reference cell at the first URL scheme.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REFERENCE_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<desc>.*?)\s*(?P<url>https?://.*?)\s*$").expect("valid regex")
});

/// Parse the body of a references section into back matter.
///
/// Every row is attempted, including a header row. Rows with fewer than two
/// cells, or without a URL in the second cell, are dropped.
///
/// # Examples
/// ```
/// use pki_policy_converter::backmatter::parse_backmatter;
///
/// let body = [
///     "<table>",
///     "<tr><td>RFC 5280</td><td>X.509 profile https://www.rfc-editor.org/rfc/rfc5280</td></tr>",
///     "</table>",
/// ];
/// let back_matter = parse_backmatter(&body);
/// assert_eq!(back_matter.resources.len(), 1);
/// assert_eq!(back_matter.resources[0].description, "X.509 profile");
/// ```
pub fn parse_backmatter<S: AsRef<str>>(lines: &[S]) -> BackMatter {
    let rows = extract_table(lines);
    let resources: Vec<Resource> = rows.iter().filter_map(|row| resource_from_row(row)).collect();

    tracing::debug!(
        rows = rows.len(),
        resources = resources.len(),
        "Parsed back matter"
    );
    BackMatter { resources }
}

fn resource_from_row(row: &[String]) -> Option<Resource> {
    let [title, reference, ..] = row else {
        tracing::debug!(cells = row.len(), "Skipping reference row with too few cells");
        return None;
    };

    let Some(caps) = REFERENCE_CELL.captures(reference) else {
        tracing::debug!(title = %title, "Skipping reference row without URL");
        return None;
    };

    Some(Resource {
        uuid: Uuid::new_v4(),
        title: title.clone(),
        description: caps["desc"].trim().to_string(),
        rlinks: vec![ResourceLink {
            href: caps["url"].to_string(),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_row_without_url_dropped() {
        let body = [
            "<table>",
            "<tr><td>RFC 1234</td><td>desc http://example.com/x</td></tr>",
            "<tr><td>Bad Row</td><td>no url here</td></tr>",
            "</table>",
        ];
        let back_matter = parse_backmatter(&body);

        assert_eq!(back_matter.resources.len(), 1);
        let resource = &back_matter.resources[0];
        assert_eq!(resource.title, "RFC 1234");
        assert_eq!(resource.description, "desc");
        assert_eq!(
            resource.rlinks,
            vec![ResourceLink {
                href: "http://example.com/x".to_string()
            }]
        );
    }

    #[test]
    fn test_split_at_first_url() {
        let body = ["<table><tr><td>Mirror</td><td>See https://a.example then https://b.example</td></tr></table>"];
        let back_matter = parse_backmatter(&body);
        let resource = &back_matter.resources[0];

        assert_eq!(resource.description, "See");
        assert_eq!(
            resource.rlinks[0].href,
            "https://a.example then https://b.example"
        );
    }

    #[test]
    fn test_url_only_cell_has_empty_description() {
        let body = ["<table><tr><td>FIPS 140-3</td><td>https://csrc.nist.gov/pubs</td></tr></table>"];
        let back_matter = parse_backmatter(&body);
        assert_eq!(back_matter.resources[0].description, "");
        assert_eq!(back_matter.resources[0].rlinks[0].href, "https://csrc.nist.gov/pubs");
    }

    #[test]
    fn test_header_row_is_attempted_and_dropped() {
        let body = [
            "<table>",
            "<tr><th>Name</th><th>Location</th></tr>",
            "<tr><td>RFC 3647</td><td>Framework http://example.com/3647</td></tr>",
            "<tr><td>single cell</td></tr>",
            "</table>",
        ];
        let back_matter = parse_backmatter(&body);
        let titles: Vec<_> = back_matter.resources.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["RFC 3647"]);
    }

    #[test]
    fn test_resources_get_distinct_ids() {
        let body = [
            "<table>",
            "<tr><td>A</td><td>http://a.example</td></tr>",
            "<tr><td>B</td><td>http://b.example</td></tr>",
            "</table>",
        ];
        let back_matter = parse_backmatter(&body);
        assert_eq!(back_matter.resources.len(), 2);
        assert_ne!(back_matter.resources[0].uuid, back_matter.resources[1].uuid);
    }

    #[test]
    fn test_empty_input() {
        let body: [&str; 0] = [];
        assert_eq!(parse_backmatter(&body), BackMatter::default());
    }
}
