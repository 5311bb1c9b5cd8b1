//! OSCAL catalog data model populated by the converter.
//!
//! Only the subset of the OSCAL catalog schema that a certificate policy
//! maps onto is modelled. Field names serialize to the kebab-case names the
//! schema uses.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use crate::config::OSCAL_VERSION;

/// Regex for slug generation - matches non-word characters.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.-]").expect("valid regex"));

/// Regex for slug generation - matches whitespace and dashes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_SPACE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Root object. Either holds a complete catalog or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Catalog>,
}

impl Document {
    /// A document carrying a catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    /// An explicitly empty document.
    #[must_use]
    pub fn empty() -> Self {
        Self { catalog: None }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_none()
    }
}

/// An OSCAL catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Catalog {
    pub uuid: Uuid,
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    pub back_matter: BackMatter,
}

/// Catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Metadata {
    pub title: String,
    pub published: DateTime<Utc>,
    pub version: String,
    pub oscal_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revisions: Option<Vec<Revision>>,
}

impl Metadata {
    /// Create metadata with the schema version filled in.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        version: impl Into<String>,
        published: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            published,
            version: version.into(),
            oscal_version: OSCAL_VERSION.to_string(),
            revisions: None,
        }
    }

    /// Attach revisions; an empty list is stored as absent.
    #[must_use]
    pub fn with_revisions(mut self, revisions: Vec<Revision>) -> Self {
        self.revisions = (!revisions.is_empty()).then_some(revisions);
        self
    }

    /// Generate a file-name friendly slug from the title.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use pki_policy_converter::types::Metadata;
    ///
    /// let metadata = Metadata::new("Federal Common Policy", "2.1", Utc::now());
    /// assert_eq!(metadata.to_slug(), "federal_common_policy");
    /// ```
    #[must_use]
    pub fn to_slug(&self) -> String {
        let text = self.title.to_lowercase();
        let text = SLUG_NON_WORD.replace_all(&text, "");
        let text = SLUG_SPACE_DASH.replace_all(&text, "_");
        text.trim_matches('_').to_string()
    }
}

/// One entry of the revision history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub version: String,
    pub published: DateTime<Utc>,
    pub remarks: String,
}

/// A hierarchy node; one per policy section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<Vec<Control>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
}

impl Group {
    /// Create a group without children, controls or parts.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            groups: None,
            controls: None,
            parts: None,
        }
    }

    /// Append a child group, creating the child list if absent.
    pub fn add_subgroup(&mut self, child: Group) {
        self.groups.get_or_insert_with(Vec::new).push(child);
    }

    /// Child groups, empty when there are none.
    #[must_use]
    pub fn subgroups(&self) -> &[Group] {
        self.groups.as_deref().unwrap_or_default()
    }

    /// Narrative parts, empty when there are none.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        self.parts.as_deref().unwrap_or_default()
    }

    /// Controls, empty when there are none.
    #[must_use]
    pub fn controls(&self) -> &[Control] {
        self.controls.as_deref().unwrap_or_default()
    }
}

/// A control holding the normative statements of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub title: String,
    pub parts: Vec<Part>,
}

/// Kind of narrative part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartName {
    /// Informative section content.
    Overview,
    /// Normative content.
    Statement,
}

impl PartName {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Statement => "statement",
        }
    }
}

/// A leaf narrative unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub name: PartName,
    pub prose: String,
}

/// External references collected from the policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackMatter {
    pub resources: Vec<Resource>,
}

/// A referenced document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub uuid: Uuid,
    pub title: String,
    pub description: String,
    pub rlinks: Vec<ResourceLink>,
}

/// Link to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub href: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn published() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_add_subgroup_creates_list() {
        let mut parent = Group::new("group-1", "Parent");
        assert!(parent.groups.is_none());

        parent.add_subgroup(Group::new("group-2", "First"));
        parent.add_subgroup(Group::new("group-3", "Second"));

        let titles: Vec<_> = parent.subgroups().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_metadata_empty_revisions_are_absent() {
        let metadata = Metadata::new("Policy", "1.0", published()).with_revisions(Vec::new());
        assert!(metadata.revisions.is_none());
        assert_eq!(metadata.oscal_version, OSCAL_VERSION);
    }

    #[test]
    fn test_metadata_to_slug_special_chars() {
        let metadata = Metadata::new("X.509 Certificate Policy (Common)!", "1.0", published());
        assert_eq!(metadata.to_slug(), "x.509_certificate_policy_common");
    }

    #[test]
    fn test_catalog_serializes_kebab_case() {
        let catalog = Catalog {
            uuid: Uuid::nil(),
            metadata: Metadata::new("Policy", "1.0", published()),
            groups: Vec::new(),
            back_matter: BackMatter::default(),
        };
        let json = serde_json::to_value(Document::new(catalog)).unwrap();

        assert_eq!(json["catalog"]["metadata"]["oscal-version"], "1.1.2");
        assert_eq!(
            json["catalog"]["metadata"]["published"],
            "2023-05-01T00:00:00Z"
        );
        assert!(json["catalog"]["back-matter"]["resources"].is_array());
        assert!(json["catalog"].get("groups").is_none());
        assert!(json["catalog"]["metadata"].get("revisions").is_none());
    }

    #[test]
    fn test_empty_document_serialization() {
        assert_eq!(serde_json::to_string(&Document::empty()).unwrap(), "{}");
        assert!(Document::empty().is_empty());
    }

    #[test]
    fn test_part_name_serialization() {
        assert_eq!(
            serde_json::to_string(&PartName::Statement).unwrap(),
            "\"statement\""
        );
        assert_eq!(PartName::Overview.as_str(), "overview");
    }
}
