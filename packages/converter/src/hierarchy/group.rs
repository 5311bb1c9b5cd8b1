//! Conversion of one section into a catalog group.

use uuid::Uuid;

use crate::classify::NormativeClassifier;
use crate::markup::{extract_table, flatten_rows, plain_text, table_boundary, TableBoundary};
use crate::segment::Section;
use crate::types::{Control, Group, Part, PartName};

/// Section body split into normative and informative text, in order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SectionContent {
    pub normative: Vec<String>,
    pub informative: Vec<String>,
}

impl SectionContent {
    /// Classify a body, treating each embedded table as one unit.
    pub fn from_body<S: AsRef<str>>(body: &[S], classifier: &NormativeClassifier) -> Self {
        let mut content = Self::default();
        let mut table: Option<Vec<&str>> = None;

        for line in body.iter().map(|line| line.as_ref()) {
            let boundary = table_boundary(line);

            if let Some(buffer) = table.as_mut() {
                buffer.push(line);
                if matches!(
                    boundary,
                    Some(TableBoundary::Close | TableBoundary::OpenAndClose)
                ) {
                    let lines = std::mem::take(buffer);
                    table = None;
                    content.push(flatten_table(&lines), classifier);
                }
                continue;
            }

            match boundary {
                Some(TableBoundary::Open) => table = Some(vec![line]),
                Some(TableBoundary::OpenAndClose) => {
                    content.push(flatten_table(&[line]), classifier);
                }
                Some(TableBoundary::Close) | None => content.push(plain_text(line), classifier),
            }
        }

        if let Some(lines) = table {
            tracing::debug!(lines = lines.len(), "Table left open at end of section");
            content.push(flatten_table(&lines), classifier);
        }

        content
    }

    fn push(&mut self, text: String, classifier: &NormativeClassifier) {
        if text.is_empty() {
            return;
        }
        if classifier.is_normative(&text) {
            self.normative.push(text);
        } else {
            self.informative.push(text);
        }
    }
}

/// Flatten table lines into one line of text.
///
/// Falls back to the markup-stripped text when no rows can be read.
fn flatten_table(lines: &[&str]) -> String {
    let rows = extract_table(lines);
    let flattened = flatten_rows(&rows);
    if flattened.trim().is_empty() {
        plain_text(&lines.join(" "))
    } else {
        flattened.trim().to_string()
    }
}

/// Convert a section into a group.
///
/// Returns `None` for a section whose title is empty after stripping.
/// Informative text becomes `overview` parts on the group. Normative text
/// becomes one control, wrapped in a child group dedicated to it.
pub fn section_to_group(section: &Section, classifier: &NormativeClassifier) -> Option<Group> {
    if section.has_empty_title() {
        tracing::debug!(header = %section.header_line(), "Skipping section with empty title");
        return None;
    }

    let uuid = Uuid::new_v4();
    let group_id = format!("group-{uuid}");
    let mut group = Group::new(group_id.clone(), section.title.clone());

    let content = SectionContent::from_body(&section.body, classifier);

    if !content.normative.is_empty() {
        let mut control_group = Group::new(
            format!("control-{uuid}"),
            format!("{}: Group for Normative Statements", section.title),
        );
        control_group.controls = Some(vec![statements_to_control(
            &section.title,
            content.normative,
        )]);
        group.add_subgroup(control_group);
    }

    if !content.informative.is_empty() {
        let parts = content
            .informative
            .into_iter()
            .enumerate()
            .map(|(n, prose)| Part {
                id: format!("{group_id}-{n}"),
                name: PartName::Overview,
                prose,
            })
            .collect();
        group.parts = Some(parts);
    }

    Some(group)
}

fn statements_to_control(title: &str, statements: Vec<String>) -> Control {
    let uuid = Uuid::new_v4();
    let parts = statements
        .into_iter()
        .zip(1..)
        .map(|(prose, n)| Part {
            id: format!("stmt-{uuid}-{n}"),
            name: PartName::Statement,
            prose,
        })
        .collect();

    Control {
        id: format!("ctrl-{uuid}"),
        title: format!("{title}: Normative Statements"),
        parts,
    }
}
