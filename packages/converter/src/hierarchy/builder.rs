//! Assembly of section groups into the catalog hierarchy.

use crate::backmatter::parse_backmatter;
use crate::classify::NormativeClassifier;
use crate::config::ParserConfig;
use crate::error::{ConverterError, Result};
use crate::segment::Section;
use crate::types::{BackMatter, Group};

use super::group::section_to_group;

/// The top-level groups and back matter of a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    pub groups: Vec<Group>,
    pub back_matter: BackMatter,
}

/// A group in the arena with the indices of its children.
#[derive(Debug)]
struct Node {
    group: Group,
    children: Vec<usize>,
}

/// Builds the group tree from sections in document order.
///
/// Groups live in an arena while the tree is open. The stack holds the arena
/// index of the most recent group at each depth. The tree is materialised by
/// [`HierarchyBuilder::finish`].
#[derive(Debug)]
pub struct HierarchyBuilder<'a> {
    classifier: NormativeClassifier,
    toc_marker: Option<&'a str>,
    backmatter_markers: &'a [String],

    arena: Vec<Node>,
    stack: Vec<usize>,
    roots: Vec<usize>,
    back_matter: Option<BackMatter>,
}

impl<'a> HierarchyBuilder<'a> {
    /// Create a builder for the given parser configuration.
    #[must_use]
    pub fn new(config: &'a ParserConfig) -> Self {
        Self {
            classifier: NormativeClassifier::new(config.normative_keywords.iter().cloned()),
            toc_marker: config.toc_marker.as_deref().filter(|m| !m.is_empty()),
            backmatter_markers: &config.backmatter_sections,
            arena: Vec::new(),
            stack: Vec::new(),
            roots: Vec::new(),
            back_matter: None,
        }
    }

    /// Add the next section.
    ///
    /// # Errors
    /// `ConverterError::MalformedSection` when the section has no header.
    pub fn add_section(&mut self, section: &Section) -> Result<()> {
        let header = section.header_line();

        if self.toc_marker.is_some_and(|marker| header.contains(marker)) {
            tracing::debug!(header = %header, "Skipping table of contents");
            return Ok(());
        }

        if self.is_backmatter(header) {
            if self.back_matter.is_some() {
                tracing::debug!(header = %header, "Replacing earlier back matter");
            }
            self.back_matter = Some(parse_backmatter(&section.body));
            return Ok(());
        }

        if section.header.is_none() {
            return Err(ConverterError::MalformedSection {
                line: section.body.first().cloned().unwrap_or_default(),
            });
        }

        let Some(group) = section_to_group(section, &self.classifier) else {
            return Ok(());
        };
        self.place(section.depth, group);
        Ok(())
    }

    fn is_backmatter(&self, header: &str) -> bool {
        self.backmatter_markers
            .iter()
            .any(|marker| !marker.is_empty() && header.contains(marker.as_str()))
    }

    /// Place a group by comparing its depth with the stack height.
    fn place(&mut self, depth: usize, group: Group) {
        let index = self.arena.len();
        self.arena.push(Node {
            group,
            children: Vec::new(),
        });

        let height = self.stack.len();
        if depth <= 1 {
            // Sections of the previous top-level group are closed
            self.stack.clear();
            self.stack.push(index);
            self.roots.push(index);
        } else if depth > height {
            let parent = self
                .stack
                .get(depth - 2)
                .or_else(|| self.stack.last())
                .copied();
            if depth - 1 > height {
                tracing::debug!(depth, height, "Header depth jumps past open sections");
            }
            self.stack.push(index);
            match parent {
                Some(parent) => self.attach(parent, index),
                None => self.roots.push(index),
            }
        } else {
            self.stack.truncate(depth);
            self.stack[depth - 1] = index;
            let parent = self.stack[depth - 2];
            self.attach(parent, index);
        }
    }

    fn attach(&mut self, parent: usize, child: usize) {
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Materialise the tree.
    ///
    /// Without a back-matter section the back matter is empty.
    #[must_use]
    pub fn finish(self) -> Hierarchy {
        let back_matter = self
            .back_matter
            .unwrap_or_else(|| parse_backmatter::<&str>(&[]));

        // Children always come after their parent in the arena
        let mut built: Vec<Option<Group>> = Vec::with_capacity(self.arena.len());
        built.resize_with(self.arena.len(), || None);
        for (index, node) in self.arena.into_iter().enumerate().rev() {
            let mut group = node.group;
            for child in node.children {
                if let Some(child) = built.get_mut(child).and_then(Option::take) {
                    group.add_subgroup(child);
                }
            }
            built[index] = Some(group);
        }

        let groups = self
            .roots
            .into_iter()
            .filter_map(|index| built.get_mut(index).and_then(Option::take))
            .collect();

        Hierarchy {
            groups,
            back_matter,
        }
    }
}

/// Build the hierarchy from the sections following the introduction.
///
/// # Errors
/// `ConverterError::MalformedSection` when a section has no header.
pub fn build_hierarchy(sections: &[Section], config: &ParserConfig) -> Result<Hierarchy> {
    let mut builder = HierarchyBuilder::new(config);
    for section in sections {
        builder.add_section(section)?;
    }
    Ok(builder.finish())
}
