//! Section-to-group conversion and hierarchy assembly.
//!
//! Each section becomes a group. Header depth decides where the group is
//! attached: a depth-1 section starts a new top-level group, deeper sections
//! nest below the most recent shallower one.

mod builder;
mod group;

pub use builder::{build_hierarchy, Hierarchy, HierarchyBuilder};
pub use group::{section_to_group, SectionContent};
