//! Content assembler.
//!
//! # Responsibility
//! - Serialize the container/paragraph model into one document string.
//!
//! # Invariants
//! - Output is a pure function of `(containers, paragraphs, options)`.
//! - Paragraphs are grouped under their own container; unassigned paragraphs
//!   are not part of the document.
//! - Containers sort by `order` ascending; paragraphs sort by `order`
//!   ascending inside a container, ties keep collection position.
//! - No paragraph is skipped for being empty or whitespace-only.

use super::text::has_rendered_content;
use crate::model::container::Container;
use crate::model::paragraph::Paragraph;

/// Separator emitted after every heading and paragraph block.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Rendering switches for [`assemble_content`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Emit `## <container name>` before each non-empty container. Off by
    /// default; plain output is the container groups concatenated.
    pub include_section_headings: bool,
}

impl AssembleOptions {
    /// Options with `## <name>` section headings enabled.
    pub fn with_headings() -> Self {
        Self {
            include_section_headings: true,
        }
    }
}

/// Concatenates container groups into the final document.
///
/// Containers without paragraphs contribute nothing, heading included.
pub fn assemble_content(
    containers: &[Container],
    paragraphs: &[Paragraph],
    options: &AssembleOptions,
) -> String {
    let mut document = String::new();
    for container in sorted_containers(containers) {
        let group = paragraphs_of(paragraphs, Some(container));
        if group.is_empty() {
            continue;
        }

        if options.include_section_headings {
            document.push_str("## ");
            document.push_str(container.name.trim());
            document.push_str(BLOCK_SEPARATOR);
        }
        for paragraph in group {
            document.push_str(&paragraph.content);
            document.push_str(BLOCK_SEPARATOR);
        }
    }
    document
}

/// Returns whether at least one assigned paragraph renders text or media.
pub fn has_assigned_content(containers: &[Container], paragraphs: &[Paragraph]) -> bool {
    paragraphs.iter().any(|paragraph| {
        paragraph.container_id.as_ref().is_some_and(|container_id| {
            containers.iter().any(|container| &container.id == container_id)
        }) && has_rendered_content(&paragraph.content)
    })
}

/// Containers in assembly order.
pub(crate) fn sorted_containers(containers: &[Container]) -> Vec<&Container> {
    let mut sorted: Vec<&Container> = containers.iter().collect();
    sorted.sort_by_key(|container| container.order);
    sorted
}

/// Paragraphs of one bucket in assembly order. `None` selects the unassigned
/// pool.
pub(crate) fn paragraphs_of<'a>(
    paragraphs: &'a [Paragraph],
    container: Option<&Container>,
) -> Vec<&'a Paragraph> {
    let bucket = container.map(|container| &container.id);
    let mut group: Vec<&Paragraph> = paragraphs
        .iter()
        .filter(|paragraph| paragraph.container_id.as_ref() == bucket)
        .collect();
    group.sort_by_key(|paragraph| paragraph.order);
    group
}

#[cfg(test)]
mod tests {
    use super::{assemble_content, AssembleOptions};
    use crate::model::container::Container;
    use crate::model::paragraph::Paragraph;

    #[test]
    fn empty_model_assembles_to_empty_string() {
        assert_eq!(assemble_content(&[], &[], &AssembleOptions::default()), "");
    }

    #[test]
    fn headings_are_opt_in() {
        let containers = vec![Container::with_id("c1", "Intro", 0)];
        let paragraphs = vec![Paragraph::with_id("p1", "Hello", 0).in_container("c1")];
        let plain = assemble_content(&containers, &paragraphs, &AssembleOptions::default());
        let headed = assemble_content(&containers, &paragraphs, &AssembleOptions::with_headings());
        assert_eq!(plain, "Hello\n\n");
        assert_eq!(headed, "## Intro\n\nHello\n\n");
    }
}
