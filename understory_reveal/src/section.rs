// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section registry: the ordered list of sections a reveal view renders.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Number of sections generated by [`RevealConfig::default`](crate::RevealConfig).
pub const DEFAULT_SECTION_COUNT: usize = 5;

/// Body text shared by every [`PlaceholderContent`] section.
pub const PLACEHOLDER_BODY: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
Vivamus vehicula, massa vel laoreet faucibus, turpis turpis rutrum metus, a interdum est \
lectus nec urna.";

/// One renderable section.
///
/// Descriptors are immutable once generated; [`SectionDescriptor::index`]
/// is also the index of the section's slot in [`HandleSlots`](crate::HandleSlots)
/// and in the watcher's reveal state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionDescriptor {
    index: usize,
    title: String,
    body: String,
}

impl SectionDescriptor {
    /// Position of this section in its registry, starting at `0`.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Heading text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Paragraph text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Supplier of per-section text.
pub trait SectionContent {
    /// Heading for the section at `index`.
    fn title(&self, index: usize) -> String;

    /// Body text for the section at `index`.
    fn body(&self, index: usize) -> String;
}

/// Numbered headings (`"Section 1"`, `"Section 2"`, ...) over a fixed
/// [`PLACEHOLDER_BODY`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaceholderContent;

impl SectionContent for PlaceholderContent {
    fn title(&self, index: usize) -> String {
        format!("Section {}", index + 1)
    }

    fn body(&self, _index: usize) -> String {
        String::from(PLACEHOLDER_BODY)
    }
}

impl<F> SectionContent for F
where
    F: Fn(usize) -> (String, String),
{
    fn title(&self, index: usize) -> String {
        self(index).0
    }

    fn body(&self, index: usize) -> String {
        self(index).1
    }
}

/// Generates `count` placeholder sections with indices `0..count`.
///
/// ```rust
/// use understory_reveal::generate;
///
/// let sections = generate(3);
/// assert_eq!(sections.len(), 3);
/// assert_eq!(sections[2].title(), "Section 3");
/// ```
#[must_use]
pub fn generate(count: usize) -> Vec<SectionDescriptor> {
    generate_with(count, &PlaceholderContent)
}

/// Generates `count` sections using `content` for their text.
#[must_use]
pub fn generate_with<C: SectionContent + ?Sized>(
    count: usize,
    content: &C,
) -> Vec<SectionDescriptor> {
    (0..count)
        .map(|index| SectionDescriptor {
            index,
            title: content.title(index),
            body: content.body(index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{PLACEHOLDER_BODY, generate, generate_with};

    #[test]
    fn generate_yields_ordered_indices() {
        for count in [0_usize, 1, 5, 17] {
            let sections = generate(count);
            assert_eq!(sections.len(), count);
            for (i, section) in sections.iter().enumerate() {
                assert_eq!(section.index(), i);
            }
        }
    }

    #[test]
    fn titles_are_one_based_and_bodies_shared() {
        let sections = generate(5);
        assert_eq!(sections[0].title(), "Section 1");
        assert_eq!(sections[4].title(), "Section 5");
        assert!(!PLACEHOLDER_BODY.is_empty());
        assert!(sections.iter().all(|s| s.body() == PLACEHOLDER_BODY));
    }

    #[test]
    fn generate_is_deterministic() {
        assert_eq!(generate(5), generate(5));
    }

    #[test]
    fn closures_supply_custom_content() {
        let content = |i: usize| (alloc::format!("Chapter {i}"), String::from("body"));
        let sections = generate_with(2, &content);
        assert_eq!(sections[1].title(), "Chapter 1");
        assert_eq!(sections[1].body(), "body");
    }
}
