// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers shared by the reveal demos.
//!
//! A stand-in "rendering host": sections are stacked vertically at a fixed
//! height, mounted with their index as handle, and printed as text with a
//! marker showing the reveal class a stylesheet would key off.

use std::fmt::Write as _;

use kurbo::Rect;
use understory_reveal::{RevealView, SectionContent, ViewportHost};

/// Height of each demo section, in logical pixels.
pub const SECTION_HEIGHT: f64 = 400.0;

/// Width of the demo page, in logical pixels.
pub const PAGE_WIDTH: f64 = 800.0;

/// Lays out every section in `view` top to bottom and mounts it.
///
/// Each section's handle is its index. Bounds are recorded on `host`.
pub fn mount_stacked<C: SectionContent>(
    view: &mut RevealView<usize, C>,
    host: &mut ViewportHost<usize>,
) {
    for index in 0..view.sections().len() {
        let top = SECTION_HEIGHT * index as f64;
        host.set_bounds(index, Rect::new(0.0, top, PAGE_WIDTH, top + SECTION_HEIGHT));
        view.mount_ref(index, Some(index));
    }
}

/// Renders one line per section: its title, reveal class, and visible fraction.
pub fn render<C: SectionContent>(view: &RevealView<usize, C>, host: &ViewportHost<usize>) -> String {
    let mut out = String::new();
    for section in view.sections() {
        let index = section.index();
        let class = view.reveal_class(index).unwrap_or("hidden");
        let ratio = host.visible_ratio(&index).unwrap_or(0.0);
        writeln!(
            out,
            "{:<12} [{:<7}] {:>5.1}% visible",
            section.title(),
            class,
            ratio * 100.0
        )
        .expect("writing to a String cannot fail");
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use understory_reveal::{RevealConfig, RevealView, ViewportHost};

    use super::{mount_stacked, render};

    #[test]
    fn render_marks_revealed_sections() {
        let config = RevealConfig::default();
        let mut view = RevealView::new(config);
        let mut host = ViewportHost::new(Rect::new(0.0, 0.0, 800.0, 600.0), config.threshold());
        mount_stacked(&mut view, &mut host);
        view.did_mount(&mut host);
        let batch = host.take_batch();
        view.on_visibility(&batch);

        let text = render(&view, &host);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Section 1"));
        assert!(lines[0].contains("[visible]"));
        assert!(lines[2].contains("[hidden ]"));
    }
}
