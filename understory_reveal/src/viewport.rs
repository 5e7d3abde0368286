// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A geometric [`VisibilityHost`] over axis-aligned rectangles.
//!
//! [`ViewportHost`] is for embedders that already know where their elements
//! are laid out (for example from a box tree or a Taffy layout pass) and only
//! need the intersection bookkeeping. It compares each observed element's
//! bounds against a viewport rectangle and reports an entry whenever the
//! element moves to the other side of the threshold.
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_reveal::ViewportHost;
//! use understory_reveal::VisibilityHost;
//!
//! let mut host = ViewportHost::new(Rect::new(0.0, 0.0, 800.0, 600.0), 0.3);
//! host.set_bounds("a", Rect::new(0.0, 500.0, 800.0, 900.0));
//! host.observe(&"a");
//!
//! // First pass always reports: 100 of 400 px visible.
//! let batch = host.take_batch();
//! assert_eq!(batch.len(), 1);
//! assert!((batch[0].ratio - 0.25).abs() < 1e-9);
//!
//! // Scrolling 200 px brings 300 of 400 px into view.
//! host.scroll_by(200.0);
//! let batch = host.take_batch();
//! assert!((batch[0].ratio - 0.75).abs() < 1e-9);
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Rect, Vec2};

use crate::host::{VisibilityEntry, VisibilityHost};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    /// Observed but not reported yet.
    Pending,
    Below,
    AtOrAbove,
}

/// Visibility host that intersects element bounds with a viewport rectangle.
#[derive(Clone, Debug)]
pub struct ViewportHost<H> {
    viewport: Rect,
    threshold: f64,
    supported: bool,
    bounds: HashMap<H, Rect>,
    sides: HashMap<H, Side>,
    // Observation order, so batches come out in a stable order.
    order: Vec<H>,
}

impl<H> ViewportHost<H>
where
    H: Clone + Eq + Hash,
{
    /// Creates a host over `viewport` that reports crossings of `threshold`.
    #[must_use]
    pub fn new(viewport: Rect, threshold: f64) -> Self {
        Self {
            viewport: viewport.abs(),
            threshold,
            supported: true,
            bounds: HashMap::new(),
            sides: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Marks the host as unavailable, as in a runtime without visibility detection.
    pub fn set_supported(&mut self, supported: bool) {
        self.supported = supported;
    }

    /// Current viewport rectangle.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Replaces the viewport rectangle.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport.abs();
    }

    /// Moves the viewport vertically by `dy`.
    pub fn scroll_by(&mut self, dy: f64) {
        self.viewport = self.viewport + Vec2::new(0.0, dy);
    }

    /// Moves the viewport so that its top edge is at `y`.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_by(y - self.viewport.y0);
    }

    /// Records the laid-out bounds of `handle`.
    ///
    /// Bounds can be set before or after the handle is observed. Observed
    /// handles without bounds report a ratio of zero.
    pub fn set_bounds(&mut self, handle: H, bounds: Rect) {
        self.bounds.insert(handle, bounds.abs());
    }

    /// Forgets the bounds of `handle`.
    pub fn remove_bounds(&mut self, handle: &H) {
        self.bounds.remove(handle);
    }

    /// Returns `true` if `handle` is currently observed.
    #[must_use]
    pub fn is_observing(&self, handle: &H) -> bool {
        self.sides.contains_key(handle)
    }

    /// Number of observed handles.
    #[must_use]
    pub fn observed_len(&self) -> usize {
        self.order.len()
    }

    /// Visible fraction of `handle` in the current viewport, if it has bounds.
    #[must_use]
    pub fn visible_ratio(&self, handle: &H) -> Option<f64> {
        self.bounds
            .get(handle)
            .map(|bounds| intersection_ratio(*bounds, self.viewport).0)
    }

    /// Computes the next batch of entries.
    ///
    /// Newly observed handles report once unconditionally. After that, a
    /// handle reports only when it crosses the threshold in either direction.
    /// Returns an empty vector when nothing changed.
    pub fn take_batch(&mut self) -> Vec<VisibilityEntry<H>> {
        let mut batch = Vec::new();
        for handle in &self.order {
            let (ratio, is_intersecting) = match self.bounds.get(handle) {
                Some(bounds) => intersection_ratio(*bounds, self.viewport),
                None => (0.0, false),
            };
            let side = if is_intersecting && ratio >= self.threshold {
                Side::AtOrAbove
            } else {
                Side::Below
            };
            let Some(previous) = self.sides.get_mut(handle) else {
                continue;
            };
            if *previous != side {
                *previous = side;
                batch.push(VisibilityEntry {
                    target: handle.clone(),
                    ratio,
                    is_intersecting,
                });
            }
        }
        batch
    }
}

impl<H> VisibilityHost<H> for ViewportHost<H>
where
    H: Clone + Eq + Hash,
{
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn observe(&mut self, handle: &H) {
        if self.sides.contains_key(handle) {
            return;
        }
        self.sides.insert(handle.clone(), Side::Pending);
        self.order.push(handle.clone());
    }

    fn unobserve(&mut self, handle: &H) {
        if self.sides.remove(handle).is_some() {
            self.order.retain(|h| h != handle);
        }
    }
}

/// Returns the visible fraction of `target` inside `viewport` and whether
/// they intersect at all.
///
/// Zero-area targets are fully visible when they lie inside the viewport,
/// edges included.
fn intersection_ratio(target: Rect, viewport: Rect) -> (f64, bool) {
    let area = target.area();
    if area <= 0.0 {
        let inside = target.x0 >= viewport.x0
            && target.x1 <= viewport.x1
            && target.y0 >= viewport.y0
            && target.y1 <= viewport.y1;
        return if inside { (1.0, true) } else { (0.0, false) };
    }
    let visible = target.intersect(viewport).area();
    if visible <= 0.0 {
        return (0.0, false);
    }
    ((visible / area).min(1.0), true)
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::{ViewportHost, intersection_ratio};
    use crate::host::VisibilityHost;

    fn page() -> ViewportHost<u32> {
        // Five 400px-tall sections stacked under a 600px viewport.
        let mut host = ViewportHost::new(Rect::new(0.0, 0.0, 800.0, 600.0), 0.3);
        for i in 0..5_u32 {
            let top = f64::from(i) * 400.0;
            host.set_bounds(i, Rect::new(0.0, top, 800.0, top + 400.0));
            host.observe(&i);
        }
        host
    }

    #[test]
    fn ratio_handles_partial_and_degenerate_targets() {
        let vp = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (r, hit) = intersection_ratio(Rect::new(0.0, 50.0, 100.0, 150.0), vp);
        assert!((r - 0.5).abs() < 1e-9);
        assert!(hit);

        assert_eq!(
            intersection_ratio(Rect::new(0.0, 200.0, 100.0, 300.0), vp),
            (0.0, false)
        );
        assert_eq!(
            intersection_ratio(Rect::new(10.0, 100.0, 10.0, 100.0), vp),
            (1.0, true)
        );
    }

    #[test]
    fn first_pass_reports_every_observed_handle() {
        let mut host = page();
        let batch = host.take_batch();
        assert_eq!(batch.len(), 5);
        // Section 0 fully visible, section 1 half visible, the rest hidden.
        assert!((batch[0].ratio - 1.0).abs() < 1e-9);
        assert!((batch[1].ratio - 0.5).abs() < 1e-9);
        assert!(!batch[2].is_intersecting);
        assert!(host.take_batch().is_empty());
    }

    #[test]
    fn scrolling_reports_only_crossings() {
        let mut host = page();
        host.take_batch();

        // Viewport 500..1100: section 2 (800..1200) is 300/400 visible,
        // section 0 (0..400) is hidden, section 1 stays above threshold.
        host.scroll_by(500.0);
        let batch = host.take_batch();
        let targets: alloc::vec::Vec<u32> = batch.iter().map(|e| e.target).collect();
        assert_eq!(targets, [0, 2]);

        host.scroll_to(500.0);
        assert!(host.take_batch().is_empty());
    }

    #[test]
    fn unobserved_handles_stop_reporting() {
        let mut host = page();
        host.unobserve(&0);
        host.unobserve(&0);
        assert_eq!(host.observed_len(), 4);
        assert!(!host.is_observing(&0));
        assert!(host.take_batch().iter().all(|e| e.target != 0));
    }

    #[test]
    fn handles_without_bounds_report_hidden() {
        let mut host = ViewportHost::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0.3);
        host.observe(&9_u32);
        let batch = host.take_batch();
        assert_eq!(batch.len(), 1);
        assert!(!batch[0].is_intersecting);
        assert_eq!(host.visible_ratio(&9), None);
    }
}
