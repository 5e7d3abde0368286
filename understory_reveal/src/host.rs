// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visibility host seam.
//!
//! A host is whatever the embedding runtime provides to detect how much of an
//! element is inside the viewport. The watcher only needs three things from
//! it: whether it is available at all, and a way to start and stop observing
//! a handle. Visibility changes travel the other way as batches of
//! [`VisibilityEntry`] values, which the embedder forwards to
//! [`VisibilityWatcher::handle_batch`](crate::VisibilityWatcher::handle_batch)
//! from its dispatch loop.

/// A visibility-detection capability.
pub trait VisibilityHost<H> {
    /// Returns `false` when the runtime has no visibility detection.
    ///
    /// The watcher fails open in that case and reveals every mounted element
    /// at attach time.
    fn is_supported(&self) -> bool {
        true
    }

    /// Starts reporting visibility changes for `handle`.
    fn observe(&mut self, handle: &H);

    /// Stops reporting visibility changes for `handle`.
    fn unobserve(&mut self, handle: &H);
}

/// One visibility report for an observed element.
///
/// Entries are delivered in batches. Within a batch the order is whatever the
/// host chose; consumers must not rely on it.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityEntry<H> {
    /// The element this report is about.
    pub target: H,
    /// Fraction of the element's area inside the viewport, in `[0, 1]`.
    pub ratio: f64,
    /// Whether any part of the element intersects the viewport.
    pub is_intersecting: bool,
}

impl<H> VisibilityEntry<H> {
    /// Creates an entry, deriving `is_intersecting` from `ratio > 0`.
    #[must_use]
    pub fn new(target: H, ratio: f64) -> Self {
        Self {
            target,
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }
}
