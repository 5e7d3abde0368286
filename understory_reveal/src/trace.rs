// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observability hooks for the visibility watcher.
//!
//! The watcher does not keep a history of what happened to each element; it
//! only stores the current state. Embedders that want to know why a section
//! did or did not reveal can pass a [`RevealTrace`] sink to the `*_traced`
//! watcher methods. [`RecordingTrace`] stores every event in order and is
//! mostly useful in tests and inspectors.
//!
//! With the `tracing` feature enabled, the same events are also emitted as
//! `tracing` events under the `understory_reveal` target.

use alloc::vec::Vec;

/// A callback sink for watcher lifecycle events.
///
/// Every method has an empty default body.
pub trait RevealTrace {
    /// `index` started being observed.
    fn observed(&mut self, index: usize) {
        let _ = index;
    }

    /// `index` had no mounted handle at attach time and was skipped.
    fn skipped(&mut self, index: usize) {
        let _ = index;
    }

    /// `index` transitioned to revealed. `ratio` is the reported visible fraction.
    fn revealed(&mut self, index: usize, ratio: f64) {
        let _ = (index, ratio);
    }

    /// `index` stopped being observed.
    fn unobserved(&mut self, index: usize) {
        let _ = index;
    }

    /// `index` was revealed without observation because the host is unsupported.
    fn fallback(&mut self, index: usize) {
        let _ = index;
    }

    /// A batch of `entries` arrived with no live subscription and was dropped.
    fn dropped_late(&mut self, entries: usize) {
        let _ = entries;
    }
}

/// A sink that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTrace;

impl RevealTrace for NoTrace {}

/// One recorded watcher event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraceEvent {
    /// See [`RevealTrace::observed`].
    Observed(usize),
    /// See [`RevealTrace::skipped`].
    Skipped(usize),
    /// See [`RevealTrace::revealed`].
    Revealed {
        /// Section index.
        index: usize,
        /// Reported visible fraction.
        ratio: f64,
    },
    /// See [`RevealTrace::unobserved`].
    Unobserved(usize),
    /// See [`RevealTrace::fallback`].
    Fallback(usize),
    /// See [`RevealTrace::dropped_late`].
    DroppedLate(usize),
}

/// Records every event in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RecordingTrace {
    events: Vec<TraceEvent>,
}

impl RecordingTrace {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Clears all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl RevealTrace for RecordingTrace {
    fn observed(&mut self, index: usize) {
        self.events.push(TraceEvent::Observed(index));
    }

    fn skipped(&mut self, index: usize) {
        self.events.push(TraceEvent::Skipped(index));
    }

    fn revealed(&mut self, index: usize, ratio: f64) {
        self.events.push(TraceEvent::Revealed { index, ratio });
    }

    fn unobserved(&mut self, index: usize) {
        self.events.push(TraceEvent::Unobserved(index));
    }

    fn fallback(&mut self, index: usize) {
        self.events.push(TraceEvent::Fallback(index));
    }

    fn dropped_late(&mut self, entries: usize) {
        self.events.push(TraceEvent::DroppedLate(entries));
    }
}

/// Forwards to the caller's sink and, when enabled, to `tracing`.
pub(crate) struct Emit<'t> {
    sink: &'t mut dyn RevealTrace,
}

impl<'t> Emit<'t> {
    pub(crate) fn new(sink: &'t mut dyn RevealTrace) -> Self {
        Self { sink }
    }

    pub(crate) fn observed(&mut self, index: usize) {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "understory_reveal", index, "observe");
        self.sink.observed(index);
    }

    pub(crate) fn skipped(&mut self, index: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "understory_reveal", index, "no handle mounted; skipping");
        self.sink.skipped(index);
    }

    pub(crate) fn revealed(&mut self, index: usize, ratio: f64) {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "understory_reveal", index, ratio, "revealed");
        self.sink.revealed(index, ratio);
    }

    pub(crate) fn unobserved(&mut self, index: usize) {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "understory_reveal", index, "unobserve");
        self.sink.unobserved(index);
    }

    pub(crate) fn fallback(&mut self, index: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "understory_reveal",
            index,
            "visibility host unsupported; revealing immediately"
        );
        self.sink.fallback(index);
    }

    pub(crate) fn dropped_late(&mut self, entries: usize) {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "understory_reveal", entries, "dropped batch after detach");
        self.sink.dropped_late(entries);
    }
}
