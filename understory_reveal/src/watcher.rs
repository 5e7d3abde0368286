// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visibility watcher: subscribe on mount, reveal on threshold, release on unmount.

use alloc::vec;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::config::{RevealConfig, RevealMode};
use crate::host::{VisibilityEntry, VisibilityHost};
use crate::slots::HandleSlots;
use crate::trace::{Emit, NoTrace, RevealTrace};

/// Token for the observations created by one [`VisibilityWatcher::attach`].
///
/// Tokens from earlier attachments never match a later one, so detaching with
/// a stale token is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    generation: u64,
}

/// Lifecycle state of one element.
///
/// `Unobserved -> Observed -> Revealed`, with `Observed -> Unobserved` only
/// through detach. `Revealed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementState {
    /// Not observed and not revealed.
    Unobserved,
    /// Observed, waiting to cross the threshold.
    Observed,
    /// Revealed. Never reverts.
    Revealed,
}

/// What an attach call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Handles are now observed by the host.
    Observing {
        /// Number of handles passed to [`VisibilityHost::observe`].
        observed: usize,
        /// Number of slots without a mounted handle.
        skipped: usize,
    },
    /// A subscription was already live; nothing changed.
    AlreadyAttached,
    /// The host is unsupported, so every mounted element was revealed
    /// immediately instead of being observed.
    Fallback {
        /// Number of elements revealed by the fallback.
        revealed: usize,
    },
}

/// Result of [`VisibilityWatcher::attach`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attach {
    /// The live subscription, to be passed back to [`VisibilityWatcher::detach`].
    pub subscription: Subscription,
    /// What the call did.
    pub outcome: AttachOutcome,
}

/// Bridges element handles to a [`VisibilityHost`] and owns the reveal state.
///
/// Reveal state lives here, indexed by section, rather than on the elements
/// themselves; renderers read it back through [`VisibilityWatcher::is_revealed`].
///
/// ```rust
/// use understory_reveal::{HandleSlots, RevealConfig, VisibilityEntry, VisibilityHost, VisibilityWatcher};
///
/// #[derive(Default)]
/// struct Host(Vec<u32>);
///
/// impl VisibilityHost<u32> for Host {
///     fn observe(&mut self, h: &u32) { self.0.push(*h); }
///     fn unobserve(&mut self, h: &u32) { self.0.retain(|x| x != h); }
/// }
///
/// let mut slots = HandleSlots::with_len(2);
/// slots.set(0, Some(100_u32));
/// slots.set(1, Some(101));
///
/// let mut host = Host::default();
/// let mut watcher = VisibilityWatcher::new(RevealConfig::new(2, 0.3).unwrap());
/// let attach = watcher.attach(&mut host, &slots);
///
/// let revealed = watcher.handle_batch(&[VisibilityEntry::new(101, 0.5)]);
/// assert_eq!(revealed, [1]);
/// assert!(watcher.is_revealed(1));
///
/// watcher.detach(&mut host, attach.subscription);
/// assert!(host.0.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct VisibilityWatcher<H> {
    threshold: f64,
    mode: RevealMode,
    revealed: Vec<bool>,
    observed: Vec<Option<H>>,
    index_of: HashMap<H, usize>,
    // Revealed in `Once` mode while no host was at hand; unobserved on the
    // next call that has one.
    pending_release: Vec<usize>,
    live: Option<Subscription>,
    next_generation: u64,
}

impl<H> VisibilityWatcher<H>
where
    H: Clone + Eq + Hash,
{
    /// Creates a watcher for `config.count()` elements, none revealed.
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        let len = config.count();
        let mut observed = Vec::with_capacity(len);
        observed.resize_with(len, || None);
        Self {
            threshold: config.threshold(),
            mode: config.mode(),
            revealed: vec![false; len],
            observed,
            index_of: HashMap::new(),
            pending_release: Vec::new(),
            live: None,
            next_generation: 0,
        }
    }

    /// Visible fraction at or above which an element is revealed.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The live subscription, if attached.
    #[must_use]
    pub fn subscription(&self) -> Option<Subscription> {
        self.live
    }

    /// Returns `true` if `index` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    /// Reveal flags for every element, in index order.
    #[must_use]
    pub fn reveal_states(&self) -> &[bool] {
        &self.revealed
    }

    /// Number of revealed elements.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|r| **r).count()
    }

    /// Indices revealed in [`RevealMode::Once`] that are still waiting to be
    /// unobserved because their batch was handled without a host.
    #[must_use]
    pub fn pending_release(&self) -> &[usize] {
        &self.pending_release
    }

    /// Lifecycle state of `index`.
    #[must_use]
    pub fn state(&self, index: usize) -> ElementState {
        if self.is_revealed(index) {
            ElementState::Revealed
        } else if self.observed.get(index).is_some_and(Option::is_some) {
            ElementState::Observed
        } else {
            ElementState::Unobserved
        }
    }

    /// Starts observing every mounted handle in `slots`.
    ///
    /// Empty slots are skipped, as are sections past the end of a `slots`
    /// shorter than the section count. If a subscription is already live
    /// nothing new is observed and [`AttachOutcome::AlreadyAttached`] is
    /// returned; pending [`RevealMode::Once`] releases are still flushed. If the host is
    /// unsupported, every mounted element is revealed at once and the outcome
    /// is [`AttachOutcome::Fallback`].
    pub fn attach<V>(&mut self, host: &mut V, slots: &HandleSlots<H>) -> Attach
    where
        V: VisibilityHost<H> + ?Sized,
    {
        self.attach_traced(host, slots, &mut NoTrace)
    }

    /// [`attach`](Self::attach), reporting each step to `trace`.
    pub fn attach_traced<V>(
        &mut self,
        host: &mut V,
        slots: &HandleSlots<H>,
        trace: &mut dyn RevealTrace,
    ) -> Attach
    where
        V: VisibilityHost<H> + ?Sized,
    {
        if let Some(subscription) = self.live {
            let mut emit = Emit::new(trace);
            self.flush_pending(host, &mut emit);
            return Attach {
                subscription,
                outcome: AttachOutcome::AlreadyAttached,
            };
        }

        self.ensure_len(slots.len());
        let subscription = Subscription {
            generation: self.next_generation,
        };
        self.next_generation += 1;
        self.live = Some(subscription);

        let mut emit = Emit::new(trace);

        if !host.is_supported() {
            let mut revealed = 0;
            for (index, _) in slots.mounted() {
                if !self.revealed[index] {
                    self.revealed[index] = true;
                    revealed += 1;
                    emit.fallback(index);
                }
            }
            return Attach {
                subscription,
                outcome: AttachOutcome::Fallback { revealed },
            };
        }

        let mut observed = 0;
        let mut skipped = 0;
        for (index, handle) in slots.iter() {
            let Some(handle) = handle else {
                skipped += 1;
                emit.skipped(index);
                continue;
            };
            if self.mode == RevealMode::Once && self.revealed[index] {
                continue;
            }
            // The same handle in two slots is observed once, for the first slot.
            if self.index_of.contains_key(handle) {
                skipped += 1;
                emit.skipped(index);
                continue;
            }
            host.observe(handle);
            self.index_of.insert(handle.clone(), index);
            self.observed[index] = Some(handle.clone());
            observed += 1;
            emit.observed(index);
        }
        // Sections with no slot at all are treated like empty slots.
        for index in slots.len()..self.revealed.len() {
            skipped += 1;
            emit.skipped(index);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "understory_reveal",
            generation = subscription.generation,
            observed,
            skipped,
            "attached"
        );
        Attach {
            subscription,
            outcome: AttachOutcome::Observing { observed, skipped },
        }
    }

    /// Applies one batch of visibility entries.
    ///
    /// An entry reveals its element when it intersects the viewport with a
    /// ratio at or above the threshold. Entries for unknown or already
    /// revealed elements are ignored, and the whole batch is dropped when no
    /// subscription is live. Returns newly revealed indices in batch order.
    pub fn handle_batch(&mut self, entries: &[VisibilityEntry<H>]) -> Vec<usize> {
        self.apply_batch(None, entries, &mut NoTrace)
    }

    /// [`handle_batch`](Self::handle_batch) with access to the host.
    ///
    /// In [`RevealMode::Once`] newly revealed elements are unobserved, along
    /// with any left pending by earlier host-less batches.
    pub fn handle_batch_with(
        &mut self,
        host: &mut dyn VisibilityHost<H>,
        entries: &[VisibilityEntry<H>],
    ) -> Vec<usize> {
        self.apply_batch(Some(host), entries, &mut NoTrace)
    }

    /// [`handle_batch_with`](Self::handle_batch_with), reporting each step to `trace`.
    pub fn handle_batch_traced(
        &mut self,
        host: Option<&mut dyn VisibilityHost<H>>,
        entries: &[VisibilityEntry<H>],
        trace: &mut dyn RevealTrace,
    ) -> Vec<usize> {
        self.apply_batch(host, entries, trace)
    }

    fn apply_batch(
        &mut self,
        mut host: Option<&mut dyn VisibilityHost<H>>,
        entries: &[VisibilityEntry<H>],
        trace: &mut dyn RevealTrace,
    ) -> Vec<usize> {
        let mut emit = Emit::new(trace);
        if let Some(host) = host.as_deref_mut() {
            self.flush_pending(host, &mut emit);
        }
        if self.live.is_none() {
            if !entries.is_empty() {
                emit.dropped_late(entries.len());
            }
            return Vec::new();
        }

        let mut newly = Vec::new();
        for entry in entries {
            let Some(&index) = self.index_of.get(&entry.target) else {
                continue;
            };
            if self.revealed[index] {
                continue;
            }
            if !entry.is_intersecting || entry.ratio < self.threshold {
                continue;
            }
            self.revealed[index] = true;
            newly.push(index);
            emit.revealed(index, entry.ratio);

            if self.mode == RevealMode::Once {
                match host.as_deref_mut() {
                    Some(host) => self.release(host, index, &mut emit),
                    None => self.pending_release.push(index),
                }
            }
        }
        newly
    }

    /// Stops observing everything registered under `subscription`.
    ///
    /// Reveal marks are kept. Returns `false` without doing anything when
    /// `subscription` is not the live one, including on a second detach.
    pub fn detach<V>(&mut self, host: &mut V, subscription: Subscription) -> bool
    where
        V: VisibilityHost<H> + ?Sized,
    {
        self.detach_traced(host, subscription, &mut NoTrace)
    }

    /// [`detach`](Self::detach), reporting each step to `trace`.
    pub fn detach_traced<V>(
        &mut self,
        host: &mut V,
        subscription: Subscription,
        trace: &mut dyn RevealTrace,
    ) -> bool
    where
        V: VisibilityHost<H> + ?Sized,
    {
        if self.live != Some(subscription) {
            return false;
        }
        let mut emit = Emit::new(trace);
        for (index, slot) in self.observed.iter_mut().enumerate() {
            if let Some(handle) = slot.take() {
                host.unobserve(&handle);
                emit.unobserved(index);
            }
        }
        self.index_of.clear();
        self.pending_release.clear();
        self.live = None;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "understory_reveal",
            generation = subscription.generation,
            revealed = self.revealed_count(),
            "detached"
        );
        true
    }

    fn release<V>(&mut self, host: &mut V, index: usize, emit: &mut Emit<'_>)
    where
        V: VisibilityHost<H> + ?Sized,
    {
        if let Some(handle) = self.observed[index].take() {
            host.unobserve(&handle);
            self.index_of.remove(&handle);
            emit.unobserved(index);
        }
    }

    /// Unobserves every element left in [`pending_release`](Self::pending_release).
    pub fn release_pending<V>(&mut self, host: &mut V)
    where
        V: VisibilityHost<H> + ?Sized,
    {
        self.flush_pending(host, &mut Emit::new(&mut NoTrace));
    }

    fn flush_pending<V>(&mut self, host: &mut V, emit: &mut Emit<'_>)
    where
        V: VisibilityHost<H> + ?Sized,
    {
        let pending = core::mem::take(&mut self.pending_release);
        for index in pending {
            self.release(host, index, emit);
        }
    }

    fn ensure_len(&mut self, len: usize) {
        if len > self.revealed.len() {
            self.revealed.resize(len, false);
            self.observed.resize_with(len, || None);
        }
    }
}
