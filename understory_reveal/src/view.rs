// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owning view: sections, handle slots, and a watcher on one lifecycle.

use alloc::vec::Vec;
use core::hash::Hash;

use crate::config::RevealConfig;
use crate::host::{VisibilityEntry, VisibilityHost};
use crate::section::{PlaceholderContent, SectionContent, SectionDescriptor, generate_with};
use crate::slots::HandleSlots;
use crate::trace::{NoTrace, RevealTrace};
use crate::watcher::{AttachOutcome, Subscription, VisibilityWatcher};

/// Marker a styling layer applies to revealed sections.
pub const REVEAL_CLASS: &str = "visible";

/// A page of sections that reveal as they scroll into view.
///
/// `RevealView` ties the registry, the handle slots, and the watcher to a
/// rendering host's lifecycle:
///
/// 1. Render [`sections`](Self::sections) and pass each element's handle to
///    [`mount_ref`](Self::mount_ref).
/// 2. Call [`did_mount`](Self::did_mount) once mounting is done.
/// 3. Forward host batches to [`on_visibility`](Self::on_visibility).
/// 4. Call [`will_unmount`](Self::will_unmount) before tearing down.
///
/// Renderers read [`reveal_class`](Self::reveal_class) or
/// [`is_revealed`](Self::is_revealed) on every frame instead of being told
/// to mutate elements.
#[derive(Clone, Debug)]
pub struct RevealView<H, C = PlaceholderContent> {
    content: C,
    sections: Vec<SectionDescriptor>,
    slots: HandleSlots<H>,
    watcher: VisibilityWatcher<H>,
    subscription: Option<Subscription>,
}

impl<H> RevealView<H>
where
    H: Clone + Eq + Hash,
{
    /// Creates a view of placeholder sections.
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self::with_content(config, PlaceholderContent)
    }
}

impl<H, C> RevealView<H, C>
where
    H: Clone + Eq + Hash,
    C: SectionContent,
{
    /// Creates a view whose section text comes from `content`.
    #[must_use]
    pub fn with_content(config: RevealConfig, content: C) -> Self {
        let sections = generate_with(config.count(), &content);
        Self {
            content,
            slots: HandleSlots::with_len(sections.len()),
            watcher: VisibilityWatcher::new(config),
            sections,
            subscription: None,
        }
    }

    /// The content supplier.
    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Sections in render order.
    #[must_use]
    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    /// Mounted element handles.
    #[must_use]
    pub fn slots(&self) -> &HandleSlots<H> {
        &self.slots
    }

    /// The underlying watcher.
    #[must_use]
    pub fn watcher(&self) -> &VisibilityWatcher<H> {
        &self.watcher
    }

    /// Ref callback for section `index`: `Some` on mount, `None` on unmount.
    pub fn mount_ref(&mut self, index: usize, handle: Option<H>) {
        self.slots.set(index, handle);
    }

    /// Subscribes every mounted section to `host`.
    ///
    /// Calling this again while mounted is a no-op.
    pub fn did_mount<V>(&mut self, host: &mut V) -> AttachOutcome
    where
        V: VisibilityHost<H> + ?Sized,
    {
        self.did_mount_traced(host, &mut NoTrace)
    }

    /// [`did_mount`](Self::did_mount), reporting watcher events to `trace`.
    pub fn did_mount_traced<V>(
        &mut self,
        host: &mut V,
        trace: &mut dyn RevealTrace,
    ) -> AttachOutcome
    where
        V: VisibilityHost<H> + ?Sized,
    {
        let attach = self.watcher.attach_traced(host, &self.slots, trace);
        self.subscription = Some(attach.subscription);
        attach.outcome
    }

    /// Applies a batch from the host. Returns newly revealed section indices.
    ///
    /// In [`RevealMode::Once`](crate::RevealMode::Once) the sections revealed
    /// here are unobserved on the next call that has the host:
    /// [`on_visibility_with`](Self::on_visibility_with),
    /// [`did_mount`](Self::did_mount), or [`will_unmount`](Self::will_unmount).
    pub fn on_visibility(&mut self, entries: &[VisibilityEntry<H>]) -> Vec<usize> {
        self.watcher.handle_batch(entries)
    }

    /// Like [`on_visibility`](Self::on_visibility), with host access for
    /// [`RevealMode::Once`](crate::RevealMode::Once).
    pub fn on_visibility_with(
        &mut self,
        host: &mut dyn VisibilityHost<H>,
        entries: &[VisibilityEntry<H>],
    ) -> Vec<usize> {
        self.watcher.handle_batch_with(host, entries)
    }

    /// Releases every observation. Calling this twice is a no-op.
    pub fn will_unmount<V>(&mut self, host: &mut V)
    where
        V: VisibilityHost<H> + ?Sized,
    {
        if let Some(subscription) = self.subscription.take() {
            self.watcher.detach(host, subscription);
        }
    }

    /// Returns `true` if section `index` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.watcher.is_revealed(index)
    }

    /// [`REVEAL_CLASS`] for revealed sections, `None` otherwise.
    #[must_use]
    pub fn reveal_class(&self, index: usize) -> Option<&'static str> {
        self.is_revealed(index).then_some(REVEAL_CLASS)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::{REVEAL_CLASS, RevealView};
    use crate::config::{RevealConfig, RevealMode};
    use crate::host::{VisibilityEntry, VisibilityHost};
    use crate::viewport::ViewportHost;
    use crate::watcher::AttachOutcome;

    fn mounted(config: RevealConfig) -> (RevealView<u32>, ViewportHost<u32>) {
        let mut view = RevealView::new(config);
        let mut host = ViewportHost::new(Rect::new(0.0, 0.0, 800.0, 600.0), config.threshold());
        for section in view.sections().to_vec() {
            let i = section.index();
            let handle = u32::try_from(i).unwrap();
            let top = f64::from(handle) * 400.0;
            host.set_bounds(handle, Rect::new(0.0, top, 800.0, top + 400.0));
            view.mount_ref(i, Some(handle));
        }
        (view, host)
    }

    #[test]
    fn scrolling_down_reveals_in_turn() {
        let (mut view, mut host) = mounted(RevealConfig::default());
        assert_eq!(
            view.did_mount(&mut host),
            AttachOutcome::Observing {
                observed: 5,
                skipped: 0
            }
        );

        let batch = host.take_batch();
        assert_eq!(view.on_visibility(&batch), [0, 1]);
        assert_eq!(view.reveal_class(1), Some(REVEAL_CLASS));
        assert_eq!(view.reveal_class(2), None);

        host.scroll_to(1_400.0);
        let batch = host.take_batch();
        assert_eq!(view.on_visibility(&batch), [3, 4]);
        // Section 2 was skipped past without ever crossing the threshold.
        assert!(!view.is_revealed(2));

        view.will_unmount(&mut host);
        assert_eq!(host.observed_len(), 0);
        view.will_unmount(&mut host);
    }

    #[test]
    fn once_mode_releases_revealed_sections() {
        let config = RevealConfig::default().with_mode(RevealMode::Once);
        let (mut view, mut host) = mounted(config);
        view.did_mount(&mut host);

        let batch = host.take_batch();
        assert_eq!(view.on_visibility_with(&mut host, &batch), [0, 1]);
        assert!(!host.is_observing(&0));
        assert_eq!(host.observed_len(), 3);
    }

    #[test]
    fn once_mode_releases_on_next_host_call() {
        let config = RevealConfig::default().with_mode(RevealMode::Once);
        let (mut view, mut host) = mounted(config);
        view.did_mount(&mut host);

        assert_eq!(view.on_visibility(&[VisibilityEntry::new(1, 0.9)]), [1]);
        assert_eq!(view.watcher().pending_release(), &[1]);

        // A later batch with the host releases it, even when empty.
        assert!(view.on_visibility_with(&mut host, &[]).is_empty());
        assert!(!host.is_observing(&1));
        assert!(view.watcher().pending_release().is_empty());
        assert_eq!(host.observed_len(), 4);

        // Mounting again while attached also flushes.
        view.on_visibility(&[VisibilityEntry::new(2, 0.5)]);
        assert_eq!(view.did_mount(&mut host), AttachOutcome::AlreadyAttached);
        assert!(!host.is_observing(&2));
        assert_eq!(host.observed_len(), 3);
    }

    #[test]
    fn unsupported_host_reveals_everything_mounted() {
        let (mut view, mut host) = mounted(RevealConfig::default());
        host.set_supported(false);
        assert!(!host.is_supported());
        assert_eq!(
            view.did_mount(&mut host),
            AttachOutcome::Fallback { revealed: 5 }
        );
        assert!((0..5).all(|i| view.is_revealed(i)));
    }
}
