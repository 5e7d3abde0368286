// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reveal --heading-base-level=0

//! Understory Reveal: headless reveal-on-scroll primitives.
//!
//! This crate models a page of sections that each get a one-way "revealed"
//! mark the first time enough of them scrolls into view. It is renderer
//! agnostic: it does not draw, animate, or lay anything out.
//!
//! The core concepts are:
//!
//! - [`SectionDescriptor`] and [`generate`]: the ordered list of sections to
//!   render, with text from a [`SectionContent`] supplier.
//! - [`HandleSlots`]: one slot per section for the handle of its mounted
//!   element, filled by the rendering host's ref callback.
//! - [`VisibilityHost`]: the runtime's visibility-detection capability, with
//!   `observe`/`unobserve` and batches of [`VisibilityEntry`] values.
//! - [`VisibilityWatcher`]: subscribes mounted handles to a host, turns
//!   threshold crossings into reveal marks, and releases everything on detach.
//! - [`ViewportHost`]: a ready-made host that intersects `kurbo::Rect` bounds
//!   with a viewport rectangle.
//! - [`RevealView`]: wires all of the above to a mount / unmount lifecycle.
//!
//! Host frameworks are responsible for:
//!
//! - Rendering sections and reporting element handles via [`RevealView::mount_ref`].
//! - Forwarding visibility batches from their dispatch loop.
//! - Styling revealed sections (for example via [`RevealView::reveal_class`]).
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_reveal::{RevealConfig, RevealView, ViewportHost};
//!
//! let config = RevealConfig::default();
//! let mut view = RevealView::<usize>::new(config);
//! let mut host = ViewportHost::new(Rect::new(0.0, 0.0, 800.0, 600.0), config.threshold());
//!
//! // "Render": stack 400px sections and report their handles.
//! for i in 0..view.sections().len() {
//!     let top = 400.0 * i as f64;
//!     host.set_bounds(i, Rect::new(0.0, top, 800.0, top + 400.0));
//!     view.mount_ref(i, Some(i));
//! }
//! view.did_mount(&mut host);
//!
//! let batch = host.take_batch();
//! assert_eq!(view.on_visibility(&batch), [0, 1]);
//!
//! host.scroll_by(1_000.0);
//! let batch = host.take_batch();
//! view.on_visibility(&batch);
//! assert!(view.is_revealed(3));
//!
//! view.will_unmount(&mut host);
//! ```
//!
//! ## Failure policy
//!
//! Nothing here returns a runtime error. Sections without a mounted handle are
//! skipped and never reveal. If the host reports itself unsupported, every
//! mounted section is revealed immediately so content is never stuck hidden,
//! and [`AttachOutcome::Fallback`] tells the caller that this happened. Only
//! building a [`RevealConfig`] with a bad threshold fails, with [`ConfigError`].
//!
//! Repeated attach and detach calls are no-ops.
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` builds.
//! - `tracing` (enabled by default): emit watcher events through the `tracing` crate.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod host;
mod section;
mod slots;
pub mod trace;
mod view;
mod viewport;
mod watcher;

pub use config::{ConfigError, DEFAULT_THRESHOLD, RevealConfig, RevealMode};
pub use host::{VisibilityEntry, VisibilityHost};
pub use section::{
    DEFAULT_SECTION_COUNT, PLACEHOLDER_BODY, PlaceholderContent, SectionContent,
    SectionDescriptor, generate, generate_with,
};
pub use slots::HandleSlots;
pub use view::{REVEAL_CLASS, RevealView};
pub use viewport::ViewportHost;
pub use watcher::{Attach, AttachOutcome, ElementState, Subscription, VisibilityWatcher};
