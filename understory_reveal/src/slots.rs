// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle slots filled by the rendering host's ref callback.

use alloc::vec::Vec;

/// Ordered collection of mounted element handles, one slot per section.
///
/// The rendering host fills slots through [`HandleSlots::set`] as elements
/// mount (`Some`) and unmount (`None`). The slot count is fixed at creation
/// and always equals the number of sections.
#[derive(Clone, Debug)]
pub struct HandleSlots<H> {
    slots: Vec<Option<H>>,
}

impl<H> HandleSlots<H> {
    /// Creates `len` empty slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self { slots }
    }

    /// Number of slots, mounted or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Ref callback: stores (or clears) the handle for `index`.
    ///
    /// Returns `false` and ignores the call when `index` is out of range.
    pub fn set(&mut self, index: usize, handle: Option<H>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = handle;
                true
            }
            None => false,
        }
    }

    /// Handle mounted at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&H> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Iterates all slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&H>)> + '_ {
        self.slots.iter().enumerate().map(|(i, h)| (i, h.as_ref()))
    }

    /// Iterates mounted handles in index order, skipping empty slots.
    pub fn mounted(&self) -> impl Iterator<Item = (usize, &H)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.as_ref().map(|h| (i, h)))
    }
}

impl<H: PartialEq> HandleSlots<H> {
    /// Index of the slot holding `handle`, if mounted.
    #[must_use]
    pub fn index_of(&self, handle: &H) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(handle))
    }
}
