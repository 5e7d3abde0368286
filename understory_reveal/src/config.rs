// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Options recognized by a reveal view.

use core::fmt;

use crate::section::DEFAULT_SECTION_COUNT;

/// Visible-area fraction used by [`RevealConfig::default`].
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// What the watcher does with an element once it has been revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RevealMode {
    /// Keep observing revealed elements until the subscription is detached.
    ///
    /// Later entries for a revealed element are no-ops.
    #[default]
    KeepObserving,
    /// Stop observing an element once it is revealed.
    ///
    /// Batches handled with the host unobserve right away. Batches handled
    /// without it leave the element in
    /// [`VisibilityWatcher::pending_release`](crate::VisibilityWatcher::pending_release)
    /// until the next call that has the host.
    Once,
}

/// Error returned when a [`RevealConfig`] is built from invalid options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// The threshold was NaN, infinite, or outside `[0, 1]`.
    ThresholdOutOfRange(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdOutOfRange(value) => {
                write!(f, "reveal threshold {value} is not within [0, 1]")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Options recognized by a [`RevealView`](crate::RevealView).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealConfig {
    count: usize,
    threshold: f64,
    mode: RevealMode,
}

impl RevealConfig {
    /// Creates a configuration for `count` sections revealed at `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ThresholdOutOfRange`] unless `threshold` is a
    /// finite value in `[0, 1]`.
    pub fn new(count: usize, threshold: f64) -> Result<Self, ConfigError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }
        Ok(Self {
            count,
            threshold,
            mode: RevealMode::default(),
        })
    }

    /// Returns a copy using `mode`.
    #[must_use]
    pub fn with_mode(mut self, mode: RevealMode) -> Self {
        self.mode = mode;
        self
    }

    /// Number of sections.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Minimum visible fraction that reveals a section.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Post-reveal observation behavior.
    #[must_use]
    pub fn mode(&self) -> RevealMode {
        self.mode
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_SECTION_COUNT,
            threshold: DEFAULT_THRESHOLD,
            mode: RevealMode::KeepObserving,
        }
    }
}
