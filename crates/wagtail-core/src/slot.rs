//! Cached state for one tracked resource.
//!
//! A [`ResourceSlot`] moves through [`SlotStatus`] as fetches are issued and
//! settled. The transition methods keep two invariants after every call:
//!
//! - `Ready` holds data and no error.
//! - `Failed` holds an error and no data.
//!
//! Each trigger bumps the slot's generation. A settle carrying an older
//! generation is ignored, so only the most recently issued fetch can commit.

use serde::Serialize;

use crate::Error;

/// Lifecycle of a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Nothing has been fetched yet, or a failure was dismissed.
    #[default]
    Idle,
    /// A fetch is in flight. Previous data stays visible.
    Loading,
    /// The latest fetch succeeded.
    Ready,
    /// The latest fetch failed.
    Failed,
}

/// Why a slot failed: the message shown to users plus the error category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotFailure {
    /// Human-readable message
    pub message: String,
    /// Stable category from [`Error::category`], e.g. `"transport"` or
    /// `"malformed_response"`
    pub category: &'static str,
}

impl SlotFailure {
    /// Builds a failure from an error, showing `message` instead of the
    /// error's own text.
    pub fn new(message: impl Into<String>, error: &Error) -> Self {
        Self {
            message: message.into(),
            category: error.category(),
        }
    }
}

impl From<&Error> for SlotFailure {
    fn from(error: &Error) -> Self {
        Self::new(error.to_string(), error)
    }
}

/// Latest known value, status and error for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSlot<T> {
    data: Option<T>,
    status: SlotStatus,
    error: Option<SlotFailure>,
    #[serde(skip)]
    generation: u64,
}

impl<T> Default for ResourceSlot<T> {
    fn default() -> Self {
        Self {
            data: None,
            status: SlotStatus::Idle,
            error: None,
            generation: 0,
        }
    }
}

impl<T> ResourceSlot<T> {
    /// Latest committed value, kept visible while a refresh is loading.
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Current lifecycle state.
    pub const fn status(&self) -> SlotStatus {
        self.status
    }

    /// Failure recorded by the latest fetch, if it failed.
    pub const fn error(&self) -> Option<&SlotFailure> {
        self.error.as_ref()
    }

    /// Message of the current failure, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// Category of the current failure, if any.
    pub fn failure_category(&self) -> Option<&'static str> {
        self.error.as_ref().map(|e| e.category)
    }

    /// Generation of the most recently issued fetch.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the slot is `Idle`.
    pub fn is_idle(&self) -> bool {
        self.status == SlotStatus::Idle
    }

    /// Whether the slot is `Loading`.
    pub fn is_loading(&self) -> bool {
        self.status == SlotStatus::Loading
    }

    /// Whether the slot is `Ready`.
    pub fn is_ready(&self) -> bool {
        self.status == SlotStatus::Ready
    }

    /// Whether the slot is `Failed`.
    pub fn is_failed(&self) -> bool {
        self.status == SlotStatus::Failed
    }

    /// Enter `Loading` for a new fetch and return its generation.
    ///
    /// Clears the error but keeps `data`, so a refresh can show the previous
    /// value while it runs.
    pub(crate) fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.status = SlotStatus::Loading;
        self.error = None;
        self.generation
    }

    /// Commit a successful result. Returns `false` if `generation` has been
    /// superseded and nothing changed.
    pub(crate) fn succeed(&mut self, generation: u64, value: T) -> bool {
        if generation != self.generation {
            return false;
        }
        self.data = Some(value);
        self.error = None;
        self.status = SlotStatus::Ready;
        true
    }

    /// Commit a failure, discarding any previous data. Returns `false` if
    /// `generation` has been superseded and nothing changed.
    pub(crate) fn fail(&mut self, generation: u64, failure: SlotFailure) -> bool {
        if generation != self.generation {
            return false;
        }
        self.data = None;
        self.error = Some(failure);
        self.status = SlotStatus::Failed;
        true
    }

    /// Settle a fetch that ended without a result, e.g. because its future
    /// was dropped. The slot returns to `Ready` if it still holds data from an
    /// earlier load, otherwise to `Idle`.
    ///
    /// Returns `false` if `generation` has been superseded or already settled.
    pub(crate) fn abandon(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.status != SlotStatus::Loading {
            return false;
        }
        self.status = if self.data.is_some() {
            SlotStatus::Ready
        } else {
            SlotStatus::Idle
        };
        true
    }

    /// Dismiss the current error. A `Failed` slot returns to `Idle`.
    ///
    /// Returns `false` when there was no error to clear.
    pub(crate) fn clear_error(&mut self) -> bool {
        if self.error.take().is_none() {
            return false;
        }
        if self.status == SlotStatus::Failed {
            self.status = SlotStatus::Idle;
        }
        true
    }
}
