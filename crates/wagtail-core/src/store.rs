//! Resource store: one cached slot per tracked resource.
//!
//! The store is constructed explicitly (typically once at application start)
//! and shared by reference, or behind an `Arc` across tasks. Each public fetch
//! drives one slot through `Loading` to `Ready` or `Failed` and always returns
//! normally: failures become slot state, never errors for the caller.
//!
//! Slot state lives in a [`tokio::sync::watch`] channel. Observers can read a
//! snapshot at any time or subscribe to be woken on every change.
//!
//! ```rust,no_run
//! use wagtail_core::{ApiConfig, ResourceStore};
//!
//! # async fn run() -> wagtail_core::Result<()> {
//! let store = ResourceStore::from_config(&ApiConfig::load()?)?;
//! store.fetch_home_page().await;
//!
//! let home = store.home_page();
//! if let Some(page) = home.data() {
//!     println!("{}: {}", page.page.title, page.intro);
//! } else if let Some(message) = home.error_message() {
//!     eprintln!("{message}");
//! }
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::ResourceClient;
use crate::slot::{ResourceSlot, SlotFailure};
use crate::transport::{HttpTransport, Transport};
use crate::types::{HomePage, PageSummary};
use crate::{ApiConfig, Error, Result};

/// User-facing messages for one slot.
struct SlotMessages {
    name: &'static str,
    /// Shown when the payload failed shape validation
    invalid: &'static str,
    /// Shown when an error carries no message of its own
    fallback: &'static str,
}

const PAGES: SlotMessages = SlotMessages {
    name: "pages",
    invalid: "Invalid response format from API",
    fallback: "Failed to fetch pages",
};

const CURRENT_PAGE: SlotMessages = SlotMessages {
    name: "current_page",
    invalid: "Invalid page data received",
    fallback: "Failed to fetch page",
};

const HOME_PAGE: SlotMessages = SlotMessages {
    name: "home_page",
    invalid: "Invalid homepage data received",
    fallback: "Failed to fetch homepage",
};

impl SlotMessages {
    fn failure_for(&self, error: &Error) -> SlotFailure {
        if error.is_malformed() {
            return SlotFailure::new(self.invalid, error);
        }
        let message = error.to_string();
        if message.trim().is_empty() {
            SlotFailure::new(self.fallback, error)
        } else {
            SlotFailure::new(message, error)
        }
    }
}

/// Cached state for the page listing, the current page and the home page.
pub struct ResourceStore<T> {
    client: ResourceClient<T>,
    pages: watch::Sender<ResourceSlot<Vec<PageSummary>>>,
    current_page: watch::Sender<ResourceSlot<PageSummary>>,
    home_page: watch::Sender<ResourceSlot<HomePage>>,
}

impl ResourceStore<HttpTransport> {
    /// Creates a store that talks HTTP to the configured API.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(ResourceClient::from_config(config)?))
    }
}

impl<T: Transport> ResourceStore<T> {
    /// Creates a store with every slot `Idle`.
    pub fn new(client: ResourceClient<T>) -> Self {
        Self {
            client,
            pages: watch::channel(ResourceSlot::default()).0,
            current_page: watch::channel(ResourceSlot::default()).0,
            home_page: watch::channel(ResourceSlot::default()).0,
        }
    }

    /// The client fetches are issued through.
    pub const fn client(&self) -> &ResourceClient<T> {
        &self.client
    }

    /// Fetch the page listing into the `pages` slot.
    pub async fn fetch_pages(&self) {
        settle(&self.pages, &PAGES, async {
            self.client.list_pages().await.map(crate::Collection::into_items)
        })
        .await;
    }

    /// Fetch one page into the `current_page` slot.
    pub async fn fetch_page(&self, id: u64) {
        settle(&self.current_page, &CURRENT_PAGE, self.client.get_page(id)).await;
    }

    /// Fetch the home page into the `home_page` slot.
    pub async fn fetch_home_page(&self) {
        settle(&self.home_page, &HOME_PAGE, self.client.get_home_page()).await;
    }

    /// Dismiss the `pages` error without refetching.
    pub fn clear_pages_error(&self) {
        self.pages.send_if_modified(ResourceSlot::clear_error);
    }

    /// Dismiss the `current_page` error without refetching.
    pub fn clear_page_error(&self) {
        self.current_page.send_if_modified(ResourceSlot::clear_error);
    }

    /// Dismiss the `home_page` error without refetching.
    pub fn clear_home_page_error(&self) {
        self.home_page.send_if_modified(ResourceSlot::clear_error);
    }

    /// Snapshot of the `pages` slot.
    pub fn pages(&self) -> ResourceSlot<Vec<PageSummary>> {
        self.pages.borrow().clone()
    }

    /// Snapshot of the `current_page` slot.
    pub fn current_page(&self) -> ResourceSlot<PageSummary> {
        self.current_page.borrow().clone()
    }

    /// Snapshot of the `home_page` slot.
    pub fn home_page(&self) -> ResourceSlot<HomePage> {
        self.home_page.borrow().clone()
    }

    /// Receiver woken on every change to the `pages` slot.
    pub fn subscribe_pages(&self) -> watch::Receiver<ResourceSlot<Vec<PageSummary>>> {
        self.pages.subscribe()
    }

    /// Receiver woken on every change to the `current_page` slot.
    pub fn subscribe_current_page(&self) -> watch::Receiver<ResourceSlot<PageSummary>> {
        self.current_page.subscribe()
    }

    /// Receiver woken on every change to the `home_page` slot.
    pub fn subscribe_home_page(&self) -> watch::Receiver<ResourceSlot<HomePage>> {
        self.home_page.subscribe()
    }

    /// Whether any slot has a fetch in flight.
    pub fn is_loading(&self) -> bool {
        self.pages.borrow().is_loading()
            || self.current_page.borrow().is_loading()
            || self.home_page.borrow().is_loading()
    }
}

/// Settles the slot if a fetch is dropped before it commits.
///
/// Created right after `begin()` and disarmed once the result is in hand.
struct PendingFetch<'a, V> {
    slot: &'a watch::Sender<ResourceSlot<V>>,
    name: &'static str,
    generation: u64,
    armed: bool,
}

impl<V> PendingFetch<'_, V> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<V> Drop for PendingFetch<'_, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let generation = self.generation;
        if self.slot.send_if_modified(|state| state.abandon(generation)) {
            debug!(slot = self.name, generation, "Fetch cancelled before it settled");
        }
    }
}

/// Run one fetch episode against `slot`.
///
/// The generation is taken before the request starts; the result is committed
/// only if no newer fetch began on the same slot in the meantime. Dropping the
/// returned future early leaves the slot `Ready` or `Idle`, never `Loading`.
async fn settle<V>(
    slot: &watch::Sender<ResourceSlot<V>>,
    messages: &SlotMessages,
    fetch: impl Future<Output = Result<V>>,
) {
    let mut generation = 0;
    slot.send_modify(|state| generation = state.begin());
    let mut pending = PendingFetch {
        slot,
        name: messages.name,
        generation,
        armed: true,
    };
    debug!(slot = messages.name, generation, "Fetch started");

    let outcome = fetch.await;
    pending.disarm();

    let committed = match outcome {
        Ok(value) => {
            let committed = slot.send_if_modified(|state| state.succeed(generation, value));
            if committed {
                info!(slot = messages.name, generation, "Fetch committed");
            }
            committed
        },
        Err(err) => {
            let failure = messages.failure_for(&err);
            warn!(
                slot = messages.name,
                generation,
                category = failure.category,
                "Error fetching {}: {}",
                messages.name,
                err
            );
            slot.send_if_modified(|state| state.fail(generation, failure))
        },
    };

    if !committed {
        debug!(slot = messages.name, generation, "Discarded superseded response");
    }
}
