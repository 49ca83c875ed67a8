//! # wagtail-core
//!
//! Client-side state cache for a Wagtail content API.
//!
//! The crate fetches page-like resources, tracks their loading and error
//! status, and exposes the latest known state for rendering. Stale or
//! malformed responses never reach the cached state.
//!
//! ## Architecture
//!
//! - **Transport**: the injected "GET this resource" capability, with an HTTP
//!   implementation built on `reqwest`
//! - **Resource client**: maps page, home page and image descriptors onto
//!   requests and validates every reply into typed data
//! - **Resource store**: one [`ResourceSlot`] per tracked resource, guarded by
//!   a per-slot request generation so only the newest fetch can commit
//! - **Configuration** and **logging** helpers for host applications
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wagtail_core::{ApiConfig, ResourceStore};
//!
//! # async fn run() -> wagtail_core::Result<()> {
//! let store = ResourceStore::from_config(&ApiConfig::load()?)?;
//! store.fetch_pages().await;
//!
//! let pages = store.pages();
//! if pages.is_ready() {
//!     for page in pages.data().into_iter().flatten() {
//!         println!("{} {}", page.id, page.title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Client operations return [`Result<T, Error>`]. Store operations never fail;
//! they record the outcome in the slot instead:
//!
//! ```rust,no_run
//! # use wagtail_core::{ApiConfig, ResourceStore};
//! # async fn run(store: ResourceStore<wagtail_core::HttpTransport>) {
//! store.fetch_page(5).await;
//! let page = store.current_page();
//! if page.is_failed() {
//!     eprintln!("{:?}: {:?}", page.failure_category(), page.error_message());
//!     store.clear_page_error();
//! }
//! # }
//! ```

/// Resource client mapping descriptors to validated responses
pub mod client;
/// Configuration for reaching the content API
pub mod config;
/// Error types and result aliases
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Cached state for one resource
pub mod slot;
/// Resource store owning the cached slots
pub mod store;
/// Transport seam and HTTP implementation
pub mod transport;
/// API data types
pub mod types;
/// Payload shape checks
pub mod validate;

#[cfg(test)]
mod testing;

pub use client::ResourceClient;
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use logging::{LogOptions, init_logging};
pub use slot::{ResourceSlot, SlotFailure, SlotStatus};
pub use store::ResourceStore;
pub use transport::{HttpTransport, ResourceRequest, Transport};
pub use types::*;
pub use validate::Validated;
