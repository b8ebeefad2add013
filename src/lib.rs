//! # auditfeed
//!
//! **auditfeed** continuously harvests audit activity from the Microsoft
//! Office 365 Management Activity API and emits it as a stream of
//! enriched records.
//!
//! ## Features
//!
//! | Area            | Description                                                                | Key types / traits                      |
//! |-----------------|----------------------------------------------------------------------------|-----------------------------------------|
//! | **API client**  | List/start/stop subscriptions, list content, fetch audit records.          | [`Client`], [`ActivityApi`]             |
//! | **Watcher**     | Ticker-driven pipeline with one worker lane per content type.              | [`SubscriptionWatcher`], [`WatcherConfig`] |
//! | **State**       | Persisted per-type progress cursors so restarts resume cleanly.            | [`State`], [`MemoryState`]              |
//! | **Handlers**    | Pluggable consumers of the record stream.                                  | [`Handler`], [`JsonHandler`]            |
//! | **Sinks**       | Stdout, file, TCP and UDP record outputs.                                  | [`Output`]                              |
//! | **Errors**      | Typed errors for the API surface, watcher, handlers and state store.       | [`ApiError`], [`WatchError`]            |
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tokio_util::sync::CancellationToken;
//! use auditfeed::{
//!     Client, JsonHandler, MemoryState, Output, SubscriptionWatcher, WatcherConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Pass a pre-authenticated reqwest::Client in real deployments.
//!     let client = Client::new(None, "my-tenant-id", "")?;
//!     let state = Arc::new(MemoryState::new());
//!     let handler = JsonHandler::new(Output::dial("").await?, false);
//!
//!     let config = WatcherConfig {
//!         look_behind_minutes: 60,
//!         ticker_interval_seconds: 300,
//!     };
//!     let watcher = SubscriptionWatcher::new(
//!         Arc::new(client),
//!         config,
//!         state,
//!         Arc::new(handler),
//!     )?;
//!
//!     let shutdown = CancellationToken::new();
//!     watcher.run(shutdown).await?;
//!     Ok(())
//! }
//! ```
//!
//! ---

mod client;
mod config;
mod content;
mod content_type;
mod error;
mod handler;
mod params;
mod resource;
mod signals;
mod sink;
mod state;
mod subscription;
mod watcher;
mod window;

// ---- Public re-exports ----

pub use client::{ActivityApi, Client, DEFAULT_BASE_URL};
pub use config::{Credentials, WatcherConfig};
pub use content::Content;
pub use content_type::ContentType;
pub use error::{ApiError, HandlerError, StateError, WatchError};
pub use handler::{Handler, JsonHandler, JsonRecord};
pub use params::QueryParams;
pub use resource::{AuditRecord, ResourceAudit, ResourceContent, ResourceSubscription};
pub use signals::wait_for_shutdown_signal;
pub use sink::Output;
pub use state::{MemoryState, State};
pub use subscription::{Subscription, Webhook};
pub use watcher::SubscriptionWatcher;

#[cfg(test)]
mod client_test;
#[cfg(test)]
mod config_test;
#[cfg(test)]
mod content_type_test;
#[cfg(test)]
mod handler_test;
#[cfg(test)]
mod window_test;
