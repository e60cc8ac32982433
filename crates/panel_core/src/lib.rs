//! # Panel Core - TerraControl game-server panel
//!
//! Client-side machinery of the TerraControl administration panel. The
//! game server itself is an external collaborator reached over two fixed
//! contracts:
//!
//! * **HTTP** - `GET /api/<scope>/<object>/<args...>` for every action
//!   (say, kick, ban, restart, MOTD, password, full status, ...)
//! * **WebSocket** - `/ws` on the same host, streaming newline-separated log
//!   lines tagged `[CHAT]`, `[WARN]`, `[ERROR]` or untagged
//!
//! ## Architecture Overview
//!
//! * [`api`] - endpoint registry, request building, pre-call gating and
//!   routing of responses to hooks by status class
//! * [`log`] - line classification, the scrolling log window and the
//!   live log client
//! * [`panel`] - the panel view model and the per-action handlers that
//!   bind the two together
//!
//! ## Lifecycle
//!
//! 1. Build an [`ApiDispatcher`] over an [`api::HttpTransport`]
//! 2. Create the shared [`panel::PanelState`]
//! 3. [`panel::install_endpoints`] registers every action and raises the
//!    ready flag; earlier calls are refused
//! 4. [`panel::start_polling`] keeps the status fresh and
//!    [`LiveLogClient::run`] feeds the log window
//!
//! ## Error Handling
//!
//! Failed requests never bubble up: they are logged through `tracing` and
//! the default hooks do nothing. [`PanelError`] covers the failures a caller
//! can act on (unknown endpoint, invalid URL, bad scope).

pub use api::{ApiDispatcher, CallOutcome, RequestHandler};
pub use config::PanelConfig;
pub use error::PanelError;
pub use log::{classify_line, LiveLogClient, LogEntry, LogItem};
pub use panel::{Action, PanelState, SharedPanel};

pub mod api;
pub mod config;
pub mod error;
pub mod log;
pub mod panel;
