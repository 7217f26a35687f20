//! Movieflix - terminal client for the Movieflix catalog
//!
//! Sign in, browse catalog rows, search titles and open title details,
//! against the Movieflix API gateway.
//!
//! # Modules
//!
//! - `models` - Catalog titles, sessions, request/response bodies
//! - `api` - HTTP client for the gateway (auth + catalog endpoints)
//! - `session` - Persisted session, access policies, route guard
//! - `router` - Route history with guarded navigation
//! - `fetch` - Browse row fetch plan
//! - `app` - Screen state and key handling
//! - `ui` - TUI rendering
//! - `cli` / `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod router;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use models::{RowKey, Session, TitleDetail, TitleSummary, UserProfile};

pub use api::{ApiClient, ApiError};
pub use app::App;
pub use router::{Route, Router};
pub use session::{RouteGuard, SessionContext};
