//! Elohim SCORM - runtime adapter for SCORM 1.2 and 2004 content
//!
//! Lets a SCORM package running inside a learning path talk to whatever
//! runtime object the delivery platform injected into its window hierarchy:
//! - Discovery of the `API` / `API_1484_11` object across parent and opener windows
//! - Revision negotiation, pinned by config or inferred from the host
//! - One initialize/terminate lifecycle with completion-status repair and exit-mode handling
//! - Typed get/set over the host's string-only data model
//! - Host error codes decoded into readable diagnostics
//!
//! ## Usage from Rust
//!
//! ```rust,ignore
//! use elohim_scorm::{AdapterConfig, ScormAdapter};
//!
//! let mut scorm = ScormAdapter::new(window_context, AdapterConfig::default());
//! if scorm.initialize() {
//!     scorm.set_value("cmi.score.raw", 85);
//!     scorm.set_status("completed");
//!     scorm.terminate();
//! }
//! ```
//!
//! ## Build
//!
//! ```bash
//! wasm-pack build --target web --out-dir pkg
//! ```

pub mod adapter;
pub mod config;
pub mod connection;
pub mod data;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod host;
pub mod logging;
pub mod session;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use adapter::ScormAdapter;
pub use config::AdapterConfig;
pub use connection::Connection;
pub use data::{DataStore, StatusAction};
pub use diagnostics::Diagnostics;
pub use discovery::Discovery;
pub use error::{Result, ScormError};
pub use host::{BrowsingContext, ContextRef, RuntimeApi, RuntimeHandle};
pub use session::SessionContext;
pub use types::{CachedStatus, ConnectionState, ExitMode, ScormValue, ScormVersion};
