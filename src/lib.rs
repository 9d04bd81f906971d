//! lektury-mirror - local mirror of the Wolne Lektury catalog
//!
//! Fetches the root listing of works, then for each work its detail record
//! and every available content file (txt, xml, html, fb2, epub, mobi, pdf),
//! caching everything on disk so later runs skip what is already there.
//!
//! # Architecture
//!
//! - Every remote resource has exactly one local path
//! - A cache hit never touches the network
//! - Offline mode serves only from cache and fails on a miss
//! - Works are processed sequentially, in listing order
//!
//! # Modules
//!
//! - `cache`: The cached-fetch primitive and its HTTP origin
//! - `catalog`: Listing and detail endpoints
//! - `core`: Orchestration (Orchestrator, WorkState, MirrorReport)
//! - `domain`: Data structures (RemoteUrl, WorkSummary, WorkDetail)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Mirror into the current directory
//! lektury-mirror
//!
//! # Re-run without network access
//! lektury-mirror --offline
//! ```

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;

// Re-export main types at crate root for convenience
pub use cache::{Cache, HttpOrigin, Origin};
pub use catalog::CatalogClient;
pub use config::{CachePolicy, FailurePolicy, MirrorConfig};
pub use crate::core::{MirrorReport, Orchestrator, WorkState};
pub use domain::{Format, RemoteUrl, Tag, WorkDetail, WorkSummary};
pub use error::{MirrorError, Result};
