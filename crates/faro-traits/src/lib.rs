#![doc(issue_tracker_base_url = "https://github.com/factordynamics/faro/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the Faro factor research engine.
//!
//! This crate provides the foundations shared by factor construction and
//! evaluation: the long-format [`Panel`], its entity and date partitions,
//! the [`Factor`] trait, the research configuration and the descriptive
//! statistics used across the workspace.

/// The version of the faro-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod config;
pub mod error;
pub mod factor;
pub mod panel;
pub mod stats;
pub mod types;

// Re-exports
pub use config::ResearchConfig;
pub use error::{FaroError, Result};
pub use factor::{EntityHistory, Factor};
pub use panel::{Group, Panel};
pub use types::{CE_TO_UNIX_EPOCH_DAYS, Date, Ticker, columns, fwd_ret_column};
