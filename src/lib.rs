//! flow - information flow networks for the aequitas detection tools
//!
//! flow provides:
//! - A network model of sites (information sources) and channels
//! - Level ordering of channels, with orphan and cycle detection
//! - Loaders for JSON definitions and a line-oriented description language
//! - Renderers for TikZ, HTML, Graphviz, Mermaid and plain tables
//! - Unified output format (jsonl/json/md/raw)

pub mod cli;
pub mod core;
pub mod export;
pub mod loader;
pub mod network;

pub use crate::core::error::{FlowError, Result};
pub use crate::network::{Network, OrderReport, SiteId, SiteKind, SiteSpec};
