//! Network model - sites, channels and the flow graph they form
//!
//! - A `Site` is an information source, or a group of sources
//! - A `Channel` transforms source sites into target sites
//! - A `Network` owns both and computes their evaluation order

pub mod channel;
pub mod graph;
pub mod order;
pub mod query;
pub mod site;

pub use channel::{Channel, ChannelId};
pub use graph::Network;
pub use order::OrderReport;
pub use query::{ChannelQuery, SiteQuery};
pub use site::{Site, SiteId, SiteKind, SiteSpec};
