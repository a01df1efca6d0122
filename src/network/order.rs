//! Level ordering of a network
//!
//! Sites that nothing produces start at level 0 when some channel reads them.
//! A channel is placed at the first level where all of its sources are
//! available, and its targets land one level later. Channels that never
//! become computable (cycles, or downstream of one) keep `LEVEL_PENDING`.

use tracing::{debug, warn};

use crate::network::channel::ChannelId;
use crate::network::graph::Network;
use crate::network::site::SiteId;

/// Level of a site that is neither produced nor consumed
pub const LEVEL_ORPHAN: i64 = -1;

/// Level of anything the ordering has not (yet) reached
pub const LEVEL_PENDING: i64 = 1000;

/// Extra passes allowed beyond the channel count before giving up
const EXTRA_PASSES: usize = 10;

/// Outcome of [`Network::compute_order`]
#[derive(Debug, Clone, Default)]
pub struct OrderReport {
    pub converged: bool,
    pub iterations: usize,
    pub orphaned_sites: Vec<SiteId>,
    pub unreachable_channels: Vec<ChannelId>,
}

impl OrderReport {
    pub fn is_clean(&self) -> bool {
        self.converged && self.orphaned_sites.is_empty() && self.unreachable_channels.is_empty()
    }
}

impl Network {
    /// Assign levels to every site and channel and sort channels by level.
    pub fn compute_order(&mut self) -> OrderReport {
        for site in &mut self.sites {
            site.level = if site.producer.is_none() {
                LEVEL_ORPHAN
            } else {
                LEVEL_PENDING
            };
        }

        for ch in &mut self.channels {
            ch.level = LEVEL_PENDING;
            for sid in &ch.sources {
                let site = &mut self.sites[sid.0];
                if site.level == LEVEL_ORPHAN {
                    site.level = 0;
                }
            }
        }

        let limit = self.channels.len() + EXTRA_PASSES;
        let mut done = false;
        let mut i: usize = 0;

        while !done && i < limit {
            done = true;
            let level = i as i64;

            for cid in &self.channel_order {
                let ch = &self.channels[cid.0];
                if ch.level < level {
                    continue;
                }
                if ch.sources.iter().any(|sid| self.sites[sid.0].level > level) {
                    continue;
                }

                done = false;
                let ch = &mut self.channels[cid.0];
                ch.level = level;
                for sid in &ch.targets {
                    self.sites[sid.0].level = level + 1;
                }
            }
            i += 1;
        }

        let channels = &self.channels;
        self.channel_order.sort_by_key(|cid| channels[cid.0].level);

        let sites = &self.sites;
        for ch in &mut self.channels {
            ch.sources.sort_by_key(|sid| std::cmp::Reverse(sites[sid.0].level));
        }

        let report = OrderReport {
            converged: i <= self.channels.len() + 1,
            iterations: i,
            orphaned_sites: self
                .sites_iter()
                .filter(|(_, s)| s.level == LEVEL_ORPHAN)
                .map(|(sid, _)| sid)
                .collect(),
            unreachable_channels: self
                .channels_iter()
                .filter(|(_, c)| c.level == LEVEL_PENDING)
                .map(|(cid, _)| cid)
                .collect(),
        };

        debug!(iterations = i, "computed network order");

        if !report.converged {
            warn!("failed to compute network structure");
        }
        if !report.orphaned_sites.is_empty() {
            let labels: Vec<_> = report
                .orphaned_sites
                .iter()
                .map(|sid| self.site_ref(*sid).display_label())
                .collect();
            warn!("there are orphaned sites: {:?}", labels);
        }
        if !report.unreachable_channels.is_empty() {
            let labels: Vec<_> = report
                .unreachable_channels
                .iter()
                .map(|cid| self.channel_debug(*cid))
                .collect();
            warn!("there are unreachable channels: {:?}", labels);
        }

        report
    }
}
