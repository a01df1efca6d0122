//! Channels: transformations from source sites to target sites

use crate::network::site::SiteId;

/// Level a channel carries before any ordering has been computed
pub const CHANNEL_LEVEL_UNSET: i64 = -1;

/// Index of a channel inside its network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub(crate) usize);

impl ChannelId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Channel {
    pub(crate) id: String,
    pub(crate) label: String,
    pub(crate) sources: Vec<SiteId>,
    pub(crate) targets: Vec<SiteId>,
    pub(crate) level: i64,
}

impl Channel {
    pub(crate) fn new(id: String, label: Option<String>) -> Self {
        let label = label.unwrap_or_else(|| id.clone());
        Self {
            id,
            label,
            sources: Vec::new(),
            targets: Vec::new(),
            level: CHANNEL_LEVEL_UNSET,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Input sites, in evaluation order
    pub fn sources(&self) -> &[SiteId] {
        &self.sources
    }

    /// Output sites, in insertion order
    pub fn targets(&self) -> &[SiteId] {
        &self.targets
    }

    pub fn level(&self) -> i64 {
        self.level
    }

    pub fn has_source(&self, site: SiteId) -> bool {
        self.sources.contains(&site)
    }

    pub fn has_target(&self, site: SiteId) -> bool {
        self.targets.contains(&site)
    }

    /// Append a source unless already present
    pub(crate) fn push_source(&mut self, site: SiteId) {
        if !self.sources.contains(&site) {
            self.sources.push(site);
        }
    }

    /// Remove a source, reporting whether it was present
    pub(crate) fn remove_source(&mut self, site: SiteId) -> bool {
        match self.sources.iter().position(|s| *s == site) {
            Some(pos) => {
                self.sources.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn push_target(&mut self, site: SiteId) {
        if !self.targets.contains(&site) {
            self.targets.push(site);
        }
    }

    pub(crate) fn remove_target(&mut self, site: SiteId) -> bool {
        match self.targets.iter().position(|s| *s == site) {
            Some(pos) => {
                self.targets.remove(pos);
                true
            }
            None => false,
        }
    }
}
