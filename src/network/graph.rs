//! The network: an arena of sites and channels forming a flow graph
//!
//! Sites and channels are addressed by [`SiteId`] / [`ChannelId`] handles that
//! are only meaningful for the network that issued them. Channels keep a
//! separate evaluation order that [`Network::compute_order`] rewrites.

use tracing::debug;

use crate::core::error::{FlowError, Result};
use crate::network::channel::{Channel, ChannelId};
use crate::network::query::{ChannelQuery, SiteQuery};
use crate::network::site::{Site, SiteId, SiteSpec};

/// Specification versions this implementation understands
pub const IMPLEMENTED_SPECS: &[&str] = &["IF0.1", "IF0.2"];

pub const DEFAULT_SPEC: &str = "IF0.2";

/// Version stamped on every network
pub const NETWORK_VERSION: &str = "0.0.1";

#[derive(Debug, Clone)]
pub struct Network {
    spec: String,
    name: Option<String>,
    version: String,
    pub(crate) sites: Vec<Site>,
    pub(crate) channels: Vec<Channel>,
    pub(crate) channel_order: Vec<ChannelId>,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            spec: DEFAULT_SPEC.to_string(),
            name: None,
            version: NETWORK_VERSION.to_string(),
            sites: Vec::new(),
            channels: Vec::new(),
            channel_order: Vec::new(),
        }
    }
}

impl Network {
    /// Create an empty network for the given specification version
    pub fn new(spec: &str) -> Result<Self> {
        if !IMPLEMENTED_SPECS.contains(&spec) {
            return Err(FlowError::UnknownSpec(spec.to_string()));
        }
        Ok(Self {
            spec: spec.to_string(),
            ..Self::default()
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build a linear network `a -> b -> c`, one channel per consecutive pair.
    ///
    /// Channel labels are consumed from the front of `channel_labels` while any
    /// remain; later channels keep their generated id as label.
    pub fn chain<S: AsRef<str>>(labels: &[S], channel_labels: &[S]) -> Result<Self> {
        let mut network = Self::default();
        network.extend_chain(labels, channel_labels)?;
        Ok(network)
    }

    /// Append a linear chain of sites (resolved or created by label) to this network
    pub fn extend_chain<S: AsRef<str>>(&mut self, labels: &[S], channel_labels: &[S]) -> Result<()> {
        let mut pending = channel_labels.iter().map(|l| l.as_ref());
        let mut tail: Option<SiteId> = None;

        for label in labels {
            let site = self.site_or_create(label.as_ref());
            if let Some(prev) = tail {
                self.add_channel(&[prev], &[site], pending.next())?;
            }
            tail = Some(site);
        }

        Ok(())
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    // ==================== Sites ====================

    /// Create and register a new site
    pub fn add_site(&mut self, spec: SiteSpec) -> Result<SiteId> {
        let id = format!("_s{}", self.sites.len());

        let (label, members) = match spec {
            SiteSpec::Unlabeled => (None, Vec::new()),
            SiteSpec::Labeled(label) => (Some(label), Vec::new()),
            SiteSpec::Group(members) => {
                if members.is_empty() {
                    return Err(FlowError::InvalidSite {
                        message: "a group needs at least one member".to_string(),
                    });
                }
                let mut resolved: Vec<(String, SiteId)> = Vec::with_capacity(members.len());
                for member in members {
                    let site = self.sites.get(member.0).ok_or_else(|| FlowError::InvalidSite {
                        message: format!("group member #{} is not part of this network", member.0),
                    })?;
                    if !resolved.iter().any(|(_, sid)| *sid == member) {
                        resolved.push((site.id.clone(), member));
                    }
                }
                (None, resolved)
            }
        };

        debug!(site = %id, "adding site");
        let handle = SiteId(self.sites.len());
        self.sites.push(Site::new(id, label, members));
        Ok(handle)
    }

    /// Create a labelled group site
    pub fn add_group(&mut self, label: &str, members: &[SiteId]) -> Result<SiteId> {
        let sid = self.add_site(SiteSpec::Group(members.to_vec()))?;
        self.sites[sid.0].label = Some(label.to_string());
        Ok(sid)
    }

    /// Resolve a site by id, falling back to the first site with that label
    pub fn find_site(&self, key: &str) -> Option<SiteId> {
        self.sites
            .iter()
            .position(|s| s.id == key)
            .or_else(|| {
                self.sites
                    .iter()
                    .position(|s| s.label.as_deref() == Some(key))
            })
            .map(SiteId)
    }

    pub fn site(&self, key: &str) -> Result<SiteId> {
        self.find_site(key)
            .ok_or_else(|| FlowError::UnknownSite(key.to_string()))
    }

    /// Resolve a site, creating one labelled `key` if nothing matches
    pub fn site_or_create(&mut self, key: &str) -> SiteId {
        match self.find_site(key) {
            Some(sid) => sid,
            None => {
                let handle = SiteId(self.sites.len());
                let id = format!("_s{}", self.sites.len());
                debug!(site = %id, label = key, "creating site");
                self.sites.push(Site::new(id, Some(key.to_string()), Vec::new()));
                handle
            }
        }
    }

    /// Borrow a site by handle.
    ///
    /// Panics if the handle was issued by another network.
    pub fn site_ref(&self, sid: SiteId) -> &Site {
        &self.sites[sid.0]
    }

    /// All sites in creation order
    pub fn sites_iter(&self) -> impl Iterator<Item = (SiteId, &Site)> {
        self.sites.iter().enumerate().map(|(i, s)| (SiteId(i), s))
    }

    /// Query over every site
    pub fn sites(&self) -> SiteQuery<'_> {
        SiteQuery::new(self, (0..self.sites.len()).map(SiteId).collect())
    }

    /// Query over the sites named by `keys` (ids or labels)
    pub fn sites_by(&self, keys: &[&str]) -> Result<SiteQuery<'_>> {
        let ids = keys
            .iter()
            .map(|k| self.site(k))
            .collect::<Result<Vec<_>>>()?;
        Ok(SiteQuery::new(self, ids))
    }

    fn check_site(&self, sid: SiteId) -> Result<()> {
        if sid.0 < self.sites.len() {
            Ok(())
        } else {
            Err(FlowError::UnknownSite(format!("#{}", sid.0)))
        }
    }

    fn check_channel(&self, cid: ChannelId) -> Result<()> {
        if cid.0 < self.channels.len() {
            Ok(())
        } else {
            Err(FlowError::UnknownChannel(format!("#{}", cid.0)))
        }
    }

    // ==================== Channels ====================

    /// Create a channel from `sources` to `targets`.
    ///
    /// Fails without registering anything if a target already has a producer.
    pub fn add_channel(
        &mut self,
        sources: &[SiteId],
        targets: &[SiteId],
        label: Option<&str>,
    ) -> Result<ChannelId> {
        for sid in sources.iter().chain(targets) {
            self.check_site(*sid)?;
        }
        for sid in targets {
            let site = &self.sites[sid.0];
            if let Some(producer) = site.producer {
                return Err(FlowError::AlreadyProduced {
                    site: site.display_label().to_string(),
                    producer: self.channel_summary(producer),
                });
            }
        }

        let cid = ChannelId(self.channels.len());
        let id = format!("_c{}", self.channels.len());
        debug!(channel = %id, "adding channel");
        let mut channel = Channel::new(id, label.map(str::to_string));
        for sid in sources {
            channel.push_source(*sid);
        }
        for sid in targets {
            channel.push_target(*sid);
            self.sites[sid.0].producer = Some(cid);
        }
        self.channels.push(channel);
        self.channel_order.push(cid);
        Ok(cid)
    }

    /// Resolve a channel by id, falling back to the first channel with that label
    pub fn find_channel(&self, key: &str) -> Option<ChannelId> {
        self.channels
            .iter()
            .position(|c| c.id == key)
            .or_else(|| self.channels.iter().position(|c| c.label == key))
            .map(ChannelId)
    }

    pub fn channel(&self, key: &str) -> Result<ChannelId> {
        self.find_channel(key)
            .ok_or_else(|| FlowError::UnknownChannel(key.to_string()))
    }

    /// Borrow a channel by handle.
    ///
    /// Panics if the handle was issued by another network.
    pub fn channel_ref(&self, cid: ChannelId) -> &Channel {
        &self.channels[cid.0]
    }

    /// All channels in evaluation order
    pub fn channels_iter(&self) -> impl Iterator<Item = (ChannelId, &Channel)> {
        self.channel_order
            .iter()
            .map(move |cid| (*cid, &self.channels[cid.0]))
    }

    /// All channels in creation order, regardless of evaluation order
    pub fn channels_created(&self) -> impl Iterator<Item = (ChannelId, &Channel)> {
        self.channels
            .iter()
            .enumerate()
            .map(|(i, c)| (ChannelId(i), c))
    }

    pub fn channels(&self) -> ChannelQuery<'_> {
        ChannelQuery::new(self, self.channel_order.clone())
    }

    pub fn channels_by(&self, keys: &[&str]) -> Result<ChannelQuery<'_>> {
        let ids = keys
            .iter()
            .map(|k| self.channel(k))
            .collect::<Result<Vec<_>>>()?;
        Ok(ChannelQuery::new(self, ids))
    }

    pub fn add_input(&mut self, cid: ChannelId, sid: SiteId) -> Result<()> {
        self.check_channel(cid)?;
        self.check_site(sid)?;
        self.channels[cid.0].push_source(sid);
        Ok(())
    }

    pub fn add_inputs(&mut self, cid: ChannelId, sids: &[SiteId]) -> Result<()> {
        for sid in sids {
            self.add_input(cid, *sid)?;
        }
        Ok(())
    }

    pub fn discard_input(&mut self, cid: ChannelId, sid: SiteId) -> Result<()> {
        self.check_channel(cid)?;
        self.check_site(sid)?;
        if self.channels[cid.0].remove_source(sid) {
            Ok(())
        } else {
            Err(FlowError::NotAnInput {
                site: self.sites[sid.0].display_label().to_string(),
                channel: self.channels[cid.0].id.clone(),
            })
        }
    }

    /// Make `sid` an output of `cid`; a site has at most one producer
    pub fn add_output(&mut self, cid: ChannelId, sid: SiteId) -> Result<()> {
        self.check_channel(cid)?;
        self.check_site(sid)?;
        let current = self.sites[sid.0].producer;
        match current {
            Some(producer) if producer != cid => Err(FlowError::AlreadyProduced {
                site: self.sites[sid.0].display_label().to_string(),
                producer: self.channel_summary(producer),
            }),
            _ => {
                self.sites[sid.0].producer = Some(cid);
                self.channels[cid.0].push_target(sid);
                Ok(())
            }
        }
    }

    pub fn add_outputs(&mut self, cid: ChannelId, sids: &[SiteId]) -> Result<()> {
        for sid in sids {
            self.add_output(cid, *sid)?;
        }
        Ok(())
    }

    /// Remove `sid` from the outputs of `cid`; not a target is a no-op
    pub fn discard_output(&mut self, cid: ChannelId, sid: SiteId) -> Result<()> {
        self.check_channel(cid)?;
        self.check_site(sid)?;
        if self.channels[cid.0].remove_target(sid) {
            self.sites[sid.0].producer = None;
        }
        Ok(())
    }

    // ==================== Text forms ====================

    fn site_list(&self, sids: &[SiteId]) -> String {
        sids.iter()
            .map(|sid| self.sites[sid.0].display_label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `_c0: [a, b] --> {c}`
    pub fn channel_summary(&self, cid: ChannelId) -> String {
        let ch = &self.channels[cid.0];
        format!(
            "{}: [{}] --> {{{}}}",
            ch.id,
            self.site_list(&ch.sources),
            self.site_list(&ch.targets)
        )
    }

    /// `<label: [a, b] --> {c}>`
    pub fn channel_debug(&self, cid: ChannelId) -> String {
        let ch = &self.channels[cid.0];
        format!(
            "<{}: [{}] --> {{{}}}>",
            ch.label,
            self.site_list(&ch.sources),
            self.site_list(&ch.targets)
        )
    }
}
