//! JSON network definitions
//!
//! ```json
//! {"spec": "IF0.2", "name": "pipeline",
//!  "sites": [{"label": "raw"}, {"label": "inputs", "members": ["raw", "meta"]}],
//!  "channels": [{"label": "clean", "source": ["raw"], "target": ["clean data"]}],
//!  "chain": ["clean data", "report"], "channel_labels": ["summarize"]}
//! ```
//!
//! Sites named by a channel or chain are created on first mention.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::error::{FlowError, Result};
use crate::network::graph::{Network, DEFAULT_SPEC};
use crate::network::site::{SiteId, SiteSpec};

fn default_spec() -> String {
    DEFAULT_SPEC.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkDefinition {
    #[serde(default = "default_spec")]
    pub spec: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sites: Vec<SiteDefinition>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ChannelDefinition>,

    /// Linear chain of site labels, joined in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,

    /// Labels for the chain's channels, consumed front to back
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channel_labels: Vec<String>,
}

impl Default for NetworkDefinition {
    fn default() -> Self {
        Self {
            spec: default_spec(),
            name: None,
            sites: Vec::new(),
            channels: Vec::new(),
            chain: Vec::new(),
            channel_labels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Member keys (ids or labels) for a group site
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub source: Vec<String>,

    #[serde(default)]
    pub target: Vec<String>,
}

impl NetworkDefinition {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the network this definition describes
    pub fn to_network(&self) -> Result<Network> {
        let mut network = Network::new(&self.spec)?;
        network.set_name(self.name.clone());

        for site in &self.sites {
            if site.members.is_empty() {
                let spec = match &site.label {
                    Some(label) => SiteSpec::Labeled(label.clone()),
                    None => SiteSpec::Unlabeled,
                };
                network.add_site(spec)?;
                continue;
            }

            let members = site
                .members
                .iter()
                .map(|key| network.site(key))
                .collect::<Result<Vec<_>>>()?;
            match &site.label {
                Some(label) => network.add_group(label, &members)?,
                None => network.add_site(SiteSpec::Group(members))?,
            };
        }

        for channel in &self.channels {
            if channel.target.is_empty() && channel.source.is_empty() {
                return Err(FlowError::Definition {
                    message: format!(
                        "channel '{}' has neither sources nor targets",
                        channel.label.as_deref().unwrap_or("?")
                    ),
                });
            }
            let sources: Vec<SiteId> = channel
                .source
                .iter()
                .map(|key| network.site_or_create(key))
                .collect();
            let targets: Vec<SiteId> = channel
                .target
                .iter()
                .map(|key| network.site_or_create(key))
                .collect();
            network.add_channel(&sources, &targets, channel.label.as_deref())?;
        }

        if !self.chain.is_empty() {
            network.extend_chain(self.chain.as_slice(), self.channel_labels.as_slice())?;
        }

        Ok(network)
    }

    /// Describe an existing network.
    ///
    /// Every site is listed in creation order so that reloading reproduces
    /// the same ids. References use the label when it identifies the site
    /// unambiguously and the id otherwise.
    pub fn from_network(network: &Network) -> Self {
        let mut label_counts: HashMap<&str, usize> = HashMap::new();
        for (_, site) in network.sites_iter() {
            if let Some(label) = site.label() {
                *label_counts.entry(label).or_default() += 1;
            }
        }

        let key_of = |sid: SiteId| -> String {
            let site = network.site_ref(sid);
            match site.label() {
                Some(label)
                    if label_counts.get(label) == Some(&1)
                        && network.find_site(label) == Some(sid) =>
                {
                    label.to_string()
                }
                _ => site.id().to_string(),
            }
        };

        let sites = network
            .sites_iter()
            .map(|(_, site)| SiteDefinition {
                label: site.label().map(str::to_string),
                members: site.member_ids().map(key_of).collect(),
            })
            .collect();

        let channels = network
            .channels_created()
            .map(|(_, ch)| ChannelDefinition {
                label: (ch.label() != ch.id()).then(|| ch.label().to_string()),
                source: ch.sources().iter().map(|sid| key_of(*sid)).collect(),
                target: ch.targets().iter().map(|sid| key_of(*sid)).collect(),
            })
            .collect();

        Self {
            spec: network.spec().to_string(),
            name: network.name().map(str::to_string),
            sites,
            channels,
            chain: Vec::new(),
            channel_labels: Vec::new(),
        }
    }
}
