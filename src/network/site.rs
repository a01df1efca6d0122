//! Sites: information sources and groups of sources

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{FlowError, Result};
use crate::network::channel::ChannelId;

/// Level a site carries before any ordering has been computed
pub const SITE_LEVEL_UNSET: i64 = 4000;

/// Index of a site inside its network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(pub(crate) usize);

impl SiteId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a site stands alone or groups other sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Single,
    Group,
}

impl std::str::FromStr for SiteKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "site" => Ok(SiteKind::Single),
            "group" => Ok(SiteKind::Group),
            _ => Err(format!("Unknown site kind: {}", s)),
        }
    }
}

/// How a new site should be built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSpec {
    Unlabeled,
    Labeled(String),
    Group(Vec<SiteId>),
}

impl From<&str> for SiteSpec {
    fn from(label: &str) -> Self {
        SiteSpec::Labeled(label.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Site {
    pub(crate) id: String,
    pub(crate) label: Option<String>,
    pub(crate) members: Vec<(String, SiteId)>,
    pub(crate) producer: Option<ChannelId>,
    pub(crate) level: i64,
}

impl Site {
    pub(crate) fn new(id: String, label: Option<String>, members: Vec<(String, SiteId)>) -> Self {
        Self {
            id,
            label,
            members,
            producer: None,
            level: SITE_LEVEL_UNSET,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The label, or the id when the site has none
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn kind(&self) -> SiteKind {
        if self.members.is_empty() {
            SiteKind::Single
        } else {
            SiteKind::Group
        }
    }

    pub fn producer(&self) -> Option<ChannelId> {
        self.producer
    }

    pub fn level(&self) -> i64 {
        self.level
    }

    /// Member site handles in insertion order
    pub fn member_ids(&self) -> impl Iterator<Item = SiteId> + '_ {
        self.members.iter().map(|(_, sid)| *sid)
    }

    /// Look up a member of this group by its string id
    pub fn member(&self, id: &str) -> Result<SiteId> {
        self.members
            .iter()
            .find(|(mid, _)| mid == id)
            .map(|(_, sid)| *sid)
            .ok_or_else(|| FlowError::UnknownMember {
                group: self.id.clone(),
                member: id.to_string(),
            })
    }

    /// Look up several members, failing on the first unknown id
    pub fn members(&self, ids: &[&str]) -> Result<Vec<SiteId>> {
        ids.iter().map(|id| self.member(id)).collect()
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}
