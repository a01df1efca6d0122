//! Lazy, chainable filters over the sites and channels of a network

use crate::network::channel::{Channel, ChannelId};
use crate::network::graph::Network;
use crate::network::site::{Site, SiteId, SiteKind};

type SiteFilter<'a> = Box<dyn Fn(&Site) -> bool + 'a>;
type ChannelFilter<'a> = Box<dyn Fn(&Channel) -> bool + 'a>;

/// Resolve an index where negative values count from the end
fn resolve_index(len: usize, index: isize) -> Option<usize> {
    if index >= 0 {
        let i = index as usize;
        (i < len).then_some(i)
    } else {
        len.checked_sub(index.unsigned_abs())
    }
}

/// Filtered view over a set of sites
pub struct SiteQuery<'a> {
    network: &'a Network,
    ids: Vec<SiteId>,
    filters: Vec<SiteFilter<'a>>,
}

impl<'a> SiteQuery<'a> {
    pub(crate) fn new(network: &'a Network, ids: Vec<SiteId>) -> Self {
        Self {
            network,
            ids,
            filters: Vec::new(),
        }
    }

    /// Keep sites whose label is one of `labels`
    pub fn label<S: AsRef<str>>(mut self, labels: &[S]) -> Self {
        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        self.filters.push(Box::new(move |site: &Site| {
            site.label()
                .is_some_and(|l| labels.iter().any(|want| want == l))
        }));
        self
    }

    /// Keep sites of the given kind
    pub fn kind(mut self, kind: SiteKind) -> Self {
        self.filters
            .push(Box::new(move |site: &Site| site.kind() == kind));
        self
    }

    /// Matching sites, in query order
    pub fn iter(&self) -> impl Iterator<Item = SiteId> + '_ {
        self.ids.iter().copied().filter(move |sid| {
            let site = self.network.site_ref(*sid);
            self.filters.iter().all(|f| f(site))
        })
    }

    pub fn handles(&self) -> Vec<SiteId> {
        self.iter().collect()
    }

    pub fn get(&self, index: isize) -> Option<SiteId> {
        let matches = self.handles();
        resolve_index(matches.len(), index).map(|i| matches[i])
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        let network = self.network;
        self.iter().map(|sid| network.site_ref(sid).id()).collect()
    }

    pub fn labels(&self) -> Vec<Option<&'a str>> {
        let network = self.network;
        self.iter().map(|sid| network.site_ref(sid).label()).collect()
    }

    /// `(level, site)` pairs, stably ordered by level
    pub fn levels(&self) -> Vec<(i64, SiteId)> {
        let mut levels: Vec<_> = self
            .iter()
            .map(|sid| (self.network.site_ref(sid).level(), sid))
            .collect();
        levels.sort_by_key(|(level, _)| *level);
        levels
    }
}

/// Filtered view over a set of channels
pub struct ChannelQuery<'a> {
    network: &'a Network,
    ids: Vec<ChannelId>,
    filters: Vec<ChannelFilter<'a>>,
}

impl<'a> ChannelQuery<'a> {
    pub(crate) fn new(network: &'a Network, ids: Vec<ChannelId>) -> Self {
        Self {
            network,
            ids,
            filters: Vec::new(),
        }
    }

    pub fn label<S: AsRef<str>>(mut self, labels: &[S]) -> Self {
        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        self.filters.push(Box::new(move |ch: &Channel| {
            labels.iter().any(|want| want == ch.label())
        }));
        self
    }

    /// Keep channels reading from any of `sites`
    pub fn source(mut self, sites: &[SiteId]) -> Self {
        let sites = sites.to_vec();
        self.filters.push(Box::new(move |ch: &Channel| {
            sites.iter().any(|s| ch.has_source(*s))
        }));
        self
    }

    /// Keep channels writing to any of `sites`
    pub fn target(mut self, sites: &[SiteId]) -> Self {
        let sites = sites.to_vec();
        self.filters.push(Box::new(move |ch: &Channel| {
            sites.iter().any(|s| ch.has_target(*s))
        }));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.ids.iter().copied().filter(move |cid| {
            let ch = self.network.channel_ref(*cid);
            self.filters.iter().all(|f| f(ch))
        })
    }

    pub fn handles(&self) -> Vec<ChannelId> {
        self.iter().collect()
    }

    pub fn get(&self, index: isize) -> Option<ChannelId> {
        let matches = self.handles();
        resolve_index(matches.len(), index).map(|i| matches[i])
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        let network = self.network;
        self.iter().map(|cid| network.channel_ref(cid).id()).collect()
    }

    pub fn labels(&self) -> Vec<&'a str> {
        let network = self.network;
        self.iter()
            .map(|cid| network.channel_ref(cid).label())
            .collect()
    }

    pub fn levels(&self) -> Vec<(i64, ChannelId)> {
        let mut levels: Vec<_> = self
            .iter()
            .map(|cid| (self.network.channel_ref(cid).level(), cid))
            .collect();
        levels.sort_by_key(|(level, _)| *level);
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::site::SiteSpec;

    fn sample() -> Network {
        let mut nw = Network::default();
        let a = nw.site_or_create("Site A");
        let b = nw.site_or_create("Site B");
        let c = nw.site_or_create("Site C");
        nw.add_group("AB", &[a, b]).unwrap();
        nw.add_channel(&[a], &[b], Some("ab")).unwrap();
        nw.add_channel(&[b], &[c], Some("bc")).unwrap();
        nw
    }

    #[test]
    fn test_site_label_filter() {
        let nw = sample();
        let q = nw.sites().label(&["Site A"]);
        assert_eq!(q.ids(), vec!["_s0"]);
        assert_eq!(q.len(), 1);

        let q = nw.sites().label(&["Site A", "Site C"]);
        assert_eq!(q.labels(), vec![Some("Site A"), Some("Site C")]);
    }

    #[test]
    fn test_site_label_filter_skips_unlabeled() {
        let mut nw = Network::default();
        nw.add_site(SiteSpec::Unlabeled).unwrap();
        assert!(nw.sites().label(&["_s0"]).is_empty());
    }

    #[test]
    fn test_site_kind_filter() {
        let nw = sample();
        assert_eq!(nw.sites().kind(SiteKind::Group).ids(), vec!["_s3"]);
        assert_eq!(nw.sites().kind(SiteKind::Single).len(), 3);
    }

    #[test]
    fn test_filters_accumulate() {
        let nw = sample();
        let q = nw.sites().label(&["Site A", "AB"]).kind(SiteKind::Group);
        assert_eq!(q.ids(), vec!["_s3"]);
    }

    #[test]
    fn test_site_indexing() {
        let nw = sample();
        let q = nw.sites();
        assert_eq!(q.get(0), Some(SiteId(0)));
        assert_eq!(q.get(-1), Some(SiteId(3)));
        assert_eq!(q.get(4), None);
        assert_eq!(q.get(-5), None);
    }

    #[test]
    fn test_channel_filters() {
        let nw = sample();
        let b = nw.site("Site B").unwrap();
        assert_eq!(nw.channels().source(&[b]).labels(), vec!["bc"]);
        assert_eq!(nw.channels().target(&[b]).labels(), vec!["ab"]);
        assert_eq!(nw.channels().label(&["bc"]).ids(), vec!["_c1"]);
        assert!(nw.channels().label(&["bc"]).target(&[b]).is_empty());
    }

    #[test]
    fn test_channels_by_keys() {
        let nw = sample();
        let q = nw.channels_by(&["bc", "_c0"]).unwrap();
        assert_eq!(q.ids(), vec!["_c1", "_c0"]);
        assert!(nw.channels_by(&["zz"]).is_err());
        assert_eq!(nw.sites_by(&["Site C"]).unwrap().len(), 1);
    }

    #[test]
    fn test_levels_sorted() {
        let mut nw = sample();
        nw.compute_order();
        let levels = nw.channels().levels();
        assert_eq!(levels.iter().map(|(l, _)| *l).collect::<Vec<_>>(), vec![0, 1]);

        let site_levels: Vec<i64> = nw.sites().levels().iter().map(|(l, _)| *l).collect();
        let mut sorted = site_levels.clone();
        sorted.sort();
        assert_eq!(site_levels, sorted);
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(3, 0), Some(0));
        assert_eq!(resolve_index(3, -3), Some(0));
        assert_eq!(resolve_index(3, -4), None);
        assert_eq!(resolve_index(0, 0), None);
    }
}
