//! Unified Result Model
//!
//! Every command maps its findings to this model before rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Network,
    Site,
    Channel,
    Warning,
    Error,
}

impl Kind {
    /// Sort rank: problems first, then the network summary, then its parts
    fn rank(self) -> u8 {
        match self {
            Kind::Error => 0,
            Kind::Warning => 1,
            Kind::Network => 2,
            Kind::Site => 3,
            Kind::Channel => 4,
        }
    }
}

/// Confidence level of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Issue information attached to a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowIssue {
    pub code: String,
    pub message: String,
}

impl FlowIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Network-local id (`_s3`, `_c0`) of the site or channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human-readable label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Computed level in the flow order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,

    /// Structured payload (sources, targets, members, counts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Confidence level
    pub confidence: Confidence,

    /// Issues (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FlowIssue>,
}

impl ResultItem {
    fn bare(kind: Kind) -> Self {
        Self {
            kind,
            id: None,
            label: None,
            level: None,
            data: None,
            confidence: Confidence::High,
            errors: Vec::new(),
        }
    }

    /// Create a new site result
    pub fn site(id: impl Into<String>, label: impl Into<String>, level: i64) -> Self {
        Self {
            id: Some(id.into()),
            label: Some(label.into()),
            level: Some(level),
            ..Self::bare(Kind::Site)
        }
    }

    /// Create a new channel result
    pub fn channel(id: impl Into<String>, label: impl Into<String>, level: i64) -> Self {
        Self {
            id: Some(id.into()),
            label: Some(label.into()),
            level: Some(level),
            ..Self::bare(Kind::Channel)
        }
    }

    /// Create a network summary result
    pub fn network(name: Option<String>) -> Self {
        Self {
            label: name,
            ..Self::bare(Kind::Network)
        }
    }

    /// Create a warning result
    pub fn warning(issue: FlowIssue) -> Self {
        Self {
            confidence: Confidence::Medium,
            errors: vec![issue],
            ..Self::bare(Kind::Warning)
        }
    }

    /// Create a new error result
    pub fn error(issue: FlowIssue) -> Self {
        Self {
            errors: vec![issue],
            ..Self::bare(Kind::Error)
        }
    }

    /// Set the id this result refers to
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    /// Stable sort by kind, then level; ties keep insertion order
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| {
            a.kind
                .rank()
                .cmp(&b.kind.rank())
                .then_with(|| match (a.level, b.level) {
                    (Some(la), Some(lb)) => la.cmp(&lb),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
        });
    }

    /// Items that carry a warning or an error
    pub fn problems(&self) -> impl Iterator<Item = &ResultItem> {
        self.items
            .iter()
            .filter(|i| matches!(i.kind, Kind::Warning | Kind::Error))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
