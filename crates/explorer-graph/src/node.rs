//! Node model
//!
//! Nodes are created or overwritten only by backend responses. The one
//! local mutation is the UI's ephemeral `fetching` marker, which never
//! crosses the wire.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned node identifier, unique within a project
///
/// Serialized as a number. Decodes from a number or a decimal string, since
/// edge maps key their sources by `"<id>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Wrap a raw id
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct NodeIdVisitor;

impl Visitor<'_> for NodeIdVisitor {
    type Value = NodeId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a u32 node id or its decimal string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<NodeId, E> {
        u32::try_from(value)
            .map(NodeId)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<NodeId, E> {
        u32::try_from(value)
            .map(NodeId)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<NodeId, E> {
        value
            .parse::<u32>()
            .map(NodeId)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeIdVisitor)
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Typed node payload, `{ "type": ..., "data": ... }` on the wire
///
/// Structured payloads keep their JSON object; this core never inspects
/// them beyond the variant tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    Link(serde_json::Value),
    Text(String),
    Tree(String),
    TableRow(serde_json::Value),
    ProjectSettings(serde_json::Value),
    CrawlerSettings(serde_json::Value),
}

impl Payload {
    /// Variant tag as sent by the backend
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Link(_) => "Link",
            Self::Text(_) => "Text",
            Self::Tree(_) => "Tree",
            Self::TableRow(_) => "TableRow",
            Self::ProjectSettings(_) => "ProjectSettings",
            Self::CrawlerSettings(_) => "CrawlerSettings",
        }
    }
}

/// Processing flags reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeFlag {
    None,
    IsProcessed,
    IsRequesting,
    IsBlocked,
    HadError,
}

/// A graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Type tags, ordered by relevance; not unique across nodes
    pub labels: Vec<String>,
    pub payload: Payload,
    #[serde(default)]
    pub flags: Vec<NodeFlag>,
    /// Last write time in milliseconds; only used as a watermark
    pub written_at: i64,
    /// Set by the UI while it refreshes this node
    #[serde(skip)]
    pub fetching: bool,
}

impl Node {
    /// Create a node with no flags
    #[must_use]
    pub fn new(id: impl Into<NodeId>, labels: &[&str], payload: Payload, written_at: i64) -> Self {
        Self {
            id: id.into(),
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
            payload,
            flags: Vec::new(),
            written_at,
            fetching: false,
        }
    }

    /// Check whether the node carries a label
    #[inline]
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Check whether the backend reports a flag
    #[inline]
    #[must_use]
    pub fn has_flag(&self, flag: NodeFlag) -> bool {
        self.flags.contains(&flag)
    }
}
