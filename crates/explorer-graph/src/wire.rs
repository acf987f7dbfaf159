//! Backend response payloads
//!
//! Every engine endpoint answers with `{ "type": ..., "data": ... }`.

use crate::edge::NodeEdges;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Edges keyed by source node id (`"<id>"` keys on the wire)
pub type EdgesBySource = BTreeMap<NodeId, NodeEdges>;

/// Bulk payload of the explore endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExploreData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: EdgesBySource,
    /// Backend-asserted clusters, each rendered as one element
    #[serde(default)]
    pub sibling_nodes: Vec<Vec<NodeId>>,
}

/// Response envelope of the engine API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EngineResponse {
    Nodes(Vec<Node>),
    Edges(EdgesBySource),
    Explore(ExploreData),
    Labels(Vec<String>),
    Error(String),
}

impl EngineResponse {
    /// Variant tag, for log messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nodes(_) => "Nodes",
            Self::Edges(_) => "Edges",
            Self::Explore(_) => "Explore",
            Self::Labels(_) => "Labels",
            Self::Error(_) => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edges_response_uses_string_keys() {
        let value = json!({
            "type": "Edges",
            "data": {
                "1": {"edges": [[2, "RelatedTo"]], "written_at": 40},
                "7": {"edges": [], "written_at": 41}
            }
        });
        let response: EngineResponse = serde_json::from_value(value).unwrap();
        let EngineResponse::Edges(edges) = response else {
            panic!("expected edges");
        };
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[&NodeId::new(1)].edges[0].0, NodeId::new(2));
        assert!(edges[&NodeId::new(7)].edges.is_empty());
    }

    fn edges_body(type_first: bool) -> String {
        let data = r#"{"3": {"edges": [[4, "BelongsTo"]], "written_at": 9}}"#;
        if type_first {
            format!(r#"{{"type": "Edges", "data": {data}}}"#)
        } else {
            format!(r#"{{"data": {data}, "type": "Edges"}}"#)
        }
    }

    fn explore_body(type_first: bool) -> String {
        let data = r#"{
            "nodes": [],
            "edges": {"3": {"edges": [[4, "BelongsTo"]], "written_at": 9}},
            "sibling_nodes": [[4, 5]]
        }"#;
        if type_first {
            format!(r#"{{"type": "Explore", "data": {data}}}"#)
        } else {
            format!(r#"{{"data": {data}, "type": "Explore"}}"#)
        }
    }

    #[test]
    fn edges_decode_with_either_key_order() {
        for type_first in [true, false] {
            let response: EngineResponse = serde_json::from_str(&edges_body(type_first)).unwrap();
            let EngineResponse::Edges(edges) = response else {
                panic!("expected edges");
            };
            assert_eq!(edges[&NodeId::new(3)].edges[0].0, NodeId::new(4));
        }
    }

    #[test]
    fn explore_decodes_with_either_key_order() {
        for type_first in [true, false] {
            let response: EngineResponse = serde_json::from_str(&explore_body(type_first)).unwrap();
            let EngineResponse::Explore(data) = response else {
                panic!("expected explore");
            };
            assert_eq!(data.edges[&NodeId::new(3)].written_at, 9);
            assert_eq!(data.sibling_nodes, vec![vec![NodeId::new(4), NodeId::new(5)]]);
        }
    }

    #[test]
    fn explore_response_decodes_sibling_groups() {
        let value = json!({
            "type": "Explore",
            "data": {
                "nodes": [],
                "edges": {},
                "sibling_nodes": [[2, 3], [5, 6, 7]]
            }
        });
        let response: EngineResponse = serde_json::from_value(value).unwrap();
        let EngineResponse::Explore(data) = response else {
            panic!("expected explore");
        };
        assert_eq!(data.sibling_nodes.len(), 2);
        assert_eq!(data.sibling_nodes[1], vec![NodeId::new(5), NodeId::new(6), NodeId::new(7)]);
    }

    #[test]
    fn error_response_decodes() {
        let response: EngineResponse =
            serde_json::from_value(json!({"type": "Error", "data": "no such project"})).unwrap();
        assert_eq!(response.kind(), "Error");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result = serde_json::from_value::<EngineResponse>(json!({"type": "Bogus", "data": 1}));
        assert!(result.is_err());
    }
}
