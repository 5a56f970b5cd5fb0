//! [crate::properties] contains the building blocks that flow between the store, the
//! reconciler and the renderer: [`Node`]s, [`Edge`]s and their identifiers.
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

pub use uuid::Uuid;

use crate::{
    config::UserOptions,
    error::TmapError,
    wiki::{Tiddler, FIELD_CAPTION},
};

/// Field names of a persisted edge document.
pub const EDGE_FIELD_ID: &str = "id";
pub const EDGE_FIELD_FROM: &str = "from";
pub const EDGE_FIELD_TO: &str = "to";
pub const EDGE_FIELD_LABEL: &str = "label";

pub type NodeId = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    /// Matched by the view's node filter.
    #[default]
    Matches,
    /// Pulled in as the far end of an edge touching a match.
    Neighbours,
    /// Injected by the graph itself (e.g. the focused document of a quick-connect view).
    Special,
}

impl Display for NodeGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeGroup::Matches => write!(f, "matches"),
            NodeGroup::Neighbours => write!(f, "neighbours"),
            NodeGroup::Special => write!(f, "special"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

pub type PositionMap = BTreeMap<NodeId, Position>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub group: NodeGroup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    /// Title of the source document.
    pub tref: String,
}

impl Node {
    pub fn from_tiddler(tiddler: &Tiddler, options: &UserOptions, group: NodeGroup) -> Node {
        Node {
            id: node_id_of(tiddler, options),
            label: tiddler
                .field(FIELD_CAPTION)
                .unwrap_or(tiddler.title.as_str())
                .to_string(),
            group,
            tref: tiddler.title.clone(),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: Option<&Position>) -> Node {
        if let Some(pos) = position {
            self.x = Some(pos.x);
            self.y = Some(pos.y);
        }
        self
    }

    pub fn position(&self) -> Option<Position> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Position { x, y }),
            _ => None,
        }
    }
}

/// Stable node id for a document: the configured id field when set, else the title.
pub fn node_id_of(tiddler: &Tiddler, options: &UserOptions) -> NodeId {
    tiddler
        .field(&options.field_node_id)
        .filter(|id| !id.is_empty())
        .unwrap_or(tiddler.title.as_str())
        .to_string()
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeId(Uuid);

impl EdgeId {
    pub fn generate() -> EdgeId {
        EdgeId(Uuid::new_v4())
    }
}

impl From<Uuid> for EdgeId {
    fn from(uuid: Uuid) -> Self {
        EdgeId(uuid)
    }
}

impl TryFrom<&str> for EdgeId {
    type Error = TmapError;

    fn try_from(string: &str) -> Result<Self, Self::Error> {
        Ok(EdgeId(Uuid::parse_str(string)?))
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.hyphenated().encode_lower(&mut Uuid::encode_buffer())
        )
    }
}

/// A directed, labeled relationship between two node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EdgeId>,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub label: String,
}

impl Edge {
    pub fn new<F: Into<String>, T: Into<String>, L: Into<String>>(from: F, to: T, label: L) -> Edge {
        Edge {
            id: None,
            from: from.into(),
            to: to.into(),
            label: label.into(),
        }
    }

    pub fn with_id(mut self, id: EdgeId) -> Edge {
        self.id = Some(id);
        self
    }

    /// Read an edge back from its persisted document.
    pub fn from_tiddler(tiddler: &Tiddler) -> Result<Edge, TmapError> {
        let field = |name: &str| {
            tiddler.field(name).map(|v| v.to_string()).ok_or_else(|| {
                TmapError::InvalidEdge(format!(
                    "edge document '{}' has no '{name}' field",
                    tiddler.title
                ))
            })
        };
        let id = EdgeId::try_from(field(EDGE_FIELD_ID)?.as_str())?;
        Ok(Edge {
            id: Some(id),
            from: field(EDGE_FIELD_FROM)?,
            to: field(EDGE_FIELD_TO)?,
            label: tiddler.field(EDGE_FIELD_LABEL).unwrap_or_default().to_string(),
        })
    }

    /// Document persisting this edge below `namespace`. Requires an id.
    pub fn to_tiddler(&self, namespace: &str) -> Result<Tiddler, TmapError> {
        let id = self
            .id
            .ok_or_else(|| TmapError::InvalidEdge("edge has no id".to_string()))?;
        Ok(Tiddler::new(edge_title(namespace, &self.label, &id))
            .with_field(EDGE_FIELD_ID, id.to_string())
            .with_field(EDGE_FIELD_FROM, self.from.clone())
            .with_field(EDGE_FIELD_TO, self.to.clone())
            .with_field(EDGE_FIELD_LABEL, self.label.clone()))
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}--[{}]-->{}", self.from, self.label, self.to)
    }
}

pub fn edge_title(namespace: &str, label: &str, id: &EdgeId) -> String {
    format!("{namespace}/{label}/{id}")
}
