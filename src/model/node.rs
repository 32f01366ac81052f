use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The closed set of data types a port can carry. Used for compatibility
/// display only; the store never rejects a connection on port type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    Image,
    Video,
    Audio,
    Text,
    Style,
    Character,
    Mesh3d,
    Any,
}

impl PortType {
    /// Whether a value of `self` can be displayed as connectable to `other`.
    pub fn is_compatible_with(self, other: PortType) -> bool {
        self == PortType::Any || other == PortType::Any || self == other
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PortType::Image => "image",
            PortType::Video => "video",
            PortType::Audio => "audio",
            PortType::Text => "text",
            PortType::Style => "style",
            PortType::Character => "character",
            PortType::Mesh3d => "mesh3d",
            PortType::Any => "any",
        };
        write!(f, "{}", name)
    }
}

/// A typed connection point on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub port_type: PortType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

/// Per-node run status, written by the execution layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Queued,
    Running,
    Completed,
    Error,
}

/// Location of a node in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    /// Catalog key of the node kind; mirrors `CanvasNode::node_type`.
    #[serde(default)]
    pub node_type: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub inputs: Vec<Port>,
    #[serde(default)]
    pub outputs: Vec<Port>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A vertex of the working graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
}

impl CanvasNode {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        let node_type = node_type.into();
        Self {
            id: id.into(),
            data: NodeData {
                node_type: node_type.clone(),
                ..NodeData::default()
            },
            node_type,
            position: Position::default(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn input(&self, port_id: &str) -> Option<&Port> {
        self.data.inputs.iter().find(|p| p.id == port_id)
    }

    pub fn output(&self, port_id: &str) -> Option<&Port> {
        self.data.outputs.iter().find(|p| p.id == port_id)
    }
}

/// Shallow partial update for a node: each `Some` replaces the field wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub node_type: Option<String>,
    pub position: Option<Position>,
    pub data: Option<NodeData>,
}

impl NodePatch {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn data(data: NodeData) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, node: &mut CanvasNode) {
        if let Some(node_type) = self.node_type {
            node.node_type = node_type;
        }
        if let Some(position) = self.position {
            node.position = position;
        }
        if let Some(data) = self.data {
            node.data = data;
        }
    }
}
