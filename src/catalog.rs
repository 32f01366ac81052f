//! Read-only table of node kinds consulted by rendering and execution layers.
//!
//! The store never validates `CanvasNode::node_type` against this table; the
//! catalog exists so callers can resolve display metadata, parameter schemas
//! and agent bindings for a node, and to instantiate fresh nodes.

use crate::model::{CanvasNode, Category, NodeData, Port, PortType, Position};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Declares one port of a node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    pub id: String,
    pub label: String,
    pub port_type: PortType,
    #[serde(default)]
    pub required: bool,
}

impl PortSpec {
    pub fn new(id: &str, label: &str, port_type: PortType) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            port_type,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn to_port(&self) -> Port {
        Port {
            id: self.id.clone(),
            label: self.label.clone(),
            port_type: self.port_type,
            required: self.required,
        }
    }
}

/// Value domain of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ParamKind {
    Text { multiline: bool },
    Number { min: Option<f64>, max: Option<f64> },
    Boolean,
    Select { options: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSchema {
    pub name: String,
    pub label: String,
    pub kind: ParamKind,
    pub default: Value,
}

impl ParamSchema {
    pub fn new(name: &str, label: &str, kind: ParamKind, default: Value) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            default,
        }
    }
}

/// Backend endpoint a node kind is executed by, plus its static configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentBinding {
    pub endpoint: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl AgentBinding {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            config: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.config.insert(key.to_string(), value);
        self
    }
}

/// Catalog entry for one node `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeKind {
    pub type_name: String,
    pub label: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub inputs: Vec<PortSpec>,
    #[serde(default)]
    pub outputs: Vec<PortSpec>,
    #[serde(default)]
    pub params: Vec<ParamSchema>,
    #[serde(default)]
    pub agent: Option<AgentBinding>,
}

impl NodeKind {
    pub fn new(type_name: &str, label: &str, category: Category) -> Self {
        Self {
            type_name: type_name.to_string(),
            label: label.to_string(),
            category,
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            params: Vec::new(),
            agent: None,
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn input(mut self, port: PortSpec) -> Self {
        self.inputs.push(port);
        self
    }

    pub fn output(mut self, port: PortSpec) -> Self {
        self.outputs.push(port);
        self
    }

    pub fn param(mut self, param: ParamSchema) -> Self {
        self.params.push(param);
        self
    }

    pub fn agent(mut self, agent: AgentBinding) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Parameter map filled with each schema's default value.
    pub fn default_params(&self) -> Map<String, Value> {
        self.params
            .iter()
            .map(|p| (p.name.clone(), p.default.clone()))
            .collect()
    }
}

pub struct NodeCatalogBuilder {
    kinds: AHashMap<String, NodeKind>,
}

impl NodeCatalogBuilder {
    pub fn new() -> Self {
        let mut kinds = AHashMap::new();
        register_default_kinds(&mut kinds);
        Self { kinds }
    }

    /// Starts from an empty table, without the built-in kinds.
    pub fn empty() -> Self {
        Self {
            kinds: AHashMap::new(),
        }
    }

    /// Adds or replaces a kind.
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kinds.insert(kind.type_name.clone(), kind);
        self
    }

    pub fn build(self) -> NodeCatalog {
        NodeCatalog { kinds: self.kinds }
    }
}

impl Default for NodeCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable once built.
#[derive(Debug, Clone)]
pub struct NodeCatalog {
    kinds: AHashMap<String, NodeKind>,
}

impl Default for NodeCatalog {
    fn default() -> Self {
        NodeCatalogBuilder::new().build()
    }
}

impl NodeCatalog {
    pub fn builder() -> NodeCatalogBuilder {
        NodeCatalogBuilder::new()
    }

    pub fn get(&self, type_name: &str) -> Option<&NodeKind> {
        self.kinds.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// All kinds, sorted by type name.
    pub fn kinds(&self) -> Vec<&NodeKind> {
        let mut kinds: Vec<_> = self.kinds.values().collect();
        kinds.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        kinds
    }

    pub fn in_category(&self, category: Category) -> Vec<&NodeKind> {
        self.kinds()
            .into_iter()
            .filter(|k| k.category == category)
            .collect()
    }

    pub fn agent_binding(&self, type_name: &str) -> Option<&AgentBinding> {
        self.get(type_name).and_then(|k| k.agent.as_ref())
    }

    /// Creates a node of `type_name` with default parameters and declared ports.
    pub fn instantiate(&self, type_name: &str, id: &str, position: Position) -> Option<CanvasNode> {
        let kind = self.get(type_name)?;
        Some(CanvasNode {
            id: id.to_string(),
            node_type: kind.type_name.clone(),
            position,
            data: NodeData {
                label: kind.label.clone(),
                node_type: kind.type_name.clone(),
                params: kind.default_params(),
                inputs: kind.inputs.iter().map(PortSpec::to_port).collect(),
                outputs: kind.outputs.iter().map(PortSpec::to_port).collect(),
                ..NodeData::default()
            },
        })
    }
}

fn prompt_param() -> ParamSchema {
    ParamSchema::new(
        "prompt",
        "Prompt",
        ParamKind::Text { multiline: true },
        json!(""),
    )
}

fn register_default_kinds(kinds: &mut AHashMap<String, NodeKind>) {
    let defaults = [
        NodeKind::new("textPrompt", "Text Prompt", Category::Image)
            .describe("Free text passed downstream as a prompt")
            .output(PortSpec::new("text", "Text", PortType::Text))
            .param(prompt_param()),
        NodeKind::new("imageGen", "Image Generator", Category::Image)
            .input(PortSpec::new("prompt", "Prompt", PortType::Text).required())
            .input(PortSpec::new("style", "Style", PortType::Style))
            .output(PortSpec::new("image", "Image", PortType::Image))
            .param(prompt_param())
            .param(ParamSchema::new(
                "aspectRatio",
                "Aspect ratio",
                ParamKind::Select {
                    options: vec!["1:1".into(), "16:9".into(), "9:16".into()],
                },
                json!("1:1"),
            ))
            .agent(AgentBinding::new("image-generation").with("model", json!("default"))),
        NodeKind::new("upscale", "Upscale", Category::Image)
            .input(PortSpec::new("image", "Image", PortType::Image).required())
            .output(PortSpec::new("image", "Image", PortType::Image))
            .param(ParamSchema::new(
                "factor",
                "Factor",
                ParamKind::Number {
                    min: Some(1.0),
                    max: Some(4.0),
                },
                json!(2),
            ))
            .agent(AgentBinding::new("image-upscale")),
        NodeKind::new("garment", "Garment", Category::Fashion)
            .input(PortSpec::new("character", "Model", PortType::Character))
            .input(PortSpec::new("style", "Style", PortType::Style))
            .output(PortSpec::new("image", "Look", PortType::Image))
            .param(prompt_param())
            .agent(AgentBinding::new("fashion-agent")),
        NodeKind::new("character", "Character", Category::Character)
            .output(PortSpec::new("character", "Character", PortType::Character))
            .param(ParamSchema::new(
                "name",
                "Name",
                ParamKind::Text { multiline: false },
                json!(""),
            )),
        NodeKind::new("videoGen", "Video Generator", Category::Video)
            .input(PortSpec::new("image", "First frame", PortType::Image))
            .input(PortSpec::new("prompt", "Prompt", PortType::Text))
            .output(PortSpec::new("video", "Video", PortType::Video))
            .param(ParamSchema::new(
                "duration",
                "Duration (s)",
                ParamKind::Number {
                    min: Some(1.0),
                    max: Some(30.0),
                },
                json!(5),
            ))
            .agent(AgentBinding::new("video-generation")),
        NodeKind::new("audioGen", "Audio Generator", Category::Audio)
            .input(PortSpec::new("prompt", "Prompt", PortType::Text).required())
            .output(PortSpec::new("audio", "Audio", PortType::Audio))
            .param(ParamSchema::new(
                "loop",
                "Loop",
                ParamKind::Boolean,
                json!(false),
            ))
            .agent(AgentBinding::new("audio-generation")),
        NodeKind::new("storyWriter", "Story Writer", Category::Story)
            .input(PortSpec::new("character", "Characters", PortType::Character))
            .output(PortSpec::new("text", "Story", PortType::Text))
            .param(ParamSchema::new(
                "genre",
                "Genre",
                ParamKind::Text { multiline: false },
                json!(""),
            ))
            .param(ParamSchema::new(
                "tone",
                "Tone",
                ParamKind::Text { multiline: false },
                json!(""),
            ))
            .agent(AgentBinding::new("story-agent")),
        NodeKind::new("meshGen", "3D Mesh", Category::Mesh3d)
            .input(PortSpec::new("image", "Reference", PortType::Image).required())
            .output(PortSpec::new("mesh", "Mesh", PortType::Mesh3d))
            .agent(AgentBinding::new("mesh-generation")),
        NodeKind::new("output", "Output", Category::Image)
            .describe("Collects any upstream result")
            .input(PortSpec::new("value", "Value", PortType::Any)),
    ];

    for kind in defaults {
        kinds.insert(kind.type_name.clone(), kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiate_copies_ports_and_defaults() {
        let catalog = NodeCatalog::default();
        let node = catalog
            .instantiate("imageGen", "n1", Position::new(10.0, 20.0))
            .unwrap();

        assert_eq!(node.node_type, "imageGen");
        assert_eq!(node.data.node_type, "imageGen");
        assert_eq!(node.data.inputs.len(), 2);
        assert!(node.input("prompt").unwrap().required);
        assert_eq!(node.data.params["aspectRatio"], json!("1:1"));
    }

    #[test]
    fn unknown_kind_is_none() {
        assert!(NodeCatalog::default().instantiate("nope", "n", Position::default()).is_none());
    }

    #[test]
    fn custom_kinds_extend_or_replace() {
        let catalog = NodeCatalog::builder()
            .with_kind(NodeKind::new("upscale", "Better Upscale", Category::Image))
            .with_kind(NodeKind::new("colorway", "Colorway", Category::Fashion))
            .build();

        assert_eq!(catalog.get("upscale").unwrap().label, "Better Upscale");
        assert!(catalog.get("upscale").unwrap().agent.is_none());
        assert!(catalog.in_category(Category::Fashion).len() >= 2);
    }
}
