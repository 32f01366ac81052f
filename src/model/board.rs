use super::{CanvasEdge, CanvasNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of domains a board can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Fashion,
    Image,
    Video,
    Audio,
    Story,
    Character,
    Mesh3d,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Fashion,
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Story,
        Category::Character,
        Category::Mesh3d,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fashion => "fashion",
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Story => "story",
            Category::Character => "character",
            Category::Mesh3d => "mesh3d",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Pan/zoom state of the canvas. Opaque to the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// A named, categorized snapshot of one graph.
///
/// `nodes`/`edges` are a copy; while the board is active the graph store
/// holds the authoritative working graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
    #[serde(default)]
    pub viewport: Viewport,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a board; `updated_at` is always refreshed on apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub nodes: Option<Vec<CanvasNode>>,
    pub edges: Option<Vec<CanvasEdge>>,
    pub viewport: Option<Viewport>,
}

impl BoardPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn graph(nodes: Vec<CanvasNode>, edges: Vec<CanvasEdge>) -> Self {
        Self {
            nodes: Some(nodes),
            edges: Some(edges),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, board: &mut Board, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            board.name = name;
        }
        if let Some(category) = self.category {
            board.category = category;
        }
        if let Some(nodes) = self.nodes {
            board.nodes = nodes;
        }
        if let Some(edges) = self.edges {
            board.edges = edges;
        }
        if let Some(viewport) = self.viewport {
            board.viewport = viewport;
        }
        board.updated_at = now;
    }
}
