use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discriminant of an asset's content, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Audio,
    Text,
    Mesh3d,
    Story,
}

/// What an asset carries: a media URL, or a structured story document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AssetContent {
    Image { url: String },
    Video { url: String },
    Audio { url: String },
    Text { url: String },
    Mesh3d { url: String },
    Story {
        #[serde(rename = "storyData")]
        story_data: StoryData,
    },
}

impl AssetContent {
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetContent::Image { .. } => AssetKind::Image,
            AssetContent::Video { .. } => AssetKind::Video,
            AssetContent::Audio { .. } => AssetKind::Audio,
            AssetContent::Text { .. } => AssetKind::Text,
            AssetContent::Mesh3d { .. } => AssetKind::Mesh3d,
            AssetContent::Story { .. } => AssetKind::Story,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            AssetContent::Image { url }
            | AssetContent::Video { url }
            | AssetContent::Audio { url }
            | AssetContent::Text { url }
            | AssetContent::Mesh3d { url } => Some(url),
            AssetContent::Story { .. } => None,
        }
    }
}

/// A produced or saved artifact. Independent of any board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub content: AssetContent,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Asset {
    pub fn media(id: impl Into<String>, content: AssetContent) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            content,
            metadata: Map::new(),
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> AssetKind {
        self.content.kind()
    }

    pub fn story_data(&self) -> Option<&StoryData> {
        match &self.content {
            AssetContent::Story { story_data } => Some(story_data),
            _ => None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A character entry of a story document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryCharacter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload of a story asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub characters: Vec<StoryCharacter>,
    #[serde(default)]
    pub outline: Option<String>,
}

impl StoryData {
    pub fn has_outline(&self) -> bool {
        self.outline.as_deref().is_some_and(|o| !o.is_empty())
    }
}
