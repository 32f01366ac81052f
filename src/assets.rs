use crate::model::{Asset, AssetContent, AssetKind, StoryData};
use chrono::Utc;
use itertools::Itertools;
use serde_json::{Map, Value, json};
use tracing::debug;
use uuid::Uuid;

/// Name given to a story saved without a title.
pub const UNTITLED_STORY: &str = "Untitled Story";

/// Flat collection of produced artifacts, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    assets: Vec<Asset>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn assets_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Asset> + 'a {
        self.assets.iter().filter(move |a| a.has_tag(tag))
    }

    pub fn assets_of_kind(&self, kind: AssetKind) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(move |a| a.kind() == kind)
    }

    pub fn stories(&self) -> impl Iterator<Item = &Asset> {
        self.assets_of_kind(AssetKind::Story)
    }

    /// Inserts an asset. An asset with the same id is replaced in place.
    pub fn add_asset(&mut self, asset: Asset) {
        debug!(asset_id = %asset.id, kind = ?asset.kind(), "add_asset");
        match self.assets.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
    }

    /// Removes an asset by id. Absent ids are a no-op.
    pub fn remove_asset(&mut self, id: &str) -> Option<Asset> {
        let index = self.assets.iter().position(|a| a.id == id)?;
        debug!(asset_id = id, "remove_asset");
        Some(self.assets.remove(index))
    }

    /// Replaces an asset's tags, dropping empty entries and duplicates.
    pub fn update_asset_tags(&mut self, id: &str, tags: Vec<String>) -> bool {
        match self.assets.iter_mut().find(|a| a.id == id) {
            Some(asset) => {
                asset.tags = clean_tags(tags);
                true
            }
            None => false,
        }
    }

    /// Builds a story asset from `story`, appends it and returns it.
    ///
    /// Tags are the caller's tags followed by the story's genre and tone, with
    /// empty entries and repeats dropped.
    pub fn save_story(&mut self, story: StoryData, tags: Vec<String>) -> Asset {
        let name = story
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_STORY)
            .to_string();

        let tags = clean_tags(
            tags.into_iter()
                .chain(story.genre.clone())
                .chain(story.tone.clone()),
        );

        let asset = Asset {
            id: Uuid::new_v4().to_string(),
            name,
            metadata: story_metadata(&story),
            content: AssetContent::Story { story_data: story },
            tags,
            created_at: Utc::now(),
        };
        debug!(asset_id = %asset.id, name = %asset.name, "save_story");
        self.assets.push(asset.clone());
        asset
    }
}

fn story_metadata(story: &StoryData) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("genre".to_string(), json!(story.genre));
    metadata.insert("tone".to_string(), json!(story.tone));
    metadata.insert("characterCount".to_string(), json!(story.characters.len()));
    metadata.insert("hasOutline".to_string(), json!(story.has_outline()));
    metadata
}

fn clean_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    tags.into_iter()
        .filter(|t| !t.is_empty())
        .unique()
        .collect()
}
