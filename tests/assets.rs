use canvas_store::assets::UNTITLED_STORY;
use canvas_store::prelude::*;

fn story(title: Option<&str>, genre: Option<&str>, tone: Option<&str>) -> StoryData {
    StoryData {
        title: title.map(String::from),
        genre: genre.map(String::from),
        tone: tone.map(String::from),
        ..StoryData::default()
    }
}

#[test]
fn test_save_story_tags_and_name() {
    let mut store = CanvasStore::in_memory();

    let asset = store.save_story(
        story(Some("T"), Some(""), Some("Dark")),
        vec!["x".to_string()],
    );

    assert_eq!(asset.name, "T");
    assert_eq!(asset.tags, vec!["x".to_string(), "Dark".to_string()]);
    assert_eq!(asset.kind(), AssetKind::Story);
    assert_eq!(store.assets().len(), 1);
    assert_eq!(store.assets().assets().last(), Some(&asset));
}

#[test]
fn test_save_story_without_title_uses_placeholder() {
    let mut library = AssetLibrary::new();

    let untitled = library.save_story(story(None, None, None), Vec::new());
    let empty = library.save_story(story(Some(""), None, None), Vec::new());

    assert_eq!(untitled.name, UNTITLED_STORY);
    assert_eq!(empty.name, UNTITLED_STORY);
    assert!(untitled.tags.is_empty());
    assert_ne!(untitled.id, empty.id);
}

#[test]
fn test_save_story_only_drops_empty_strings() {
    let mut library = AssetLibrary::new();

    let asset = library.save_story(
        story(Some(" "), Some(" "), Some("")),
        vec!["".to_string(), "x".to_string()],
    );

    assert_eq!(asset.name, " ");
    assert_eq!(asset.tags, vec!["x".to_string(), " ".to_string()]);
}

#[test]
fn test_save_story_drops_repeated_tags() {
    let mut library = AssetLibrary::new();

    let asset = library.save_story(
        story(Some("Noir"), Some("mystery"), Some("mystery")),
        vec!["mystery".to_string(), "".to_string(), "city".to_string()],
    );

    assert_eq!(asset.tags, vec!["mystery".to_string(), "city".to_string()]);
}

#[test]
fn test_save_story_metadata() {
    let mut library = AssetLibrary::new();
    let data = StoryData {
        title: Some("Voyage".to_string()),
        genre: Some("sci-fi".to_string()),
        characters: vec![
            StoryCharacter {
                name: "Ada".to_string(),
                ..StoryCharacter::default()
            },
            StoryCharacter {
                name: "Brook".to_string(),
                role: Some("pilot".to_string()),
                ..StoryCharacter::default()
            },
        ],
        outline: Some("Act one".to_string()),
        ..StoryData::default()
    };

    let asset = library.save_story(data.clone(), Vec::new());

    assert_eq!(asset.metadata["characterCount"], 2);
    assert_eq!(asset.metadata["hasOutline"], true);
    assert_eq!(asset.metadata["genre"], "sci-fi");
    assert!(asset.metadata["tone"].is_null());
    assert_eq!(asset.story_data(), Some(&data));
}

#[test]
fn test_library_queries() {
    let mut store = CanvasStore::in_memory();
    let mut image = Asset::media(
        "img-1",
        AssetContent::Image {
            url: "https://cdn.example/img-1.png".to_string(),
        },
    );
    image.tags = vec!["hero".to_string()];
    store.add_asset(image);
    store.save_story(story(Some("T"), None, None), vec!["hero".to_string()]);

    assert_eq!(store.assets().assets_with_tag("hero").count(), 2);
    assert_eq!(store.assets().assets_of_kind(AssetKind::Image).count(), 1);
    assert_eq!(store.assets().stories().count(), 1);
    assert_eq!(
        store.assets().asset("img-1").and_then(|a| a.content.url()),
        Some("https://cdn.example/img-1.png")
    );

    assert!(store.update_asset_tags("img-1", vec!["final".to_string()]));
    assert!(store.assets().asset("img-1").unwrap().has_tag("final"));
    assert!(!store.update_asset_tags("missing", Vec::new()));

    assert!(store.remove_asset("img-1").is_some());
    assert!(store.remove_asset("img-1").is_none());
    assert_eq!(store.assets().len(), 1);
}

#[test]
fn test_asset_wire_format() {
    let asset = Asset::media(
        "a1",
        AssetContent::Video {
            url: "https://cdn.example/a1.mp4".to_string(),
        },
    );

    let json = serde_json::to_value(&asset).unwrap();

    assert_eq!(json["type"], "video");
    assert_eq!(json["url"], "https://cdn.example/a1.mp4");
    assert!(json.get("createdAt").is_some());
}
