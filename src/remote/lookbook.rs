//! The fashion lookbook store: lookbooks, garments, colorways and outfits
//! mirrored from the lookbook service.

use super::{ListQuery, RemoteCollection, Resource, ResourceApi, ResourcePatch};
use crate::error::RemoteError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookbook {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub outfit_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookbookDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Garment {
    pub id: String,
    pub name: String,
    /// Garment class, e.g. "top" or "outerwear".
    pub category: String,
    #[serde(default)]
    pub colorway_ids: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarmentDraft {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub colorway_ids: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colorway {
    pub id: String,
    pub name: String,
    /// Hex color codes, primary first.
    #[serde(default)]
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorwayDraft {
    pub name: String,
    #[serde(default)]
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub garment_ids: Vec<String>,
    #[serde(default)]
    pub lookbook_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitDraft {
    pub name: String,
    #[serde(default)]
    pub garment_ids: Vec<String>,
    #[serde(default)]
    pub lookbook_id: Option<String>,
}

macro_rules! impl_resource {
    ( $( ($record:ty, $draft:ty) ),* $(,)? ) => {
        $(
            impl Resource for $record {
                type Draft = $draft;
                fn id(&self) -> &str { &self.id }
            }
        )*
    };
}

impl_resource! {
    (Lookbook, LookbookDraft),
    (Garment, GarmentDraft),
    (Colorway, ColorwayDraft),
    (Outfit, OutfitDraft),
}

/// A client able to serve all four lookbook resources.
pub trait LookbookApi:
    ResourceApi<Lookbook> + ResourceApi<Garment> + ResourceApi<Colorway> + ResourceApi<Outfit>
{
}

impl<T> LookbookApi for T where
    T: ResourceApi<Lookbook> + ResourceApi<Garment> + ResourceApi<Colorway> + ResourceApi<Outfit>
{
}

/// Generates the list/get/create/update/delete wrappers for one collection.
macro_rules! collection_ops {
    (
        $field:ident: $record:ty, $draft:ty,
        $fetch:ident, $fetch_one:ident, $create:ident, $update:ident, $delete:ident
    ) => {
        pub fn $field(&self) -> &RemoteCollection<$record> {
            &self.$field
        }

        pub async fn $fetch(&self, query: &ListQuery) -> Result<Vec<$record>, RemoteError> {
            self.$field.fetch(&self.api, query).await
        }

        pub async fn $fetch_one(&self, id: &str) -> Result<$record, RemoteError> {
            self.$field.fetch_one(&self.api, id).await
        }

        pub async fn $create(&self, draft: $draft) -> Result<$record, RemoteError> {
            self.$field.create(&self.api, draft).await
        }

        pub async fn $update(
            &self,
            id: &str,
            patch: ResourcePatch,
        ) -> Result<$record, RemoteError> {
            self.$field.update(&self.api, id, patch).await
        }

        pub async fn $delete(&self, id: &str) -> Result<(), RemoteError> {
            self.$field.delete(&self.api, id).await
        }
    };
}

/// Lookbook service state with one loading flag per collection.
pub struct LookbookStore<A> {
    api: A,
    lookbooks: RemoteCollection<Lookbook>,
    garments: RemoteCollection<Garment>,
    colorways: RemoteCollection<Colorway>,
    outfits: RemoteCollection<Outfit>,
}

impl<A: LookbookApi> LookbookStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            lookbooks: RemoteCollection::new("lookbooks"),
            garments: RemoteCollection::new("garments"),
            colorways: RemoteCollection::new("colorways"),
            outfits: RemoteCollection::new("outfits"),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// True while any collection has a call in flight.
    pub fn is_loading(&self) -> bool {
        self.lookbooks.is_loading()
            || self.garments.is_loading()
            || self.colorways.is_loading()
            || self.outfits.is_loading()
    }

    collection_ops!(lookbooks: Lookbook, LookbookDraft,
        fetch_lookbooks, fetch_lookbook, create_lookbook, update_lookbook, delete_lookbook);
    collection_ops!(garments: Garment, GarmentDraft,
        fetch_garments, fetch_garment, create_garment, update_garment, delete_garment);
    collection_ops!(colorways: Colorway, ColorwayDraft,
        fetch_colorways, fetch_colorway, create_colorway, update_colorway, delete_colorway);
    collection_ops!(outfits: Outfit, OutfitDraft,
        fetch_outfits, fetch_outfit, create_outfit, update_outfit, delete_outfit);

    /// Outfits of the given lookbook among those already fetched.
    pub fn outfits_in(&self, lookbook_id: &str) -> Vec<Outfit> {
        self.outfits
            .items()
            .into_iter()
            .filter(|o| o.lookbook_id.as_deref() == Some(lookbook_id))
            .collect()
    }
}
