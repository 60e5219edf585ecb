//! Persisted catalog of posts, tags and table of contents entries.
//!
//! The [`CatalogStore`] trait is everything the reconciler needs from a
//! storage backend. [`memory::MemoryCatalog`] keeps it all in memory,
//! [`json_file::JsonCatalog`] persists the same data to a JSON file.

use std::collections::BTreeSet;
use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

pub mod json_file;
pub mod memory;
pub mod query;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PostId(pub Uuid);

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TagId(pub Uuid);

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TocEntryId(pub Uuid);

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Always `slugify(title)`, recomputed by the store on every save.
    pub slug: String,
    pub intro: String,
    pub body: String,
    pub publish_date: NaiveDate,
    pub last_update: Option<NaiveDate>,
    pub tags: Vec<TagId>,
    pub toc: Vec<TocEntryId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// One heading of a post's table of contents.
///
/// Rows are looked up by `(content, order, slug)`, so posts with the same
/// heading at the same position share a row. `slug` is unique in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: TocEntryId,
    pub content: String,
    pub order: u32,
    pub slug: String,
}

/// Values written by [`CatalogStore::create_post`] and [`CatalogStore::update_post`].
/// There is no slug here, the store derives it from the title.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub intro: String,
    pub body: String,
    pub publish_date: NaiveDate,
    pub last_update: Option<NaiveDate>,
    pub tags: Vec<TagId>,
    pub toc: Vec<TocEntryId>,
}

pub trait CatalogStore {
    fn list_all_posts(&self) -> StoreResult<Vec<Post>>;

    fn find_post_by_slug(&self, slug: &str) -> StoreResult<Option<Post>>;

    fn create_post(&mut self, fields: PostFields) -> StoreResult<PostId>;

    /// Replaces every field of the post, associations included.
    fn update_post(&mut self, id: PostId, fields: PostFields) -> StoreResult<()>;

    /// Returns how many posts were deleted.
    fn delete_posts_with_slug_in(&mut self, slugs: &BTreeSet<String>) -> StoreResult<usize>;

    fn get_or_create_tag(&mut self, name: &str) -> StoreResult<TagId>;

    fn delete_tags_with_no_posts(&mut self) -> StoreResult<usize>;

    fn get_or_create_toc_entry(&mut self, content: &str, order: u32, slug: &str) -> StoreResult<TocEntryId>;

    fn delete_toc_entries_with_no_posts(&mut self) -> StoreResult<usize>;

    fn list_all_tags(&self) -> StoreResult<Vec<Tag>>;

    /// Tags of a post, in association order.
    fn tags_of(&self, post: &Post) -> StoreResult<Vec<Tag>>;

    /// Table of contents of a post, in association order.
    fn toc_of(&self, post: &Post) -> StoreResult<Vec<TocEntry>>;
}
