use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{CatalogStore, Post, PostFields, PostId, StoreResult, Tag, TagId, TocEntry, TocEntryId};
use crate::error::StoreError;
use crate::slug::slugify;

/// Catalog held in memory. Also the on-disk shape of [`JsonCatalog`](super::json_file::JsonCatalog).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MemoryCatalog {
    posts: Vec<Post>,
    tags: Vec<Tag>,
    toc_entries: Vec<TocEntry>,
    #[serde(skip)]
    writes: u64,
}

/// Set semantics for associations: first occurrence wins.
fn dedup<T: PartialEq + Copy>(ids: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows created, changed or deleted since this catalog was loaded.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn check_post_slug(&self, slug: &str, owner: Option<PostId>) -> StoreResult<()> {
        let taken = self.posts.iter().any(|p| p.slug == slug && Some(p.id) != owner);
        if taken {
            return Err(StoreError::DuplicateSlug { kind: "post", slug: slug.to_string() });
        }
        Ok(())
    }

    fn is_tag_used(&self, id: TagId) -> bool {
        self.posts.iter().any(|p| p.tags.contains(&id))
    }

    fn is_toc_entry_used(&self, id: TocEntryId) -> bool {
        self.posts.iter().any(|p| p.toc.contains(&id))
    }
}

impl CatalogStore for MemoryCatalog {
    fn list_all_posts(&self) -> StoreResult<Vec<Post>> {
        Ok(self.posts.clone())
    }

    fn find_post_by_slug(&self, slug: &str) -> StoreResult<Option<Post>> {
        Ok(self.posts.iter().find(|p| p.slug == slug).cloned())
    }

    fn create_post(&mut self, fields: PostFields) -> StoreResult<PostId> {
        let slug = slugify(&fields.title);
        self.check_post_slug(&slug, None)?;

        let id = PostId(Uuid::new_v4());
        self.posts.push(Post {
            id,
            slug,
            title: fields.title,
            intro: fields.intro,
            body: fields.body,
            publish_date: fields.publish_date,
            last_update: fields.last_update,
            tags: dedup(fields.tags),
            toc: dedup(fields.toc),
        });
        self.writes += 1;

        Ok(id)
    }

    fn update_post(&mut self, id: PostId, fields: PostFields) -> StoreResult<()> {
        let slug = slugify(&fields.title);
        self.check_post_slug(&slug, Some(id))?;

        let post = self.posts.iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::PostNotFound(id))?;

        post.slug = slug;
        post.title = fields.title;
        post.intro = fields.intro;
        post.body = fields.body;
        post.publish_date = fields.publish_date;
        post.last_update = fields.last_update;
        post.tags = dedup(fields.tags);
        post.toc = dedup(fields.toc);
        self.writes += 1;

        Ok(())
    }

    fn delete_posts_with_slug_in(&mut self, slugs: &BTreeSet<String>) -> StoreResult<usize> {
        let before = self.posts.len();
        self.posts.retain(|p| !slugs.contains(&p.slug));
        let deleted = before - self.posts.len();
        self.writes += deleted as u64;
        Ok(deleted)
    }

    fn get_or_create_tag(&mut self, name: &str) -> StoreResult<TagId> {
        if let Some(tag) = self.tags.iter().find(|t| t.name == name) {
            return Ok(tag.id);
        }

        let id = TagId(Uuid::new_v4());
        self.tags.push(Tag { id, name: name.to_string() });
        self.writes += 1;
        Ok(id)
    }

    fn delete_tags_with_no_posts(&mut self) -> StoreResult<usize> {
        let orphans: Vec<TagId> = self.tags.iter()
            .map(|t| t.id)
            .filter(|id| !self.is_tag_used(*id))
            .collect();
        self.tags.retain(|t| !orphans.contains(&t.id));
        self.writes += orphans.len() as u64;
        Ok(orphans.len())
    }

    fn get_or_create_toc_entry(&mut self, content: &str, order: u32, slug: &str) -> StoreResult<TocEntryId> {
        let existing = self.toc_entries.iter()
            .find(|e| e.content == content && e.order == order && e.slug == slug);
        if let Some(entry) = existing {
            return Ok(entry.id);
        }

        if self.toc_entries.iter().any(|e| e.slug == slug) {
            return Err(StoreError::DuplicateSlug { kind: "table of contents", slug: slug.to_string() });
        }

        let id = TocEntryId(Uuid::new_v4());
        self.toc_entries.push(TocEntry {
            id,
            content: content.to_string(),
            order,
            slug: slug.to_string(),
        });
        self.writes += 1;
        Ok(id)
    }

    fn delete_toc_entries_with_no_posts(&mut self) -> StoreResult<usize> {
        let orphans: Vec<TocEntryId> = self.toc_entries.iter()
            .map(|e| e.id)
            .filter(|id| !self.is_toc_entry_used(*id))
            .collect();
        self.toc_entries.retain(|e| !orphans.contains(&e.id));
        self.writes += orphans.len() as u64;
        Ok(orphans.len())
    }

    fn list_all_tags(&self) -> StoreResult<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    fn tags_of(&self, post: &Post) -> StoreResult<Vec<Tag>> {
        Ok(post.tags.iter()
            .filter_map(|id| self.tags.iter().find(|t| t.id == *id))
            .cloned()
            .collect())
    }

    fn toc_of(&self, post: &Post) -> StoreResult<Vec<TocEntry>> {
        Ok(post.toc.iter()
            .filter_map(|id| self.toc_entries.iter().find(|e| e.id == *id))
            .cloned()
            .collect())
    }
}
