use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use spdlog::debug;

use crate::catalog::memory::MemoryCatalog;
use crate::catalog::{CatalogStore, Post, PostFields, PostId, StoreResult, Tag, TagId, TocEntry, TocEntryId};
use crate::error::StoreError;

/// A [`MemoryCatalog`] saved to a JSON file after every write.
///
/// Each write is persisted on its own, so an aborted pass leaves the file
/// with everything applied up to the failure.
#[derive(Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    catalog: MemoryCatalog,
}

impl JsonCatalog {
    /// Opens the catalog at `path`. A missing file is an empty catalog.
    pub fn open(path: &Path) -> StoreResult<JsonCatalog> {
        let catalog = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| StoreError::Json(path.to_path_buf(), e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Catalog file {} not found, starting empty", path.display());
                MemoryCatalog::new()
            }
            Err(e) => return Err(StoreError::Io(path.to_path_buf(), e)),
        };

        Ok(JsonCatalog {
            path: path.to_path_buf(),
            catalog,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writes(&self) -> u64 {
        self.catalog.writes()
    }

    fn save(&self) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(&self.catalog)
            .map_err(|e| StoreError::Json(self.path.clone(), e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
            }
        }

        // sibling file first, then rename over the target
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|e| StoreError::Io(tmp_path.clone(), e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Io(self.path.clone(), e))
    }

    /// Runs a write on the inner catalog and saves only if it changed something.
    fn write<T>(&mut self, op: impl FnOnce(&mut MemoryCatalog) -> StoreResult<T>) -> StoreResult<T> {
        let before = self.catalog.writes();
        let res = op(&mut self.catalog)?;
        if self.catalog.writes() != before {
            self.save()?;
        }
        Ok(res)
    }
}

impl CatalogStore for JsonCatalog {
    fn list_all_posts(&self) -> StoreResult<Vec<Post>> {
        self.catalog.list_all_posts()
    }

    fn find_post_by_slug(&self, slug: &str) -> StoreResult<Option<Post>> {
        self.catalog.find_post_by_slug(slug)
    }

    fn create_post(&mut self, fields: PostFields) -> StoreResult<PostId> {
        self.write(|c| c.create_post(fields))
    }

    fn update_post(&mut self, id: PostId, fields: PostFields) -> StoreResult<()> {
        self.write(|c| c.update_post(id, fields))
    }

    fn delete_posts_with_slug_in(&mut self, slugs: &BTreeSet<String>) -> StoreResult<usize> {
        self.write(|c| c.delete_posts_with_slug_in(slugs))
    }

    fn get_or_create_tag(&mut self, name: &str) -> StoreResult<TagId> {
        self.write(|c| c.get_or_create_tag(name))
    }

    fn delete_tags_with_no_posts(&mut self) -> StoreResult<usize> {
        self.write(|c| c.delete_tags_with_no_posts())
    }

    fn get_or_create_toc_entry(&mut self, content: &str, order: u32, slug: &str) -> StoreResult<TocEntryId> {
        self.write(|c| c.get_or_create_toc_entry(content, order, slug))
    }

    fn delete_toc_entries_with_no_posts(&mut self) -> StoreResult<usize> {
        self.write(|c| c.delete_toc_entries_with_no_posts())
    }

    fn list_all_tags(&self) -> StoreResult<Vec<Tag>> {
        self.catalog.list_all_tags()
    }

    fn tags_of(&self, post: &Post) -> StoreResult<Vec<Tag>> {
        self.catalog.tags_of(post)
    }

    fn toc_of(&self, post: &Post) -> StoreResult<Vec<TocEntry>> {
        self.catalog.toc_of(post)
    }
}
