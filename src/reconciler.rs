//! Keeps the catalog an exact mirror of the posts directory.
//!
//! One [`Reconciler::run`] reads every post file, creates or updates the
//! matching catalog post, deletes posts whose file is gone and finally drops
//! tags and table of contents entries no post refers to. Unchanged files cause
//! no write at all. The first error stops the pass; what was written before it
//! stays written.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use spdlog::{debug, info, warn};

use crate::catalog::{CatalogStore, Post, PostFields, StoreResult};
use crate::content::parsed_post::ParsedPost;
use crate::content::ParseError;
use crate::error::IngestError;
use crate::post_list::{SourceDir, SourceEntry};
use crate::slug::slugify;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
}

/// What a pass did, by post title, file or slug.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub skipped: Vec<PathBuf>,
    pub deleted_posts: Vec<String>,
    pub deleted_tags: usize,
    pub deleted_toc_entries: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
            && self.updated.is_empty()
            && self.deleted_posts.is_empty()
            && self.deleted_tags == 0
            && self.deleted_toc_entries == 0
    }
}

impl Display for SyncReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "created={}, updated={}, unchanged={}, skipped={}, deleted posts={}, deleted tags={}, deleted toc entries={}",
               self.created.len(),
               self.updated.len(),
               self.unchanged.len(),
               self.skipped.len(),
               self.deleted_posts.len(),
               self.deleted_tags,
               self.deleted_toc_entries
        )
    }
}

pub struct Reconciler {
    source: SourceDir,
}

impl Reconciler {
    pub fn new(source: SourceDir) -> Reconciler {
        Reconciler { source }
    }

    pub fn run<S: CatalogStore>(&self, store: &mut S) -> Result<SyncReport, IngestError> {
        let mut report = SyncReport::default();
        let mut missing_slugs: BTreeSet<String> = store.list_all_posts()?
            .into_iter()
            .map(|p| p.slug)
            .collect();
        let mut seen_slugs = HashSet::new();

        let entries = self.source.retrieve_entries().map_err(|source| IngestError::Io {
            path: self.source.root_dir.clone(),
            source,
        })?;

        for entry in entries {
            let path = match entry {
                SourceEntry::Post(path) => path,
                SourceEntry::Other(path) => {
                    warn!("Skipping file: {}", path.display());
                    report.skipped.push(path);
                    continue;
                }
            };

            let parsed = read_post(&path)?;
            debug!("Parsed {}: {}", path.display(), parsed);

            missing_slugs.remove(&parsed.slug);
            if !seen_slugs.insert(parsed.slug.clone()) {
                warn!("More than one file produces the slug '{}', {} overrides the earlier one", parsed.slug, path.display());
            }

            match create_or_update(store, &parsed)? {
                Outcome::Created => {
                    info!("Successfully created post: {}", parsed.title);
                    report.created.push(parsed.title);
                }
                Outcome::Updated => {
                    info!("Successfully updated post: {}", parsed.title);
                    report.updated.push(parsed.title);
                }
                Outcome::Unchanged => {
                    info!("No changes detected for post: {}", parsed.title);
                    report.unchanged.push(parsed.title);
                }
            }
        }

        if !missing_slugs.is_empty() {
            store.delete_posts_with_slug_in(&missing_slugs)?;
            info!("Deleted missing blog posts: {:?}", missing_slugs);
            report.deleted_posts = missing_slugs.into_iter().collect();
        }

        report.deleted_tags = store.delete_tags_with_no_posts()?;
        if report.deleted_tags > 0 {
            info!("Deleted {} orphaned tags", report.deleted_tags);
        }

        report.deleted_toc_entries = store.delete_toc_entries_with_no_posts()?;
        if report.deleted_toc_entries > 0 {
            info!("Deleted {} orphaned table of contents entries", report.deleted_toc_entries);
        }

        Ok(report)
    }
}

fn read_post(path: &Path) -> Result<ParsedPost, IngestError> {
    let raw = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = raw.replace("\r\n", "\n");

    ParsedPost::from_string(&raw).map_err(|e| match e {
        ParseError::MetadataWithoutColon(_) => IngestError::MalformedDocument {
            file: path.to_path_buf(),
            reason: e.to_string(),
        },
        ParseError::MalformedDate { field, value, .. } => IngestError::MalformedDate {
            file: path.to_path_buf(),
            field: field.to_string(),
            value,
        },
    })
}

fn create_or_update<S: CatalogStore>(store: &mut S, parsed: &ParsedPost) -> StoreResult<Outcome> {
    match store.find_post_by_slug(&parsed.slug)? {
        Some(post) => {
            if !has_changed(&*store, &post, parsed)? {
                return Ok(Outcome::Unchanged);
            }
            let fields = resolve_fields(store, parsed)?;
            store.update_post(post.id, fields)?;
            Ok(Outcome::Updated)
        }
        None => {
            let fields = resolve_fields(store, parsed)?;
            store.create_post(fields)?;
            Ok(Outcome::Created)
        }
    }
}

fn has_changed<S: CatalogStore>(store: &S, post: &Post, parsed: &ParsedPost) -> StoreResult<bool> {
    if post.title != parsed.title
        || post.body != parsed.body
        || post.publish_date != parsed.publish_date
        || post.last_update != parsed.last_update
        || post.intro != parsed.intro {
        return Ok(true);
    }

    let toc: Vec<String> = store.toc_of(post)?.into_iter().map(|e| e.content).collect();
    if toc != parsed.toc {
        return Ok(true);
    }

    let tags: BTreeSet<String> = store.tags_of(post)?.into_iter().map(|t| t.name).collect();
    let parsed_tags: BTreeSet<String> = parsed.tags.iter().cloned().collect();
    Ok(tags != parsed_tags)
}

/// Looks up, or creates, every tag and table of contents entry of the post.
fn resolve_fields<S: CatalogStore>(store: &mut S, parsed: &ParsedPost) -> StoreResult<PostFields> {
    let tags = parsed.tags.iter()
        .map(|name| store.get_or_create_tag(name))
        .collect::<StoreResult<Vec<_>>>()?;

    let toc = parsed.toc.iter()
        .enumerate()
        .map(|(idx, content)| store.get_or_create_toc_entry(content, idx as u32 + 1, &slugify(content)))
        .collect::<StoreResult<Vec<_>>>()?;

    Ok(PostFields {
        title: parsed.title.clone(),
        intro: parsed.intro.clone(),
        body: parsed.body.clone(),
        publish_date: parsed.publish_date,
        last_update: parsed.last_update,
        tags,
        toc,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use crate::catalog::json_file::JsonCatalog;
    use crate::catalog::memory::MemoryCatalog;
    use crate::catalog::query::{post_page, tag_names};
    use crate::error::StoreError;
    use crate::post_list::DEFAULT_EXTENSION;
    use crate::test_data::{POST_DATA, SECOND_POST_DATA};

    use super::*;

    fn posts_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn reconciler(dir: &TempDir) -> Reconciler {
        Reconciler::new(SourceDir::new(dir.path().to_path_buf(), DEFAULT_EXTENSION))
    }

    fn post_text(title: &str, tags: &str, headings: &[&str]) -> String {
        let mut text = format!("---\nTitle: {}\nPublished Date: 2024-06-01\nLast Update: 2024-06-02\nTags: {}\n---\n", title, tags);
        for heading in headings {
            text.push_str(&format!("## {}\nSome words.\n", heading));
        }
        text
    }

    #[test]
    fn test_first_run_creates_everything() {
        let dir = posts_dir(&[("rust.md", POST_DATA), ("async.md", SECOND_POST_DATA)]);
        let mut catalog = MemoryCatalog::new();

        let report = reconciler(&dir).run(&mut catalog).unwrap();
        assert_eq!(report.created, ["Async in Practice", "Getting Started with Rust"]);
        assert!(report.updated.is_empty());
        assert_eq!(tag_names(&catalog).unwrap(), ["async", "rust", "tutorial"]);

        let page = post_page(&catalog, "getting-started-with-rust").unwrap().unwrap();
        assert_eq!(page.post.intro, "Rust is a systems language.\n\nIt is fast.");
        assert_eq!(page.post.publish_date, NaiveDate::from_ymd_opt(2023, 11, 5).unwrap());
        assert!(page.post.body.contains(r#"<h2 id="installing-the-toolchain">"#));
    }

    #[test]
    fn test_second_run_writes_nothing() {
        let dir = posts_dir(&[("rust.md", POST_DATA), ("async.md", SECOND_POST_DATA)]);
        let mut catalog = MemoryCatalog::new();
        let reconciler = reconciler(&dir);

        reconciler.run(&mut catalog).unwrap();
        let writes = catalog.writes();

        let report = reconciler.run(&mut catalog).unwrap();
        assert!(report.is_noop());
        assert_eq!(report.unchanged.len(), 2);
        assert_eq!(catalog.writes(), writes);
    }

    #[test]
    fn test_changed_file_updates_in_place() {
        let dir = posts_dir(&[("rust.md", POST_DATA)]);
        let mut catalog = MemoryCatalog::new();
        let reconciler = reconciler(&dir);
        reconciler.run(&mut catalog).unwrap();
        let before = catalog.find_post_by_slug("getting-started-with-rust").unwrap().unwrap();

        let edited = POST_DATA.replace("Some text.", "Some other text.");
        fs::write(dir.path().join("rust.md"), edited).unwrap();
        let report = reconciler.run(&mut catalog).unwrap();
        assert_eq!(report.updated, ["Getting Started with Rust"]);

        let after = catalog.find_post_by_slug("getting-started-with-rust").unwrap().unwrap();
        assert_eq!(after.id, before.id);
        assert!(after.body.contains("Some other text."));
    }

    #[test]
    fn test_tag_swap_is_detected() {
        let dir = posts_dir(&[("a.md", &*post_text("Tagged", "rust, web", &["One"]))]);
        let mut catalog = MemoryCatalog::new();
        let reconciler = reconciler(&dir);
        reconciler.run(&mut catalog).unwrap();

        fs::write(dir.path().join("a.md"), post_text("Tagged", "rust, cli", &["One"])).unwrap();
        let report = reconciler.run(&mut catalog).unwrap();
        assert_eq!(report.updated, ["Tagged"]);
        assert_eq!(report.deleted_tags, 1);
        assert_eq!(tag_names(&catalog).unwrap(), ["cli", "rust"]);
    }

    #[test]
    fn test_rename_recomputes_slug() {
        let dir = posts_dir(&[("a.md", &*post_text("First Name", "x", &["Alpha"]))]);
        let mut catalog = MemoryCatalog::new();
        let reconciler = reconciler(&dir);
        reconciler.run(&mut catalog).unwrap();

        fs::write(dir.path().join("a.md"), post_text("Second Name", "x", &["Beta"])).unwrap();
        let report = reconciler.run(&mut catalog).unwrap();
        assert_eq!(report.created, ["Second Name"]);
        assert_eq!(report.deleted_posts, ["first-name"]);
        assert_eq!(report.deleted_toc_entries, 1);

        let posts = catalog.list_all_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, slugify("Second Name"));
    }

    #[test]
    fn test_removed_file_deletes_post_and_last_tag() {
        let dir = posts_dir(&[
            ("a.md", &*post_text("Post A", "shared, only-a", &[])),
            ("b.md", &*post_text("Post B", "shared", &[])),
        ]);
        let mut catalog = MemoryCatalog::new();
        let reconciler = reconciler(&dir);
        reconciler.run(&mut catalog).unwrap();

        fs::remove_file(dir.path().join("a.md")).unwrap();
        let report = reconciler.run(&mut catalog).unwrap();
        assert_eq!(report.deleted_posts, ["post-a"]);
        assert_eq!(report.deleted_tags, 1);
        assert!(catalog.find_post_by_slug("post-a").unwrap().is_none());
        assert_eq!(tag_names(&catalog).unwrap(), ["shared"]);
    }

    #[test]
    fn test_toc_order() {
        let headings = ["Why", "How", "What next"];
        let dir = posts_dir(&[("a.md", &*post_text("Ordered", "", &headings))]);
        let mut catalog = MemoryCatalog::new();
        reconciler(&dir).run(&mut catalog).unwrap();

        let page = post_page(&catalog, "ordered").unwrap().unwrap();
        let toc: Vec<(&str, u32, &str)> = page.toc.iter()
            .map(|e| (e.content.as_str(), e.order, e.slug.as_str()))
            .collect();
        assert_eq!(toc, [("Why", 1, "why"), ("How", 2, "how"), ("What next", 3, "what-next")]);
        assert!(page.post.body.contains(r#"<h2 id="what-next">What next</h2>"#));
        assert!(page.tags.is_empty());
    }

    #[test]
    fn test_shared_toc_rows() {
        let dir = posts_dir(&[
            ("a.md", &*post_text("Post A", "", &["Setup"])),
            ("b.md", &*post_text("Post B", "", &["Setup"])),
        ]);
        let mut catalog = MemoryCatalog::new();
        reconciler(&dir).run(&mut catalog).unwrap();

        let a = catalog.find_post_by_slug("post-a").unwrap().unwrap();
        let b = catalog.find_post_by_slug("post-b").unwrap().unwrap();
        assert_eq!(a.toc, b.toc);
    }

    #[test]
    fn test_toc_slug_conflict_fails() {
        let dir = posts_dir(&[
            ("a.md", &*post_text("Post A", "", &["Setup"])),
            ("b.md", &*post_text("Post B", "", &["Intro", "Setup"])),
        ]);
        let mut catalog = MemoryCatalog::new();
        let res = reconciler(&dir).run(&mut catalog);
        assert!(matches!(res, Err(IngestError::Store(StoreError::DuplicateSlug { .. }))));
    }

    #[test]
    fn test_other_files_are_skipped() {
        let dir = posts_dir(&[("a.md", &*post_text("Post A", "", &[])), ("image.png", "binary")]);
        fs::create_dir(dir.path().join("assets")).unwrap();
        let mut catalog = MemoryCatalog::new();

        let report = reconciler(&dir).run(&mut catalog).unwrap();
        assert_eq!(report.created, ["Post A"]);
        assert_eq!(report.skipped, [dir.path().join("assets"), dir.path().join("image.png")]);
    }

    #[test]
    fn test_error_aborts_without_rollback() {
        let dir = posts_dir(&[
            ("a.md", &*post_text("Post A", "", &[])),
            ("b.md", "---\nTitle: Broken\nPublished Date:\n---\n"),
            ("c.md", &*post_text("Post C", "", &[])),
        ]);
        let mut catalog = MemoryCatalog::new();

        let res = reconciler(&dir).run(&mut catalog);
        match res {
            Err(IngestError::MalformedDate { file, field, value }) => {
                assert_eq!(file, dir.path().join("b.md"));
                assert_eq!(field, "Published Date");
                assert_eq!(value, "");
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(catalog.find_post_by_slug("post-a").unwrap().is_some());
        assert!(catalog.find_post_by_slug("post-c").unwrap().is_none());
    }

    #[test]
    fn test_crlf_file() {
        let dir = posts_dir(&[("a.md", &*post_text("Windows Post", "win", &["Usage"]).replace('\n', "\r\n"))]);
        let mut catalog = MemoryCatalog::new();
        reconciler(&dir).run(&mut catalog).unwrap();

        let page = post_page(&catalog, "windows-post").unwrap().unwrap();
        assert_eq!(page.toc[0].content, "Usage");
        assert!(!page.post.body.contains('\r'));
    }

    #[test]
    fn test_malformed_metadata() {
        let dir = posts_dir(&[("a.md", "---\nTitle: A\nno colon here\n---\nbody")]);
        let mut catalog = MemoryCatalog::new();
        let res = reconciler(&dir).run(&mut catalog);
        assert!(matches!(res, Err(IngestError::MalformedDocument { .. })));
    }

    #[test]
    fn test_missing_directory() {
        let reconciler = Reconciler::new(SourceDir::new(PathBuf::from("/no/such/posts"), DEFAULT_EXTENSION));
        let mut catalog = MemoryCatalog::new();
        assert!(matches!(reconciler.run(&mut catalog), Err(IngestError::Io { .. })));
    }

    #[test]
    fn test_json_catalog_round_trip() {
        let dir = posts_dir(&[("rust.md", POST_DATA)]);
        let catalog_path = dir.path().join("state").join("catalog.json");
        let reconciler = Reconciler::new(SourceDir::new(dir.path().to_path_buf(), DEFAULT_EXTENSION));

        let mut catalog = JsonCatalog::open(&catalog_path).unwrap();
        let report = reconciler.run(&mut catalog).unwrap();
        assert_eq!(report.created.len(), 1);
        assert!(report.skipped.is_empty());

        let mut reopened = JsonCatalog::open(&catalog_path).unwrap();
        let report = reconciler.run(&mut reopened).unwrap();
        assert!(report.is_noop());
        assert_eq!(reopened.writes(), 0);
        // created by the first pass, not a post
        assert_eq!(report.skipped, [dir.path().join("state")]);
    }
}
