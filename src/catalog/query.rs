use crate::catalog::{CatalogStore, Post, StoreResult, Tag, TocEntry};

/// A post together with its resolved tags and table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub post: Post,
    pub tags: Vec<Tag>,
    pub toc: Vec<TocEntry>,
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.publish_date.cmp(&a.publish_date).then_with(|| a.slug.cmp(&b.slug)));
}

/// Every post, newest publish date first.
pub fn recent_posts(store: &impl CatalogStore) -> StoreResult<Vec<Post>> {
    let mut posts = store.list_all_posts()?;
    newest_first(&mut posts);
    Ok(posts)
}

/// Posts carrying the tag `name`, newest first. Unknown tags give an empty list.
pub fn posts_tagged(store: &impl CatalogStore, name: &str) -> StoreResult<Vec<Post>> {
    let Some(tag) = store.list_all_tags()?.into_iter().find(|t| t.name == name) else {
        return Ok(vec![]);
    };

    let mut posts: Vec<Post> = store.list_all_posts()?
        .into_iter()
        .filter(|p| p.tags.contains(&tag.id))
        .collect();
    newest_first(&mut posts);
    Ok(posts)
}

/// Distinct tag names, sorted.
pub fn tag_names(store: &impl CatalogStore) -> StoreResult<Vec<String>> {
    let mut names: Vec<String> = store.list_all_tags()?.into_iter().map(|t| t.name).collect();
    names.sort();
    names.dedup();
    Ok(names)
}

pub fn post_page(store: &impl CatalogStore, slug: &str) -> StoreResult<Option<PostPage>> {
    let Some(post) = store.find_post_by_slug(slug)? else {
        return Ok(None);
    };

    let mut tags = store.tags_of(&post)?;
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    let toc = store.toc_of(&post)?;

    Ok(Some(PostPage { post, tags, toc }))
}
