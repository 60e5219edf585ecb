use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::content::body_transformer::transform_body;
use crate::content::ParseError;

lazy_static! {
    static ref FRONT_MATTER_REGEX: Regex = Regex::new(r"(?s)\A---\n(?P<meta>.*?)\n---\n(?P<body>.*)").unwrap();
}

pub const TITLE_KEY: &str = "Title";
pub const PUBLISHED_DATE_KEY: &str = "Published Date";
pub const LAST_UPDATE_KEY: &str = "Last Update";
pub const TAGS_KEY: &str = "Tags";

pub const UNTITLED: &str = "Untitled";

/// Metadata block of a post. Keys are kept exactly as written, trimmed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrontMatter {
    entries: HashMap<String, String>,
}

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn title(&self) -> &str {
        self.get(TITLE_KEY).unwrap_or(UNTITLED)
    }

    pub fn published_date(&self) -> &str {
        self.get(PUBLISHED_DATE_KEY).unwrap_or_default()
    }

    pub fn last_update(&self) -> &str {
        self.get(LAST_UPDATE_KEY).unwrap_or_default()
    }

    /// Comma separated tags, trimmed, without empties or repeats.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = vec![];
        for tag in self.get(TAGS_KEY).unwrap_or_default().split(',') {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }

    fn parse(meta: &str) -> Result<FrontMatter, ParseError> {
        let mut entries = HashMap::new();
        for line in meta.trim().split('\n') {
            let Some((key, value)) = line.split_once(':') else {
                return Err(ParseError::MetadataWithoutColon(line.to_string()));
            };
            entries.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(FrontMatter { entries })
    }
}

/// Splits a raw document into its front matter and its transformed body.
///
/// A document that does not start with a `---` delimited block comes back
/// untouched, with empty metadata.
pub fn split_front_matter(raw: &str) -> Result<(FrontMatter, String), ParseError> {
    let Some(cap) = FRONT_MATTER_REGEX.captures(raw) else {
        return Ok((FrontMatter::default(), raw.to_string()));
    };

    let front_matter = FrontMatter::parse(&cap["meta"])?;
    let body = transform_body(&cap["body"]);

    Ok((front_matter, body))
}

#[cfg(test)]
mod tests {
    use crate::test_data::{POST_DATA, POST_WITHOUT_FRONT_MATTER};

    use super::*;

    #[test]
    fn test_split_front_matter() {
        let (front_matter, body) = split_front_matter(POST_DATA).unwrap();
        assert_eq!(front_matter.title(), "Getting Started with Rust");
        assert_eq!(front_matter.published_date(), "2023-11-05");
        assert_eq!(front_matter.last_update(), "2024-01-10");
        assert_eq!(front_matter.tags(), ["rust", "tutorial"]);
        assert!(body.starts_with(r#"<h2 id="intro">Intro</h2>"#));
        assert!(body.contains(r#"<h2 id="installing-the-toolchain">Installing the toolchain</h2>"#));
        assert!(body.contains(r#"<pre data-prefix="$"><code>rustup update</code></pre>"#));
        assert!(!body.contains("Title:"));
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let raw = "---\nTitle: Rust: the good parts\n  Spaced Key  :  v  \n---\nbody";
        let (front_matter, body) = split_front_matter(raw).unwrap();
        assert_eq!(front_matter.title(), "Rust: the good parts");
        assert_eq!(front_matter.get("Spaced Key"), Some("v"));
        assert_eq!(front_matter.get("spaced key"), None);
        assert_eq!(body, "body");
    }

    #[test]
    fn test_missing_front_matter() {
        let (front_matter, body) = split_front_matter(POST_WITHOUT_FRONT_MATTER).unwrap();
        assert!(front_matter.is_empty());
        assert_eq!(front_matter.title(), UNTITLED);
        assert_eq!(front_matter.published_date(), "");
        assert!(front_matter.tags().is_empty());
        // no transformation without front matter
        assert_eq!(body, POST_WITHOUT_FRONT_MATTER);
    }

    #[test]
    fn test_line_without_colon() {
        let raw = "---\nTitle: A\nbroken line\n---\nbody";
        let res = split_front_matter(raw);
        assert_eq!(res, Err(ParseError::MetadataWithoutColon("broken line".to_string())));
    }

    #[test]
    fn test_tags() {
        let raw = "---\nTags: rust,  web , ,rust, cli\n---\n";
        let (front_matter, body) = split_front_matter(raw).unwrap();
        assert_eq!(front_matter.tags(), ["rust", "web", "cli"]);
        assert_eq!(body, "");

        let raw = "---\nTags:\n---\n";
        let (front_matter, _) = split_front_matter(raw).unwrap();
        assert!(front_matter.tags().is_empty());
    }
}
