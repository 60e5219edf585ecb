use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::content::front_matter::{split_front_matter, LAST_UPDATE_KEY, PUBLISHED_DATE_KEY};
use crate::content::outline::{extract_intro, extract_table_of_contents};
use crate::content::ParseError;
use crate::slug::slugify;
use crate::text_utils::{format_date, parse_date, parse_optional_date};

/// Everything the catalog needs to know about one markdown file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPost {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub intro: String,
    pub tags: Vec<String>,
    pub toc: Vec<String>,
    pub publish_date: NaiveDate,
    pub last_update: Option<NaiveDate>,
}

impl Display for ParsedPost {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "slug={}, published={}, tags={}\ntitle={}\ntoc={}",
               self.slug,
               format_date(&self.publish_date),
               self.tags.join(","),
               self.title,
               self.toc.join(" | ")
        )
    }
}

impl ParsedPost {
    pub fn from_string(raw: &str) -> Result<ParsedPost, ParseError> {
        let (front_matter, body) = split_front_matter(raw)?;

        let title = front_matter.title().to_string();
        let publish_date = parse_date(front_matter.published_date()).map_err(|reason| ParseError::MalformedDate {
            field: PUBLISHED_DATE_KEY,
            value: front_matter.published_date().to_string(),
            reason,
        })?;
        let last_update = parse_optional_date(front_matter.last_update()).map_err(|reason| ParseError::MalformedDate {
            field: LAST_UPDATE_KEY,
            value: front_matter.last_update().to_string(),
            reason,
        })?;

        Ok(ParsedPost {
            slug: slugify(&title),
            title,
            body,
            intro: extract_intro(raw),
            tags: front_matter.tags(),
            toc: extract_table_of_contents(raw),
            publish_date,
            last_update,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::{POST_DATA, POST_WITHOUT_FRONT_MATTER, SECOND_POST_DATA};

    use super::*;

    #[test]
    fn test_from_string() {
        let post = ParsedPost::from_string(POST_DATA).unwrap();
        println!("{}", post);
        assert_eq!(post.title, "Getting Started with Rust");
        assert_eq!(post.slug, "getting-started-with-rust");
        assert_eq!(post.intro, "Rust is a systems language.\n\nIt is fast.");
        assert_eq!(post.tags, ["rust", "tutorial"]);
        assert_eq!(post.toc, ["Intro", "Installing the toolchain", "Writing code"]);
        assert_eq!(post.publish_date, NaiveDate::from_ymd_opt(2023, 11, 5).unwrap());
        assert_eq!(post.last_update, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert!(post.body.contains(r#"<h2 id="writing-code">Writing code</h2>"#));
    }

    #[test]
    fn test_empty_last_update() {
        let post = ParsedPost::from_string(SECOND_POST_DATA).unwrap();
        assert_eq!(post.last_update, None);
    }

    #[test]
    fn test_missing_front_matter_has_no_publish_date() {
        let res = ParsedPost::from_string(POST_WITHOUT_FRONT_MATTER);
        assert!(matches!(res, Err(ParseError::MalformedDate { field: PUBLISHED_DATE_KEY, .. })));
    }

    #[test]
    fn test_bad_dates() {
        let raw = "---\nTitle: A\nPublished Date: 2023-02-30\n---\n";
        let res = ParsedPost::from_string(raw);
        assert!(matches!(res, Err(ParseError::MalformedDate { field: PUBLISHED_DATE_KEY, .. })));

        let raw = "---\nTitle: A\nPublished Date: 2023-02-03\nLast Update: soon\n---\n";
        let res = ParsedPost::from_string(raw);
        assert!(matches!(res, Err(ParseError::MalformedDate { field: LAST_UPDATE_KEY, .. })));
    }

    #[test]
    fn test_toc_anchor_matches_body() {
        let raw = "---\nTitle: A\nPublished Date: 2023-02-03\n---\n## Ça va? Yes!\ntext\n";
        let post = ParsedPost::from_string(raw).unwrap();
        let anchor = format!(r#"<h2 id="{}">"#, slugify(&post.toc[0]));
        assert!(post.body.contains(&anchor));
        assert_eq!(slugify(&post.toc[0]), "ca-va-yes");
    }
}
