use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

pub mod body_transformer;
pub mod front_matter;
pub mod outline;
pub mod parsed_post;

lazy_static! {
    /// A level-2 heading on a single line. Whitespace after `##` never crosses a line break.
    static ref HEADING_REGEX: Regex = Regex::new(r"(?m)^##[^\S\r\n]+(?P<text>.*?)\r?$").unwrap();
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("metadata line without a colon: '{0}'")]
    MetadataWithoutColon(String),

    #[error("{field} = '{value}': {reason}")]
    MalformedDate {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Text of a level-2 heading line, if `line` is one.
fn heading_text(line: &str) -> Option<&str> {
    HEADING_REGEX.captures(line)
        .and_then(|cap| cap.name("text"))
        .map(|text| text.as_str())
}
