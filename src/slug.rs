use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INVALID_CHARS: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[-\s]+").unwrap();
}

/// Turns any text into a lowercase, hyphenated, ascii-only slug.
///
/// Posts, heading anchors and table of contents entries all go through this
/// function, so an `<h2 id>` always matches the slug stored for its entry.
pub fn slugify(text: &str) -> String {
    let ascii = unidecode::unidecode(text);
    let lowered = ascii.to_lowercase();
    let cleaned = INVALID_CHARS.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(&cleaned, "-");
    joined.trim_matches(|c: char| c == '-' || c == '_').to_string()
}
