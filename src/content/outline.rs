use crate::content::heading_text;

const FRONT_MATTER_DELIMITER: &str = "---";
const INTRO_HEADING: &str = "## Intro";

/// Titles of the level-2 headings that follow the front matter, in document order.
///
/// Works on the raw document, before the body transformer rewrote the
/// headings. Nothing is collected for a document without front matter.
pub fn extract_table_of_contents(raw: &str) -> Vec<String> {
    let mut toc = vec![];
    let mut front_matter_opened = false;
    let mut front_matter_closed = false;

    for line in raw.lines() {
        if line.trim() == FRONT_MATTER_DELIMITER {
            if !front_matter_opened {
                front_matter_opened = true;
            } else if !front_matter_closed {
                front_matter_closed = true;
            }
            continue;
        }

        if front_matter_closed {
            if let Some(text) = heading_text(line) {
                toc.push(text.to_string());
            }
        }
    }

    toc
}

/// Text between the first `## Intro` line and the next `## ` heading, trimmed.
pub fn extract_intro(raw: &str) -> String {
    let mut lines = raw.lines().skip_while(|line| !line.starts_with(INTRO_HEADING));
    if lines.next().is_none() {
        return String::new();
    }

    let mut intro = String::new();
    for line in lines {
        if line.starts_with("## ") {
            break;
        }
        intro.push_str(line);
        intro.push('\n');
    }

    intro.trim().to_string()
}
