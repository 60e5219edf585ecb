use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::content::HEADING_REGEX;
use crate::slug::slugify;

lazy_static! {
    static ref CODE_BLOCK_REGEX: Regex = Regex::new(r"(?s)```(?P<lang>\w+)\n(?P<code>.*?)```").unwrap();
}

const DEFAULT_CODE_CLASS: &str = "mockup-code";

fn code_class(language: &str) -> &'static str {
    match language {
        "bash" | "python" | "html" | "css" | "js" => "mockup-code",
        _ => DEFAULT_CODE_CLASS,
    }
}

/// Rewrites a post body: code blocks first, then heading anchors.
pub fn transform_body(body: &str) -> String {
    let body = render_code_blocks(body);
    anchor_headings(&body)
}

pub fn render_code_blocks(body: &str) -> String {
    CODE_BLOCK_REGEX
        .replace_all(body, |cap: &Captures| {
            let language = &cap["lang"];
            render_code_block(language, &cap["code"])
        })
        .into_owned()
}

fn render_code_block(language: &str, code: &str) -> String {
    let shell_prompt = language == "bash";
    let lines: Vec<String> = code
        .split('\n')
        .map(|line| {
            if shell_prompt {
                format!(r#"<pre data-prefix="$"><code>{}</code></pre>"#, line)
            } else {
                format!("<pre><code>{}</code></pre>", line)
            }
        })
        .collect();

    format!("<div class=\"{}\">\n{}\n</div>", code_class(language), lines.join("\n"))
}

pub fn anchor_headings(body: &str) -> String {
    HEADING_REGEX
        .replace_all(body, |cap: &Captures| {
            let text = &cap["text"];
            format!(r#"<h2 id="{}">{}</h2>"#, slugify(text), text)
        })
        .into_owned()
}
