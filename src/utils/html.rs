//! Recipe summaries and instructions arrive as HTML from the API. Nothing
//! from those fields is rendered as markup: it is flattened to plain text here.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

static BLANKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Elements that end a line.
const BLOCKS: &[&str] = &[
    "p", "div", "ol", "ul", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "blockquote",
];

fn collect(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

        let name = child.value().name();
        match name {
            "script" | "style" => continue,
            "br" => {
                out.push('\n');
                continue;
            }
            "li" => out.push_str("\n- "),
            _ => {}
        }
        collect(child, out);
        if BLOCKS.contains(&name) {
            out.push('\n');
        }
    }
}

/// Strips markup from API supplied HTML, keeping paragraph and list breaks.
pub fn to_plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());
    collect(fragment.root_element(), &mut text);

    let lines = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    BLANKS.replace_all(lines.trim(), "\n\n").into_owned()
}
