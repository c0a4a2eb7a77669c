//! Post metadata resolution.
//!
//! A post's display text can come from several places. The front matter is
//! explicit and always wins; text derived from the body is the fallback:
//!
//! - **Title**: front-matter `title` → slug
//! - **Summary**: front-matter `description` → excerpt of the rendered body
//!
//! The same "first non-empty value" rule is used by the page composer to
//! decide whether optional listing fields (`link`, `logo`, `timeline`) are
//! present at all.

/// Character budget for auto-generated excerpts.
pub const EXCERPT_LENGTH: usize = 160;

/// Resolve a field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value, trimmed.
///
/// ```text
/// title:   resolve(&[front_matter_title, slug])
/// summary: resolve(&[front_matter_description, excerpt])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Build a plain-text excerpt from rendered HTML.
///
/// Tags are stripped, common entities decoded, and whitespace collapsed. The
/// result is cut to `max_chars` characters at a word boundary, with `…`
/// appended when anything was cut.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = collapse_whitespace(&decode_entities(&strip_html_tags(html)));
    truncate_at_word(&text, max_chars)
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
pub fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Decode the entities pulldown-cmark emits when escaping text.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        // last, so `&amp;lt;` decodes to `&lt;` and not `<`
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let head = &text[..cut];
    let kept = if text[cut..].starts_with(char::is_whitespace) {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(pos) => &head[..pos],
            // a single word longer than the budget: hard cut
            None => head,
        }
    };
    format!("{}…", kept.trim_end())
}
