//! Slug derivation for content documents.
//!
//! Every blog post is identified by a slug derived from its path relative to
//! the content directory. The same slug is the post's URL segment and its
//! output directory, so derivation must be deterministic:
//!
//! - `Hello-World.md` → `hello-world`
//! - `2021/Retro.md` → `2021/retro`
//! - `2021/retro/index.md` → `2021/retro` (an `index` file names its directory)
//! - `My Trip.markdown` → `my-trip`
//! - `C# tips?.md` → `c-tips`
//!
//! Segments only ever contain `[a-z0-9._-]`, so a slug can be written into an
//! href and a file path without escaping.

use std::path::{Component, Path};

/// Slugs that would collide with generated routes.
pub const RESERVED_SLUGS: &[&str] = &["blog"];

/// Derive a slug from a path relative to the content root.
///
/// Returns `None` when the path has no usable components (e.g. an empty
/// path, or a path made only of `..`).
pub fn slug_from_path(relative: &Path) -> Option<String> {
    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let file = parts.pop()?;
    let stem = Path::new(&file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(file);

    if !(stem.eq_ignore_ascii_case("index") && !parts.is_empty()) {
        parts.push(stem);
    }

    let segments: Vec<String> = parts
        .iter()
        .map(|p| normalize_segment(p))
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Whether a slug would shadow a generated route.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Lower-case a path segment and turn every run of characters outside
/// `[a-z0-9._]` into a single dash. Leading and trailing dashes are dropped,
/// and a segment made only of dots is empty.
fn normalize_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_' {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.chars().all(|c| c == '.') {
        String::new()
    } else {
        trimmed.to_string()
    }
}
