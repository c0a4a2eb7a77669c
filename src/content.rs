//! Blog content indexing.
//!
//! Walks the content directory once, parses every markdown document into a
//! [`BlogPost`], and keeps the result as an immutable, date-sorted index.
//!
//! ## Documents
//!
//! Each post is a markdown file that starts with a front-matter block, either
//! YAML fenced by `---` or TOML fenced by `+++`:
//!
//! ```text
//! ---
//! title: Hello World
//! date: 2021-03-14
//! description: First post.     # optional
//! ---
//! Markdown body...
//! ```
//!
//! Recognized keys are `title`, `date`, and `description`; anything else is
//! ignored so documents written for other generators still load.
//!
//! ## Ordering
//!
//! Posts are listed newest first. A post without a `date` sorts after every
//! dated post. Ties are broken by slug so the order is total.
//!
//! ## Malformed Documents
//!
//! A document that cannot be read or parsed never stops the build. It is
//! logged, left out of the index, and recorded in
//! [`ContentRepository::skipped`] for reporting. Only failing to read the
//! content root itself is an error.

use crate::metadata::{self, EXCERPT_LENGTH};
use crate::slug;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pulldown_cmark::{Options, Parser, html as md_html};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single document that was skipped while building the index.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}: {kind}", path.display())]
pub struct ContentParseError {
    /// Path relative to the content root.
    pub path: PathBuf,
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("cannot read file: {0}")]
    Read(String),
    #[error("missing front matter block")]
    MissingFrontMatter,
    #[error("unterminated front matter block")]
    UnterminatedFrontMatter,
    #[error("invalid front matter: {0}")]
    FrontMatter(String),
    #[error("invalid date {0:?}: expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),
    #[error("cannot derive a slug from the file path")]
    NoSlug,
    #[error("slug {0:?} is reserved")]
    ReservedSlug(String),
    #[error("slug {slug:?} is already used by {first}")]
    DuplicateSlug { slug: String, first: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no blog post with slug {slug:?}")]
pub struct NotFoundError {
    pub slug: String,
}

/// A parsed blog post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    /// Unique identifier derived from the relative path.
    pub slug: String,
    /// Front-matter title, or the slug when the front matter has none.
    pub title: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    /// Markdown body rendered to HTML.
    pub body_html: String,
    /// Plain-text summary of the body.
    pub excerpt: String,
    /// Source file relative to the content root.
    pub source_path: String,
}

impl BlogPost {
    /// The text shown under the title in listings: the front-matter
    /// description when present, otherwise the excerpt.
    pub fn summary(&self) -> String {
        metadata::resolve(&[self.description.as_deref(), Some(self.excerpt.as_str())]).unwrap_or_default()
    }
}

/// Immutable index of blog posts, sorted for display.
#[derive(Debug, Default)]
pub struct ContentRepository {
    posts: Vec<BlogPost>,
    skipped: Vec<ContentParseError>,
}

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

impl ContentRepository {
    /// Scan `dir` recursively and index every markdown document.
    ///
    /// A missing directory yields an empty repository.
    pub fn open(dir: &Path) -> Result<Self, ContentError> {
        if !dir.exists() {
            debug!(dir = %dir.display(), "content directory does not exist, no posts");
            return Ok(Self::default());
        }

        let files = collect_documents(dir)?;
        debug!(count = files.len(), dir = %dir.display(), "found content documents");

        let parsed: Vec<Result<BlogPost, ContentParseError>> = files
            .par_iter()
            .map(|path| parse_document(dir, path))
            .collect();

        let mut posts = Vec::with_capacity(parsed.len());
        let mut skipped = Vec::new();
        for result in parsed {
            match result {
                Ok(post) => posts.push(post),
                Err(err) => skipped.push(err),
            }
        }

        Ok(Self::index(posts, skipped))
    }

    /// Build an index from posts already in memory.
    ///
    /// Applies the same ordering and duplicate-slug rules as [`open`](Self::open).
    pub fn from_posts(posts: Vec<BlogPost>) -> Self {
        Self::index(posts, Vec::new())
    }

    fn index(posts: Vec<BlogPost>, mut skipped: Vec<ContentParseError>) -> Self {
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut unique = Vec::with_capacity(posts.len());

        for post in posts {
            if let Some(first) = seen.get(&post.slug) {
                skipped.push(ContentParseError {
                    path: PathBuf::from(&post.source_path),
                    kind: ParseErrorKind::DuplicateSlug {
                        slug: post.slug.clone(),
                        first: first.clone(),
                    },
                });
                continue;
            }
            seen.insert(post.slug.clone(), post.source_path.clone());
            unique.push(post);
        }

        sort_posts(&mut unique);

        for err in &skipped {
            warn!(error = %err, "skipping blog post");
        }

        Self {
            posts: unique,
            skipped,
        }
    }

    /// All posts, newest first, dateless posts last.
    pub fn list_posts(&self) -> &[BlogPost] {
        &self.posts
    }

    /// Look up a post by slug. Leading and trailing slashes are ignored.
    pub fn get_post(&self, slug: &str) -> Result<&BlogPost, NotFoundError> {
        let wanted = slug.trim_matches('/');
        self.posts
            .iter()
            .find(|p| p.slug == wanted)
            .ok_or_else(|| NotFoundError {
                slug: wanted.to_string(),
            })
    }

    /// Documents left out of the index, with the reason.
    pub fn skipped(&self) -> &[ContentParseError] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Newest first; `None` dates compare lowest so they land at the end.
fn sort_posts(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}

fn collect_documents(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    // Surface an unreadable root as a hard error; walkdir would only
    // report it as a per-entry failure.
    fs::read_dir(dir)?;

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable content entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_markdown(e.path()))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    MARKDOWN_EXTENSIONS.contains(&ext.as_str())
}

// =============================================================================
// Document parsing
// =============================================================================

fn parse_document(root: &Path, path: &Path) -> Result<BlogPost, ContentParseError> {
    let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    let fail = |kind: ParseErrorKind| ContentParseError {
        path: relative.clone(),
        kind,
    };

    let content = fs::read_to_string(path).map_err(|e| fail(ParseErrorKind::Read(e.to_string())))?;
    let slug = slug::slug_from_path(&relative).ok_or_else(|| fail(ParseErrorKind::NoSlug))?;
    if slug::is_reserved(&slug) {
        return Err(fail(ParseErrorKind::ReservedSlug(slug)));
    }

    let source_path = relative.to_string_lossy().replace('\\', "/");
    parse_post(&content, slug, source_path).map_err(fail)
}

/// Parse document text into a post. `slug` and `source_path` are supplied by
/// the caller since they come from the file's location, not its content.
pub fn parse_post(
    content: &str,
    slug: String,
    source_path: String,
) -> Result<BlogPost, ParseErrorKind> {
    let (format, header, body) = split_front_matter(content)?;
    let front = match format {
        FrontMatterFormat::Yaml => parse_yaml_front_matter(header)?,
        FrontMatterFormat::Toml => parse_toml_front_matter(header)?,
    };

    let date = match metadata::resolve(&[front.date.as_deref()]) {
        Some(raw) => Some(parse_date(&raw).ok_or(ParseErrorKind::InvalidDate(raw))?),
        None => None,
    };

    let body_html = render_markdown(body);
    let excerpt = metadata::excerpt(&body_html, EXCERPT_LENGTH);
    let title = metadata::resolve(&[front.title.as_deref(), Some(slug.as_str())]).unwrap_or_default();

    Ok(BlogPost {
        title,
        date,
        description: metadata::resolve(&[front.description.as_deref()]),
        body_html,
        excerpt,
        slug,
        source_path,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FrontMatterFormat {
    Yaml,
    Toml,
}

/// Raw front-matter values, before date parsing and fallbacks.
#[derive(Debug, Default)]
struct FrontMatter {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
}

/// Split a document into (format, front-matter text, body).
fn split_front_matter(content: &str) -> Result<(FrontMatterFormat, &str, &str), ParseErrorKind> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let (first, rest) = content.split_once('\n').unwrap_or((content, ""));

    let fence = first.trim_end();
    let format = match fence {
        "---" => FrontMatterFormat::Yaml,
        "+++" => FrontMatterFormat::Toml,
        _ => return Err(ParseErrorKind::MissingFrontMatter),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == fence {
            return Ok((format, &rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(ParseErrorKind::UnterminatedFrontMatter)
}

fn parse_yaml_front_matter(header: &str) -> Result<FrontMatter, ParseErrorKind> {
    if header.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(header)
        .map_err(|e| ParseErrorKind::FrontMatter(e.to_string()))?;
    if value.is_null() {
        return Ok(FrontMatter::default());
    }
    if !value.is_mapping() {
        return Err(ParseErrorKind::FrontMatter(
            "expected key/value pairs".to_string(),
        ));
    }

    Ok(FrontMatter {
        title: yaml_scalar(&value, "title")?,
        date: yaml_scalar(&value, "date")?,
        description: yaml_scalar(&value, "description")?,
    })
}

fn yaml_scalar(value: &serde_yaml_ng::Value, key: &str) -> Result<Option<String>, ParseErrorKind> {
    use serde_yaml_ng::Value;
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(ParseErrorKind::FrontMatter(format!(
            "`{key}` must be a single value"
        ))),
    }
}

fn parse_toml_front_matter(header: &str) -> Result<FrontMatter, ParseErrorKind> {
    let table: toml::Table =
        toml::from_str(header).map_err(|e| ParseErrorKind::FrontMatter(e.to_string()))?;

    Ok(FrontMatter {
        title: toml_scalar(&table, "title")?,
        date: toml_scalar(&table, "date")?,
        description: toml_scalar(&table, "description")?,
    })
}

fn toml_scalar(table: &toml::Table, key: &str) -> Result<Option<String>, ParseErrorKind> {
    use toml::Value;
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Datetime(dt)) => Ok(Some(dt.to_string())),
        Some(Value::Integer(i)) => Ok(Some(i.to_string())),
        Some(Value::Float(f)) => Ok(Some(f.to_string())),
        Some(Value::Boolean(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(ParseErrorKind::FrontMatter(format!(
            "`{key}` must be a single value"
        ))),
    }
}

/// Parse a front-matter date. Accepts a calendar date, an RFC 3339
/// timestamp, or a local `date time`; only the calendar date is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

fn render_markdown(body: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(body, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}
