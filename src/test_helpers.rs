//! Shared test utilities for the simple-folio test suite.
//!
//! Provides fixture setup, small builders for posts and configs, and lookup
//! helpers that panic with the available values on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let repo = ContentRepository::open(&tmp.path().join("content")).unwrap();
//! assert_eq!(post_slugs(repo.list_posts())[0], "2021/year-in-review");
//!
//! let page = compose_home(&sample_config(), repo.list_posts());
//! let projects = find_listing(&page, "projects");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::compose::{ListingView, PageViewModel, Section};
use crate::config::{Identity, ListingEntry, SiteConfig, SkillGroup, SocialLink};
use crate::content::{BlogPost, parse_date};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// The copy holds `config.toml` and a `content/` directory. Tests get an
/// isolated copy they can mutate without affecting other tests or the source
/// fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a markdown document with YAML front matter under `root`.
///
/// `front_matter` is the raw YAML between the fences. Parent directories are
/// created as needed.
pub fn write_post(root: &Path, rel: &str, front_matter: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, format!("---\n{front_matter}\n---\n\n{body}\n")).unwrap();
}

// =========================================================================
// Builders
// =========================================================================

/// A post with a generated title and body. `date` uses `YYYY-MM-DD`.
pub fn sample_post(slug: &str, date: Option<&str>) -> BlogPost {
    let body_html = format!("<p>Body of {slug}.</p>\n");
    BlogPost {
        slug: slug.to_string(),
        title: format!("Post {slug}"),
        date: date.map(|d| parse_date(d).unwrap_or_else(|| panic!("bad test date {d:?}"))),
        description: None,
        excerpt: format!("Body of {slug}."),
        body_html,
        source_path: format!("{slug}.md"),
    }
}

/// A valid config with the blog enabled and one entry in every list.
pub fn sample_config() -> SiteConfig {
    let mut project = ListingEntry::new("Widget", "Makes widgets.");
    project.link = Some("https://widget.example".to_string());
    let mut job = ListingEntry::new("Staff Engineer", "Example Corp");
    job.timeline = Some("2021 - Present".to_string());
    let mut school = ListingEntry::new("BSc Computer Science", "Example University");
    school.timeline = Some("2012 - 2016".to_string());

    SiteConfig {
        blog_enabled: true,
        identity: Identity {
            name: "Jane Doe".to_string(),
            title: "Jane Doe | Engineer".to_string(),
            description: "Engineer based in Lisbon.".to_string(),
            about: Some("I build things.".to_string()),
            author: Some("@janedoe".to_string()),
            picture: None,
            social_image: None,
            social: vec![SocialLink {
                label: "GitHub".to_string(),
                url: "https://github.com/janedoe".to_string(),
            }],
        },
        projects: vec![project],
        experience: vec![job],
        education: vec![school],
        skills: vec![SkillGroup {
            name: "Languages".to_string(),
            description: "Rust, Go, Python".to_string(),
        }],
        ..SiteConfig::default()
    }
}

// =========================================================================
// Lookups, panics with a clear message on miss
// =========================================================================

/// Find a section by id. Panics if the page doesn't have it.
pub fn find_section<'a>(page: &'a PageViewModel, id: &str) -> &'a Section {
    page.section(id).unwrap_or_else(|| {
        let ids = section_ids(page);
        panic!("section '{id}' not found on {:?}. Available: {ids:?}", page.route)
    })
}

/// Items of a projects/experience/education section. Panics otherwise.
pub fn find_listing<'a>(page: &'a PageViewModel, id: &str) -> &'a [ListingView] {
    match find_section(page, id) {
        Section::Projects { items } | Section::Experience { items } | Section::Education { items } => {
            items
        }
        other => panic!("section '{id}' is not a listing: {other:?}"),
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All post slugs in order.
pub fn post_slugs(posts: &[BlogPost]) -> Vec<&str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
}

/// All section ids of a page in display order.
pub fn section_ids(page: &PageViewModel) -> Vec<&'static str> {
    page.sections.iter().map(Section::id).collect()
}
