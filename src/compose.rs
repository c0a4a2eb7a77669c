//! Page composition.
//!
//! Turns the site configuration and the post index into one
//! [`PageViewModel`] per route. View-models are plain data: everything a
//! template needs is resolved here, so renderers never inspect the config or
//! re-check optional fields.
//!
//! ## Routes
//!
//! | Route | Output | Generated when |
//! |-------|--------|----------------|
//! | [`Route::Home`] | `index.html` | always |
//! | [`Route::BlogIndex`] | `blog/index.html` | `blog_enabled` |
//! | [`Route::Post`] | `<slug>/index.html` | `blog_enabled`, one per post |
//!
//! ## Visibility
//!
//! A section is present if and only if it has something to show. An empty
//! list and a missing list are the same thing. The blog section additionally
//! requires `blog_enabled`. Optional listing fields (`link`, `logo`,
//! `timeline`) are normalized the same way: blank strings count as absent.
//!
//! Composition is pure. Routes are independent, so [`compose_site`] builds
//! them in parallel.

use crate::config::{Identity, ListingEntry, SiteConfig, SkillGroup};
use crate::content::{BlogPost, NotFoundError};
use crate::metadata::resolve;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

const HOME_BLOG_HEADING: &str = "Blog";
const BLOG_INDEX_HEADING: &str = "All Blog Posts";
const BLOG_INDEX_TITLE: &str = "Blog";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Route {
    Home,
    BlogIndex,
    Post { slug: String },
}

impl Route {
    /// File path relative to the output directory.
    pub fn output_path(&self) -> PathBuf {
        match self {
            Route::Home => PathBuf::from("index.html"),
            Route::BlogIndex => Path::new("blog").join("index.html"),
            Route::Post { slug } => slug.split('/').collect::<PathBuf>().join("index.html"),
        }
    }

    /// Site-relative URL of the route, under `prefix`.
    pub fn href(&self, prefix: &str) -> String {
        match self {
            Route::Home => format!("{prefix}/"),
            Route::BlogIndex => format!("{prefix}/blog/"),
            Route::Post { slug } => format!("{prefix}/{slug}/"),
        }
    }
}

/// Everything needed to render one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageViewModel {
    pub route: Route,
    pub meta: PageMeta,
    pub identity: Identity,
    /// Visible sections, in display order.
    pub sections: Vec<Section>,
    /// Present only on post detail pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostDetail>,
}

impl PageViewModel {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == id)
    }

    pub fn has_section(&self, id: &str) -> bool {
        self.section(id).is_some()
    }
}

/// `<head>` metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    /// Full document title, e.g. `"Hello | Jane Doe"`.
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum Section {
    About {
        text: String,
    },
    Skills {
        groups: Vec<SkillGroup>,
    },
    Blog {
        heading: String,
        posts: Vec<PostSummary>,
        /// More posts exist than are listed here.
        show_all: bool,
    },
    Projects {
        items: Vec<ListingView>,
    },
    Experience {
        items: Vec<ListingView>,
    },
    Education {
        items: Vec<ListingView>,
    },
}

impl Section {
    /// Stable identifier, also used as the HTML anchor.
    pub fn id(&self) -> &'static str {
        match self {
            Section::About { .. } => "about",
            Section::Skills { .. } => "skills",
            Section::Blog { .. } => "blog",
            Section::Projects { .. } => "projects",
            Section::Experience { .. } => "experience",
            Section::Education { .. } => "education",
        }
    }

    pub fn heading(&self) -> &str {
        match self {
            Section::About { .. } => "About",
            Section::Skills { .. } => "Skills",
            Section::Blog { heading, .. } => heading,
            Section::Projects { .. } => "Projects",
            Section::Experience { .. } => "Experience",
            Section::Education { .. } => "Education",
        }
    }
}

/// A listing entry with presence checks already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "href", rename_all = "snake_case")]
pub enum LinkTarget {
    /// A page on this site; the href already carries the path prefix.
    Internal(String),
    External(String),
}

impl LinkTarget {
    pub fn href(&self) -> &str {
        match self {
            LinkTarget::Internal(href) | LinkTarget::External(href) => href,
        }
    }
}

/// A post as it appears in listings and previous/next navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub summary: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub post: BlogPost,
    /// The next older post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PostSummary>,
    /// The next newer post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PostSummary>,
}

// ============================================================================
// Composition
// ============================================================================

/// All routes the site consists of, in output order.
///
/// `posts` must be in display order, as returned by
/// [`ContentRepository::list_posts`](crate::content::ContentRepository::list_posts).
pub fn site_routes(config: &SiteConfig, posts: &[BlogPost]) -> Vec<Route> {
    let mut routes = vec![Route::Home];
    if config.blog_enabled {
        routes.push(Route::BlogIndex);
        routes.extend(posts.iter().map(|p| Route::Post {
            slug: p.slug.clone(),
        }));
    }
    routes
}

/// Compose every route of the site.
pub fn compose_site(
    config: &SiteConfig,
    posts: &[BlogPost],
) -> Result<Vec<PageViewModel>, NotFoundError> {
    site_routes(config, posts)
        .par_iter()
        .map(|route| compose(config, posts, route))
        .collect()
}

/// Compose a single route.
pub fn compose(
    config: &SiteConfig,
    posts: &[BlogPost],
    route: &Route,
) -> Result<PageViewModel, NotFoundError> {
    match route {
        Route::Home => Ok(compose_home(config, posts)),
        Route::BlogIndex => Ok(compose_blog_index(config, posts)),
        Route::Post { slug } => compose_post_detail(config, posts, slug),
    }
}

/// Home page: about, skills, recent posts, then the listings.
pub fn compose_home(config: &SiteConfig, posts: &[BlogPost]) -> PageViewModel {
    let prefix = config.prefix();
    let mut sections = Vec::new();

    if let Some(text) = resolve(&[config.identity.about.as_deref()]) {
        sections.push(Section::About { text });
    }
    if !config.skills.is_empty() {
        sections.push(Section::Skills {
            groups: config.skills.clone(),
        });
    }
    if let Some(blog) = blog_section(
        config,
        posts,
        Some(config.home_post_limit),
        HOME_BLOG_HEADING,
    ) {
        sections.push(blog);
    }
    if let Some(items) = listing_views(&config.projects, &prefix) {
        sections.push(Section::Projects { items });
    }
    if let Some(items) = listing_views(&config.experience, &prefix) {
        sections.push(Section::Experience { items });
    }
    if let Some(items) = listing_views(&config.education, &prefix) {
        sections.push(Section::Education { items });
    }

    PageViewModel {
        meta: page_meta(config, &Route::Home, None, None),
        route: Route::Home,
        identity: page_identity(&config.identity),
        sections,
        post: None,
    }
}

/// Blog index: every post, newest first.
pub fn compose_blog_index(config: &SiteConfig, posts: &[BlogPost]) -> PageViewModel {
    let route = Route::BlogIndex;
    let sections = blog_section(config, posts, None, BLOG_INDEX_HEADING)
        .into_iter()
        .collect();

    PageViewModel {
        meta: page_meta(config, &route, Some(BLOG_INDEX_TITLE), None),
        route,
        identity: page_identity(&config.identity),
        sections,
        post: None,
    }
}

/// A single post with links to its chronological neighbours.
pub fn compose_post_detail(
    config: &SiteConfig,
    posts: &[BlogPost],
    slug: &str,
) -> Result<PageViewModel, NotFoundError> {
    let wanted = slug.trim_matches('/');
    let index = posts
        .iter()
        .position(|p| p.slug == wanted)
        .ok_or_else(|| NotFoundError {
            slug: wanted.to_string(),
        })?;

    let prefix = config.prefix();
    let post = &posts[index];
    let previous = posts.get(index + 1).map(|p| summarize(p, &prefix));
    let next = index
        .checked_sub(1)
        .and_then(|i| posts.get(i))
        .map(|p| summarize(p, &prefix));

    let route = Route::Post {
        slug: post.slug.clone(),
    };
    let summary = post.summary();

    Ok(PageViewModel {
        meta: page_meta(config, &route, Some(post.title.as_str()), Some(summary.as_str())),
        route,
        identity: page_identity(&config.identity),
        sections: Vec::new(),
        post: Some(PostDetail {
            post: post.clone(),
            previous,
            next,
        }),
    })
}

fn blog_section(
    config: &SiteConfig,
    posts: &[BlogPost],
    limit: Option<usize>,
    heading: &str,
) -> Option<Section> {
    if !config.blog_enabled || posts.is_empty() {
        return None;
    }
    let prefix = config.prefix();
    let shown = limit.map_or(posts.len(), |n| n.min(posts.len()));

    Some(Section::Blog {
        heading: heading.to_string(),
        posts: posts[..shown].iter().map(|p| summarize(p, &prefix)).collect(),
        show_all: shown < posts.len(),
    })
}

fn summarize(post: &BlogPost, prefix: &str) -> PostSummary {
    PostSummary {
        slug: post.slug.clone(),
        title: post.title.clone(),
        date: post.date,
        summary: post.summary(),
        href: Route::Post {
            slug: post.slug.clone(),
        }
        .href(prefix),
    }
}

/// Normalize listing entries; `None` when there is nothing to show.
fn listing_views(entries: &[ListingEntry], prefix: &str) -> Option<Vec<ListingView>> {
    if entries.is_empty() {
        return None;
    }
    Some(
        entries
            .iter()
            .map(|entry| ListingView {
                name: entry.name.clone(),
                description: entry.description.clone(),
                link: resolve(&[entry.link.as_deref()]).map(|link| {
                    if entry.internal {
                        LinkTarget::Internal(internal_href(&link, prefix))
                    } else {
                        LinkTarget::External(link)
                    }
                }),
                logo: resolve(&[entry.logo.as_deref()]),
                timeline: resolve(&[entry.timeline.as_deref()]),
            })
            .collect(),
    )
}

fn internal_href(link: &str, prefix: &str) -> String {
    format!("{prefix}/{}", link.trim_start_matches('/'))
}

/// The identity as pages see it: blank optional fields become absent.
fn page_identity(identity: &Identity) -> Identity {
    Identity {
        author: resolve(&[identity.author.as_deref()]),
        picture: resolve(&[identity.picture.as_deref()]),
        social_image: resolve(&[identity.social_image.as_deref()]),
        ..identity.clone()
    }
}

fn page_meta(
    config: &SiteConfig,
    route: &Route,
    page_title: Option<&str>,
    description: Option<&str>,
) -> PageMeta {
    let site_title = &config.identity.title;
    let title = match page_title {
        Some(t) => format!("{t} | {site_title}"),
        None => site_title.clone(),
    };

    PageMeta {
        title,
        description: resolve(&[description, Some(config.identity.description.as_str())])
            .unwrap_or_default(),
        // site_url already includes any path prefix
        canonical_url: config
            .base_url()
            .map(|base| format!("{base}{}", route.href(""))),
    }
}
