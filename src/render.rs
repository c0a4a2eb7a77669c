//! HTML rendering.
//!
//! The last stage of the build. A [`Renderer`] turns one composed
//! [`PageViewModel`] into a complete document. Renderers never look at the
//! configuration or the repository: whatever a page shows was decided by the
//! composer, so a renderer only maps data to markup.
//!
//! [`HtmlRenderer`] is the built-in implementation. It uses
//! [maud](https://maud.lambda.xyz/) so templates are checked at compile time
//! and every interpolated value is escaped. The only unescaped content is the
//! post body, which is HTML produced by the markdown renderer.
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time and prefixed with the
//! theme's custom properties, then inlined into every page. The output is
//! self-contained: one HTML file per route, no asset directory.

use crate::compose::{
    LinkTarget, ListingView, PageViewModel, PostDetail, PostSummary, Route, Section,
};
use crate::config::{self, Identity, SiteConfig, SkillGroup};
use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use thiserror::Error;

const CSS_STATIC: &str = include_str!("../static/style.css");

#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("post page for '{slug}' has no post data")]
    MissingPost { slug: String },
    #[error("{route} page cannot show post data")]
    UnexpectedPost { route: &'static str },
}

/// Turns a composed page into a document.
pub trait Renderer {
    fn render(&self, page: &PageViewModel) -> Result<String, RenderError>;
}

/// Maud-based HTML renderer.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    css: String,
    prefix: String,
}

impl HtmlRenderer {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            css: format!(
                "{}\n\n{}",
                config::generate_theme_css(&config.theme),
                CSS_STATIC
            ),
            prefix: config.prefix(),
        }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, page: &PageViewModel) -> Result<String, RenderError> {
        let main = match (&page.route, &page.post) {
            (Route::Post { .. }, Some(detail)) => render_post(detail),
            (Route::Post { slug }, None) => {
                return Err(RenderError::MissingPost { slug: slug.clone() });
            }
            (Route::Home, Some(_)) => return Err(RenderError::UnexpectedPost { route: "home" }),
            (Route::BlogIndex, Some(_)) => {
                return Err(RenderError::UnexpectedPost { route: "blog index" });
            }
            (Route::Home, None) => render_sections(&page.sections, &self.prefix, "home-page"),
            (Route::BlogIndex, None) => render_blog_index(&page.sections, &self.prefix),
        };

        let content = html! {
            (site_header(&page.identity, &self.prefix))
            (main)
            (site_footer(&page.identity))
        };
        Ok(base_document(page, &self.css, content).into_string())
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document, including SEO and social meta tags.
fn base_document(page: &PageViewModel, css: &str, content: Markup) -> Markup {
    let meta = &page.meta;
    let og_type = match page.route {
        Route::Post { .. } => "article",
        _ => "website",
    };
    let description = (!meta.description.is_empty()).then_some(meta.description.as_str());

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (meta.title) }
                @if let Some(description) = description {
                    meta name="description" content=(description);
                }
                meta property="og:title" content=(meta.title);
                @if let Some(description) = description {
                    meta property="og:description" content=(description);
                }
                meta property="og:type" content=(og_type);
                @if let Some(url) = &meta.canonical_url {
                    meta property="og:url" content=(url);
                    link rel="canonical" href=(url);
                }
                @if let Some(image) = &page.identity.social_image {
                    meta property="og:image" content=(image);
                    meta name="twitter:image" content=(image);
                }
                meta name="twitter:card" content="summary";
                @if let Some(author) = &page.identity.author {
                    meta name="twitter:creator" content=(author);
                }
                meta name="twitter:title" content=(meta.title);
                @if let Some(description) = description {
                    meta name="twitter:description" content=(description);
                }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header: picture, name, tagline and social links.
fn site_header(identity: &Identity, prefix: &str) -> Markup {
    html! {
        header.site-header {
            @if let Some(picture) = &identity.picture {
                a.profile-link href=(Route::Home.href(prefix)) {
                    img.profile-picture src=(picture) alt=(identity.name);
                }
            }
            h1.site-name {
                a href=(Route::Home.href(prefix)) { (identity.name) }
            }
            @if !identity.description.is_empty() {
                p.site-description { (identity.description) }
            }
            @if !identity.social.is_empty() {
                nav.social {
                    ul {
                        @for link in &identity.social {
                            li {
                                a href=(link.url) target="_blank" rel="noopener noreferrer" {
                                    (link.label)
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn site_footer(identity: &Identity) -> Markup {
    html! {
        footer.site-footer {
            p { "© " (identity.name) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_sections(sections: &[Section], prefix: &str, class: &str) -> Markup {
    html! {
        main class=(class) {
            @for section in sections {
                (render_section(section, prefix))
            }
        }
    }
}

fn render_blog_index(sections: &[Section], prefix: &str) -> Markup {
    if sections.is_empty() {
        return html! {
            main.blog-index {
                p.empty { "No posts yet." }
            }
        };
    }
    render_sections(sections, prefix, "blog-index")
}

/// Renders a single post with previous/next navigation.
fn render_post(detail: &PostDetail) -> Markup {
    let post = &detail.post;
    html! {
        main.post-page {
            article.post {
                header {
                    h2.post-title { (post.title) }
                    @if let Some(date) = post.date {
                        p.post-date { "Posted on " (format_date(date)) }
                    }
                }
                div.post-body {
                    (PreEscaped(&post.body_html))
                }
            }
            @if detail.previous.is_some() || detail.next.is_some() {
                nav.post-nav {
                    ul {
                        li.previous {
                            @if let Some(previous) = &detail.previous {
                                a href=(previous.href) rel="prev" { "← " (previous.title) }
                            }
                        }
                        li.next {
                            @if let Some(next) = &detail.next {
                                a href=(next.href) rel="next" { (next.title) " →" }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

fn render_section(section: &Section, prefix: &str) -> Markup {
    let body = match section {
        Section::About { text } => html! { p.about { (text) } },
        Section::Skills { groups } => render_skills(groups),
        Section::Blog {
            posts, show_all, ..
        } => render_post_list(posts, *show_all, prefix),
        Section::Projects { items }
        | Section::Experience { items }
        | Section::Education { items } => html! {
            @for item in items {
                (summary_item(item))
            }
        },
    };

    html! {
        section id=(section.id()) class="section" {
            h2.section-heading { (section.heading()) }
            (body)
        }
    }
}

fn render_skills(groups: &[SkillGroup]) -> Markup {
    html! {
        @for group in groups {
            div.skill-group {
                h3 { (group.name) }
                p { (group.description) }
            }
        }
    }
}

fn render_post_list(posts: &[PostSummary], show_all: bool, prefix: &str) -> Markup {
    html! {
        @for post in posts {
            div.summary-item {
                h3.summary-name {
                    a href=(post.href) { (post.title) }
                }
                @if let Some(date) = post.date {
                    p.summary-timeline { (format_date(date)) }
                }
                @if !post.summary.is_empty() {
                    p.summary-description { (post.summary) }
                }
            }
        }
        @if show_all {
            p.show-all {
                a href=(Route::BlogIndex.href(prefix)) { "View all posts" }
            }
        }
    }
}

/// One project, job or school entry.
fn summary_item(item: &ListingView) -> Markup {
    let name = html! {
        @match &item.link {
            Some(LinkTarget::Internal(href)) => {
                a href=(href) { (item.name) }
            }
            Some(LinkTarget::External(href)) => {
                a href=(href) target="_blank" rel="noopener noreferrer" { (item.name) }
            }
            None => {
                (item.name)
            }
        }
    };

    html! {
        div.summary-item {
            @if let Some(logo) = &item.logo {
                img.summary-logo src=(logo) alt=(item.name) loading="lazy";
            }
            div {
                h3.summary-name { (name) }
                @if let Some(timeline) = &item.timeline {
                    p.summary-timeline { (timeline) }
                }
                p.summary-description { (item.description) }
            }
        }
    }
}

/// `March 14, 2021`
fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
