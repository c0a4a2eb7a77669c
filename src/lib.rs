//! # Simple Folio
//!
//! A static site generator for a personal portfolio with an optional blog.
//! One configuration file says who the site is about and lists projects,
//! experience, education and skills; a directory of markdown files holds the
//! blog posts.
//!
//! # Architecture: Four Stages
//!
//! ```text
//! 1. Load      config.toml   →  SiteConfig          (who, what, which sections)
//! 2. Index     content/      →  ContentRepository   (posts, newest first)
//! 3. Compose   both          →  PageViewModel       (one per route)
//! 4. Render    view-models   →  dist/               (HTML files)
//! ```
//!
//! Loading and indexing are independent. Composition is a pure function of
//! their results, which keeps every rule about what a page shows (section
//! visibility, ordering, previous/next links, meta tags) testable without
//! touching the filesystem or parsing HTML. Rendering only maps data to
//! markup, so another template technology can replace [`render::HtmlRenderer`]
//! by implementing [`render::Renderer`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` / JSON loading, validation, stock config, theme CSS |
//! | [`content`] | Walks the content directory, parses front matter and markdown, indexes posts |
//! | [`slug`] | Derives post slugs from relative file paths |
//! | [`metadata`] | First-non-empty field resolution and body excerpts |
//! | [`compose`] | Builds a view-model per route: sections, summaries, post navigation, meta |
//! | [`render`] | `Renderer` trait and the Maud-based HTML renderer |
//! | [`pipeline`] | Runs the stages in order and writes the output directory |
//! | [`output`] | CLI output formatting for `check` and `build` |
//!
//! # Routes
//!
//! | Route | Output | Generated when |
//! |-------|--------|----------------|
//! | Home | `index.html` | always |
//! | Blog index | `blog/index.html` | `blog_enabled` |
//! | Post | `<slug>/index.html` | `blog_enabled` |
//!
//! # Design Decisions
//!
//! ## Empty Means Hidden
//!
//! Every home section follows one rule: it is shown if and only if it has
//! content. An omitted list, an empty list, and a blank string are all the
//! same thing. The blog section additionally needs `blog_enabled = true`.
//! Templates never repeat these checks; the composer has already dropped
//! anything empty.
//!
//! ## Bad Posts Don't Break the Build
//!
//! A post with broken front matter, an unparseable date, or a clashing slug
//! is left out of the index and reported by `check` and `build`. Everything
//! else still gets published. Configuration errors are the opposite: a site
//! without a name or title is not built at all.
//!
//! ## Render First, Write Last
//!
//! All pages are rendered in memory before the first file is written. A
//! failed build leaves the output directory as it was.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), so templates are
//! compile-time checked Rust and all interpolation is escaped. There is no
//! template directory to ship and the stylesheet is embedded in the binary.

pub mod compose;
pub mod config;
pub mod content;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod slug;

#[cfg(test)]
pub(crate) mod test_helpers;
