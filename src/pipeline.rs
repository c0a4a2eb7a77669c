//! Build pipeline.
//!
//! Runs the stages in order and owns the error policy between them:
//!
//! ```text
//! 1. Load      config.toml  →  SiteConfig           (fatal on any error)
//! 2. Index     content/     →  ContentRepository    (bad documents skipped)
//! 3. Compose   both         →  Vec<PageViewModel>
//! 4. Render    view-models  →  HTML strings         (fatal on any error)
//! 5. Write     HTML         →  dist/<route>/index.html
//! ```
//!
//! Every page is rendered in memory before the first file is written, so a
//! failed build never leaves a half-written output directory behind. The
//! output directory is not cleaned first; stale files from earlier builds
//! survive.

use crate::compose::{self, PageViewModel, Route};
use crate::config::{self, ConfigError, ConfigSource, SiteConfig};
use crate::content::{ContentError, ContentParseError, ContentRepository, NotFoundError};
use crate::render::{HtmlRenderer, RenderError, Renderer};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Where to read from and write to.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub config: ConfigSource,
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl BuildOptions {
    /// Conventional layout: `<root>/config.toml`, `<root>/content/`,
    /// `<root>/dist/`.
    pub fn for_site_root(root: &Path) -> Self {
        Self {
            config: ConfigSource::File(root.join("config.toml")),
            content_dir: root.join("content"),
            output_dir: root.join("dist"),
        }
    }
}

/// A loaded site: validated config plus the post index.
#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    pub repository: ContentRepository,
}

impl Site {
    /// Compose every route of the site.
    pub fn compose(&self) -> Result<Vec<PageViewModel>, NotFoundError> {
        compose::compose_site(&self.config, self.repository.list_posts())
    }
}

/// One rendered document, ready to be written.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub route: Route,
    /// Post title on post pages, the document title elsewhere.
    pub title: String,
    /// Relative to the output directory.
    pub path: PathBuf,
    pub html: String,
}

/// A page written by [`build`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub route: Route,
    pub title: String,
    pub path: PathBuf,
}

/// Summary of a finished build.
#[derive(Debug)]
pub struct BuildReport {
    /// Written pages in route order.
    pub pages: Vec<GeneratedPage>,
    /// Number of indexed posts.
    pub posts: usize,
    /// Documents left out of the index.
    pub skipped: Vec<ContentParseError>,
}

/// Load the config and index the content, without composing or writing.
///
/// The config is loaded first; if it is invalid the content directory is
/// never read.
pub fn check(options: &BuildOptions) -> Result<Site, BuildError> {
    debug!(source = %options.config.describe(), "loading config");
    let config = config::load(&options.config)?;

    debug!(dir = %options.content_dir.display(), "indexing content");
    let repository = ContentRepository::open(&options.content_dir)?;
    info!(
        posts = repository.len(),
        skipped = repository.skipped().len(),
        "content indexed"
    );

    Ok(Site { config, repository })
}

/// Run the full pipeline with the built-in HTML renderer.
pub fn build(options: &BuildOptions) -> Result<BuildReport, BuildError> {
    let site = check(options)?;
    let renderer = HtmlRenderer::new(&site.config);
    build_site(&site, &renderer, &options.output_dir)
}

/// Compose, render and write a loaded site with any renderer.
pub fn build_site<R>(site: &Site, renderer: &R, output_dir: &Path) -> Result<BuildReport, BuildError>
where
    R: Renderer + Sync,
{
    let pages = site.compose()?;
    debug!(count = pages.len(), "composed pages");

    let rendered = render_pages(&pages, renderer)?;
    write_pages(output_dir, &rendered)?;
    info!(
        pages = rendered.len(),
        output = %output_dir.display(),
        "site written"
    );

    Ok(BuildReport {
        pages: rendered
            .into_iter()
            .map(|p| GeneratedPage {
                route: p.route,
                title: p.title,
                path: p.path,
            })
            .collect(),
        posts: site.repository.len(),
        skipped: site.repository.skipped().to_vec(),
    })
}

/// Render every page. Stops at the first failure; order is preserved.
pub fn render_pages<R>(pages: &[PageViewModel], renderer: &R) -> Result<Vec<RenderedPage>, RenderError>
where
    R: Renderer + Sync,
{
    pages
        .par_iter()
        .map(|page| -> Result<RenderedPage, RenderError> {
            Ok(RenderedPage {
                route: page.route.clone(),
                title: page
                    .post
                    .as_ref()
                    .map_or_else(|| page.meta.title.clone(), |d| d.post.title.clone()),
                path: page.route.output_path(),
                html: renderer.render(page)?,
            })
        })
        .collect()
}

fn write_pages(output_dir: &Path, pages: &[RenderedPage]) -> Result<(), BuildError> {
    for page in pages {
        let path = output_dir.join(&page.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| BuildError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &page.html).map_err(|source| BuildError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %page.path.display(), "wrote page");
    }
    Ok(())
}
