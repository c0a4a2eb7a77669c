//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every post is shown
//! by its positional index and title first; the source file and other
//! details follow as indented context lines. The result reads as a content
//! inventory while still letting users trace entries back to files.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Site
//!     Jane Doe | Engineer
//!     Blog: enabled (5 posts on home)
//!     Sections: about, skills, blog, projects, experience, education
//!
//! Posts
//! 001 2021: Year in Review (2021-12-30)
//!     Source: 2021/year-in-review/index.md
//! 002 Hello World (2021-03-14)
//!     Source: hello-world.md
//!     Summary: The first post on this site.
//!
//! Skipped
//!     broken-date.md: invalid date "sometime last spring": ...
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Blog → blog/index.html
//! 001 Hello World → hello-world/index.html
//!
//! Generated 3 pages (1 post, 0 skipped)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::compose::{self, Route};
use crate::content::{BlogPost, ContentParseError};
use crate::pipeline::{BuildReport, Site};

const SUMMARY_WIDTH: usize = 60;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Post header: index, title, and date when known.
///
/// ```text
/// 001 Hello World (2021-03-14)
/// 002 Untitled
/// ```
fn post_header(index: usize, post: &BlogPost) -> String {
    match post.date {
        Some(date) => format!("{} {} ({})", format_index(index), post.title, date),
        None => format!("{} {}", format_index(index), post.title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn skipped_lines(skipped: &[ContentParseError]) -> Vec<String> {
    if skipped.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Skipped".to_string()];
    lines.extend(skipped.iter().map(|err| format!("{}{}", indent(1), err)));
    lines
}

// ============================================================================
// check
// ============================================================================

/// Format the inventory of a loaded site.
pub fn format_check_output(site: &Site) -> Vec<String> {
    let config = &site.config;
    let posts = site.repository.list_posts();
    let mut lines = vec!["Site".to_string()];

    lines.push(format!("{}{}", indent(1), config.identity.title));
    if config.blog_enabled {
        lines.push(format!(
            "{}Blog: enabled ({} on home)",
            indent(1),
            plural(config.home_post_limit, "post")
        ));
    } else {
        lines.push(format!("{}Blog: disabled", indent(1)));
    }

    let home = compose::compose_home(config, posts);
    let ids: Vec<&str> = home.sections.iter().map(|s| s.id()).collect();
    if ids.is_empty() {
        lines.push(format!("{}Sections: none", indent(1)));
    } else {
        lines.push(format!("{}Sections: {}", indent(1), ids.join(", ")));
    }

    lines.push(String::new());
    lines.push("Posts".to_string());
    if posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in posts.iter().enumerate() {
        lines.push(post_header(i + 1, post));
        lines.push(format!("{}Source: {}", indent(1), post.source_path));
        if let Some(description) = &post.description {
            lines.push(format!(
                "{}Summary: {}",
                indent(1),
                truncate_desc(description, SUMMARY_WIDTH)
            ));
        }
    }

    lines.extend(skipped_lines(site.repository.skipped()));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(site: &Site) {
    for line in format_check_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format the pages a build wrote.
///
/// Information-first: each page leads with its title, followed by `→` and
/// the output path.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut post_index = 0;

    for page in &report.pages {
        let path = page.path.to_string_lossy().replace('\\', "/");
        let label = match &page.route {
            Route::Home => "Home".to_string(),
            Route::BlogIndex => "Blog".to_string(),
            Route::Post { .. } => {
                post_index += 1;
                format!("{} {}", format_index(post_index), page.title)
            }
        };
        lines.push(format!("{} \u{2192} {}", label, path));
    }

    lines.extend(skipped_lines(&report.skipped));
    lines.push(String::new());
    lines.push(format!(
        "Generated {} ({}, {} skipped)",
        plural(report.pages.len(), "page"),
        plural(report.posts, "post"),
        report.skipped.len()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
