//! Site configuration module.
//!
//! Loads and validates the site configuration: who the site is about, the
//! listings shown on the home page, and whether the blog is switched on.
//! The result is an immutable [`SiteConfig`] that every later stage borrows.
//!
//! ## Config File Location
//!
//! By default the configuration lives next to the content directory:
//!
//! ```text
//! site/
//! ├── config.toml              # Site configuration (required)
//! └── content/
//!     └── blog/
//!         ├── hello-world.md
//!         └── 2021/
//!             └── retro/index.md
//! ```
//!
//! A `.json` file with the same keys is accepted too. The top-level switches
//! also answer to their camelCase spellings (`siteUrl`, `pathPrefix`,
//! `blogEnabled`, `homePostLimit`); every other key must match exactly.
//!
//! ## Configuration Options
//!
//! ```toml
//! site_url = "https://example.com"   # Canonical base URL (optional)
//! path_prefix = "/portfolio"         # Serve the site under a sub-path (optional)
//! blog_enabled = true                # Default: false
//! home_post_limit = 5                # Posts shown on the home page
//!
//! [identity]
//! name = "Jane Doe"                  # Required
//! title = "Jane Doe | Engineer"      # Required
//! description = "Engineer based in Lisbon."
//! about = "Longer biography shown in the About section."
//! author = "@janedoe"
//! picture = "https://jane.example/me.jpg"        # Header avatar (optional)
//! social_image = "https://jane.example/card.png" # og:image card (optional)
//!
//! [[identity.social]]
//! label = "GitHub"
//! url = "https://github.com/janedoe"
//!
//! [[projects]]
//! name = "Widget"
//! description = "Makes widgets."
//! link = "https://widget.example"    # Optional
//! logo = "https://widget.example/logo.png"  # Optional
//!
//! [[experience]]
//! name = "Staff Engineer"
//! description = "Example Corp"
//! timeline = "2021 - Present"        # Optional
//!
//! [[skills]]
//! name = "Languages"
//! description = "Rust, Go, Python"
//!
//! [theme]
//! accent = "#3486eb"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Missing list sections are
//! treated as empty.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing required config field: {0}")]
    MissingField(&'static str),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Where a configuration document comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A file on disk. `.json` files are parsed as JSON, anything else as TOML.
    File(PathBuf),
    /// An embedded TOML literal.
    Toml(String),
    /// An embedded JSON literal.
    Json(String),
}

impl ConfigSource {
    pub fn describe(&self) -> String {
        match self {
            ConfigSource::File(path) => path.display().to_string(),
            ConfigSource::Toml(_) => "<inline toml>".to_string(),
            ConfigSource::Json(_) => "<inline json>".to_string(),
        }
    }
}

/// Site configuration.
///
/// Only `identity.name` and `identity.title` are required. Every list
/// defaults to empty and every optional field to absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute base URL of the deployed site, including any path prefix.
    /// Used for canonical links.
    #[serde(alias = "siteUrl")]
    pub site_url: Option<String>,
    /// URL prefix the site is served under, e.g. `/portfolio`.
    #[serde(alias = "pathPrefix")]
    pub path_prefix: String,
    /// Whether the blog section and blog routes are generated at all.
    #[serde(alias = "blogEnabled")]
    pub blog_enabled: bool,
    /// How many recent posts the home page lists.
    #[serde(alias = "homePostLimit")]
    pub home_post_limit: usize,
    pub identity: Identity,
    pub projects: Vec<ListingEntry>,
    pub experience: Vec<ListingEntry>,
    pub education: Vec<ListingEntry>,
    pub skills: Vec<SkillGroup>,
    /// Colors used by the HTML renderer.
    pub theme: ThemeConfig,
}

pub const DEFAULT_HOME_POST_LIMIT: usize = 5;

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: None,
            path_prefix: String::new(),
            blog_enabled: false,
            home_post_limit: DEFAULT_HOME_POST_LIMIT,
            identity: Identity::default(),
            projects: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate required fields and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.name.trim().is_empty() {
            return Err(ConfigError::MissingField("identity.name"));
        }
        if self.identity.title.trim().is_empty() {
            return Err(ConfigError::MissingField("identity.title"));
        }
        if self.home_post_limit == 0 {
            return Err(ConfigError::Validation(
                "home_post_limit must be at least 1".into(),
            ));
        }
        self.theme.validate()?;
        if let Some(url) = self.site_url.as_deref().map(str::trim)
            && !url.is_empty()
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "site_url must be an http(s) URL, got {url:?}"
            )));
        }
        Ok(())
    }

    /// Normalized path prefix: empty, or `/segment[/segment...]` without a
    /// trailing slash.
    pub fn prefix(&self) -> String {
        let trimmed = self.path_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }

    /// Site URL without a trailing slash, if one is configured.
    pub fn base_url(&self) -> Option<&str> {
        self.site_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
    }
}

/// Who the site is about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Identity {
    pub name: String,
    /// Default page title, also the suffix of every other page title.
    pub title: String,
    /// One-line tagline, used as the default meta description.
    pub description: String,
    /// Biography shown in the About section.
    pub about: Option<String>,
    /// Author handle, e.g. `@janedoe`.
    pub author: Option<String>,
    /// Profile picture URL shown in the header.
    pub picture: Option<String>,
    /// Image URL for social cards (`og:image`).
    pub social_image: Option<String>,
    pub social: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

/// One item in the projects, experience, or education lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingEntry {
    pub name: String,
    pub description: String,
    pub link: Option<String>,
    pub logo: Option<String>,
    /// Free-form date range, e.g. `"2016 - 2018"`.
    pub timeline: Option<String>,
    /// `link` is a route within this site rather than an external URL.
    #[serde(default)]
    pub internal: bool,
}

impl ListingEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            link: None,
            logo: None,
            timeline: None,
            internal: false,
        }
    }
}

/// A labelled group of skills. `description` is kept as the raw
/// comma-joined string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillGroup {
    pub name: String,
    pub description: String,
}

/// Colors injected into the generated stylesheet as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Links, headings accents, and the browser theme color.
    pub accent: String,
    pub text: String,
    /// Secondary text: descriptions, timelines, dates.
    pub text_muted: String,
    pub background: String,
}

/// Characters that could end the inlined `<style>` element or the
/// declaration a value is written into.
const THEME_FORBIDDEN: &[char] = &['<', '>', ';', '{', '}'];

impl ThemeConfig {
    /// Theme values are written verbatim into CSS.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("accent", &self.accent),
            ("text", &self.text),
            ("text_muted", &self.text_muted),
            ("background", &self.background),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() || value.contains(THEME_FORBIDDEN) {
                return Err(ConfigError::Validation(format!(
                    "theme.{name} is not a valid CSS color: {value:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent: "#3486eb".to_string(),
            text: "#111827".to_string(),
            text_muted: "#4b5563".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse and validate a configuration document.
pub fn load(source: &ConfigSource) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = match source {
        ConfigSource::File(path) => {
            let content = fs::read_to_string(path)?;
            if is_json(path) {
                serde_json::from_str(&content)?
            } else {
                toml::from_str(&content)?
            }
        }
        ConfigSource::Toml(content) => toml::from_str(content)?,
        ConfigSource::Json(content) => serde_json::from_str(content)?,
    };
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    load(&ConfigSource::File(root.join("config.toml")))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Returns a fully-commented sample `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Folio Configuration
# ==========================
# Only identity.name and identity.title are required.
# Every list section may be omitted; empty sections are not rendered.
# Unknown keys will cause an error.

# Absolute URL of the deployed site. Used for canonical links.
# site_url = "https://example.com"

# Serve the site under a sub-path (e.g. GitHub project pages).
# path_prefix = "/portfolio"

# Generate the blog section, the blog index, and one page per post.
blog_enabled = true

# Number of recent posts listed on the home page.
home_post_limit = 5

# ---------------------------------------------------------------------------
# Identity
# ---------------------------------------------------------------------------
[identity]
name = "Your Name"
title = "Your Name | What You Do"
description = "What you do, and where."
about = "A few sentences about yourself."
author = "@handle"
# picture = "https://example.com/me.jpg"         # shown in the header
# social_image = "https://example.com/card.png"  # og:image for link previews

[[identity.social]]
label = "GitHub"
url = "https://github.com/handle"

# ---------------------------------------------------------------------------
# Listings. `link`, `logo` and `timeline` are optional.
# Set `internal = true` when `link` points to a page on this site.
# ---------------------------------------------------------------------------
[[projects]]
name = "Project"
description = "What it does."
link = "https://example.com/project"

[[experience]]
name = "Role"
description = "Company"
timeline = "2020 - Present"

[[education]]
name = "Degree"
description = "University"
timeline = "2012 - 2016"

[[skills]]
name = "Languages & Frameworks"
description = "Rust, Go, TypeScript"

# ---------------------------------------------------------------------------
# Theme colors
# ---------------------------------------------------------------------------
[theme]
accent = "#3486eb"
text = "#111827"
text_muted = "#4b5563"
background = "#ffffff"
"##
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --color-accent: {accent};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-bg: {background};
}}"#,
        accent = theme.accent,
        text = theme.text,
        text_muted = theme.text_muted,
        background = theme.background,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
[identity]
name = "Jane Doe"
title = "Jane Doe | Engineer"
"#;

    fn load_toml(toml: &str) -> Result<SiteConfig, ConfigError> {
        load(&ConfigSource::Toml(toml.to_string()))
    }

    #[test]
    fn minimal_config_loads_with_defaults() {
        let config = load_toml(MINIMAL).unwrap();
        assert_eq!(config.identity.name, "Jane Doe");
        assert!(!config.blog_enabled);
        assert_eq!(config.home_post_limit, DEFAULT_HOME_POST_LIMIT);
        assert!(config.projects.is_empty());
        assert!(config.experience.is_empty());
        assert!(config.education.is_empty());
        assert!(config.skills.is_empty());
        assert_eq!(config.theme.accent, "#3486eb");
    }

    #[test]
    fn missing_name_is_error() {
        let result = load_toml(
            r#"
[identity]
title = "Somebody"
"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("identity.name"))
        ));
    }

    #[test]
    fn blank_name_is_error() {
        let result = load_toml(
            r#"
[identity]
name = "   "
title = "Somebody"
"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("identity.name"))
        ));
    }

    #[test]
    fn missing_title_is_error() {
        let result = load_toml(
            r#"
[identity]
name = "Jane"
"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("identity.title"))
        ));
    }

    #[test]
    fn missing_identity_table_is_error() {
        let result = load_toml("blog_enabled = true\n");
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("identity.name"))
        ));
    }

    #[test]
    fn listing_optional_fields_parse() {
        let config = load_toml(
            r#"
[identity]
name = "Jane"
title = "Jane"

[[projects]]
name = "Widget"
description = "Makes widgets"
link = "https://widget.example"
logo = "https://widget.example/logo.png"

[[projects]]
name = "Notes"
description = "Internal page"
link = "/notes"
internal = true

[[experience]]
name = "Engineer"
description = "Example Corp"
timeline = "2020 - Present"
"#,
        )
        .unwrap();

        assert_eq!(config.projects.len(), 2);
        assert_eq!(
            config.projects[0].link.as_deref(),
            Some("https://widget.example")
        );
        assert!(!config.projects[0].internal);
        assert!(config.projects[1].internal);
        assert_eq!(config.projects[1].timeline, None);
        assert_eq!(
            config.experience[0].timeline.as_deref(),
            Some("2020 - Present")
        );
        assert_eq!(config.experience[0].logo, None);
    }

    #[test]
    fn listing_without_description_is_error() {
        let result = load_toml(
            r#"
[identity]
name = "Jane"
title = "Jane"

[[projects]]
name = "Widget"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result = load_toml(
            r#"
blog_enbled = true

[identity]
name = "Jane"
title = "Jane"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let result = load_toml(
            r#"
[identity]
name = "Jane"
title = "Jane"
github = "https://github.com/jane"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn json_source_accepts_camel_case_aliases() {
        let json = r#"{
            "siteUrl": "https://jane.example",
            "blogEnabled": true,
            "identity": { "name": "Jane", "title": "Jane | Engineer" },
            "skills": [
                { "name": "Databases", "description": "PostgreSQL, Redis" }
            ]
        }"#;
        let config = load(&ConfigSource::Json(json.to_string())).unwrap();
        assert!(config.blog_enabled);
        assert_eq!(config.base_url(), Some("https://jane.example"));
        assert_eq!(config.skills[0].description, "PostgreSQL, Redis");
    }

    #[test]
    fn json_source_missing_name_is_error() {
        let json = r#"{ "identity": { "title": "Jane" } }"#;
        let result = load(&ConfigSource::Json(json.to_string()));
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("identity.name"))
        ));
    }

    // =========================================================================
    // File loading
    // =========================================================================

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), MINIMAL).unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.identity.title, "Jane Doe | Engineer");
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_file_picks_json_by_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("site.json");
        fs::write(
            &path,
            r#"{ "identity": { "name": "Jane", "title": "Jane" } }"#,
        )
        .unwrap();

        let config = load(&ConfigSource::File(path)).unwrap();
        assert_eq!(config.identity.name, "Jane");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[identity\nname = ").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_home_post_limit_zero() {
        let mut config = load_toml(MINIMAL).unwrap();
        config.home_post_limit = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_site_url_scheme() {
        let mut config = load_toml(MINIMAL).unwrap();
        config.site_url = Some("ftp://example.com".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));

        config.site_url = Some("https://example.com/".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), Some("https://example.com"));
    }

    #[test]
    fn empty_site_url_means_none() {
        let mut config = load_toml(MINIMAL).unwrap();
        config.site_url = Some("  ".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), None);
    }

    #[test]
    fn prefix_is_normalized() {
        let mut config = SiteConfig::default();
        assert_eq!(config.prefix(), "");

        config.path_prefix = "portfolio/".to_string();
        assert_eq!(config.prefix(), "/portfolio");

        config.path_prefix = "/".to_string();
        assert_eq!(config.prefix(), "");

        config.path_prefix = "/a/b/".to_string();
        assert_eq!(config.prefix(), "/a/b");
    }

    // =========================================================================
    // Stock config and CSS
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid() {
        let config = load_toml(stock_config_toml()).unwrap();
        assert!(config.blog_enabled);
        assert_eq!(config.identity.social.len(), 1);
        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.skills.len(), 1);
    }

    #[test]
    fn stock_config_theme_matches_defaults() {
        let config = load_toml(stock_config_toml()).unwrap();
        let defaults = ThemeConfig::default();
        assert_eq!(config.theme.accent, defaults.accent);
        assert_eq!(config.theme.text, defaults.text);
        assert_eq!(config.theme.text_muted, defaults.text_muted);
        assert_eq!(config.theme.background, defaults.background);
    }

    #[test]
    fn theme_value_cannot_close_style_element() {
        let result = load_toml(&format!(
            "{MINIMAL}\n[theme]\naccent = \"red}}</style><script>alert(1)</script>\"\n"
        ));
        assert!(matches!(
            result,
            Err(ConfigError::Validation(msg)) if msg.contains("theme.accent")
        ));
    }

    #[test]
    fn theme_rejects_declaration_breakers() {
        for bad in ["red; color: blue", "#fff }", "{", "  "] {
            let mut theme = ThemeConfig::default();
            theme.background = bad.to_string();
            assert!(
                matches!(theme.validate(), Err(ConfigError::Validation(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn theme_accepts_css_color_forms() {
        let mut theme = ThemeConfig::default();
        for good in ["#abc", "rebeccapurple", "rgb(10, 20, 30)", "hsl(210 50% 40% / 0.8)"] {
            theme.text = good.to_string();
            assert!(theme.validate().is_ok(), "rejected {good:?}");
        }
    }

    #[test]
    fn identity_images_optional() {
        let config = load_toml(MINIMAL).unwrap();
        assert_eq!(config.identity.picture, None);
        assert_eq!(config.identity.social_image, None);

        let config = load_toml(
            r#"
[identity]
name = "Jane"
title = "Jane"
picture = "https://jane.example/me.jpg"
social_image = "https://jane.example/card.png"
"#,
        )
        .unwrap();
        assert_eq!(
            config.identity.picture.as_deref(),
            Some("https://jane.example/me.jpg")
        );
        assert_eq!(
            config.identity.social_image.as_deref(),
            Some("https://jane.example/card.png")
        );
    }

    #[test]
    fn generate_theme_css_includes_all_variables() {
        let mut theme = ThemeConfig::default();
        theme.accent = "#ff0000".to_string();

        let css = generate_theme_css(&theme);
        assert!(css.contains("--color-accent: #ff0000"));
        assert!(css.contains("--color-text:"));
        assert!(css.contains("--color-text-muted:"));
        assert!(css.contains("--color-bg:"));
    }
}
