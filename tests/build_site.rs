//! End-to-end tests that run the compiled binary against `fixtures/site/`.
//!
//! Run with: `cargo test --test build_site`

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/site")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_simple-folio"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run simple-folio")
}

fn run_in_site(command: &str, config: &Path, output: &Path) -> Output {
    let content = fixture_root().join("content");
    run(&[
        command,
        "--config",
        config.to_str().unwrap(),
        "--content",
        content.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--quiet",
    ])
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read(dir: &Path, rel: &str) -> String {
    fs::read_to_string(dir.join(rel)).unwrap_or_else(|e| panic!("cannot read {rel}: {e}"))
}

// ===========================================================================
// build
// ===========================================================================

#[test]
fn build_generates_all_routes() {
    let tmp = TempDir::new().unwrap();
    let dist = tmp.path().join("dist");
    let out = run_in_site("build", &fixture_root().join("config.toml"), &dist);
    assert!(out.status.success(), "build failed: {:?}", out);

    for rel in [
        "index.html",
        "blog/index.html",
        "hello-world/index.html",
        "notes-on-rust/index.html",
        "untitled-thoughts/index.html",
        "2021/year-in-review/index.html",
    ] {
        assert!(dist.join(rel).is_file(), "missing {rel}");
    }
    assert!(!dist.join("broken-date").exists());

    let report = stdout(&out);
    assert!(report.contains("Home \u{2192} index.html"));
    assert!(report.contains("Generated 6 pages (4 posts, 1 skipped)"));
}

#[test]
fn home_page_sections_in_order() {
    let tmp = TempDir::new().unwrap();
    let dist = tmp.path().join("dist");
    let out = run_in_site("build", &fixture_root().join("config.toml"), &dist);
    assert!(out.status.success());

    let home = read(&dist, "index.html");
    let positions: Vec<usize> = ["about", "skills", "blog", "projects", "experience", "education"]
        .iter()
        .map(|id| {
            home.find(&format!(r#"id="{id}""#))
                .unwrap_or_else(|| panic!("section {id} missing"))
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn post_page_has_neighbours_and_meta() {
    let tmp = TempDir::new().unwrap();
    let dist = tmp.path().join("dist");
    let out = run_in_site("build", &fixture_root().join("config.toml"), &dist);
    assert!(out.status.success());

    let post = read(&dist, "hello-world/index.html");
    assert!(post.contains("<title>Hello World | Jane Doe | Engineer</title>"));
    assert!(post.contains(r#"content="The first post on this site.""#));
    assert!(post.contains(r#"href="/notes-on-rust/" rel="prev""#));
    assert!(post.contains(r#"href="/2021/year-in-review/" rel="next""#));

    let oldest = read(&dist, "untitled-thoughts/index.html");
    assert!(!oldest.contains(r#"rel="prev""#));
}

#[test]
fn blog_disabled_builds_home_only() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    fs::write(
        &config,
        "[identity]\nname = \"Jane Doe\"\ntitle = \"Jane Doe\"\n\n[[projects]]\nname = \"Widget\"\ndescription = \"Widgets.\"\n",
    )
    .unwrap();
    let dist = tmp.path().join("dist");

    let out = run_in_site("build", &config, &dist);
    assert!(out.status.success());
    assert!(dist.join("index.html").is_file());
    assert!(!dist.join("blog").exists());
    assert!(!dist.join("hello-world").exists());

    let home = read(&dist, "index.html");
    assert!(!home.contains(r#"id="blog""#));
    assert!(home.contains(r#"id="projects""#));
    assert!(!home.contains(r#"id="experience""#));
}

#[test]
fn invalid_config_fails_without_output() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    fs::write(&config, "[identity]\ntitle = \"No Name\"\n").unwrap();
    let dist = tmp.path().join("dist");

    let out = run_in_site("build", &config, &dist);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("identity.name"));
    assert!(!dist.exists());
}

// ===========================================================================
// check / pages / gen-config
// ===========================================================================

#[test]
fn check_reports_skipped_document() {
    let tmp = TempDir::new().unwrap();
    let dist = tmp.path().join("dist");
    let out = run_in_site("check", &fixture_root().join("config.toml"), &dist);
    assert!(out.status.success());

    let report = stdout(&out);
    assert!(report.contains("001 2021: Year in Review (2021-12-30)"));
    assert!(report.contains("broken-date.md: invalid date"));
    assert!(!dist.exists());
}

#[test]
fn pages_prints_view_models() {
    let tmp = TempDir::new().unwrap();
    let out = run_in_site("pages", &fixture_root().join("config.toml"), tmp.path());
    assert!(out.status.success());

    let pages: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let pages = pages.as_array().unwrap();
    assert_eq!(pages.len(), 6);
    assert_eq!(pages[0]["route"]["kind"], "home");
    assert_eq!(pages[1]["route"]["kind"], "blog_index");
    assert_eq!(pages[2]["route"]["slug"], "2021/year-in-review");
}

#[test]
fn gen_config_is_loadable() {
    let tmp = TempDir::new().unwrap();
    let out = run(&["gen-config"]);
    assert!(out.status.success());

    let config = tmp.path().join("config.toml");
    fs::write(&config, &out.stdout).unwrap();
    let dist = tmp.path().join("dist");
    let out = run_in_site("build", &config, &dist);
    assert!(out.status.success(), "stock config failed to build: {:?}", out);
}
