use clap::{Parser, Subcommand};
use simple_folio::config::{self, ConfigSource};
use simple_folio::output;
use simple_folio::pipeline::{self, BuildOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-folio")]
#[command(about = "Static site generator for a personal portfolio and blog")]
#[command(long_about = "\
Static site generator for a personal portfolio and blog

One config file describes who you are and what you have done. Markdown files
with front matter become blog posts.

Site structure:

  site/
  ├── config.toml                  # Identity, listings, theme (required)
  └── content/
      ├── hello-world.md           # Post → /hello-world/
      └── 2021/
          └── year-in-review/
              └── index.md         # Post → /2021/year-in-review/

Post front matter (YAML between --- fences, or TOML between +++ fences):
  title:       falls back to the slug
  date:        YYYY-MM-DD; posts without a date are listed last
  description: falls back to an excerpt of the body

Run 'simple-folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site configuration file (.toml or .json)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Content directory holding the blog posts
    #[arg(long, default_value = "content", global = true)]
    content: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline and write the site
    Build,
    /// Validate config and content without writing anything
    Check,
    /// Print every composed page as JSON
    Pages,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let options = BuildOptions {
        config: ConfigSource::File(cli.config.clone()),
        content_dir: cli.content.clone(),
        output_dir: cli.output.clone(),
    };

    match cli.command {
        Command::Build => {
            println!("==> Building {}", options.content_dir.display());
            let report = pipeline::build(&options)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", options.output_dir.display());
        }
        Command::Check => {
            println!("==> Checking {}", options.config.describe());
            let site = pipeline::check(&options)?;
            output::print_check_output(&site);
            println!("==> Content is valid");
        }
        Command::Pages => {
            let site = pipeline::check(&options)?;
            let pages = site.compose()?;
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` takes precedence over flags.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
