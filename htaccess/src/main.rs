//! htaccess - inspect, format and route `.htaccess` files
//!
//! This is the main entry point for the htaccess CLI.

mod config;
mod report;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::CliConfig;
use htaccess_parser::{Document, LineEnding, NodeRef, NodeType};
use htaccess_route::Router;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// htaccess - parse, check and rewrite .htaccess files
#[derive(Parser)]
#[command(name = "htaccess")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML or JSON file with [render] and [route] sections
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and report lines that could not be placed cleanly
    Check {
        /// Path to the .htaccess file
        #[arg(default_value = ".htaccess")]
        file: PathBuf,
    },

    /// Print the canonical rendering of a file
    Fmt {
        #[arg(default_value = ".htaccess")]
        file: PathBuf,

        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,

        /// Use CRLF line endings
        #[arg(long)]
        crlf: bool,
    },

    /// Show the parsed tree
    Tree {
        #[arg(default_value = ".htaccess")]
        file: PathBuf,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// List nodes with a given name
    Find {
        file: PathBuf,

        /// Block or directive name, `#` for comments
        name: String,

        /// Stop at the first match
        #[arg(long)]
        first: bool,
    },

    /// Resolve a URL through the file's rewrite rules
    Route {
        file: PathBuf,

        url: String,

        /// Page to use when no rule matches
        #[arg(long)]
        default_page: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            CliConfig::load(path)?
        }
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Check { file } => {
            let (source, doc) = read_document(&file)?;
            let diagnostics = doc.diagnostics();
            if diagnostics.is_empty() {
                println!("{} is well formed", file.display());
                return Ok(());
            }
            report::print_diagnostics(&file.display().to_string(), &source, diagnostics)
                .context("Failed to print diagnostics")?;
            eprintln!("{}: {} problem(s)", file.display(), diagnostics.len());
            std::process::exit(1);
        }

        Commands::Fmt { file, write, crlf } => {
            let (_, doc) = read_document(&file)?;
            let mut options = config.render;
            if crlf {
                options.line_ending = LineEnding::CrLf;
            }
            let rendered = doc.render_with(&options);

            if write {
                std::fs::write(&file, rendered)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                tracing::info!("Formatted {}", file.display());
            } else {
                print!("{}", rendered);
            }
        }

        Commands::Tree { file, json } => {
            let (_, doc) = read_document(&file)?;
            if json {
                let out = serde_json::to_string_pretty(&doc.snapshot())?;
                println!("{}", out);
            } else {
                for node in doc.root().descendants() {
                    println!("{}", outline(node));
                }
            }
        }

        Commands::Find { file, name, first } => {
            let (_, doc) = read_document(&file)?;
            let matches = if first {
                doc.find(|n| n.name() == name).into_iter().collect()
            } else {
                doc.find_all(|n| n.name() == name)
            };
            if matches.is_empty() {
                eprintln!("No `{}` nodes in {}", name, file.display());
                std::process::exit(1);
            }
            for node in matches {
                println!(
                    "level {} index {}: {}",
                    node.level(),
                    node.index(),
                    node.render_with(&config.render).trim_start()
                );
            }
        }

        Commands::Route {
            file,
            url,
            default_page,
        } => {
            let mut route = config.route;
            route.htaccess_path = Some(file);
            if let Some(page) = default_page {
                route.default_page = page;
            }
            let router = Router::load(route)?;
            println!("{}", router.resolve(&url));
        }

        Commands::Version => {
            println!("htaccess v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<(String, Document)> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = Document::parse(&source);
    Ok((doc.source().to_string(), doc))
}

/// One outline line: kind, name and arguments indented by depth
fn outline(node: NodeRef<'_>) -> String {
    let indent = "  ".repeat(node.level().saturating_sub(1));
    match node.kind() {
        NodeType::Comment => format!("{}comment {}", indent, node.text()),
        NodeType::BlankLine | NodeType::Document => format!("{}{}", indent, node.kind()),
        _ => {
            let args = node
                .argument_list()
                .map(|a| a.to_string())
                .unwrap_or_default();
            format!("{}{} {} {}", indent, node.kind(), node.name(), args)
                .trim_end()
                .to_string()
        }
    }
}
