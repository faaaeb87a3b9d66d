//! `tagtext` — render styled message templates from the command line.
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tagtext::{Catalog, Segment, Translator, Vars, render};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod ctx;

use ctx::Ctx;

#[derive(Parser)]
#[command(name = "tagtext", about = "Render styled message templates")]
struct Cli {
    /// Log more (-v debug, -vv trace); TAGTEXT_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Render a message from the catalog
    Render {
        key: String,
        /// Placeholder value, repeatable
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
        /// Catalog file or directory (default: ~/.config/tagtext/messages)
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Ansi)]
        format: Format,
    },

    /// Render a template given on the command line
    Inline {
        template: String,
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
        #[arg(long, value_enum, default_value_t = Format::Ansi)]
        format: Format,
    },

    /// Escape text so it renders literally
    Escape {
        text: String,
        /// Escape for embedding inside hover content instead
        #[arg(long)]
        hover: bool,
    },

    /// Validate every template in the catalog
    Check {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Ansi,
    Plain,
    Debug,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Cmd::Render {
            key,
            vars,
            catalog,
            format,
        } => {
            let catalog = open_catalog(catalog.as_deref())?;
            let vars: Vars = vars.into_iter().collect();
            let segments = catalog
                .message(&key, &vars)
                .with_context(|| format!("no message under '{key}'"))?
                .with_context(|| format!("render '{key}'"))?;
            print_segments(&segments, format);
            Ok(())
        }

        Cmd::Inline {
            template,
            vars,
            format,
        } => {
            let vars: Vars = vars.into_iter().collect();
            let segments = Translator::new()
                .parse_with(&template, &vars)
                .context("render template")?;
            print_segments(&segments, format);
            Ok(())
        }

        Cmd::Escape { text, hover } => {
            if hover {
                println!("{}", tagtext::escape_hover(&text));
            } else {
                println!("{}", tagtext::escape(&text));
            }
            Ok(())
        }

        Cmd::Check { catalog } => cmd_check(&open_catalog(catalog.as_deref())?),
    }
}

fn cmd_check(catalog: &Catalog) -> Result<()> {
    let failures = catalog.check();
    for (key, err) in &failures {
        warn!(%key, "{err}");
    }

    anyhow::ensure!(
        failures.is_empty(),
        "{} of {} templates failed to parse",
        failures.len(),
        catalog.len()
    );

    println!("ok: {} templates", catalog.len());
    Ok(())
}

/// An explicit path, or the default catalog directory.
fn open_catalog(path: Option<&Path>) -> Result<Catalog> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Ctx::new().context("initialise context")?.catalog_dir,
    };
    debug!(path = %path.display(), "opening catalog");
    Catalog::open(&path).context("open catalog")
}

fn print_segments(segments: &[Segment], format: Format) {
    match format {
        Format::Ansi => println!("{}", render::to_ansi(segments)),
        Format::Plain => println!("{}", render::to_plain(segments)),
        Format::Debug => println!("{segments:#?}"),
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("TAGTEXT_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
