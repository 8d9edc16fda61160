use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bible_model::Testament;
use bible_service::{BibleService, ServiceConfig};
use bible_store::SearchOptions;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bible-cli", version, about = "Import, validate and query Bible translations")]
struct Cli {
    /// Blob store directory for persisted translations (overrides config and BIBLE_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON config file; unset fields fall back to BIBLE_* environment variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a translation from one or more JSON sources, tried in order.
    Import {
        translation: String,
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// Minimum resolved verses for a source to count as usable.
        #[arg(long)]
        min_verses: Option<usize>,
        /// Skip writing the imported translation to the blob store.
        #[arg(long)]
        no_persist: bool,
    },
    /// Completeness report for one translation, or all loaded ones.
    Validate { translation: Option<String> },
    Verse {
        book: String,
        chapter: u32,
        verse: u32,
        #[arg(short, long)]
        translation: Option<String>,
    },
    Chapter {
        book: String,
        chapter: u32,
        #[arg(short, long)]
        translation: Option<String>,
    },
    /// Case-insensitive keyword search.
    Search {
        query: String,
        #[arg(short, long)]
        translation: Option<String>,
        #[arg(long)]
        book: Option<String>,
        /// `old` or `new`.
        #[arg(long)]
        testament: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Verse of the day (UTC today unless --date YYYY-MM-DD).
    Daily {
        #[arg(short, long)]
        translation: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Random {
        #[arg(short, long)]
        translation: Option<String>,
    },
    Stats,
    Books,
    Translations,
    /// Remove a persisted translation from the blob store.
    Forget { translation: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<ServiceConfig> {
    let mut cfg = match &cli.config {
        Some(path) => ServiceConfig::from_json_file(path)?,
        None => ServiceConfig::from_env(),
    };
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }
    Ok(cfg)
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn parse_testament(raw: &str) -> Result<Testament> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "old" | "ot" => Ok(Testament::Old),
        "new" | "nt" => Ok(Testament::New),
        other => bail!("unknown testament '{other}' (expected old or new)"),
    }
}

fn render<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", render(value)?);
    Ok(())
}

/// A miss prints `null`; it is not an error.
fn print_found<T: Serialize>(value: Option<T>, what: &str) -> Result<()> {
    if value.is_none() {
        tracing::info!("{what} not found");
    }
    print_json(&value)
}

/// Bring every persisted translation into memory; failures are logged, not fatal.
fn load_persisted(svc: &BibleService) -> Result<()> {
    for (id, outcome) in svc.load_all_persisted()? {
        if let Err(e) = outcome {
            tracing::warn!(translation = %id, error = %e, "skipping persisted translation");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut cfg = load_config(&cli)?;

    if let Command::Import { translation, sources, min_verses, no_persist } = &cli.cmd {
        if let Some(min) = min_verses {
            cfg.min_import_verses = *min;
        }
        let svc = BibleService::new(cfg)?;
        let payloads = sources.iter().map(|p| read_json(p)).collect::<Result<Vec<_>>>()?;
        let report = svc.import_with_fallback(translation, &payloads)?;
        if !*no_persist {
            let source = sources.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(",");
            svc.persist_translation(translation, &source)?;
        }
        println!(
            "imported {translation}: shape={:?} written={} dropped={} seen={}",
            report.shape, report.written, report.dropped, report.total_seen
        );
        return Ok(());
    }

    let default_translation = cfg.default_translation.clone();
    let svc = BibleService::new(cfg)?;
    if let Command::Forget { translation } = &cli.cmd {
        let removed = svc.delete_persisted(translation)?;
        println!("{}", if removed { "deleted" } else { "nothing persisted" });
        return Ok(());
    }
    load_persisted(&svc)?;
    let pick = |t: &Option<String>| t.clone().unwrap_or_else(|| default_translation.clone());

    match &cli.cmd {
        Command::Validate { translation: Some(t) } => print_json(&svc.validate(t)),
        Command::Validate { translation: None } => print_json(&svc.validate_all()),
        Command::Verse { book, chapter, verse, translation } => {
            print_found(svc.get_verse(&pick(translation), book, *chapter, *verse), "verse")
        }
        Command::Chapter { book, chapter, translation } => {
            print_found(svc.get_chapter(&pick(translation), book, *chapter), "chapter")
        }
        Command::Search { query, translation, book, testament, limit } => {
            let mut opts = SearchOptions::with_limit(limit.unwrap_or(svc.config().search_limit));
            opts.translation = translation.clone();
            opts.book = book.clone();
            opts.testament = testament.as_deref().map(parse_testament).transpose()?;
            print_json(&svc.search_with(query, &opts))
        }
        Command::Daily { translation, date } => {
            let t = pick(translation);
            let verse = match date {
                Some(d) => svc.daily_verse_for(*d, &t),
                None => svc.daily_verse(&t),
            };
            print_found(verse, "daily verse")
        }
        Command::Random { translation } => print_found(svc.random_verse(&pick(translation)), "random verse"),
        Command::Stats => print_json(&svc.stats()),
        Command::Books => print_json(&svc.books()),
        Command::Translations => print_json(&svc.translations()),
        Command::Import { .. } | Command::Forget { .. } => Ok(()),
    }
}
