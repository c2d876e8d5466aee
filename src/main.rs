use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use docsift::index::stats::{IndexStats, show_stats};
use docsift::index::{Category, DocId, DocumentStore};
use docsift::output::{self, format_with_width};
use docsift::query::{Fields, QueryEngine};
use docsift::utils::{AppConfig, find_search_index, get_config_path};
use std::path::{Path, PathBuf};
use termcolor::ColorChoice;
use tracing::Level;

#[derive(Parser)]
#[command(name = "docsift")]
#[command(about = "Search generated documentation indexes from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// When to use colors
    #[arg(long, value_enum, global = true)]
    color: Option<ColorMode>,

    /// Use this config file instead of the one in the config directory
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a ranked keyword search
    Search {
        /// Index file or documentation build directory
        path: PathBuf,

        /// Query words (may include category:TAG and page:GLOB filters)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of results (0 or less returns nothing)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Fields to search: title, text, or title,text
        #[arg(long)]
        fields: Option<Fields>,

        /// Discard matches scoring below this
        #[arg(long)]
        min_score: Option<f32>,

        /// Only return entries of this category (repeatable)
        #[arg(short, long = "category", value_name = "TAG")]
        categories: Vec<String>,

        /// Character budget for snippets
        #[arg(short, long)]
        width: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a single entry by its position in the index
    Show {
        /// Index file or documentation build directory
        path: PathBuf,

        /// Zero-based entry position
        index: usize,

        /// Print the entry as JSON
        #[arg(long)]
        json: bool,
    },
    /// List entries in index order
    List {
        /// Index file or documentation build directory
        path: PathBuf,

        /// Only list entries of this category (repeatable)
        #[arg(short, long = "category", value_name = "TAG")]
        categories: Vec<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show index statistics
    Stats {
        /// Index file or documentation build directory
        path: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the configuration, or write the defaults with --init
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
    /// Search interactively
    #[cfg(feature = "interactive")]
    Tui {
        /// Index file or documentation build directory
        path: PathBuf,

        /// Initial query
        query: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let color = color_choice(cli.color, &config);

    match cli.command {
        Commands::Search {
            path,
            query,
            limit,
            fields,
            min_score,
            categories,
            width,
            json,
        } => {
            let store = open_store(&path)?;

            let mut options = config.search_options();
            if let Some(limit) = limit {
                options = options.with_limit(limit);
            }
            if let Some(fields) = fields {
                options = options.with_fields(fields);
            }
            if let Some(min_score) = min_score {
                options = options.with_min_score(min_score);
            }
            if !categories.is_empty() {
                options = options.with_categories(parse_categories(&categories));
            }

            let query = query.join(" ");
            let engine = QueryEngine::with_scoring_weights(&store, config.weights);
            let matches = engine.search(&query, &options)?;
            let results = format_with_width(&matches, width.unwrap_or(config.snippet_width));

            if results.is_empty() {
                eprintln!("No matches for: {}", query);
            }
            if json {
                output::print_json(&results)?;
            } else {
                output::print_results(&results, color)?;
            }
        }
        Commands::Show { path, index, json } => {
            let store = open_store(&path)?;
            let entry = store.get(index)?;
            if json {
                output::print_json(entry)?;
            } else {
                output::print_entry(index as DocId, entry, color)?;
            }
        }
        Commands::List {
            path,
            categories,
            json,
        } => {
            let store = open_store(&path)?;
            let wanted = parse_categories(&categories);
            let entries = store
                .iter()
                .filter(|(_, entry)| wanted.is_empty() || wanted.contains(&entry.category));

            if json {
                let entries: Vec<_> = entries.map(|(_, entry)| entry).collect();
                output::print_json(&entries)?;
            } else {
                output::print_entry_list(entries, color)?;
            }
        }
        Commands::Stats { path, json } => {
            let index_path = find_search_index(&path)?;
            let store = load_store(&index_path)?;
            let stats = IndexStats::collect(&store);
            if json {
                output::print_json(&stats)?;
            } else {
                show_stats(&index_path, &stats);
            }
        }
        Commands::Config { init } => {
            let config_path = match cli.config {
                Some(path) => path,
                None => get_config_path()?,
            };
            if init {
                if config_path.exists() {
                    println!("Config already exists: {}", config_path.display());
                } else {
                    AppConfig::default().save_to(&config_path)?;
                    println!("Wrote default config: {}", config_path.display());
                }
            } else {
                println!("# {}", config_path.display());
                output::print_json(&config)?;
            }
        }
        #[cfg(feature = "interactive")]
        Commands::Tui { path, query } => {
            let index_path = find_search_index(&path)?;
            docsift::tui::run(index_path, config, query)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber at the level picked by `-v` flags
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn color_choice(mode: Option<ColorMode>, config: &AppConfig) -> ColorChoice {
    match mode {
        Some(ColorMode::Always) => ColorChoice::Always,
        Some(ColorMode::Never) => ColorChoice::Never,
        Some(ColorMode::Auto) => ColorChoice::Auto,
        None if config.color => ColorChoice::Auto,
        None => ColorChoice::Never,
    }
}

fn parse_categories(tags: &[String]) -> Vec<Category> {
    tags.iter().map(|tag| Category::from_tag(tag)).collect()
}

/// Resolve `path` to an index file and load it
fn open_store(path: &Path) -> Result<DocumentStore> {
    let index_path = find_search_index(path)?;
    load_store(&index_path)
}

fn load_store(index_path: &Path) -> Result<DocumentStore> {
    DocumentStore::open(index_path)
        .with_context(|| format!("Failed to load index {}", index_path.display()))
}
