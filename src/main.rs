use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nestpath::config::Config;
use nestpath::document::codec::{parse_json, to_json_compact, to_json_pretty};
use nestpath::document::merge::merge;
use nestpath::document::node::Document;
use nestpath::file::loader::{load_document, load_document_from_stdin};
use nestpath::file::saver::{save_document, WriteOptions};
use nestpath::filter::{Filter, FilterMode, WhereClause};
use nestpath::path::accessor::{delete_with, get_with, has_with, set_with, SetReturn};

/// nestpath - dotted-path access, merge and filtering for JSON/YAML documents
#[derive(Parser)]
#[command(name = "nestpath")]
#[command(version)]
#[command(about = "Query and edit JSON/YAML documents with dotted paths", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/nestpath/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value at a path
    Get {
        /// Document file, or - for stdin
        file: String,
        path: String,
    },
    /// Exit with status 0 when the path exists, 1 otherwise
    Has { file: String, path: String },
    /// Write a value at a path and print what --return asks for
    Set {
        file: String,
        path: String,
        /// JSON value; anything that is not valid JSON is taken as a string
        value: String,
        /// child, root, or another path to read after the write
        #[arg(long = "return", default_value = "child")]
        return_mode: String,
        /// Save the modified document here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete the value at a path
    Delete {
        file: String,
        path: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Deep-merge sources into the target, left to right
    Merge {
        target: String,
        #[arg(required = true)]
        sources: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Filter records with a JSON where-clause
    Filter {
        file: String,
        /// Where-clause as JSON, e.g. '{"active": true}'
        #[arg(value_name = "WHERE")]
        where_json: String,
        /// list, record or auto
        #[arg(long, default_value = "auto")]
        mode: String,
    },
}

fn init_logging(config: &Config) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(file: &str) -> Result<Document> {
    if file == "-" {
        load_document_from_stdin()
    } else {
        load_document(file)
    }
}

fn print(doc: &Document, compact: bool, config: &Config) {
    if compact {
        println!("{}", to_json_compact(doc));
    } else {
        println!("{}", to_json_pretty(doc, config.indent_size));
    }
}

fn save(path: &PathBuf, doc: &Document, config: &Config) -> Result<()> {
    let report = save_document(path, doc, &WriteOptions::from_config(config))
        .with_context(|| format!("Failed to save {}", path.display()))?;
    tracing::info!(path = %report.path.display(), bytes = report.written, "saved document");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    init_logging(&config);
    let syntax = config.path_syntax();

    match cli.command {
        Command::Get { file, path } => {
            let doc = load(&file)?;
            match get_with(&doc, &path, &syntax) {
                Some(value) => print(value, cli.compact, &config),
                None => std::process::exit(1),
            }
        }
        Command::Has { file, path } => {
            let doc = load(&file)?;
            if !has_with(&doc, &path, &syntax) {
                std::process::exit(1);
            }
        }
        Command::Set {
            file,
            path,
            value,
            return_mode,
            output,
        } => {
            let mut doc = load(&file)?;
            let value = parse_json(&value).unwrap_or(Document::String(value));
            let mode = SetReturn::from_name(&return_mode);
            let returned = set_with(&mut doc, &path, value, &mode, &syntax)
                .with_context(|| format!("Failed to set {}", path))?
                .cloned()
                .unwrap_or_default();
            print(&returned, cli.compact, &config);
            if let Some(output) = output {
                save(&output, &doc, &config)?;
            }
        }
        Command::Delete { file, path, output } => {
            let mut doc = load(&file)?;
            let removed = delete_with(&mut doc, &path, &syntax);
            println!("{}", removed);
            if let Some(output) = output {
                save(&output, &doc, &config)?;
            }
            if !removed {
                std::process::exit(1);
            }
        }
        Command::Merge {
            target,
            sources,
            output,
        } => {
            let mut doc = load(&target)?;
            for source in &sources {
                merge(&mut doc, load(source)?).with_context(|| format!("Failed to merge {}", source))?;
            }
            print(&doc, cli.compact, &config);
            if let Some(output) = output {
                save(&output, &doc, &config)?;
            }
        }
        Command::Filter {
            file,
            where_json,
            mode,
        } => {
            let doc = load(&file)?;
            let where_doc = parse_json(&where_json).context("Where-clause is not valid JSON")?;
            let clause = WhereClause::from_document_with(&where_doc, config.default_strict, &syntax)?;
            let mut filter = match mode.as_str() {
                "auto" => Filter::auto(doc),
                other => Filter::new(doc, other.parse::<FilterMode>()?),
            }
            .with_syntax(syntax);

            match filter.where_clause(&clause)? {
                Some(matched) => print(&matched, cli.compact, &config),
                None => {
                    println!("false");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
