use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use trove_core::{EngineConfig, ScoringModel, SearchEngine, SearchResult};
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "trove-indexer")]
#[command(about = "Index a directory of text files and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Input path (file or directory)
    #[arg(long)]
    input: String,
    /// Index build threads (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long, value_enum, default_value_t = Scoring::Bm25)]
    scoring: Scoring,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scoring {
    Bm25,
    Tfidf,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print ranked results as JSON
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long)]
        query: String,
        /// Maximum number of results to print; 0 prints none
        #[arg(long, default_value_t = 10)]
        k: usize,
    },
    /// Build the index and print vocabulary completions as JSON
    Complete {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Build the index and print corpus statistics
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

#[derive(Serialize)]
struct Stats {
    num_docs: usize,
    indexed_docs: usize,
    num_terms: usize,
    avg_doc_length: f64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, query, k } => {
            let engine = build_engine(&corpus)?;
            let results = top_k(&engine, &query, k);
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Complete { corpus, prefix } => {
            let engine = build_engine(&corpus)?;
            println!("{}", serde_json::to_string_pretty(&engine.autocomplete(&prefix))?);
        }
        Commands::Stats { corpus } => {
            let engine = build_engine(&corpus)?;
            let snapshot = engine.snapshot();
            let stats = Stats {
                num_docs: snapshot.stats.num_docs,
                indexed_docs: snapshot.stats.doc_lengths.len(),
                num_terms: snapshot.index.num_terms(),
                avg_doc_length: snapshot.stats.avg_doc_length,
            };
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

fn build_engine(args: &CorpusArgs) -> Result<SearchEngine> {
    let files = collect_files(Path::new(&args.input))?;
    let scoring = match args.scoring {
        Scoring::Bm25 => ScoringModel::Bm25,
        Scoring::Tfidf => ScoringModel::TfIdf,
    };
    let engine = SearchEngine::new(EngineConfig { workers: args.workers, scoring });
    for file in &files {
        engine.add_document(file);
    }
    engine.build_index();
    tracing::info!(input = %args.input, files = files.len(), "corpus indexed");
    Ok(engine)
}

fn top_k(engine: &SearchEngine, query: &str, k: usize) -> Vec<SearchResult> {
    let mut results = engine.search(query);
    results.truncate(k);
    results
}

fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "txt" | "md") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        bail!("input {} does not exist", input.display());
    }
    Ok(files)
}
