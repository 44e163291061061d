use anyhow::Result;
use axum::Router;
use clap::{Parser, ValueEnum};
use server::build_app;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};
use trove_core::{EngineConfig, ScoringModel, SearchEngine};

#[derive(Clone, Copy, ValueEnum)]
enum Scoring {
    Bm25,
    Tfidf,
}

#[derive(Parser)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "localhost")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// JSON engine config; flags below override it
    #[arg(long)]
    config: Option<String>,
    /// Index build threads (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long, value_enum)]
    scoring: Option<Scoring>,
    /// Load the built-in sample corpus at startup
    #[arg(long, default_value_t = false)]
    sample: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    if args.workers.is_some() {
        config.workers = args.workers;
    }
    if let Some(scoring) = args.scoring {
        config.scoring = match scoring {
            Scoring::Bm25 => ScoringModel::Bm25,
            Scoring::Tfidf => ScoringModel::TfIdf,
        };
    }

    let engine = Arc::new(SearchEngine::new(config));
    if args.sample {
        engine.load_sample_dataset();
    }
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app: Router = build_app(engine, admin_token)?;

    let addr: SocketAddr = tokio::net::lookup_host((args.host.as_str(), args.port))
        .await?
        .next()
        .ok_or_else(|| anyhow::anyhow!("cannot resolve {}:{}", args.host, args.port))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
