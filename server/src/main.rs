use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};
use vagas_core::engine::Snapshot;
use vagas_server::build_app;
use vagas_server::store::{self, StoreConfig};

#[derive(Parser)]
#[command(name = "vagas-server")]
#[command(about = "Job recommendation service over a TF-IDF similarity index", long_about = None)]
struct Args {
    /// Collection to load from the document store
    #[arg(long, default_value = "PCD")]
    collection: String,
    /// Local JSON/JSONL posting file, instead of the remote store
    #[arg(long)]
    input: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let jobs = match &args.input {
        Some(path) => store::load_jobs_file(path)?,
        None => {
            let config = StoreConfig::from_env()?;
            store::fetch_jobs(&config, &args.collection).await?
        }
    };
    if jobs.is_empty() {
        bail!("document store yielded no postings");
    }
    tracing::info!(postings = jobs.len(), "postings loaded");

    let snapshot = Arc::new(Snapshot::build(jobs));
    let app = build_app(snapshot);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
