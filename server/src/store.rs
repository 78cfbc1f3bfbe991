//! Document store adapter: loads the job posting collection once at startup.
//!
//! The remote store speaks JSON — a GET on `{base}/{collection}` returns an
//! array of posting objects, each carrying `id` plus arbitrary stored
//! fields. A local `.json`/`.jsonl` file can stand in for the store during
//! development and tests. Any failure here is fatal to startup.

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use vagas_core::JobPosting;

/// Store location and credential material, supplied via the environment.
pub struct StoreConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self { base_url: base_url.into(), token }
    }

    /// Read `STORE_URL` (required) and `STORE_TOKEN` (optional bearer
    /// credential) from the environment.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("STORE_URL")
            .context("STORE_URL is not set: no document store configured")?;
        Ok(Self { base_url, token: env::var("STORE_TOKEN").ok() })
    }
}

/// Fetch every posting in `collection` from the remote store.
pub async fn fetch_jobs(config: &StoreConfig, collection: &str) -> Result<Vec<JobPosting>> {
    let url = format!("{}/{}", config.base_url.trim_end_matches('/'), collection);
    tracing::info!(%url, "loading postings from document store");

    let client = reqwest::Client::new();
    let mut request = client.get(&url);
    if let Some(token) = &config.token {
        request = request.bearer_auth(token);
    }
    let response = request
        .send()
        .await
        .with_context(|| format!("document store request failed: {url}"))?
        .error_for_status()
        .context("document store returned an error status")?;

    let jobs: Vec<JobPosting> = response
        .json()
        .await
        .context("malformed document store response")?;
    Ok(jobs)
}

/// Load postings from a local file: a `.jsonl` file with one posting per
/// line, or a JSON file holding an array of postings.
pub fn load_jobs_file(path: &Path) -> Result<Vec<JobPosting>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = BufReader::new(file);

    if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut jobs = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let job: JobPosting = serde_json::from_str(&line)
                .with_context(|| format!("malformed posting line in {}", path.display()))?;
            jobs.push(job);
        }
        Ok(jobs)
    } else {
        let jobs: Vec<JobPosting> = serde_json::from_reader(reader)
            .with_context(|| format!("malformed posting array in {}", path.display()))?;
        Ok(jobs)
    }
}
