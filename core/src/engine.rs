use std::collections::HashMap;

use tracing::{info, warn};

use crate::tfidf::{TfidfMatrix, TfidfVectorizer};
use crate::JobPosting;

/// Minimum cosine score (strict) for a free-text query to anchor a result.
pub const SIMILARITY_THRESHOLD: f32 = 0.1;

/// Rows taken from the ranked pool for a free-text recommendation, the
/// anchor's own row included before it is filtered out.
const RECOMMEND_POOL: usize = 19;
/// Rows taken from the ranked pool for a profile recommendation.
const PROFILE_POOL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// No posting scored above the similarity threshold for the query text.
    NoMatch,
    /// No posting carries the requested identifier.
    UnknownId,
}

impl std::fmt::Display for RecommendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendError::NoMatch => write!(f, "nenhuma vaga correspondente encontrada"),
            RecommendError::UnknownId => write!(f, "nenhuma vaga encontrada com o id fornecido"),
        }
    }
}

impl std::error::Error for RecommendError {}

/// Immutable recommendation state, built once at startup and shared
/// read-only across request handlers.
///
/// The similarity index holds one row per posting with a non-empty
/// description, in posting order; `job_to_row`/`row_to_job` map between
/// posting positions and index rows.
pub struct Snapshot {
    jobs: Vec<JobPosting>,
    descriptions: Vec<String>,
    index: TfidfMatrix,
    row_to_job: Vec<usize>,
    job_to_row: Vec<Option<usize>>,
    id_to_job: HashMap<String, usize>,
}

impl Snapshot {
    /// Build the snapshot from the loaded postings: default missing
    /// descriptions to the empty string, index the non-empty ones, and
    /// record the id of each posting (first occurrence wins).
    pub fn build(jobs: Vec<JobPosting>) -> Self {
        let descriptions: Vec<String> =
            jobs.iter().map(|job| job.description().to_string()).collect();

        let mut row_to_job = Vec::new();
        let mut job_to_row = vec![None; jobs.len()];
        let mut indexed: Vec<&str> = Vec::new();
        for (pos, (job, desc)) in jobs.iter().zip(&descriptions).enumerate() {
            if desc.is_empty() {
                warn!(id = %job.id, "posting without description, excluded from index");
                continue;
            }
            job_to_row[pos] = Some(row_to_job.len());
            row_to_job.push(pos);
            indexed.push(desc);
        }
        let index = TfidfVectorizer::fit_transform(&indexed);

        let mut id_to_job: HashMap<String, usize> = HashMap::new();
        for (pos, job) in jobs.iter().enumerate() {
            id_to_job.entry(job.id.clone()).or_insert(pos);
        }

        info!(postings = jobs.len(), indexed = row_to_job.len(), "similarity index built");
        Self { jobs, descriptions, index, row_to_job, job_to_row, id_to_job }
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    /// Number of postings with an indexed description.
    pub fn num_indexed(&self) -> usize {
        self.index.num_rows()
    }

    /// Free-text recommendation: the best-matching posting first, followed
    /// by the postings most similar to it.
    pub fn recommend_by_text(&self, query: &str) -> Result<Vec<JobPosting>, RecommendError> {
        let anchor = self
            .find_job_by_similar_description(query)
            .ok_or(RecommendError::NoMatch)?;
        Ok(self.ranked_from(anchor, RECOMMEND_POOL))
    }

    /// Profile recommendation: the posting with the given id first,
    /// followed by its closest postings.
    pub fn recommend_by_id(&self, id: &str) -> Result<Vec<JobPosting>, RecommendError> {
        let anchor = self.id_to_job.get(id).copied().ok_or(RecommendError::UnknownId)?;
        Ok(self.ranked_from(anchor, PROFILE_POOL))
    }

    /// Posting position whose description is most similar to `text`.
    ///
    /// Refits a vectorizer over every defaulted description plus the query,
    /// so the query contributes to the vocabulary; the preloaded index is a
    /// separately fitted space and is only used for the ranked tail.
    fn find_job_by_similar_description(&self, text: &str) -> Option<usize> {
        if text.is_empty() {
            return None;
        }

        let mut corpus: Vec<&str> = self.descriptions.iter().map(String::as_str).collect();
        corpus.push(text);
        let matrix = TfidfVectorizer::fit_transform(&corpus);
        let (query_row, job_rows) = matrix.rows().split_last()?;

        let mut best_pos = 0usize;
        let mut best_score = f32::MIN;
        for (pos, row) in job_rows.iter().enumerate() {
            let score = query_row.dot(row);
            if score > best_score {
                best_pos = pos;
                best_score = score;
            }
        }
        (best_score > SIMILARITY_THRESHOLD).then_some(best_pos)
    }

    /// The anchor posting followed by the most similar postings from the
    /// preloaded index: score every row against the anchor's row, sort
    /// descending (stable, ties keep row order), keep the top `pool` rows
    /// minus the anchor itself. An anchor without an indexed description
    /// has no row to rank from and yields itself alone.
    fn ranked_from(&self, anchor: usize, pool: usize) -> Vec<JobPosting> {
        let mut out = vec![self.jobs[anchor].clone()];
        let Some(anchor_row) = self.job_to_row[anchor] else {
            return out;
        };

        let mut scored: Vec<(usize, f32)> = self
            .index
            .similarities(self.index.row(anchor_row))
            .into_iter()
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        out.extend(
            scored
                .into_iter()
                .take(pool)
                .filter(|&(row, _)| row != anchor_row)
                .map(|(row, _)| self.jobs[self.row_to_job[row]].clone()),
        );
        out
    }
}
