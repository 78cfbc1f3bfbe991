use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::tokenizer::tokenize;
use crate::TermId;

/// Vocabulary and document frequencies learned from one corpus.
///
/// Term ids are dense and assigned in first-seen order, so fitting the same
/// sequence of strings always produces the same vectors.
pub struct TfidfVectorizer {
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    num_docs: u32,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and per-term document frequencies of `corpus`.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        for text in corpus {
            let mut seen: HashSet<TermId> = HashSet::new();
            for term in tokenize(text.as_ref()) {
                let next = dictionary.len() as TermId;
                let tid = *dictionary.entry(term).or_insert(next);
                if df.len() <= tid as usize {
                    df.resize(tid as usize + 1, 0);
                }
                if seen.insert(tid) {
                    df[tid as usize] += 1;
                }
            }
        }
        Self { dictionary, df, num_docs: corpus.len() as u32 }
    }

    /// Smoothed inverse document frequency, never zero for in-vocabulary terms.
    fn idf(&self, tid: TermId) -> f32 {
        let n = self.num_docs as f32;
        let df = self.df[tid as usize] as f32;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    }

    /// L2-normalized tf-idf vector of `text` over the fitted vocabulary.
    /// Out-of-vocabulary terms are dropped; a text with no known terms
    /// yields the empty vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut tf: HashMap<TermId, u32> = HashMap::new();
        for term in tokenize(text) {
            if let Some(&tid) = self.dictionary.get(&term) {
                *tf.entry(tid).or_insert(0) += 1;
            }
        }
        let mut entries: Vec<(TermId, f32)> = tf
            .into_iter()
            .map(|(tid, count)| (tid, count as f32 * self.idf(tid)))
            .collect();
        entries.sort_by_key(|&(tid, _)| tid);
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }
        SparseVector(entries)
    }

    /// Fit on `corpus` and return its row matrix, one row per input string
    /// in input order.
    pub fn fit_transform<S: AsRef<str>>(corpus: &[S]) -> TfidfMatrix {
        let fitted = Self::fit(corpus);
        let rows = corpus.iter().map(|text| fitted.transform(text.as_ref())).collect();
        TfidfMatrix { rows }
    }
}

/// Sparse tf-idf row; entries sorted by term id, L2 norm 1 unless empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector(Vec<(TermId, f32)>);

impl SparseVector {
    /// Dot product by sorted merge. Both sides are normalized rows, so this
    /// is their cosine similarity, in [0, 1].
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (a, b) = (&self.0, &other.0);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Term-weighted matrix over a fixed description sequence; row i is the
/// vector of input string i.
pub struct TfidfMatrix {
    rows: Vec<SparseVector>,
}

impl TfidfMatrix {
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &SparseVector {
        &self.rows[i]
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cosine similarity of `row` against every row, in row order.
    pub fn similarities(&self, row: &SparseVector) -> Vec<f32> {
        self.rows.iter().map(|r| row.dot(r)).collect()
    }
}
