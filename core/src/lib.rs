use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod engine;
pub mod tfidf;
pub mod tokenizer;

pub type TermId = u32;

/// Stored field holding a posting's natural-language description.
pub const DESCRIPTION_FIELD: &str = "descrição";

/// A job posting as yielded by the document store: a stable identifier plus
/// whatever fields the store holds for it, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl JobPosting {
    /// Description text, or the empty string when the field is missing or not textual.
    pub fn description(&self) -> &str {
        self.fields
            .get(DESCRIPTION_FIELD)
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}
