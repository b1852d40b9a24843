//! Okapi BM25 corpus statistics.
//!
//! Statistics are rebuilt from the full tokenized corpus on every change;
//! nothing here is maintained incrementally.

use std::collections::HashMap;
use std::sync::Arc;

use knowdb_core::config::LexicalSettings;

/// Saturation (`k1`), length normalization (`b`) and the negative-IDF floor
/// (`epsilon`, a fraction of the corpus' average IDF).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
    pub epsilon: f64,
}

impl Default for Bm25Params {
    fn default() -> Self { Self { k1: 1.5, b: 0.75, epsilon: 0.25 } }
}

impl From<&LexicalSettings> for Bm25Params {
    fn from(s: &LexicalSettings) -> Self { Self { k1: s.k1, b: s.b, epsilon: s.epsilon } }
}

/// The ordered terms of one chunk, produced once at indexing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedDocument {
    terms: Vec<String>,
}

impl TokenizedDocument {
    pub fn new(text: &str) -> Self { Self { terms: crate::tokenize::tokenize(text) } }

    pub fn terms(&self) -> &[String] { &self.terms }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
}

#[derive(Debug, Clone, Copy)]
struct Posting {
    doc: usize,
    tf: u32,
}

/// Inverted postings plus the derived IDF table for one corpus snapshot.
#[derive(Debug, Default)]
pub struct Bm25Stats {
    params: Bm25Params,
    postings: HashMap<String, Vec<Posting>>,
    idf: HashMap<String, f64>,
    doc_lens: Vec<usize>,
    avgdl: f64,
}

impl Bm25Stats {
    pub fn build(docs: &[Arc<TokenizedDocument>], params: Bm25Params) -> Self {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lens = Vec::with_capacity(docs.len());
        let mut total_len = 0usize;

        for (doc, tokens) in docs.iter().enumerate() {
            let mut tf: HashMap<&str, u32> = HashMap::new();
            for term in tokens.terms() { *tf.entry(term.as_str()).or_insert(0) += 1; }
            for (term, count) in tf {
                postings.entry(term.to_string()).or_default().push(Posting { doc, tf: count });
            }
            doc_lens.push(tokens.len());
            total_len += tokens.len();
        }

        let n = docs.len() as f64;
        let avgdl = if docs.is_empty() { 0.0 } else { total_len as f64 / n };

        let mut idf = HashMap::with_capacity(postings.len());
        let mut idf_sum = 0.0;
        let mut negative = Vec::new();
        for (term, list) in &postings {
            let df = list.len() as f64;
            let value = (n - df + 0.5).ln() - (df + 0.5).ln();
            idf_sum += value;
            if value < 0.0 { negative.push(term.clone()); }
            idf.insert(term.clone(), value);
        }
        if !idf.is_empty() {
            let floor = params.epsilon * (idf_sum / idf.len() as f64);
            for term in negative { idf.insert(term, floor); }
        }

        Self { params, postings, idf, doc_lens, avgdl }
    }

    pub fn doc_count(&self) -> usize { self.doc_lens.len() }

    pub fn avgdl(&self) -> f64 { self.avgdl }

    pub fn idf(&self, term: &str) -> Option<f64> { self.idf.get(term).copied() }

    /// Score every document against `query_terms`.
    ///
    /// Entry `i` is `None` when document `i` contains none of the terms.
    /// Repeated query terms count once per occurrence.
    pub fn score(&self, query_terms: &[String]) -> Vec<Option<f64>> {
        let mut scores = vec![None; self.doc_lens.len()];
        let Bm25Params { k1, b, .. } = self.params;
        for term in query_terms {
            let (Some(list), Some(&idf)) = (self.postings.get(term), self.idf.get(term)) else { continue };
            for posting in list {
                let f = f64::from(posting.tf);
                let dl = self.doc_lens[posting.doc] as f64;
                let norm = 1.0 - b + b * dl / self.avgdl;
                let contribution = idf * (f * (k1 + 1.0)) / (f + k1 * norm);
                *scores[posting.doc].get_or_insert(0.0) += contribution;
            }
        }
        scores
    }
}
