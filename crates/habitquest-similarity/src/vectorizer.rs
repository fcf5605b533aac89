// Copyright 2024 HabitQuest
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! TF-IDF vectorization of habit tag sets.
//!
//! Every habit's tags are joined into one pseudo-document and tokenized with
//! [`tokenize`]. Weights follow a fixed formula so scores are reproducible
//! for a given corpus snapshot:
//!
//! - `tf(t, d)` is the raw count of token `t` in document `d`
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, with `n` documents of which
//!   `df(t)` contain `t`
//! - each document vector holds `tf * idf` and is scaled to unit L2 length
//!
//! Documents without any token map to the zero vector.

use crate::tokenizer::tokenize;
use habitquest_core::{Habit, HabitError};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// The distinct tokens of one corpus snapshot, mapped to column indices.
///
/// Columns follow lexicographic token order, so two builds over the same
/// snapshot always agree on indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    columns: BTreeMap<String, usize>,
}

impl Vocabulary {
    fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<&str> = tokens.into_iter().collect();
        let columns = distinct
            .into_iter()
            .enumerate()
            .map(|(col, token)| (token.to_string(), col))
            .collect();
        Self { columns }
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the snapshot produced no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column of `token`, if it occurs in the snapshot.
    pub fn column(&self, token: &str) -> Option<usize> {
        self.columns.get(token).copied()
    }

    /// Tokens in column order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// A sparse vector of non-negative weights, entries sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Builds a vector from `(column, weight)` pairs; zero weights are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (col, weight) in entries {
            *merged.entry(col).or_insert(0.0) += weight;
        }
        Self {
            entries: merged.into_iter().filter(|(_, w)| *w != 0.0).collect(),
        }
    }

    /// Weight at `column`, zero when absent.
    pub fn get(&self, column: usize) -> f64 {
        self.entries
            .binary_search_by_key(&column, |(c, _)| *c)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every weight is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-zero `(column, weight)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Euclidean length.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product, merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, wi) = self.entries[i];
            let (cj, wj) = other.entries[j];
            if ci == cj {
                sum += wi * wj;
                i += 1;
                j += 1;
            } else if ci < cj {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    fn normalized(self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return self;
        }
        Self {
            entries: self.entries.into_iter().map(|(c, w)| (c, w / norm)).collect(),
        }
    }
}

/// Vocabulary, IDF weights and one unit-length vector per habit of a snapshot.
///
/// Row `i` of [`TfIdfMatrix::vectors`] belongs to record `i` of the snapshot
/// it was built from. Matrices built from different snapshots are not
/// comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfMatrix {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
}

impl TfIdfMatrix {
    /// The snapshot's vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// IDF weight per column.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// One vector per record, in record order.
    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    /// Vector of record `row`.
    pub fn row(&self, row: usize) -> Option<&SparseVector> {
        self.vectors.get(row)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.vectors.len()
    }

    #[cfg(test)]
    pub(crate) fn from_rows(vectors: Vec<SparseVector>) -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            idf: Vec::new(),
            vectors,
        }
    }
}

/// Smoothed inverse document frequency.
pub fn smoothed_idf(n_documents: usize, document_frequency: usize) -> f64 {
    ((1.0 + n_documents as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

/// Builds the TF-IDF matrix of a corpus snapshot.
///
/// Fails with [`HabitError::EmptyCorpus`] when `records` is empty.
pub fn build(records: &[Habit]) -> Result<TfIdfMatrix, HabitError> {
    if records.is_empty() {
        return Err(HabitError::EmptyCorpus);
    }

    let documents: Vec<Vec<String>> = records
        .iter()
        .map(|habit| tokenize(&habit.tag_document()))
        .collect();

    let vocabulary =
        Vocabulary::from_tokens(documents.iter().flatten().map(String::as_str));

    let mut document_frequency = vec![0usize; vocabulary.len()];
    for tokens in &documents {
        let distinct: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for token in distinct {
            if let Some(col) = vocabulary.column(token) {
                document_frequency[col] += 1;
            }
        }
    }

    let n = documents.len();
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| smoothed_idf(n, df))
        .collect();

    let vectors = documents
        .iter()
        .map(|tokens| {
            SparseVector::from_entries(tokens.iter().filter_map(|token| {
                vocabulary.column(token).map(|col| (col, idf[col]))
            }))
            .normalized()
        })
        .collect();

    tracing::debug!(
        documents = n,
        vocabulary = vocabulary.len(),
        "Built TF-IDF matrix"
    );

    Ok(TfIdfMatrix {
        vocabulary,
        idf,
        vectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit(title: &str, tags: &[&str]) -> Habit {
        Habit {
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_build_rejects_empty_corpus() {
        assert!(matches!(build(&[]), Err(HabitError::EmptyCorpus)));
    }

    #[test]
    fn test_vocabulary_is_sorted_and_distinct() {
        let matrix = build(&[
            habit("A", &["mental health", "calm"]),
            habit("B", &["calm", "focus"]),
        ])
        .unwrap();

        let tokens: Vec<&str> = matrix.vocabulary().tokens().collect();
        assert_eq!(tokens, vec!["calm", "focus", "health", "mental"]);
        assert_eq!(matrix.vocabulary().column("focus"), Some(1));
        assert_eq!(matrix.vocabulary().column("yoga"), None);
    }

    #[test]
    fn test_smoothed_idf_values() {
        // Token present in every document gets the floor weight of 1.
        assert!(approx(smoothed_idf(3, 3), 1.0));
        assert!(approx(smoothed_idf(3, 1), (4.0f64 / 2.0).ln() + 1.0));
        assert!(smoothed_idf(10, 1) > smoothed_idf(10, 5));
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let matrix = build(&[
            habit("Meditation", &["calm", "mindfulness"]),
            habit("Morning Yoga", &["calm", "flexibility"]),
            habit("Daily Run", &["fitness", "energy"]),
        ])
        .unwrap();

        assert_eq!(matrix.rows(), 3);
        for vector in matrix.vectors() {
            assert!(approx(vector.norm(), 1.0));
        }
    }

    #[test]
    fn test_weights_match_formula() {
        let matrix = build(&[
            habit("Meditation", &["calm", "mindfulness"]),
            habit("Morning Yoga", &["calm", "flexibility"]),
        ])
        .unwrap();

        let vocab = matrix.vocabulary();
        let calm = vocab.column("calm").unwrap();
        let mindfulness = vocab.column("mindfulness").unwrap();

        let w_calm = smoothed_idf(2, 2);
        let w_mind = smoothed_idf(2, 1);
        let norm = (w_calm * w_calm + w_mind * w_mind).sqrt();

        let row = matrix.row(0).unwrap();
        assert!(approx(row.get(calm), w_calm / norm));
        assert!(approx(row.get(mindfulness), w_mind / norm));
        assert_eq!(row.nnz(), 2);
    }

    #[test]
    fn test_repeated_tokens_raise_term_frequency() {
        let matrix = build(&[
            habit("A", &["calm", "calm", "focus"]),
            habit("B", &["calm", "focus"]),
        ])
        .unwrap();

        let calm = matrix.vocabulary().column("calm").unwrap();
        let focus = matrix.vocabulary().column("focus").unwrap();
        let row = matrix.row(0).unwrap();
        assert!(approx(row.get(calm), 2.0 * row.get(focus)));
    }

    #[test]
    fn test_tag_order_does_not_change_vector() {
        let forward = build(&[habit("A", &["calm", "focus", "energy"]), habit("B", &["calm"])])
            .unwrap();
        let reversed = build(&[habit("A", &["energy", "focus", "calm"]), habit("B", &["calm"])])
            .unwrap();
        assert_eq!(forward.row(0), reversed.row(0));
    }

    #[test]
    fn test_untagged_habit_gets_zero_vector() {
        let matrix = build(&[habit("A", &[]), habit("B", &["calm"])]).unwrap();
        assert!(matrix.row(0).unwrap().is_zero());
        assert!(!matrix.row(1).unwrap().is_zero());
    }

    #[test]
    fn test_tokenless_corpus_builds_empty_vocabulary() {
        let matrix = build(&[habit("A", &[]), habit("B", &["x", "-"])]).unwrap();
        assert!(matrix.vocabulary().is_empty());
        assert!(matrix.vectors().iter().all(SparseVector::is_zero));
    }

    #[test]
    fn test_sparse_dot_merges_columns() {
        let a = SparseVector::from_entries(vec![(0, 1.0), (3, 2.0), (5, 1.0)]);
        let b = SparseVector::from_entries(vec![(3, 4.0), (4, 9.0), (5, 0.5)]);
        assert!(approx(a.dot(&b), 8.5));
        assert!(approx(b.dot(&a), 8.5));
        assert!(approx(a.dot(&SparseVector::default()), 0.0));
    }

    #[test]
    fn test_sparse_from_entries_merges_and_drops_zeros() {
        let v = SparseVector::from_entries(vec![(2, 1.0), (0, 0.0), (2, 1.5)]);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(2, 2.5)]);
        assert_eq!(v.get(0), 0.0);
    }
}
