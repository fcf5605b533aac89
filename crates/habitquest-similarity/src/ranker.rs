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

//! Query-vs-corpus cosine ranking.

use crate::vectorizer::{build, SparseVector, TfIdfMatrix};
use habitquest_core::{Habit, HabitError, ScoredHabit, TopK};

/// Decimal places kept in presented similarity scores.
pub const SCORE_DECIMALS: i32 = 4;

/// A candidate row and its raw similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredIdx {
    /// Row in the corpus snapshot.
    pub idx: usize,
    /// Cosine similarity in `[0, 1]`.
    pub score: f64,
}

/// Cosine similarity of two non-negative vectors, clamped to `[0, 1]`.
/// Returns 0.0 when either vector is zero.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (na * nb)).clamp(0.0, 1.0)
}

/// Rounds a score for presentation.
pub fn round_score(score: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (score * factor).round() / factor
}

/// Index of the first record titled exactly `title`.
pub fn find_query_row(records: &[Habit], title: &str) -> Option<usize> {
    records.iter().position(|habit| habit.title == title)
}

/// Scores every row except `query_row` against it, best first.
///
/// The sort is stable, so equal scores keep corpus order.
pub fn top_k_cosine(matrix: &TfIdfMatrix, query_row: usize, top_k: usize) -> Vec<ScoredIdx> {
    let Some(query) = matrix.row(query_row) else {
        return Vec::new();
    };
    let mut scored: Vec<ScoredIdx> = matrix
        .vectors()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != query_row)
        .map(|(idx, v)| ScoredIdx {
            idx,
            score: cosine_similarity(query, v),
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    scored
}

/// Ranks the habits of `records` by similarity to the first habit titled
/// `query_title`.
///
/// `matrix` must have been built from this exact `records` snapshot. Other
/// rows sharing the query title stay eligible; only the matched row is
/// excluded.
pub fn rank(
    query_title: &str,
    matrix: &TfIdfMatrix,
    records: &[Habit],
    top_k: TopK,
) -> Result<Vec<ScoredHabit>, HabitError> {
    if records.is_empty() {
        return Err(HabitError::EmptyCorpus);
    }
    if matrix.rows() != records.len() {
        return Err(HabitError::validation_error(
            "tfidf.rows",
            &format!(
                "matrix has {} rows but the corpus has {} records",
                matrix.rows(),
                records.len()
            ),
        ));
    }

    let query_row = find_query_row(records, query_title)
        .ok_or_else(|| HabitError::HabitNotFound(query_title.to_string()))?;

    let ranked = top_k_cosine(matrix, query_row, top_k.get())
        .into_iter()
        .map(|scored| {
            let habit = &records[scored.idx];
            ScoredHabit {
                title: habit.title.clone(),
                tags: habit.tags.clone(),
                similarity: round_score(scored.score),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        query = query_title,
        query_row,
        candidates = records.len() - 1,
        returned = ranked.len(),
        "Ranked habits"
    );
    Ok(ranked)
}

/// Vectorizes `records` and ranks them against `query_title` in one call.
pub fn recommend(
    records: &[Habit],
    query_title: &str,
    top_k: TopK,
) -> Result<Vec<ScoredHabit>, HabitError> {
    let matrix = build(records)?;
    rank(query_title, &matrix, records, top_k)
}
