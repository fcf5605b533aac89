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

//! The recommendation capability shared by every strategy.

use crate::errors::HabitError;
use crate::types::{ScoredHabit, TopK};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Produces habits similar to a query habit.
///
/// Strategies are selected by the caller; implementations never fall back to
/// one another.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Whether the same input always yields the same output.
    fn is_deterministic(&self) -> bool;

    /// Recommends at most `top_k` habits similar to `habit_title`.
    async fn recommend(
        &self,
        habit_title: &str,
        top_k: TopK,
    ) -> Result<Vec<ScoredHabit>, HabitError>;
}

/// The recommendation strategies a caller can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStrategy {
    /// TF-IDF cosine ranking over the stored corpus.
    VectorSimilarity,
    /// Suggestions generated by an external text model.
    GenerativeText,
}

impl fmt::Display for RecommendationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationStrategy::VectorSimilarity => f.write_str("vector_similarity"),
            RecommendationStrategy::GenerativeText => f.write_str("generative_text"),
        }
    }
}

impl FromStr for RecommendationStrategy {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vector_similarity" | "vector" => Ok(RecommendationStrategy::VectorSimilarity),
            "generative_text" | "generative" => Ok(RecommendationStrategy::GenerativeText),
            other => Err(HabitError::validation_error(
                "strategy",
                &format!("unknown recommendation strategy '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_round_trips_through_display() {
        for strategy in [
            RecommendationStrategy::VectorSimilarity,
            RecommendationStrategy::GenerativeText,
        ] {
            let parsed: RecommendationStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
        assert!("fuzzy".parse::<RecommendationStrategy>().is_err());
    }
}
