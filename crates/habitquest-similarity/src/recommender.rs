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

//! Deterministic recommender over a habit store.

use crate::ranker::rank;
use crate::vectorizer::build;
use async_trait::async_trait;
use habitquest_core::{HabitError, HabitStore, Recommender, ScoredHabit, TopK};
use std::sync::Arc;

/// Ranks habits by TF-IDF cosine similarity of their tags.
///
/// Each call loads a fresh snapshot from the store and rebuilds the
/// vocabulary, so results always reflect the catalog at request time.
#[derive(Clone)]
pub struct VectorSimilarityRecommender {
    store: Arc<dyn HabitStore>,
}

impl VectorSimilarityRecommender {
    /// Creates a recommender reading its corpus from `store`.
    pub fn new(store: Arc<dyn HabitStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Recommender for VectorSimilarityRecommender {
    fn name(&self) -> &str {
        "vector_similarity"
    }

    fn is_deterministic(&self) -> bool {
        true
    }

    async fn recommend(
        &self,
        habit_title: &str,
        top_k: TopK,
    ) -> Result<Vec<ScoredHabit>, HabitError> {
        let records = self.store.load_all().await?;
        tracing::info!(
            habit = habit_title,
            corpus = records.len(),
            %top_k,
            "Computing vector similarity recommendations"
        );

        let matrix = build(&records)?;
        rank(habit_title, &matrix, &records, top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitquest_core::{Habit, InMemoryHabitStore};

    fn habit(title: &str, tags: &[&str]) -> Habit {
        Habit {
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_recommend_reads_fresh_snapshot() {
        let store = InMemoryHabitStore::with_habits(vec![
            habit("Meditation", &["calm"]),
            habit("Daily Run", &["fitness"]),
        ])
        .unwrap();
        let recommender = VectorSimilarityRecommender::new(Arc::new(store.clone()));

        let first = recommender.recommend("Meditation", TopK::default()).await.unwrap();
        assert_eq!(first.len(), 1);

        store.insert(habit("Yoga Nidra", &["calm", "sleep"])).await.unwrap();
        let second = recommender.recommend("Meditation", TopK::default()).await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].title, "Yoga Nidra");
    }

    #[tokio::test]
    async fn test_recommend_surfaces_empty_corpus() {
        let recommender = VectorSimilarityRecommender::new(Arc::new(InMemoryHabitStore::new()));
        let result = recommender.recommend("Meditation", TopK::default()).await;
        assert!(matches!(result, Err(HabitError::EmptyCorpus)));
        assert!(recommender.is_deterministic());
    }

    #[test]
    fn test_recommend_blocking() {
        let store = InMemoryHabitStore::with_habits(vec![habit("Meditation", &["calm"])]).unwrap();
        let recommender = VectorSimilarityRecommender::new(Arc::new(store));
        let result = tokio_test::block_on(recommender.recommend("Meditation", TopK::default()));
        assert!(result.unwrap().is_empty());
    }
}
