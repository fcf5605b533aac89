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

//! Best-effort recommender delegating to a text generation provider

use crate::parsers::parse_recommendations;
use crate::prompts::{HabitPrompts, PromptTemplate};
use crate::providers::{LlmProvider, LlmRequest};
use async_trait::async_trait;
use habitquest_core::{HabitError, Recommender, ScoredHabit, TopK};
use std::collections::HashMap;
use std::sync::Arc;

/// Sampling settings for generated suggestions.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Temperature for randomness
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1024,
        }
    }
}

/// Asks a text model for habits related to the query habit.
///
/// Output is not deterministic and is not grounded in the stored catalog.
/// Suggestions keep the model's order and are cut to `top_k`.
pub struct GenerativeTextRecommender {
    provider: Arc<dyn LlmProvider>,
    template: PromptTemplate,
    settings: GenerationSettings,
}

impl GenerativeTextRecommender {
    /// Creates a recommender with the default prompt and sampling settings.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            template: HabitPrompts::similar_habits(),
            settings: GenerationSettings::default(),
        }
    }

    /// Overrides the sampling settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    fn build_request(&self, habit_title: &str, top_k: TopK) -> Result<LlmRequest, HabitError> {
        let mut values = HashMap::new();
        values.insert("habit_title".to_string(), habit_title.to_string());
        values.insert("count".to_string(), top_k.to_string());

        let prompt = self.template.render(&values)?;
        Ok(LlmRequest {
            prompt,
            temperature: Some(self.settings.temperature),
            max_output_tokens: Some(self.settings.max_output_tokens),
        })
    }
}

#[async_trait]
impl Recommender for GenerativeTextRecommender {
    fn name(&self) -> &str {
        "generative_text"
    }

    fn is_deterministic(&self) -> bool {
        false
    }

    async fn recommend(
        &self,
        habit_title: &str,
        top_k: TopK,
    ) -> Result<Vec<ScoredHabit>, HabitError> {
        let request = self.build_request(habit_title, top_k)?;
        tracing::info!(
            habit = habit_title,
            provider = self.provider.name(),
            %top_k,
            "Requesting generated recommendations"
        );

        let response = self.provider.complete(request).await.map_err(|e| {
            tracing::warn!(provider = self.provider.name(), error = %e, "Provider call failed");
            HabitError::from(e)
        })?;

        let mut suggestions = parse_recommendations(&response.content).map_err(|e| {
            tracing::warn!(provider = self.provider.name(), error = %e, "Unusable provider output");
            HabitError::from(e)
        })?;
        suggestions.truncate(top_k.get());
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LlmError;
    use crate::providers::LlmResponse;
    use habitquest_core::UpstreamFailure;
    use std::sync::Mutex;

    /// Provider replying with canned content and recording prompts.
    struct CannedProvider {
        reply: Result<String, fn() -> LlmError>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: fn() -> LlmError) -> Self {
            Self {
                reply: Err(err),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
            self.prompts.lock().unwrap().push(request.prompt);
            match &self.reply {
                Ok(text) => Ok(LlmResponse {
                    content: text.clone(),
                    model: "canned-1".to_string(),
                    finish_reason: Some("STOP".to_string()),
                    usage: None,
                }),
                Err(make) => Err(make()),
            }
        }
    }

    fn upstream_kind(err: HabitError) -> Option<UpstreamFailure> {
        match err {
            HabitError::UpstreamServiceError { kind, .. } => Some(kind),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_recommend_parses_and_truncates() {
        let provider = Arc::new(CannedProvider::replying(
            r#"Here you go: [
                {"title": "Evening Stretch", "tags": ["calm"], "similarity": 0.9},
                {"title": "Yoga Nidra", "tags": ["sleep"], "similarity": 0.8},
                {"title": "Body Scan", "tags": ["awareness"], "similarity": 0.7}
            ]"#,
        ));
        let recommender = GenerativeTextRecommender::new(provider.clone());

        let result = recommender
            .recommend("Morning Yoga", TopK::new(2).unwrap())
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "Evening Stretch");
        assert_eq!(result[1].title, "Yoga Nidra");

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(r#""Morning Yoga", suggest 2 similar"#));
        assert!(!recommender.is_deterministic());
    }

    #[tokio::test]
    async fn test_upstream_failures_are_not_collapsed() {
        let unreachable = GenerativeTextRecommender::new(Arc::new(CannedProvider::failing(|| {
            LlmError::Unreachable("connection refused".into())
        })));
        let garbled = GenerativeTextRecommender::new(Arc::new(CannedProvider::replying(
            "I'd suggest stretching!",
        )));
        let empty = GenerativeTextRecommender::new(Arc::new(CannedProvider::replying("[]")));

        let top_k = TopK::default();
        assert_eq!(
            upstream_kind(unreachable.recommend("Meditation", top_k).await.unwrap_err()),
            Some(UpstreamFailure::Unreachable)
        );
        assert_eq!(
            upstream_kind(garbled.recommend("Meditation", top_k).await.unwrap_err()),
            Some(UpstreamFailure::Unparsable)
        );
        assert_eq!(
            upstream_kind(empty.recommend("Meditation", top_k).await.unwrap_err()),
            Some(UpstreamFailure::Empty)
        );
    }
}
