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

//! Extraction of structured recommendations from free-form model output

use crate::errors::LlmError;
use habitquest_core::ScoredHabit;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

// Greedy: from the first '[' to the last ']', across lines.
static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[\s\S]*\]").unwrap_or_else(|e| panic!("invalid JSON array pattern: {}", e))
});

/// One suggestion as the model writes it; fields beyond these are ignored.
#[derive(Debug, Deserialize)]
struct RawSuggestion {
    title: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    similarity: Option<f64>,
}

/// Returns the JSON array embedded in `text`, if any.
pub fn extract_json_array(text: &str) -> Option<&str> {
    JSON_ARRAY.find(text).map(|m| m.as_str())
}

/// Parses the recommendations embedded in a model reply.
///
/// Entries with a blank title are dropped and similarities are clamped to
/// `[0, 1]`. A reply holding a valid but empty array is reported as
/// [`LlmError::EmptyContent`], never as an empty success.
pub fn parse_recommendations(text: &str) -> Result<Vec<ScoredHabit>, LlmError> {
    let array = extract_json_array(text)
        .ok_or_else(|| LlmError::ParsingError("no JSON array found in model output".into()))?;

    let raw: Vec<RawSuggestion> = serde_json::from_str(array)
        .map_err(|e| LlmError::ParsingError(format!("invalid recommendation array: {}", e)))?;

    let total = raw.len();
    let parsed: Vec<ScoredHabit> = raw
        .into_iter()
        .filter(|s| !s.title.trim().is_empty())
        .map(|s| ScoredHabit {
            title: s.title.trim().to_string(),
            tags: s.tags,
            similarity: s.similarity.unwrap_or(0.0).clamp(0.0, 1.0),
        })
        .collect();

    if parsed.len() < total {
        tracing::warn!(
            dropped = total - parsed.len(),
            "Dropped suggestions without a title"
        );
    }
    if parsed.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(parsed)
}
