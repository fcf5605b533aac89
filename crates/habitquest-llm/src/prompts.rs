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

//! Prompt templates for habit suggestions

use crate::errors::LlmError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(\w+)\}").unwrap_or_else(|e| panic!("invalid placeholder pattern: {}", e))
});

/// A prompt template with `{name}` placeholders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template name
    pub name: String,
    /// Template content with placeholders
    pub template: String,
    /// Variable definitions
    pub variables: HashMap<String, VariableDefinition>,
}

/// Definition of a template variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Variable name
    pub name: String,
    /// Variable description
    pub description: String,
    /// Whether the variable is required
    pub required: bool,
    /// Default value if not provided
    pub default: Option<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            variables: HashMap::new(),
        }
    }

    /// Add a variable definition
    pub fn add_variable(&mut self, var: VariableDefinition) {
        self.variables.insert(var.name.clone(), var);
    }

    /// Render the template with provided values.
    ///
    /// Placeholders are substituted in one pass over the template, so text
    /// inside a substituted value is never treated as a placeholder.
    /// Placeholders without a variable definition are left untouched.
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, LlmError> {
        if let Some(missing) = self
            .variables
            .values()
            .find(|def| def.required && !values.contains_key(&def.name))
        {
            return Err(LlmError::ConfigurationError(format!(
                "Required variable '{}' not provided to template '{}'",
                missing.name, self.name
            )));
        }

        let rendered = PLACEHOLDER.replace_all(&self.template, |caps: &Captures| {
            let name = &caps[1];
            match self.variables.get(name) {
                Some(definition) => values
                    .get(name)
                    .or(definition.default.as_ref())
                    .cloned()
                    .unwrap_or_default(),
                None => caps[0].to_string(),
            }
        });

        Ok(rendered.into_owned())
    }
}

/// Prompt templates used by the generative recommender
pub struct HabitPrompts;

impl HabitPrompts {
    /// Asks for `{count}` habits related to `{habit_title}` as a JSON array
    pub fn similar_habits() -> PromptTemplate {
        let mut template = PromptTemplate::new(
            "similar_habits",
            r#"Based on the habit "{habit_title}", suggest {count} similar or related habits that someone might want to track.
Format your response as a JSON array of objects, where each object has a "title" field for the habit name,
"tags" field with an array of relevant tags/categories, and a "similarity" field with a number between 0 and 1
indicating how similar it is to the original habit. Example format:
[
  {
    "title": "Morning Meditation",
    "tags": ["wellness", "mental health"],
    "similarity": 0.85
  }
]"#,
        );

        template.add_variable(VariableDefinition {
            name: "habit_title".to_string(),
            description: "Title of the habit to find relatives for".to_string(),
            required: true,
            default: None,
        });

        template.add_variable(VariableDefinition {
            name: "count".to_string(),
            description: "How many habits to suggest".to_string(),
            required: false,
            default: Some("5".to_string()),
        });

        template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_habits_rendering() {
        let template = HabitPrompts::similar_habits();
        let mut values = HashMap::new();
        values.insert("habit_title".to_string(), "Cold Showers".to_string());
        values.insert("count".to_string(), "3".to_string());

        let prompt = template.render(&values).unwrap();
        assert!(prompt.starts_with(r#"Based on the habit "Cold Showers", suggest 3 similar"#));
        assert!(prompt.contains(r#""title": "Morning Meditation""#));
        assert!(!prompt.contains("{habit_title}"));
    }

    #[test]
    fn test_optional_variable_uses_default() {
        let template = HabitPrompts::similar_habits();
        let mut values = HashMap::new();
        values.insert("habit_title".to_string(), "Reading Books".to_string());

        let prompt = template.render(&values).unwrap();
        assert!(prompt.contains("suggest 5 similar"));
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let template = HabitPrompts::similar_habits();
        let mut values = HashMap::new();
        values.insert("habit_title".to_string(), "Run {count} laps".to_string());
        values.insert("count".to_string(), "2".to_string());

        for _ in 0..20 {
            let prompt = template.render(&values).unwrap();
            assert!(prompt.starts_with(r#"Based on the habit "Run {count} laps", suggest 2 similar"#));
        }
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let mut template = PromptTemplate::new("greeting", "Hello {name}, see {other}");
        template.add_variable(VariableDefinition {
            name: "name".to_string(),
            description: "Who to greet".to_string(),
            required: true,
            default: None,
        });
        let mut values = HashMap::new();
        values.insert("name".to_string(), "Ada".to_string());

        assert_eq!(template.render(&values).unwrap(), "Hello Ada, see {other}");
    }

    #[test]
    fn test_missing_required_variable() {
        let template = HabitPrompts::similar_habits();
        let result = template.render(&HashMap::new());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Required variable 'habit_title' not provided"));
    }
}
