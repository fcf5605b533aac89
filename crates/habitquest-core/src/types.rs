//! Common type definitions used throughout HabitQuest.

use crate::errors::HabitError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of recommendations returned when the caller does not ask for more.
pub const DEFAULT_TOP_K: usize = 5;

/// A catalog entry: a habit title and its free-text tags.
///
/// Titles are not unique across a corpus; lookups match the first exact title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Display title, used as the lookup key.
    pub title: String,
    /// Free-text labels. Order carries no meaning for similarity.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Habit {
    /// Creates a new Habit, rejecting blank titles.
    pub fn new(title: impl Into<String>, tags: Vec<String>) -> Result<Self, HabitError> {
        let habit = Self {
            title: title.into(),
            tags,
        };
        habit.validate()?;
        Ok(habit)
    }

    /// Checks the invariants every loaded habit must satisfy.
    pub fn validate(&self) -> Result<(), HabitError> {
        if self.title.trim().is_empty() {
            return Err(HabitError::validation_error(
                "habit.title",
                "title must not be empty",
            ));
        }
        Ok(())
    }

    /// The whitespace-joined pseudo-document the vectorizer consumes.
    pub fn tag_document(&self) -> String {
        self.tags.join(" ")
    }
}

/// Validates every habit of a freshly loaded snapshot, naming the bad row.
pub fn validate_corpus(habits: &[Habit]) -> Result<(), HabitError> {
    for (row, habit) in habits.iter().enumerate() {
        habit.validate().map_err(|e| match e {
            HabitError::ValidationError { context, message } => HabitError::ValidationError {
                context: format!("corpus[{}].{}", row, context),
                message,
            },
            other => other,
        })?;
    }
    Ok(())
}

/// A recommended habit together with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHabit {
    /// Title of the recommended habit.
    pub title: String,
    /// Original, unjoined tags of the recommended habit.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Similarity to the query in `[0.0, 1.0]`.
    #[serde(default)]
    pub similarity: f64,
}

/// How many recommendations to return. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct TopK(usize);

impl TopK {
    /// Creates a new TopK, rejecting zero.
    pub fn new(k: usize) -> Result<Self, HabitError> {
        if k == 0 {
            return Err(HabitError::validation_error(
                "top_k",
                "must be a positive integer",
            ));
        }
        Ok(Self(k))
    }

    /// The raw count.
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for TopK {
    fn default() -> Self {
        Self(DEFAULT_TOP_K)
    }
}

impl TryFrom<usize> for TopK {
    type Error = HabitError;

    fn try_from(k: usize) -> Result<Self, Self::Error> {
        TopK::new(k)
    }
}

impl From<TopK> for usize {
    fn from(k: TopK) -> Self {
        k.0
    }
}

impl fmt::Display for TopK {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_habit_rejects_blank_title() {
        assert!(Habit::new("Meditation", vec!["calm".into()]).is_ok());
        assert!(matches!(
            Habit::new("   ", vec![]),
            Err(HabitError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_tag_document_joins_with_spaces() {
        let habit = Habit::new("Meditation", vec!["calm".into(), "mental health".into()]).unwrap();
        assert_eq!(habit.tag_document(), "calm mental health");

        let untagged = Habit::new("Nothing", vec![]).unwrap();
        assert_eq!(untagged.tag_document(), "");
    }

    #[test]
    fn test_habit_deserializes_dataset_documents() {
        let raw = r#"{
            "_id": "8d7f3c52-0000-0000-0000-000000000000",
            "title": "Cold Showers",
            "tags": ["resilience", "energy"],
            "category": "physical",
            "tagWeights": {"resilience": 1.2, "energy": 0.8}
        }"#;
        let habit: Habit = serde_json::from_str(raw).unwrap();
        assert_eq!(habit.title, "Cold Showers");
        assert_eq!(habit.tags, vec!["resilience", "energy"]);

        let untagged: Habit = serde_json::from_str(r#"{"title": "Walk"}"#).unwrap();
        assert!(untagged.tags.is_empty());
    }

    #[test]
    fn test_validate_corpus_names_row() {
        let corpus = vec![
            Habit { title: "Ok".into(), tags: vec![] },
            Habit { title: "".into(), tags: vec![] },
        ];
        match validate_corpus(&corpus) {
            Err(HabitError::ValidationError { context, .. }) => {
                assert_eq!(context, "corpus[1].habit.title");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_top_k() {
        assert_eq!(TopK::default().get(), 5);
        assert_eq!(TopK::new(3).unwrap().get(), 3);
        assert!(TopK::new(0).is_err());

        let parsed: Result<TopK, _> = serde_json::from_str::<TopK>("0");
        assert!(parsed.is_err());
        assert_eq!(serde_json::from_str::<TopK>("7").unwrap().get(), 7);
    }
}
