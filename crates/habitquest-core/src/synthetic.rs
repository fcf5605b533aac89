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

//! Synthetic habit dataset generation for seeding stores and benchmarks.

use crate::types::Habit;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Builder;

/// Tag vocabulary the generator samples from.
pub const KEYWORD_POOL: &[&str] = &[
    "focus", "energy", "discipline", "mindfulness", "routine", "strength",
    "calm", "confidence", "self-care", "clarity", "productivity", "resilience",
    "motivation", "creativity", "flexibility", "growth", "mental health",
    "accountability", "habits", "routine building", "emotional balance", "positivity",
    "learning", "wellbeing", "goal setting", "time management", "consistency", "reflection",
    "balance", "empathy", "communication", "rejuvenation", "fitness", "nutrition",
    "hydration", "sleep quality", "digital wellbeing", "vision", "ambition", "self-awareness",
    "work-life balance", "stress relief", "mental clarity", "kindness", "clean living",
    "dopamine detox", "leadership", "organization", "clean eating", "brain health",
    "journaling", "optimism", "awareness", "growth mindset",
];

/// Habit titles the generator samples from. Titles repeat in large datasets.
pub const HABIT_POOL: &[&str] = &[
    "Meditation", "Morning Yoga", "Evening Stretch", "Daily Run", "Walk 10,000 Steps",
    "Gratitude Journaling", "Bullet Journaling", "Digital Detox", "Sleep Before 11 PM",
    "Time Blocking", "Reading Books", "Listen to Podcasts", "Drink 3L Water",
    "Meal Prepping", "No Sugar Day", "Cold Showers", "Intermittent Fasting",
    "Strength Training", "HIIT Workout", "Pomodoro Focus", "Stretching Routine",
    "Daily Reflection", "Declutter Workspace", "Breathing Exercises", "Creative Writing",
    "Practice Music", "Sketching/Doodling", "Learn a Language", "Skill Practice",
    "Yoga Nidra", "Mindful Eating", "Plan Next Day", "Habit Tracking", "Mood Tracking",
    "Early Wake Up", "30-Min Reading", "Call a Friend", "Help Someone", "Volunteer Work",
    "Journal 5 Thoughts", "Sleep Tracking", "Daily Affirmations", "Visualisation Practice",
    "No Social Media", "Minimalist Day", "Cooking Healthy Meal", "Posture Correction",
    "Eye Relaxation", "Gratitude Sharing", "Learn Coding", "Review Budget",
    "Clean Room", "Digital Learning", "Stretch Every Hour", "Water Plants",
    "Monitor Caffeine", "Meditate with App", "Practice Silence", "Sun Exposure",
    "Fitness Challenge", "Walk Without Phone", "Creative Break", "News-Free Day",
    "Learn Public Speaking", "Organize Emails", "Inbox Zero", "5-Minute Cleanup",
    "Mindful Walking", "Body Scan", "Avoid Multitasking", "Practice Gratitude",
    "Unplug Before Sleep", "Evening Journaling",
];

/// Categories a generated habit can fall into.
pub const CATEGORIES: &[&str] = &[
    "physical", "mental", "wellness", "productivity", "hydration", "nutrition", "social",
    "creativity", "sleep",
];

// First matching rule wins.
const CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("physical", &["yoga", "run", "stretch", "workout", "training", "walk", "exercise"]),
    ("mental", &["journal", "journaling", "reflection", "mindful", "meditate"]),
    ("nutrition", &["meal", "eat", "nutrition", "sugar", "diet"]),
    ("hydration", &["water", "hydration", "drink"]),
    ("productivity", &["read", "coding", "learn", "language"]),
    ("social", &["friend", "volunteer", "gratitude", "help"]),
    ("sleep", &["sleep", "bed"]),
    ("creativity", &["draw", "music", "creative"]),
];

/// One generated dataset document, in the on-disk shape of the habit dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticHabit {
    /// Random document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Title drawn from [`HABIT_POOL`].
    pub title: String,
    /// Distinct tags drawn from [`KEYWORD_POOL`].
    pub tags: Vec<String>,
    /// Category derived from the title.
    pub category: String,
    /// Per-tag weight in `[0.6, 1.5)`, rounded to two decimals.
    #[serde(rename = "tagWeights")]
    pub tag_weights: BTreeMap<String, f64>,
}

impl From<SyntheticHabit> for Habit {
    fn from(doc: SyntheticHabit) -> Self {
        Habit {
            title: doc.title,
            tags: doc.tags,
        }
    }
}

/// Maps a title onto a category by keyword, or `None` when no rule applies.
pub fn category_for_title(title: &str) -> Option<&'static str> {
    let lower = title.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
}

/// Generates synthetic habit documents from the built-in pools.
pub struct HabitGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> HabitGenerator<R> {
    /// Creates a generator drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates one document for `title`.
    pub fn generate_habit(&mut self, title: &str) -> SyntheticHabit {
        let tag_count = self.rng.gen_range(4..=7);
        let tags: Vec<String> = KEYWORD_POOL
            .choose_multiple(&mut self.rng, tag_count)
            .map(|t| t.to_string())
            .collect();

        let mut tag_weights = BTreeMap::new();
        for tag in &tags {
            let weight: f64 = self.rng.gen_range(0.6..1.5);
            tag_weights.insert(tag.clone(), (weight * 100.0).round() / 100.0);
        }

        let category = match category_for_title(title) {
            Some(category) => category,
            None => CATEGORIES.choose(&mut self.rng).copied().unwrap_or("wellness"),
        };

        let id = Builder::from_random_bytes(self.rng.gen()).into_uuid();

        SyntheticHabit {
            id: id.to_string(),
            title: title.to_string(),
            tags,
            category: category.to_string(),
            tag_weights,
        }
    }

    /// Generates `count` documents with titles drawn (with repetition) from [`HABIT_POOL`].
    pub fn generate_dataset(&mut self, count: usize) -> Vec<SyntheticHabit> {
        let mut dataset = Vec::with_capacity(count);
        for _ in 0..count {
            let title = HABIT_POOL.choose(&mut self.rng).copied().unwrap_or("Meditation");
            dataset.push(self.generate_habit(title));
        }
        dataset
    }
}
