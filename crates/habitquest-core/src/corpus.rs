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

//! Corpus sources: anything that can hand out a snapshot of the habit catalog.

use crate::errors::HabitError;
use crate::types::{validate_corpus, Habit};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Supplies an ordered snapshot of every habit in the catalog.
///
/// The returned order is the corpus iteration order used for title lookup
/// and tie-breaking, so implementations must keep it stable between calls
/// on an unchanged catalog.
#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Loads the full catalog.
    async fn load_all(&self) -> Result<Vec<Habit>, HabitError>;
}

/// An in-memory implementation of the `HabitStore` trait.
///
/// Habits are kept in insertion order behind a `tokio` `RwLock`; every
/// `load_all` clones the current contents into a fresh snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHabitStore {
    habits: Arc<RwLock<Vec<Habit>>>,
}

impl InMemoryHabitStore {
    /// Creates a new, empty `InMemoryHabitStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `habits`.
    pub fn with_habits(habits: Vec<Habit>) -> Result<Self, HabitError> {
        validate_corpus(&habits)?;
        Ok(Self {
            habits: Arc::new(RwLock::new(habits)),
        })
    }

    /// Appends a habit to the end of the catalog.
    pub async fn insert(&self, habit: Habit) -> Result<(), HabitError> {
        habit.validate()?;
        self.habits.write().await.push(habit);
        Ok(())
    }

    /// Swaps the whole catalog for `habits`.
    pub async fn replace_all(&self, habits: Vec<Habit>) -> Result<(), HabitError> {
        validate_corpus(&habits)?;
        *self.habits.write().await = habits;
        Ok(())
    }

    /// Number of stored habits.
    pub async fn len(&self) -> usize {
        self.habits.read().await.len()
    }

    /// Whether the catalog is empty.
    pub async fn is_empty(&self) -> bool {
        self.habits.read().await.is_empty()
    }
}

#[async_trait]
impl HabitStore for InMemoryHabitStore {
    async fn load_all(&self) -> Result<Vec<Habit>, HabitError> {
        Ok(self.habits.read().await.clone())
    }
}

/// Reads the catalog from a JSON array of habit documents on every load.
///
/// Extra document fields such as `_id`, `category` or `tagWeights` are
/// ignored, so datasets written by `generate_habits` load as-is.
#[derive(Debug, Clone)]
pub struct JsonFileHabitStore {
    path: PathBuf,
}

impl JsonFileHabitStore {
    /// Creates a store backed by the file at `path`. The file is not read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HabitStore for JsonFileHabitStore {
    async fn load_all(&self) -> Result<Vec<Habit>, HabitError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let habits: Vec<Habit> = serde_json::from_slice(&bytes)?;
        validate_corpus(&habits)?;
        tracing::debug!(
            path = %self.path.display(),
            habits = habits.len(),
            "Loaded habit corpus from JSON file"
        );
        Ok(habits)
    }
}
