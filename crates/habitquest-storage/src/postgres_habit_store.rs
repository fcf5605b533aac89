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

//! Postgres-based implementation of the `HabitStore` trait using SQLx and PgPool.

use async_trait::async_trait;
use habitquest_core::corpus::HabitStore;
use habitquest_core::errors::HabitError;
use habitquest_core::types::{validate_corpus, Habit};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Postgres-backed HabitStore.
///
/// Habits live in a single `habits` table; corpus order is insertion order
/// (the `id` sequence).
#[derive(Clone, Debug)]
pub struct PostgresHabitStore {
    /// Connection pool to Postgres.
    pool: PgPool,
}

impl PostgresHabitStore {
    /// Creates a new PostgresHabitStore with the given PgPool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a small pool to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, HabitError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|e| HabitError::StorageError(format!("DB connect error: {}", e)))?;
        Ok(Self::new(pool))
    }

    /// Creates the `habits` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), HabitError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS habits (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                tags TEXT[] NOT NULL DEFAULT '{}'
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HabitError::StorageError(format!("DB ensure_schema error: {}", e)))?;
        Ok(())
    }

    /// Appends `habits` in order, in a single transaction.
    pub async fn insert_habits(&self, habits: &[Habit]) -> Result<usize, HabitError> {
        validate_corpus(habits)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| HabitError::StorageError(format!("DB begin error: {}", e)))?;

        for habit in habits {
            sqlx::query("INSERT INTO habits (title, tags) VALUES ($1, $2)")
                .bind(&habit.title)
                .bind(&habit.tags)
                .execute(&mut *tx)
                .await
                .map_err(|e| HabitError::StorageError(format!("DB insert_habits error: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| HabitError::StorageError(format!("DB commit error: {}", e)))?;

        tracing::info!(inserted = habits.len(), "Stored habits");
        Ok(habits.len())
    }

    /// Number of stored habits.
    pub async fn count(&self) -> Result<i64, HabitError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM habits")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| HabitError::StorageError(format!("DB count error: {}", e)))
    }
}

#[async_trait]
impl HabitStore for PostgresHabitStore {
    async fn load_all(&self) -> Result<Vec<Habit>, HabitError> {
        let rows = sqlx::query_as::<_, (String, Vec<String>)>(
            "SELECT title, tags FROM habits ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HabitError::StorageError(format!("DB load_all error: {}", e)))?;

        let habits: Vec<Habit> = rows
            .into_iter()
            .map(|(title, tags)| Habit { title, tags })
            .collect();
        validate_corpus(&habits)?;

        tracing::debug!(habits = habits.len(), "Loaded habit corpus from Postgres");
        Ok(habits)
    }
}
