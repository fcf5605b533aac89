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

#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core HabitQuest types, traits, and utilities shared across the workspace.

/// Corpus sources handing out habit catalog snapshots.
pub mod corpus;
pub mod errors;
pub mod recommender;
pub mod synthetic;
pub mod types;

pub use corpus::{HabitStore, InMemoryHabitStore, JsonFileHabitStore};
pub use errors::{HabitError, UpstreamFailure};
pub use recommender::{RecommendationStrategy, Recommender};
pub use types::{Habit, ScoredHabit, TopK, DEFAULT_TOP_K};
