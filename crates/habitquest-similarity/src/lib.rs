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

#![warn(missing_docs)]

//! Tag-based habit similarity for HabitQuest.
//!
//! This crate provides:
//! - Tokenization of joined tag documents
//! - TF-IDF vectorization over a corpus snapshot
//! - Query-vs-corpus cosine ranking with stable tie-breaking
//! - A [`habitquest_core::Recommender`] backed by a habit store

pub mod ranker;
pub mod recommender;
pub mod tokenizer;
pub mod vectorizer;

pub use ranker::{rank, recommend, ScoredIdx};
pub use recommender::VectorSimilarityRecommender;
pub use vectorizer::{build, SparseVector, TfIdfMatrix, Vocabulary};
