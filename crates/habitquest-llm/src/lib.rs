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

//! Generative text habit recommendations for HabitQuest.
//!
//! This crate provides:
//! - A provider seam for text generation services, with a Gemini client
//! - The prompt asking for related habits as a JSON array
//! - Extraction of that array from free-form replies
//! - A best-effort [`habitquest_core::Recommender`] built on the above
//!
//! Nothing here is deterministic; callers that need reproducible rankings
//! use the similarity crate instead.

pub mod errors;
pub mod parsers;
pub mod prompts;
pub mod providers;
pub mod recommender;

pub use errors::LlmError;
pub use providers::{GeminiConfig, GeminiProvider, LlmProvider, LlmRequest, LlmResponse};
pub use recommender::{GenerationSettings, GenerativeTextRecommender};
