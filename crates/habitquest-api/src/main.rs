//! REST entry point for HabitQuest recommendations.

mod config;
mod routes;

use clap::Parser;
use config::{ApiConfig, CorpusSource};
use habitquest_core::{HabitStore, InMemoryHabitStore, JsonFileHabitStore, Recommender};
use habitquest_llm::{GeminiProvider, GenerativeTextRecommender};
use habitquest_similarity::VectorSimilarityRecommender;
use habitquest_storage::PostgresHabitStore;
use routes::{app, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("habitquest_api=info,tower_http=info")),
        )
        .init();

    let config = ApiConfig::parse();
    config.validate()?;

    let store = open_store(&config).await?;
    let vector: Arc<dyn Recommender> = Arc::new(VectorSimilarityRecommender::new(store));
    let generative = generative_recommender(&config)?;
    let state = AppState::new(vector, generative, config.default_top_k()?);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn open_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn HabitStore>> {
    match config.corpus_source() {
        CorpusSource::Postgres(url) => {
            let store = PostgresHabitStore::connect(&url).await?;
            store.ensure_schema().await?;
            if config.seed_database {
                if let Some(path) = &config.dataset {
                    seed_database(&store, JsonFileHabitStore::new(path)).await?;
                }
            }
            tracing::info!("Serving habits from Postgres");
            Ok(Arc::new(store))
        }
        CorpusSource::JsonFile(path) => {
            tracing::info!(dataset = %path.display(), "Serving habits from JSON dataset");
            Ok(Arc::new(JsonFileHabitStore::new(path)))
        }
        CorpusSource::Empty => {
            tracing::warn!(
                "No DATABASE_URL or HABITQUEST_DATASET set; the habit corpus is empty"
            );
            Ok(Arc::new(InMemoryHabitStore::new()))
        }
    }
}

async fn seed_database(
    store: &PostgresHabitStore,
    dataset: JsonFileHabitStore,
) -> anyhow::Result<()> {
    let existing = store.count().await?;
    if existing > 0 {
        tracing::info!(existing, "Habits table already populated; skipping seed");
        return Ok(());
    }
    let habits = dataset.load_all().await?;
    let inserted = store.insert_habits(&habits).await?;
    tracing::info!(inserted, dataset = %dataset.path().display(), "Seeded habits table");
    Ok(())
}

fn generative_recommender(config: &ApiConfig) -> anyhow::Result<Option<Arc<dyn Recommender>>> {
    let Some(gemini) = config.gemini_config() else {
        tracing::warn!("GEMINI_API_KEY not set; /gemini-recommend is disabled");
        return Ok(None);
    };
    tracing::info!(model = %gemini.model, "Gemini recommendations enabled");
    let provider = Arc::new(GeminiProvider::new(gemini)?);
    let recommender =
        GenerativeTextRecommender::new(provider).with_settings(config.generation_settings());
    Ok(Some(Arc::new(recommender)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
