pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::services::{
    document_service::DocumentService,
    llm_service::{model_from_config, QuizModel},
    quiz_service::QuizService,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub quiz_service: QuizService,
    pub document_service: DocumentService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs.max(1) * 2))
            .build()?;
        let model = model_from_config(&config, http_client);
        Ok(Self::with_model(config, model))
    }

    /// Builds the state around an explicit model instead of the configured provider.
    pub fn with_model(config: Config, model: Arc<dyn QuizModel>) -> Self {
        let quiz_service =
            QuizService::new(model, Duration::from_secs(config.llm_timeout_secs));
        let document_service = DocumentService::new(config.upload_dir.clone());

        Self {
            config: Arc::new(config),
            quiz_service,
            document_service,
            started_at: Instant::now(),
        }
    }
}
