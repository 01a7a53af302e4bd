pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;
pub mod views;

use std::sync::Arc;

use crate::config::Config;
use crate::services::question_service::{QuestionRepository, QuestionService};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub question_service: QuestionService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config().clone();
        Self {
            config: Arc::new(config),
            question_service: QuestionService::from(pool),
        }
    }

    /// State backed by an arbitrary question store, e.g. an in-memory one.
    pub fn with_repository(config: Config, repository: Arc<dyn QuestionRepository>) -> Self {
        Self {
            config: Arc::new(config),
            question_service: QuestionService::new(repository),
        }
    }
}
