use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::draw::DrawConfig;
use crate::domain::rng::{self, RandomSource};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (absent when the app runs without a store)
    pub db: Option<DatabaseConnection>,
    pub draw_config: DrawConfig,
    pub rng: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("draw_config", &self.draw_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(db: DatabaseConnection, draw_config: DrawConfig) -> Self {
        Self::assemble(Some(db), draw_config)
    }

    /// State without a database; every draw answers 503.
    pub fn without_db() -> Self {
        Self::new_without_db(DrawConfig::default())
    }

    pub fn new_without_db(draw_config: DrawConfig) -> Self {
        Self::assemble(None, draw_config)
    }

    fn assemble(db: Option<DatabaseConnection>, draw_config: DrawConfig) -> Self {
        let rng = rng::from_seed(draw_config.rng_seed);
        Self {
            db,
            draw_config,
            rng,
        }
    }

    pub fn with_rng(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
