use std::sync::Arc;

use crate::config::db::{DbKind, RuntimeEnv};
use crate::config::draw::DrawConfig;
use crate::domain::rng::RandomSource;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: Option<DbKind>,
    draw_config: DrawConfig,
    rng: Option<Arc<dyn RandomSource>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Prod,
            db_kind: None,
            draw_config: DrawConfig::default(),
            rng: None,
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_db(mut self, db_kind: DbKind) -> Self {
        self.db_kind = Some(db_kind);
        self
    }

    pub fn with_draw_config(mut self, draw_config: DrawConfig) -> Self {
        self.draw_config = draw_config;
        self
    }

    /// Overrides the source derived from `DrawConfig::rng_seed`.
    pub fn with_rng(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let state = match self.db_kind {
            // single entrypoint: build + migrate
            Some(db_kind) => AppState::new(bootstrap_db(self.env, db_kind).await?, self.draw_config),
            None => AppState::new_without_db(self.draw_config),
        };

        Ok(match self.rng {
            Some(rng) => state.with_rng(rng),
            None => state,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
