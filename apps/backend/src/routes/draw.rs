//! Draw endpoints.
//!
//! `POST /draw` is the raw pool draw. `POST /api/draw` is either the two-round
//! draw or the display-mapped pool draw, depending on the configured scheme.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::Span;

use crate::db::require_db;
use crate::db::retry::RetryPolicy;
use crate::domain::sign_level::display;
use crate::error::AppError;
use crate::extractors::GuestId;
use crate::repos::signs::Sign;
use crate::services::draw_orchestrator::DrawOrchestrator;
use crate::services::pool_allocator::{AllocationResult, PoolAllocator};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct SignBody {
    id: String,
    level: i32,
    #[serde(rename = "type")]
    sign_type: String,
    reward_code: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status")]
enum PoolDrawResponse {
    #[serde(rename = "OK")]
    Ok { sign: SignBody },
    #[serde(rename = "OUT_OF_STOCK")]
    OutOfStock,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayBody {
    id: String,
    #[serde(rename = "type")]
    sign_type: String,
    title: String,
    level: i32,
    description: String,
    image_url: &'static str,
}

impl From<Sign> for DisplayBody {
    fn from(sign: Sign) -> Self {
        let shown = display(sign.level, &sign.sign_type);
        Self {
            id: sign.id,
            sign_type: sign.sign_type,
            title: shown.title,
            level: sign.level,
            description: shown.description,
            image_url: "",
        }
    }
}

async fn allocate(state: &AppState) -> Result<AllocationResult, AppError> {
    let db = require_db(state)?;
    let allocator = PoolAllocator::new(
        RetryPolicy::new(state.draw_config.max_attempts),
        state.rng.clone(),
    );
    allocator.allocate(db).await
}

/// `POST /draw`
pub async fn pool_draw(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let body = match allocate(&state).await? {
        AllocationResult::Allocated(sign) => PoolDrawResponse::Ok {
            sign: SignBody {
                id: sign.id,
                level: sign.level,
                sign_type: sign.sign_type,
                reward_code: sign.reward_code,
            },
        },
        AllocationResult::OutOfStock => PoolDrawResponse::OutOfStock,
    };
    Ok(HttpResponse::Ok().json(body))
}

/// `POST /api/draw` under the pool scheme
pub async fn pool_draw_display(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(match allocate(&state).await? {
        AllocationResult::Allocated(sign) => HttpResponse::Ok().json(DisplayBody::from(sign)),
        AllocationResult::OutOfStock => HttpResponse::Ok().json(PoolDrawResponse::OutOfStock),
    })
}

/// `POST /api/draw` under the rounds scheme
pub async fn round_draw(
    state: web::Data<AppState>,
    guest_id: GuestId,
) -> Result<HttpResponse, AppError> {
    Span::current().record("guest_id", guest_id.as_str());

    let db = require_db(&state)?;
    let orchestrator = DrawOrchestrator::new(state.draw_config.clone(), state.rng.clone());
    let result = orchestrator.draw(db, guest_id.as_str()).await?;
    Ok(HttpResponse::Ok().json(result))
}
