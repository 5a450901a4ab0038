pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;
pub mod validation;

use axum::{routing::get, Router};
use chrono::FixedOffset;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::opportunity_service::OpportunityService;
use crate::utils::time::{Clock, SystemClock};
use crate::validation::OpportunityValidator;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub local_offset: FixedOffset,
    pub opportunity_service: OpportunityService,
    pub validator: OpportunityValidator,
}

impl AppState {
    pub fn new(pool: PgPool, local_offset: FixedOffset) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock::new(local_offset)))
    }

    /// The clock's offset is used for rendering timestamps as well.
    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        let local_offset = *clock.now().offset();
        let opportunity_service = OpportunityService::new(pool.clone());
        let validator = OpportunityValidator::new(clock);

        Self {
            pool,
            local_offset,
            opportunity_service,
            validator,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/opportunities",
            get(routes::opportunity::list_opportunities)
                .post(routes::opportunity::create_opportunity),
        )
        .route(
            "/api/opportunities/statuses",
            get(routes::opportunity::list_statuses),
        )
        .route(
            "/api/opportunities/:id",
            get(routes::opportunity::get_opportunity)
                .put(routes::opportunity::update_opportunity)
                .delete(routes::opportunity::delete_opportunity),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
