pub mod balances;
pub mod conditions;
pub mod health;
pub mod sequence;
pub mod simulate;

use crate::config::Config;
use crate::orchestration::Simulator;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub simulator: Arc<Simulator>,
}

impl AppState {
    pub fn new(config: Config, simulator: Arc<Simulator>) -> Self {
        Self { config, simulator }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/sequence", post(sequence::post_sequence))
        .route("/v1/skips", post(sequence::post_skips))
        .route("/v1/balances/project", post(balances::post_project))
        .route("/v1/conditions/evaluate", post(conditions::post_evaluate))
        .route("/v1/simulate", post(simulate::post_simulate))
        .layer(cors)
        .with_state(state)
}
