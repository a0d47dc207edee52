use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{Address, Node};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub node: Node,
    #[serde(default)]
    pub owner: Option<Address>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub met: bool,
}

pub async fn post_evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let met = state
        .simulator
        .evaluator()
        .evaluate(&req.node, req.owner.as_ref())
        .await?;

    Ok(Json(EvaluateResponse { met }))
}
