use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::{Address, Edge, Node, TokenBalance};
use crate::error::AppError;
use crate::graph::FlowGraph;
use crate::orchestration::SimulationReport;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub owner: Option<Address>,
    #[serde(default)]
    pub base_balances: Vec<TokenBalance>,
}

pub async fn post_simulate(
    State(state): State<AppState>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulationReport>, AppError> {
    let graph = FlowGraph::new(req.nodes, req.edges);
    let report = state
        .simulator
        .simulate(&graph, req.owner.as_ref(), &req.base_balances)
        .await?;

    Ok(Json(report))
}
