use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{sequence::sequence_for, AppState};
use crate::domain::{Edge, Node, NodeId, TokenBalance};
use crate::engine::project;
use crate::error::AppError;
use crate::graph::FlowGraph;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    pub target_node_id: NodeId,
    #[serde(default)]
    pub base_balances: Vec<TokenBalance>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub balances: Vec<TokenBalance>,
}

pub async fn post_project(
    State(state): State<AppState>,
    Json(req): Json<ProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let graph = FlowGraph::new(req.nodes, req.edges);
    if graph.node(&req.target_node_id).is_none() {
        return Err(AppError::BadRequest(format!(
            "unknown targetNodeId {}",
            req.target_node_id
        )));
    }

    let sequence = sequence_for(&state, &graph)?;
    let balances = project(
        &graph,
        &req.target_node_id,
        &req.base_balances,
        &sequence.ranks,
    );

    Ok(Json(ProjectResponse { balances }))
}
