use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::config::CyclePolicy;
use crate::domain::{Edge, Node, NodeId, NodeKind};
use crate::engine::{compute_sequence, ids_for_ranks, mark_downstream, Sequence};
use crate::error::AppError;
use crate::graph::FlowGraph;

/// Sequence `graph`, rejecting partial orders when the service is configured to.
pub(crate) fn sequence_for(
    state: &AppState,
    graph: &FlowGraph,
) -> Result<Sequence, AppError> {
    let sequence = compute_sequence(graph);
    match state.config.cycle_policy {
        CyclePolicy::Reject => Ok(sequence.into_acyclic()?),
        CyclePolicy::Truncate => Ok(sequence),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceRequest {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceResponse {
    pub steps: Vec<StepDto>,
    pub cyclic_node_ids: Vec<NodeId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDto {
    pub rank: usize,
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

pub async fn post_sequence(
    State(state): State<AppState>,
    Json(req): Json<SequenceRequest>,
) -> Result<Json<SequenceResponse>, AppError> {
    let graph = FlowGraph::new(req.nodes, req.edges);
    let sequence = sequence_for(&state, &graph)?;

    let steps = sequence
        .steps
        .iter()
        .enumerate()
        .map(|(i, n)| StepDto {
            rank: i + 1,
            id: n.id.clone(),
            kind: n.kind(),
        })
        .collect();

    Ok(Json(SequenceResponse {
        steps,
        cyclic_node_ids: sequence.cyclic,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipsRequest {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    pub failed_node_id: NodeId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipsResponse {
    pub skipped_ranks: Vec<usize>,
    pub skipped_node_ids: Vec<NodeId>,
}

pub async fn post_skips(
    State(state): State<AppState>,
    Json(req): Json<SkipsRequest>,
) -> Result<Json<SkipsResponse>, AppError> {
    let graph = FlowGraph::new(req.nodes, req.edges);
    let sequence = sequence_for(&state, &graph)?;

    let rank = sequence.rank_of(&req.failed_node_id).ok_or_else(|| {
        AppError::BadRequest(format!(
            "failedNodeId {} is not a sequenced step",
            req.failed_node_id
        ))
    })?;

    let skipped = mark_downstream(&req.failed_node_id, rank, &sequence, &graph);
    let skipped_node_ids = ids_for_ranks(&skipped, &sequence);

    Ok(Json(SkipsResponse {
        skipped_ranks: skipped.into_iter().collect(),
        skipped_node_ids,
    }))
}
