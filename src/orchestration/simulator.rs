use crate::config::CyclePolicy;
use crate::domain::{Address, Node, NodeId, NodeKind, TokenBalance};
use crate::engine::{compute_sequence, mark_downstream, project, BalanceSheet, SequenceError};
use crate::evaluator::{EvaluationError, LogicEvaluator};
use crate::graph::FlowGraph;
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Would be submitted.
    Planned,
    /// Logic gate whose condition held.
    Passed,
    /// Logic gate whose condition did not hold or could not be read.
    Failed,
    /// Bypassed because an upstream gate failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub rank: usize,
    pub node_id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Balances available when the step runs; absent for skipped steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_balances: Option<Vec<TokenBalance>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub steps: Vec<StepReport>,
    pub skipped_ranks: BTreeSet<usize>,
    pub cyclic_node_ids: Vec<NodeId>,
    /// Base balances after every non-skipped step has been applied.
    pub final_balances: Vec<TokenBalance>,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

/// Dry run of a flow: orders steps, evaluates gates, marks skips and previews
/// balances. Nothing is ever submitted.
#[derive(Debug, Clone)]
pub struct Simulator {
    evaluator: LogicEvaluator,
    cycle_policy: CyclePolicy,
}

impl Simulator {
    pub fn new(evaluator: LogicEvaluator, cycle_policy: CyclePolicy) -> Self {
        Self {
            evaluator,
            cycle_policy,
        }
    }

    pub fn evaluator(&self) -> &LogicEvaluator {
        &self.evaluator
    }

    /// Simulate `graph` for `owner` starting from `base` balances.
    ///
    /// `owner` falls back to the wallet node's address.
    pub async fn simulate(
        &self,
        graph: &FlowGraph,
        owner: Option<&Address>,
        base: &[TokenBalance],
    ) -> Result<SimulationReport, SimulationError> {
        let mut sequence = compute_sequence(graph);
        if !sequence.is_complete() {
            if self.cycle_policy == CyclePolicy::Reject {
                sequence = sequence.into_acyclic()?;
            } else {
                warn!(
                    withheld = sequence.cyclic.len(),
                    "Cycle in flow graph, withholding affected steps"
                );
            }
        }

        let wallet_owner = graph.wallet_address().map(Address::new);
        let owner = owner.or(wallet_owner.as_ref());

        // Gates are independent reads; evaluate them all before walking the order.
        let gates: Vec<(usize, &Node)> = sequence
            .steps
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind() == NodeKind::Logic)
            .map(|(i, n)| (i + 1, n))
            .collect();
        let outcomes = join_all(
            gates
                .iter()
                .map(|(_, node)| self.evaluator.evaluate(node, owner)),
        )
        .await;
        let mut outcomes: HashMap<usize, Result<bool, EvaluationError>> = gates
            .iter()
            .map(|(rank, _)| *rank)
            .zip(outcomes)
            .collect();

        let mut skipped: BTreeSet<usize> = BTreeSet::new();
        let mut steps = Vec::with_capacity(sequence.len());
        let mut sheet = BalanceSheet::from_base(base);

        for (i, node) in sequence.steps.iter().enumerate() {
            let rank = i + 1;
            let mut report = StepReport {
                rank,
                node_id: node.id.clone(),
                label: node.step_label().to_string(),
                kind: node.kind(),
                status: StepStatus::Planned,
                reason: None,
                projected_balances: None,
            };

            if skipped.contains(&rank) {
                report.status = StepStatus::Skipped;
                report.reason = Some("upstream condition failed".to_string());
                steps.push(report);
                continue;
            }

            report.projected_balances = Some(project(graph, &node.id, base, &sequence.ranks));
            sheet.apply(node);

            if let Some(outcome) = outcomes.remove(&rank) {
                let failure = match outcome {
                    Ok(true) => None,
                    Ok(false) => Some("condition not met".to_string()),
                    Err(e) => Some(e.to_string()),
                };
                match failure {
                    None => report.status = StepStatus::Passed,
                    Some(reason) => {
                        let downstream = mark_downstream(&node.id, rank, &sequence, graph);
                        info!(
                            step = %report.label,
                            reason = %reason,
                            skipped = downstream.len(),
                            "Logic gate failed"
                        );
                        skipped.extend(downstream);
                        report.status = StepStatus::Failed;
                        report.reason = Some(reason);
                    }
                }
            }

            steps.push(report);
        }

        info!(
            steps = steps.len(),
            skipped = skipped.len(),
            "Simulation complete"
        );

        Ok(SimulationReport {
            steps,
            skipped_ranks: skipped,
            cyclic_node_ids: sequence.cyclic,
            final_balances: sheet.to_token_balances(),
        })
    }
}
