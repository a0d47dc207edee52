use chainflow::config::CyclePolicy;
use chainflow::datasource::{AssetRegistry, ChainReadError, MockChainReader};
use chainflow::domain::{
    Address, ComparisonOperator, Condition, Edge, LogicData, Node, NodeData, NodeId, Position,
    TokenBalance,
};
use chainflow::orchestration::{SimulationError, StepStatus};
use chainflow::{FlowGraph, LogicEvaluator, SequenceError, Simulator};
use std::collections::BTreeSet;
use std::sync::Arc;

const OWNER: &str = "0x00000000000000000000000000000000000000000000000000000000000000aa";
const SUI: &str = "0x2::sui::SUI";

fn simulator(mock: MockChainReader, policy: CyclePolicy) -> Simulator {
    let evaluator = LogicEvaluator::new(
        Arc::new(mock),
        AssetRegistry::with_defaults(),
        Address::new("0x0"),
    );
    Simulator::new(evaluator, policy)
}

fn wallet() -> Node {
    Node::new(
        "wallet",
        Position::new(0.0, 0.0),
        NodeData::Wallet {
            address: Some(OWNER.into()),
        },
    )
}

fn balance_gate(id: &str, y: f64, at_least: &str) -> Node {
    Node::new(
        id,
        Position::new(0.0, y),
        NodeData::Logic(LogicData {
            condition: Condition::Balance {
                asset: "SUI".into(),
                address: None,
            },
            operator: ComparisonOperator::GreaterOrEqual,
            compare_value: at_least.into(),
        }),
    )
}

fn contract_gate(id: &str, y: f64) -> Node {
    Node::new(
        id,
        Position::new(0.0, y),
        NodeData::Logic(LogicData {
            condition: Condition::Contract {
                package: "0x5".into(),
                module: "pool".into(),
                function: "reserve".into(),
                arguments: "[]".into(),
            },
            operator: ComparisonOperator::GreaterThan,
            compare_value: "0".into(),
        }),
    )
}

fn transfer(id: &str, y: f64, amount: &str) -> Node {
    Node::new(
        id,
        Position::new(0.0, y),
        NodeData::Transfer {
            asset: "SUI".into(),
            amount: amount.into(),
            to_address: Some("0xbb".into()),
        },
    )
}

fn chain(nodes: Vec<Node>) -> FlowGraph {
    let edges = nodes
        .windows(2)
        .map(|pair| Edge::new(pair[0].id.as_str(), pair[1].id.as_str()))
        .collect();
    FlowGraph::new(nodes, edges)
}

fn base() -> Vec<TokenBalance> {
    vec![TokenBalance::new("SUI", "10")]
}

#[tokio::test]
async fn test_passing_gate_keeps_every_step() {
    let mock = MockChainReader::new().with_balance(OWNER, SUI, 5_000_000_000);
    let graph = chain(vec![
        wallet(),
        transfer("send", 100.0, "1"),
        balance_gate("gate", 200.0, "5"),
        transfer("after", 300.0, "2"),
    ]);

    let report = simulator(mock, CyclePolicy::Truncate)
        .simulate(&graph, None, &base())
        .await
        .unwrap();

    let statuses: Vec<StepStatus> = report.steps.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![StepStatus::Planned, StepStatus::Passed, StepStatus::Planned]
    );
    assert!(report.skipped_ranks.is_empty());
    assert_eq!(
        report.steps[2].projected_balances,
        Some(vec![TokenBalance::new("SUI", "9.00")])
    );
    assert_eq!(report.final_balances, vec![TokenBalance::new("SUI", "7.00")]);
}

#[tokio::test]
async fn test_failed_gate_skips_downstream_steps() {
    let mock = MockChainReader::new().with_balance(OWNER, SUI, 1_000_000_000);
    let graph = chain(vec![
        wallet(),
        transfer("send", 100.0, "1"),
        balance_gate("gate", 200.0, "5"),
        transfer("after", 300.0, "2"),
        transfer("last", 400.0, "3"),
    ]);

    let report = simulator(mock, CyclePolicy::Truncate)
        .simulate(&graph, None, &base())
        .await
        .unwrap();

    assert_eq!(report.steps[1].status, StepStatus::Failed);
    assert_eq!(report.steps[1].reason.as_deref(), Some("condition not met"));
    assert_eq!(report.skipped_ranks, BTreeSet::from([3, 4]));
    assert_eq!(report.steps[2].status, StepStatus::Skipped);
    assert_eq!(report.steps[3].status, StepStatus::Skipped);
    assert!(report.steps[3].projected_balances.is_none());
    assert_eq!(report.final_balances, vec![TokenBalance::new("SUI", "9.00")]);
}

#[tokio::test]
async fn test_unreadable_gate_counts_as_failed() {
    let mock = MockChainReader::new().with_call_error(
        "0x5::pool::reserve",
        ChainReadError::NetworkError("connection refused".into()),
    );
    let graph = chain(vec![
        wallet(),
        contract_gate("gate", 100.0),
        transfer("after", 200.0, "2"),
    ]);

    let report = simulator(mock, CyclePolicy::Truncate)
        .simulate(&graph, None, &base())
        .await
        .unwrap();

    assert_eq!(report.steps[0].status, StepStatus::Failed);
    let reason = report.steps[0].reason.clone().unwrap();
    assert!(reason.starts_with("gate:"), "unexpected reason {}", reason);
    assert_eq!(report.steps[1].status, StepStatus::Skipped);
    assert_eq!(report.final_balances, vec![TokenBalance::new("SUI", "10.00")]);
}

#[tokio::test]
async fn test_explicit_owner_overrides_wallet_address() {
    let other = "0x00000000000000000000000000000000000000000000000000000000000000cc";
    let mock = MockChainReader::new().with_balance(other, SUI, 9_000_000_000);
    let graph = chain(vec![
        wallet(),
        balance_gate("gate", 100.0, "5"),
        transfer("after", 200.0, "1"),
    ]);

    let owner = Address::new(other);
    let report = simulator(mock, CyclePolicy::Truncate)
        .simulate(&graph, Some(&owner), &base())
        .await
        .unwrap();

    assert_eq!(report.steps[0].status, StepStatus::Passed);
    assert_eq!(report.steps[1].status, StepStatus::Planned);
}

#[tokio::test]
async fn test_extreme_amounts_produce_a_report() {
    let max = "79228162514264337593543950335";
    let mock = MockChainReader::new().with_balance(OWNER, SUI, 1_000_000_000);
    let mut gate = balance_gate("gate", 200.0, "0");
    if let NodeData::Logic(logic) = &mut gate.data {
        logic.operator = ComparisonOperator::ApproximatelyEqual;
        logic.compare_value = format!("-{}", max);
    }
    let swap = Node::new(
        "swap",
        Position::new(0.0, 100.0),
        NodeData::Swap {
            from_asset: "SUI".into(),
            to_asset: "USDC".into(),
            amount_in: "1".into(),
            amount_out: max.into(),
            protocol: None,
        },
    );
    let graph = chain(vec![wallet(), swap, gate, transfer("after", 300.0, "1")]);
    let base = vec![TokenBalance::new("SUI", "10"), TokenBalance::new("USDC", max)];

    let report = simulator(mock, CyclePolicy::Truncate)
        .simulate(&graph, None, &base)
        .await
        .unwrap();

    assert_eq!(report.steps[1].status, StepStatus::Failed);
    assert_eq!(report.steps[2].status, StepStatus::Skipped);
    assert_eq!(
        report.final_balances,
        vec![
            TokenBalance::new("SUI", "9.00"),
            TokenBalance::new("USDC", format!("{}.00", max)),
        ]
    );
}

fn cyclic_graph() -> FlowGraph {
    FlowGraph::new(
        vec![
            wallet(),
            transfer("a", 100.0, "1"),
            transfer("b", 200.0, "1"),
            transfer("c", 300.0, "1"),
        ],
        vec![
            Edge::new("wallet", "a"),
            Edge::new("b", "c"),
            Edge::new("c", "b"),
        ],
    )
}

#[tokio::test]
async fn test_cycle_is_withheld_under_truncate() {
    let report = simulator(MockChainReader::new(), CyclePolicy::Truncate)
        .simulate(&cyclic_graph(), None, &base())
        .await
        .unwrap();

    assert_eq!(report.steps.len(), 1);
    assert_eq!(report.steps[0].node_id, NodeId::new("a"));
    assert_eq!(
        report.cyclic_node_ids,
        vec![NodeId::new("b"), NodeId::new("c")]
    );
}

#[tokio::test]
async fn test_cycle_is_rejected_under_reject() {
    let err = simulator(MockChainReader::new(), CyclePolicy::Reject)
        .simulate(&cyclic_graph(), None, &base())
        .await
        .unwrap_err();

    match err {
        SimulationError::Sequence(SequenceError::CycleDetected { node_ids }) => {
            assert_eq!(node_ids, vec![NodeId::new("b"), NodeId::new("c")]);
        }
    }
}

#[tokio::test]
async fn test_graph_without_wallet_has_no_steps() {
    let graph = FlowGraph::new(
        vec![transfer("a", 0.0, "1"), transfer("b", 100.0, "1")],
        vec![Edge::new("a", "b")],
    );

    let report = simulator(MockChainReader::new(), CyclePolicy::Reject)
        .simulate(&graph, None, &base())
        .await
        .unwrap();

    assert!(report.steps.is_empty());
    assert_eq!(report.final_balances, vec![TokenBalance::new("SUI", "10.00")]);
}
