pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod orchestration;

pub use config::{Config, CyclePolicy};
pub use datasource::{
    AssetInfo, AssetRegistry, ChainReadError, ChainReader, GatewayChainReader, MockChainReader,
};
pub use domain::{
    Address, ComparisonOperator, Condition, Decimal, Edge, LendAction, LogicData, Node, NodeData,
    NodeId, NodeKind, Position, TokenBalance,
};
pub use engine::{compute_sequence, mark_downstream, project, Sequence, SequenceError};
pub use error::AppError;
pub use evaluator::{EvaluationError, LogicEvaluator};
pub use graph::FlowGraph;
pub use orchestration::{SimulationReport, Simulator, StepStatus};
