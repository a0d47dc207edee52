//! Domain types for flow graphs.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: NodeId, Address, Position
//! - Node/edge snapshots with a tagged per-kind payload
//! - Comparison operators for logic gates

pub mod balance;
pub mod comparison;
pub mod decimal;
pub mod node;
pub mod primitives;

pub use balance::TokenBalance;
pub use comparison::ComparisonOperator;
pub use decimal::Decimal;
pub use node::{Condition, Edge, LendAction, LogicData, Node, NodeData, NodeKind};
pub use primitives::{Address, NodeId, Position};
