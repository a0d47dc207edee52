//! Graph nodes and edges as delivered by the editing surface.

use crate::domain::{ComparisonOperator, NodeId, Position};
use serde::{Deserialize, Serialize};

/// A single operation on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub position: Position,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Position, data: NodeData) -> Self {
        Self {
            id: NodeId::new(id),
            label: None,
            position,
            data,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Human-readable step label: the explicit label, else the id.
    pub fn step_label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Directed dependency from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: NodeId::new(source),
            target: NodeId::new(target),
        }
    }
}

/// Fieldless tag of a node's variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Wallet,
    Selector,
    Transfer,
    Swap,
    Lend,
    Stake,
    Logic,
    Custom,
}

impl NodeKind {
    /// Wallet and selector nodes give context to a flow but are never executed.
    pub fn is_executable(&self) -> bool {
        !matches!(self, NodeKind::Wallet | NodeKind::Selector)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LendAction {
    #[default]
    Deposit,
    Withdraw,
    Borrow,
    Repay,
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeData {
    Wallet {
        #[serde(default)]
        address: Option<String>,
    },
    Selector {
        #[serde(default)]
        asset: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Transfer {
        asset: String,
        amount: String,
        #[serde(default)]
        to_address: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Swap {
        from_asset: String,
        to_asset: String,
        amount_in: String,
        #[serde(default)]
        amount_out: String,
        #[serde(default)]
        protocol: Option<String>,
    },
    Lend {
        asset: String,
        amount: String,
        #[serde(default)]
        action: Option<LendAction>,
        #[serde(default)]
        protocol: Option<String>,
    },
    Stake {
        asset: String,
        amount: String,
        #[serde(default)]
        protocol: Option<String>,
    },
    Logic(LogicData),
    Custom {
        package: String,
        module: String,
        function: String,
        #[serde(default)]
        arguments: Option<String>,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Wallet { .. } => NodeKind::Wallet,
            NodeData::Selector { .. } => NodeKind::Selector,
            NodeData::Transfer { .. } => NodeKind::Transfer,
            NodeData::Swap { .. } => NodeKind::Swap,
            NodeData::Lend { .. } => NodeKind::Lend,
            NodeData::Stake { .. } => NodeKind::Stake,
            NodeData::Logic(_) => NodeKind::Logic,
            NodeData::Custom { .. } => NodeKind::Custom,
        }
    }
}

/// A conditional gate: `<condition value> <operator> <compare_value>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicData {
    pub condition: Condition,
    pub operator: ComparisonOperator,
    pub compare_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Condition {
    /// Balance of `asset` held by `address` (the run's owner when absent).
    Balance {
        asset: String,
        #[serde(default)]
        address: Option<String>,
    },
    /// Read-only contract function returning an unsigned integer.
    Contract {
        package: String,
        module: String,
        function: String,
        /// JSON array of call arguments.
        #[serde(default)]
        arguments: String,
    },
}
