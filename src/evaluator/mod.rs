//! Logic gate evaluation against live chain state.
//!
//! The comparison itself is pure (`ComparisonOperator::compare`); this
//! module only gathers the value to compare through a [`ChainReader`].

use crate::datasource::{AssetRegistry, ChainReadError, ChainReader, MoveCall};
use crate::domain::{Address, Condition, Decimal, LogicData, Node, NodeData};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub mod args;

pub use args::{decode_u64_le, parse_call_args, ArgumentError};

/// Failures while evaluating a logic gate. Every variant names the step.
///
/// Callers treat any of these as "condition not met".
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("{step}: invalid contract arguments: {source}")]
    InvalidArguments {
        step: String,
        #[source]
        source: ArgumentError,
    },
    #[error("{step}: invalid compare value {value:?}")]
    InvalidThreshold { step: String, value: String },
    #[error("{step}: asset {symbol} is not in the asset registry")]
    MissingAsset { step: String, symbol: String },
    #[error("{step}: chain read failed: {source}")]
    ExternalReadFailed {
        step: String,
        #[source]
        source: ChainReadError,
    },
    #[error("{step}: balance {raw} does not fit a decimal with {decimals} places")]
    AmountOverflow {
        step: String,
        raw: u128,
        decimals: u32,
    },
    #[error("{step}: contract call returned no value")]
    NoReturnValue { step: String },
    #[error("{step}: no owner address to read a balance for")]
    MissingOwner { step: String },
    #[error("{step}: not a logic node")]
    NotALogicNode { step: String },
}

/// Evaluates logic nodes. Holds no mutable state, so one instance may serve
/// concurrent evaluations.
#[derive(Debug, Clone)]
pub struct LogicEvaluator {
    reader: Arc<dyn ChainReader>,
    registry: AssetRegistry,
    sender: Address,
}

impl LogicEvaluator {
    /// `sender` is the no-op caller identity used for read-only calls.
    pub fn new(reader: Arc<dyn ChainReader>, registry: AssetRegistry, sender: Address) -> Self {
        Self {
            reader,
            registry,
            sender,
        }
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Evaluate `node`'s condition. `owner` is the balance address used when
    /// the condition does not name one.
    pub async fn evaluate(
        &self,
        node: &Node,
        owner: Option<&Address>,
    ) -> Result<bool, EvaluationError> {
        let step = node.step_label().to_string();
        let NodeData::Logic(logic) = &node.data else {
            return Err(EvaluationError::NotALogicNode { step });
        };

        let threshold = Decimal::from_str_canonical(&logic.compare_value).map_err(|_| {
            EvaluationError::InvalidThreshold {
                step: step.clone(),
                value: logic.compare_value.clone(),
            }
        })?;

        let actual = self.read_value(&step, logic, owner).await?;
        let met = logic.operator.compare(actual, threshold);

        debug!(
            step = %step,
            actual = %actual,
            operator = %logic.operator,
            threshold = %threshold,
            met,
            "Logic condition evaluated"
        );
        Ok(met)
    }

    async fn read_value(
        &self,
        step: &str,
        logic: &LogicData,
        owner: Option<&Address>,
    ) -> Result<Decimal, EvaluationError> {
        match &logic.condition {
            Condition::Balance { asset, address } => {
                let address = match address.as_deref().filter(|a| !a.trim().is_empty()) {
                    Some(a) => Address::new(a),
                    None => owner.cloned().ok_or_else(|| EvaluationError::MissingOwner {
                        step: step.to_string(),
                    })?,
                };
                self.read_balance(step, asset, &address).await
            }
            Condition::Contract {
                package,
                module,
                function,
                arguments,
            } => {
                let arguments = parse_call_args(arguments).map_err(|source| {
                    EvaluationError::InvalidArguments {
                        step: step.to_string(),
                        source,
                    }
                })?;
                let call = MoveCall {
                    package: package.clone(),
                    module: module.clone(),
                    function: function.clone(),
                    arguments,
                };
                self.read_contract(step, &call).await.map(Decimal::from)
            }
        }
    }

    async fn read_balance(
        &self,
        step: &str,
        symbol: &str,
        address: &Address,
    ) -> Result<Decimal, EvaluationError> {
        let asset = self
            .registry
            .get(symbol)
            .ok_or_else(|| EvaluationError::MissingAsset {
                step: step.to_string(),
                symbol: symbol.to_string(),
            })?;

        let raw = self
            .reader
            .fetch_balance(address, &asset.coin_type)
            .await
            .map_err(|source| {
                warn!(step, error = %source, "Balance read failed");
                EvaluationError::ExternalReadFailed {
                    step: step.to_string(),
                    source,
                }
            })?;

        Decimal::from_raw(raw, asset.decimals).ok_or_else(|| EvaluationError::AmountOverflow {
            step: step.to_string(),
            raw,
            decimals: asset.decimals,
        })
    }

    async fn read_contract(&self, step: &str, call: &MoveCall) -> Result<u64, EvaluationError> {
        let results = self
            .reader
            .inspect_call(&self.sender, call)
            .await
            .map_err(|source| {
                warn!(step, target = %call.target(), error = %source, "Contract read failed");
                EvaluationError::ExternalReadFailed {
                    step: step.to_string(),
                    source,
                }
            })?;

        let bytes = results
            .first()
            .and_then(|r| r.return_values.first())
            .filter(|b| !b.is_empty())
            .ok_or_else(|| EvaluationError::NoReturnValue {
                step: step.to_string(),
            })?;

        Ok(decode_u64_le(bytes))
    }
}
