//! Chain-read abstraction used by logic gate evaluation.

use crate::domain::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod gateway;
pub mod mock;
pub mod registry;

pub use gateway::GatewayChainReader;
pub use mock::MockChainReader;
pub use registry::{AssetInfo, AssetRegistry, RegistryError};

/// Read-only access to chain state.
///
/// Implementations perform no retries: failures are returned to the caller as-is.
#[async_trait]
pub trait ChainReader: Send + Sync + fmt::Debug {
    /// Total raw balance of `coin_type` held by `owner`.
    ///
    /// # Arguments
    /// * `owner` - Account address
    /// * `coin_type` - Chain-level asset identifier (e.g. "0x2::sui::SUI")
    async fn fetch_balance(&self, owner: &Address, coin_type: &str)
        -> Result<u128, ChainReadError>;

    /// Run a read-only contract call on behalf of `sender` without committing
    /// any state.
    ///
    /// # Returns
    /// One entry per executed command, each holding its raw return values.
    async fn inspect_call(
        &self,
        sender: &Address,
        call: &MoveCall,
    ) -> Result<Vec<CallResult>, ChainReadError>;
}

/// A contract function invocation: `package::module::function(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    pub package: String,
    pub module: String,
    pub function: String,
    pub arguments: Vec<CallArg>,
}

impl MoveCall {
    /// `package::module::function`, used to key calls.
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CallArg {
    /// Reference to an on-chain object by id.
    Object(Address),
    /// Pure unsigned 64-bit literal.
    U64(u64),
}

/// Raw return values of one executed command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    pub return_values: Vec<Vec<u8>>,
}

/// Error type for chain-read operations.
#[derive(Debug, Clone)]
pub enum ChainReadError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// Non-success HTTP status from the read gateway
    HttpError { status: u16, message: String },
    /// JSON-RPC level error reported by the node
    RpcError { code: i64, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
}

impl fmt::Display for ChainReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainReadError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ChainReadError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            ChainReadError::RpcError { code, message } => {
                write!(f, "RPC error {}: {}", code, message)
            }
            ChainReadError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ChainReadError {}
