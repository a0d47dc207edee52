//! Mock chain reader for testing without network calls.

use super::{CallResult, ChainReadError, ChainReader, MoveCall};
use crate::domain::Address;
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock chain reader that returns predefined balances and call results.
///
/// Unknown balances read as zero; unknown call targets fail like an RPC
/// "function not found".
#[derive(Debug, Clone, Default)]
pub struct MockChainReader {
    balances: HashMap<(String, String), u128>,
    calls: HashMap<String, Result<Vec<CallResult>, ChainReadError>>,
    failing_balances: bool,
}

impl MockChainReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw balance of `coin_type` for `owner`.
    pub fn with_balance(mut self, owner: &str, coin_type: &str, raw: u128) -> Self {
        self.balances
            .insert((owner.to_string(), coin_type.to_string()), raw);
        self
    }

    /// Make every balance read fail with a network error.
    pub fn with_failing_balances(mut self) -> Self {
        self.failing_balances = true;
        self
    }

    /// Return `value` as the single little-endian return value of `target`.
    pub fn with_call_u64(self, target: &str, value: u64) -> Self {
        self.with_call_results(
            target,
            vec![CallResult {
                return_values: vec![value.to_le_bytes().to_vec()],
            }],
        )
    }

    /// Return exactly `results` for `target`.
    pub fn with_call_results(mut self, target: &str, results: Vec<CallResult>) -> Self {
        self.calls.insert(target.to_string(), Ok(results));
        self
    }

    /// Fail calls to `target` with `error`.
    pub fn with_call_error(mut self, target: &str, error: ChainReadError) -> Self {
        self.calls.insert(target.to_string(), Err(error));
        self
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn fetch_balance(
        &self,
        owner: &Address,
        coin_type: &str,
    ) -> Result<u128, ChainReadError> {
        if self.failing_balances {
            return Err(ChainReadError::NetworkError("mock balance failure".into()));
        }
        Ok(self
            .balances
            .get(&(owner.as_str().to_string(), coin_type.to_string()))
            .copied()
            .unwrap_or(0))
    }

    async fn inspect_call(
        &self,
        _sender: &Address,
        call: &MoveCall,
    ) -> Result<Vec<CallResult>, ChainReadError> {
        let target = call.target();
        match self.calls.get(&target) {
            Some(result) => result.clone(),
            None => Err(ChainReadError::RpcError {
                code: -32000,
                message: format!("function {} not found", target),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(target_fn: &str) -> MoveCall {
        MoveCall {
            package: "0x1".into(),
            module: "m".into(),
            function: target_fn.into(),
            arguments: vec![],
        }
    }

    #[tokio::test]
    async fn test_mock_balance_lookup() {
        let mock = MockChainReader::new().with_balance("0xa", "0x2::sui::SUI", 5);
        let owner = Address::new("0xa");
        assert_eq!(mock.fetch_balance(&owner, "0x2::sui::SUI").await.unwrap(), 5);
        assert_eq!(mock.fetch_balance(&owner, "other").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mock_call_u64_is_little_endian() {
        let mock = MockChainReader::new().with_call_u64("0x1::m::f", 258);
        let results = mock.inspect_call(&Address::new("0x0"), &call("f")).await.unwrap();
        assert_eq!(results[0].return_values[0][..2], [2, 1]);
    }

    #[test]
    fn test_mock_unknown_call_fails() {
        let mock = MockChainReader::new();
        let err = tokio_test::block_on(mock.inspect_call(&Address::new("0x0"), &call("missing")))
            .unwrap_err();
        assert!(err.to_string().contains("0x1::m::missing"));
    }

    #[test]
    fn test_mock_failing_balances() {
        let mock = MockChainReader::new()
            .with_balance("0xa", "0x2::sui::SUI", 5)
            .with_failing_balances();
        let result = tokio_test::block_on(mock.fetch_balance(&Address::new("0xa"), "0x2::sui::SUI"));
        assert!(matches!(result, Err(ChainReadError::NetworkError(_))));
    }
}
