//! Token balances as exchanged with the UI.

use serde::{Deserialize, Serialize};

/// An asset symbol paired with a decimal-string balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub balance: String,
}

impl TokenBalance {
    pub fn new(symbol: impl Into<String>, balance: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            balance: balance.into(),
        }
    }
}
