//! Effective balance projection: replay declared step effects without executing.

use crate::domain::{Decimal, LendAction, Node, NodeData, NodeId, TokenBalance};
use crate::graph::FlowGraph;
use std::collections::{BTreeMap, HashSet};

/// Running per-asset balances keyed by symbol.
///
/// Symbols from the base set keep their original casing; references from
/// steps are resolved case-insensitively against them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSheet {
    base_order: Vec<String>,
    amounts: BTreeMap<String, Decimal>,
}

impl BalanceSheet {
    /// Seed the sheet from `base`.
    ///
    /// A symbol listed more than once is kept at its first position with the
    /// last listed value, so it is reported once.
    pub fn from_base(base: &[TokenBalance]) -> Self {
        let mut sheet = BalanceSheet::default();
        for entry in base {
            if !sheet.amounts.contains_key(&entry.symbol) {
                sheet.base_order.push(entry.symbol.clone());
            }
            sheet
                .amounts
                .insert(entry.symbol.clone(), Decimal::parse_or_zero(&entry.balance));
        }
        sheet
    }

    /// Resolve a step's symbol to the base casing, falling back to the literal.
    fn resolve(&self, symbol: &str) -> String {
        self.base_order
            .iter()
            .find(|s| s.eq_ignore_ascii_case(symbol))
            .cloned()
            .unwrap_or_else(|| symbol.to_string())
    }

    pub fn get(&self, symbol: &str) -> Decimal {
        self.amounts
            .get(&self.resolve(symbol))
            .copied()
            .unwrap_or_default()
    }

    fn debit(&mut self, symbol: &str, amount: Decimal) {
        let key = self.resolve(symbol);
        let entry = self.amounts.entry(key).or_default();
        *entry = entry.sub_floored(amount);
    }

    fn credit(&mut self, symbol: &str, amount: Decimal) {
        let key = self.resolve(symbol);
        let entry = self.amounts.entry(key).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Apply one step's declared effect.
    pub fn apply(&mut self, node: &Node) {
        match &node.data {
            NodeData::Swap {
                from_asset,
                to_asset,
                amount_in,
                amount_out,
                ..
            } => {
                self.debit(from_asset, Decimal::parse_or_zero(amount_in));
                self.credit(to_asset, Decimal::parse_or_zero(amount_out));
            }
            NodeData::Transfer { asset, amount, .. } => {
                self.debit(asset, Decimal::parse_or_zero(amount));
            }
            NodeData::Lend {
                asset,
                amount,
                action,
                ..
            } => {
                let amount = Decimal::parse_or_zero(amount);
                match action.unwrap_or_default() {
                    LendAction::Deposit | LendAction::Repay => self.debit(asset, amount),
                    LendAction::Withdraw | LendAction::Borrow => self.credit(asset, amount),
                }
            }
            NodeData::Stake { .. }
            | NodeData::Custom { .. }
            | NodeData::Logic(_)
            | NodeData::Wallet { .. }
            | NodeData::Selector { .. } => {}
        }
    }

    /// Formatted balances for the base symbols only, in base order.
    pub fn to_token_balances(&self) -> Vec<TokenBalance> {
        self.base_order
            .iter()
            .map(|symbol| {
                let value = self.amounts.get(symbol).copied().unwrap_or_default();
                TokenBalance::new(symbol.clone(), value.to_balance_string())
            })
            .collect()
    }
}

/// Executable nodes upstream of `target`, unordered.
///
/// Wallet and selector nodes are transparent: traversal walks through them
/// without collecting them. A node is only collected when it has at least one
/// incoming edge, i.e. it is wired into the flow.
pub fn collect_predecessors<'g>(graph: &'g FlowGraph, target: &NodeId) -> Vec<&'g Node> {
    let mut found = Vec::new();
    let mut visited: HashSet<&NodeId> = HashSet::new();
    visited.insert(target);
    let mut stack: Vec<&NodeId> = graph.incoming(target).map(|e| &e.source).collect();

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(node) = graph.node(id) else {
            continue;
        };
        if node.kind().is_executable() && graph.has_incoming(id) {
            found.push(node);
        }
        stack.extend(
            graph
                .incoming(id)
                .map(|e| &e.source)
                .filter(|s| !visited.contains(s)),
        );
    }

    found
}

/// Project balances available to `target` by replaying its predecessors in
/// rank order on top of `base`.
///
/// The output keeps exactly the symbols of `base`, in order.
pub fn project(
    graph: &FlowGraph,
    target: &NodeId,
    base: &[TokenBalance],
    ranks: &BTreeMap<NodeId, usize>,
) -> Vec<TokenBalance> {
    let mut predecessors = collect_predecessors(graph, target);
    predecessors.sort_by_key(|n| (ranks.get(&n.id).copied().unwrap_or(usize::MAX), n.id.clone()));

    let mut sheet = BalanceSheet::from_base(base);
    for node in predecessors {
        sheet.apply(node);
    }
    sheet.to_token_balances()
}
