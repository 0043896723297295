//! Domain types shared by the selector, the transfer orchestrator and the
//! RPC layer.
//!
//! Everything here is transient: values are built from node responses,
//! passed along one call chain, and dropped when the round trip finishes.

use std::collections::BTreeMap;

use bitcoin::{Address, Amount, BlockHash, SignedAmount, Txid};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ==============================================================================
// Block Height
// ==============================================================================

/// A Bitcoin block height, wrapped for type safety.
///
/// `#[serde(transparent)]` keeps the JSON representation a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHeight(pub u32);

impl From<u32> for BlockHeight {
    fn from(h: u32) -> Self {
        Self(h)
    }
}

impl From<BlockHeight> for u32 {
    fn from(h: BlockHeight) -> Self {
        h.0
    }
}

impl std::ops::Deref for BlockHeight {
    type Target = u32;
    fn deref(&self) -> &u32 {
        &self.0
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ==============================================================================
// Unspent Outputs and Inputs
// ==============================================================================

/// One entry of the node's `listunspent` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnspentOutput {
    pub txid: Txid,
    pub vout: u32,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: Amount,
    pub spendable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub confirmations: u32,
}

/// A reference to an unspent output chosen for spending. Serializes to the
/// `{"txid": .., "vout": ..}` shape `createrawtransaction` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionInput {
    pub txid: Txid,
    pub vout: u32,
}

impl From<&UnspentOutput> for TransactionInput {
    fn from(utxo: &UnspentOutput) -> Self {
        Self {
            txid: utxo.txid,
            vout: utxo.vout,
        }
    }
}

/// Inputs chosen by the selector together with their exact summed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub inputs: Vec<TransactionInput>,
    pub total: Amount,
}

// ==============================================================================
// Amount Map
// ==============================================================================

/// Destination address to amount. Keys are unique; iteration order is the
/// sorted address string so serialized requests are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountMap(BTreeMap<String, Amount>);

impl AmountMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an output. Fails if the address already has an entry.
    pub fn insert(&mut self, address: &Address, amount: Amount) -> Result<(), CoreError> {
        let key = address.to_string();
        if self.0.contains_key(&key) {
            return Err(CoreError::InvalidTransfer(format!(
                "duplicate output address {key}"
            )));
        }
        self.0.insert(key, amount);
        Ok(())
    }

    pub fn get(&self, address: &Address) -> Option<Amount> {
        self.0.get(&address.to_string()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `{address: btc}` object `createrawtransaction` expects.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .map(|(addr, amount)| (addr.clone(), serde_json::json!(amount.to_btc())))
            .collect();
        serde_json::Value::Object(map)
    }
}

// ==============================================================================
// Transfers
// ==============================================================================

/// A request to move `amount` from `from` to `to`, paying `fee`.
///
/// Amounts are signed so that a non-positive request can be represented and
/// rejected before anything is sent to the node.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: SignedAmount,
    pub fee: SignedAmount,
}

/// The raw-transaction request derived from a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub inputs: Vec<TransactionInput>,
    pub outputs: AmountMap,
    pub change: Amount,
    pub lock_time: u32,
}

/// Result of asking the node to sign a raw transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub hex: String,
    pub complete: bool,
    /// Per-input error messages reported by the node, if any.
    pub errors: Vec<String>,
}

// ==============================================================================
// Node Views
// ==============================================================================

/// The subset of the node's `gettransaction` result this client reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletTransaction {
    pub txid: Txid,
    #[serde(with = "bitcoin::amount::serde::as_btc")]
    pub amount: SignedAmount,
    #[serde(with = "bitcoin::amount::serde::as_btc::opt")]
    pub fee: Option<SignedAmount>,
    pub confirmations: i64,
    pub block_hash: Option<BlockHash>,
    pub time: Option<u64>,
    pub hex: String,
}

/// Basic chain information from `getblockchaininfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainInfo {
    pub chain: String,
    pub blocks: u64,
    #[serde(rename = "bestblockhash")]
    pub best_block_hash: BlockHash,
    pub pruned: bool,
}

/// A freshly generated key pair with its address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub address: String,
    #[serde(rename = "privKey")]
    pub private_key: String,
}
