//! Bitcoin Core RPC abstraction layer.
//!
//! Defines the [`NodeRpc`] trait and provides an HTTP JSON-RPC
//! implementation ([`HttpRpcClient`]) plus a test mock (`mock::MockRpc`).

mod http_adapter;
#[cfg(test)]
pub mod mock;

pub use crate::types::ChainInfo;
pub use http_adapter::HttpRpcClient;

use async_trait::async_trait;
use bitcoin::{Address, Amount, Txid};

use crate::error::CoreError;
use crate::types::{
    AmountMap, BlockHeight, SignedTransaction, TransactionInput, UnspentOutput, WalletTransaction,
};

/// The Bitcoin Core RPC methods coinrelay consumes.
///
/// Implementations handle authentication, connection management, and
/// response decoding internally. Node-side failures are returned unchanged;
/// nothing is retried.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Height of the most-work fully validated chain.
    async fn get_block_count(&self) -> Result<BlockHeight, CoreError>;

    /// Wallet balance. `"*"` selects every account.
    async fn get_balance(&self, account: &str) -> Result<Amount, CoreError>;

    /// Unspent outputs of the node's wallet, in the order the node returns them.
    async fn list_unspent(&self) -> Result<Vec<UnspentOutput>, CoreError>;

    /// Assemble an unsigned transaction and return its hex encoding.
    async fn create_raw_transaction(
        &self,
        inputs: &[TransactionInput],
        outputs: &AmountMap,
        lock_time: u32,
    ) -> Result<String, CoreError>;

    /// Sign a raw transaction with the node's wallet keys.
    async fn sign_raw_transaction(&self, tx_hex: &str) -> Result<SignedTransaction, CoreError>;

    /// Broadcast a signed transaction. `allow_high_fees` lifts the node's
    /// fee-rate sanity cap.
    async fn send_raw_transaction(
        &self,
        tx_hex: &str,
        allow_high_fees: bool,
    ) -> Result<Txid, CoreError>;

    /// Look up a wallet transaction by id.
    async fn get_transaction(&self, txid: &Txid) -> Result<WalletTransaction, CoreError>;

    /// Let the node's wallet fund, sign and broadcast a payment in one call.
    async fn send_to_address(&self, address: &Address, amount: Amount)
        -> Result<Txid, CoreError>;

    /// Fetch basic chain info (network, block count, pruning status).
    async fn get_blockchain_info(&self) -> Result<ChainInfo, CoreError>;
}
