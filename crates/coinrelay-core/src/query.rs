//! Read-only pass-throughs to the node, plus the wallet-funded one-step send.
//!
//! Each call forwards to the node and returns its error unchanged.

use bitcoin::{Amount, Network, SignedAmount, Txid};
use tracing::info;

use crate::error::CoreError;
use crate::rpc::NodeRpc;
use crate::transfer::{parse_address, positive_amount};
use crate::types::{BlockHeight, WalletTransaction};

/// Account selector that covers every account of the node's wallet.
pub const ALL_ACCOUNTS: &str = "*";

pub async fn block_count(rpc: &dyn NodeRpc) -> Result<BlockHeight, CoreError> {
    let height = rpc.get_block_count().await?;
    info!(%height, "highest block number");
    Ok(height)
}

pub async fn balance(rpc: &dyn NodeRpc, account: &str) -> Result<Amount, CoreError> {
    let balance = rpc.get_balance(account).await?;
    info!(account, %balance, "wallet balance");
    Ok(balance)
}

/// Parse `txid` and fetch the matching wallet transaction.
pub async fn query_transaction(
    rpc: &dyn NodeRpc,
    txid: &str,
) -> Result<WalletTransaction, CoreError> {
    let parsed = txid
        .trim()
        .parse::<Txid>()
        .map_err(|e| CoreError::InvalidTxid {
            txid: txid.to_owned(),
            reason: e.to_string(),
        })?;

    let tx = rpc.get_transaction(&parsed).await?;
    let rendered = serde_json::to_string(&tx)
        .map_err(|e| CoreError::InvalidData(format!("encode transaction: {e}")))?;
    info!(txid = %tx.txid, confirmations = tx.confirmations, tx = %rendered, "wallet transaction");
    Ok(tx)
}

/// Pay `amount` to `to` from the node wallet, letting the node choose inputs
/// and fee.
pub async fn transfer_to(
    rpc: &dyn NodeRpc,
    network: Network,
    to: &str,
    amount: SignedAmount,
) -> Result<Txid, CoreError> {
    let amount = positive_amount(amount, "amount")?;
    let address = parse_address(to, network)?;
    let txid = rpc.send_to_address(&address, amount).await?;
    info!(%txid, %amount, to = %address, "sent to address");
    Ok(txid)
}
