//! Transfer orchestration: select inputs, have the node build and sign a raw
//! transaction, then broadcast it.
//!
//! The node client is passed in explicitly. Two transfers run concurrently
//! against the same wallet are not coordinated and may select the same
//! outputs; callers must serialize them.

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Amount, Network, SignedAmount, Txid};
use tracing::{debug, error, info};

use crate::error::CoreError;
use crate::rpc::NodeRpc;
use crate::select::select_inputs;
use crate::types::{AmountMap, Selection, TransferPlan, TransferRequest};

/// Lock time used for every raw transaction built here.
pub const LOCK_TIME: u32 = 0;

/// Parse `address` and check it belongs to `network`.
pub fn parse_address(address: &str, network: Network) -> Result<Address, CoreError> {
    let invalid = |reason: String| CoreError::InvalidAddress {
        address: address.to_owned(),
        reason,
    };
    address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| invalid(e.to_string()))?
        .require_network(network)
        .map_err(|e| invalid(e.to_string()))
}

/// Convert a requested amount, rejecting zero and negative values.
pub fn positive_amount(value: SignedAmount, what: &str) -> Result<Amount, CoreError> {
    if value <= SignedAmount::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "{what} must be greater than zero, got {value}"
        )));
    }
    value
        .to_unsigned()
        .map_err(|e| CoreError::InvalidAmount(format!("{what}: {e}")))
}

/// Turn a selection into the raw-transaction request: `amount` to `to`, the
/// remainder after `fee` back to `from`. A zero change output is omitted.
pub fn plan_transfer(
    selection: Selection,
    from: &Address,
    to: &Address,
    amount: Amount,
    fee: Amount,
) -> Result<TransferPlan, CoreError> {
    let change = amount
        .checked_add(fee)
        .and_then(|spent| selection.total.checked_sub(spent))
        .ok_or(CoreError::InsufficientFunds {
            available: selection.total,
            required: amount.checked_add(fee).unwrap_or(Amount::MAX),
        })?;

    let mut outputs = AmountMap::new();
    outputs.insert(to, amount)?;
    if change > Amount::ZERO {
        outputs.insert(from, change)?;
    }

    Ok(TransferPlan {
        inputs: selection.inputs,
        outputs,
        change,
        lock_time: LOCK_TIME,
    })
}

/// Send `request.amount` from `request.from` to `request.to`, paying
/// `request.fee`, and return the broadcast transaction id.
///
/// Preconditions (positive amount and fee, valid distinct addresses on
/// `network`) are checked before the node is contacted. A signing result
/// that is not complete fails with `SigningIncomplete` and nothing is
/// broadcast.
pub async fn transfer(
    rpc: &dyn NodeRpc,
    network: Network,
    request: &TransferRequest,
) -> Result<Txid, CoreError> {
    let amount = positive_amount(request.amount, "amount")?;
    let fee = positive_amount(request.fee, "fee")?;
    let from = parse_address(&request.from, network)?;
    let to = parse_address(&request.to, network)?;
    if from == to {
        return Err(CoreError::InvalidTransfer(format!(
            "source and destination are the same address {from}"
        )));
    }

    let unspent = rpc.list_unspent().await?;
    debug!(count = unspent.len(), "listed unspent outputs");

    let selection = select_inputs(&unspent, amount, fee)?;
    let plan = plan_transfer(selection, &from, &to, amount, fee)?;
    debug!(
        inputs = plan.inputs.len(),
        outputs = plan.outputs.len(),
        change = %plan.change,
        "planned transfer"
    );

    let raw_tx = rpc
        .create_raw_transaction(&plan.inputs, &plan.outputs, plan.lock_time)
        .await?;
    debug!(raw_tx = %raw_tx, "created raw transaction");

    let signed = rpc.sign_raw_transaction(&raw_tx).await?;
    debug!(signed_tx = %signed.hex, complete = signed.complete, "signed raw transaction");
    if !signed.complete {
        error!(errors = ?signed.errors, "signing incomplete");
        return Err(CoreError::SigningIncomplete {
            errors: signed.errors,
        });
    }

    let txid = rpc.send_raw_transaction(&signed.hex, true).await?;
    info!(%txid, %amount, %fee, to = %to, "broadcast transfer");
    Ok(txid)
}
