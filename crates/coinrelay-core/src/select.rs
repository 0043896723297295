//! Greedy unspent-output selection.

use bitcoin::Amount;
use tracing::debug;

use crate::error::CoreError;
use crate::types::{Selection, TransactionInput, UnspentOutput};

/// Pick inputs covering `target + fee`.
///
/// Walks `unspent` in the order given, skipping entries that are not
/// spendable, and stops at the first prefix whose sum reaches the threshold.
/// No attempt is made to minimise the input count or avoid dust change.
/// Returns `InsufficientFunds` without any inputs when the spendable total
/// never reaches the threshold.
pub fn select_inputs(
    unspent: &[UnspentOutput],
    target: Amount,
    fee: Amount,
) -> Result<Selection, CoreError> {
    let required = target
        .checked_add(fee)
        .ok_or_else(|| CoreError::InvalidAmount(format!("{target} + {fee} overflows")))?;

    let mut inputs = Vec::new();
    let mut total = Amount::ZERO;
    for utxo in unspent {
        if !utxo.spendable {
            continue;
        }

        inputs.push(TransactionInput::from(utxo));
        total = total
            .checked_add(utxo.amount)
            .ok_or_else(|| CoreError::InvalidData("unspent output total overflows".into()))?;
        if total >= required {
            debug!(
                inputs = inputs.len(),
                total = %total,
                required = %required,
                "selected inputs"
            );
            return Ok(Selection { inputs, total });
        }
    }

    Err(CoreError::InsufficientFunds {
        available: total,
        required,
    })
}
