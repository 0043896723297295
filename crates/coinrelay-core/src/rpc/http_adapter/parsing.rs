use bitcoin::{Amount, BlockHash, Denomination, SignedAmount, Txid};

use crate::error::CoreError;
use crate::types::{SignedTransaction, UnspentOutput, WalletTransaction};

pub(super) fn parse_txid(
    value: Option<&serde_json::Value>,
    field: &str,
) -> Result<Txid, CoreError> {
    let value = value
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| CoreError::InvalidData(format!("missing {field}")))?;
    value
        .parse()
        .map_err(|e| CoreError::InvalidData(format!("invalid {field}: {e}")))
}

pub(super) fn parse_opt_block_hash(
    value: Option<&serde_json::Value>,
) -> Result<Option<BlockHash>, CoreError> {
    match value.and_then(serde_json::Value::as_str) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|e| CoreError::InvalidData(format!("invalid blockhash: {e}"))),
    }
}

pub(super) fn parse_integer_required<T, const SIGNED: bool>(
    value: Option<&serde_json::Value>,
    field: &str,
) -> Result<T, CoreError>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    parse_integer::<T, SIGNED, true>(value, field)?
        .ok_or_else(|| CoreError::InvalidData(format!("missing {field}")))
}

pub(super) fn parse_integer_optional<T, const SIGNED: bool>(
    value: Option<&serde_json::Value>,
) -> Option<T>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    parse_integer::<T, SIGNED, false>(value, "value")
        .ok()
        .flatten()
}

// `required=false` treats missing/null/type-mismatch as `Ok(None)`.
fn parse_integer<T, const SIGNED: bool, const REQUIRED: bool>(
    value: Option<&serde_json::Value>,
    field: &str,
) -> Result<Option<T>, CoreError>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let missing_or_none = || {
        if REQUIRED {
            Err(CoreError::InvalidData(format!("missing {field}")))
        } else {
            Ok(None)
        }
    };

    let Some(value) = value else {
        return missing_or_none();
    };

    if SIGNED {
        let Some(n) = value.as_i64() else {
            return missing_or_none();
        };
        T::try_from(n)
            .map(Some)
            .map_err(|_| CoreError::InvalidData(format!("{field} out of range: {n}")))
    } else {
        let Some(n) = value.as_u64() else {
            return missing_or_none();
        };
        T::try_from(n)
            .map(Some)
            .map_err(|_| CoreError::InvalidData(format!("{field} out of range: {n}")))
    }
}

/// Parse a BTC amount from a JSON value.
///
/// Number values go through `Amount::from_float_in` so scientific notation
/// works, string values through `Amount::from_str_in`.
pub(super) fn parse_btc_amount(value: &serde_json::Value) -> Result<Amount, CoreError> {
    match value {
        serde_json::Value::Number(n) => {
            let parsed = n
                .as_f64()
                .ok_or_else(|| CoreError::InvalidData(format!("invalid BTC amount `{value}`")))?;
            Amount::from_float_in(parsed, Denomination::Bitcoin)
                .map_err(|e| CoreError::InvalidData(format!("invalid BTC amount `{value}`: {e}")))
        }
        serde_json::Value::String(s) => Amount::from_str_in(s, Denomination::Bitcoin)
            .map_err(|e| CoreError::InvalidData(format!("invalid BTC amount `{s}`: {e}"))),
        _ => Err(CoreError::InvalidData(format!(
            "expected numeric BTC amount, got: {value}"
        ))),
    }
}

/// Like [`parse_btc_amount`] but allows negative values, which wallet
/// transactions use for outgoing amounts and fees.
pub(super) fn parse_signed_btc_amount(
    value: &serde_json::Value,
) -> Result<SignedAmount, CoreError> {
    match value {
        serde_json::Value::Number(n) => {
            let parsed = n
                .as_f64()
                .ok_or_else(|| CoreError::InvalidData(format!("invalid BTC amount `{value}`")))?;
            SignedAmount::from_float_in(parsed, Denomination::Bitcoin)
                .map_err(|e| CoreError::InvalidData(format!("invalid BTC amount `{value}`: {e}")))
        }
        serde_json::Value::String(s) => SignedAmount::from_str_in(s, Denomination::Bitcoin)
            .map_err(|e| CoreError::InvalidData(format!("invalid BTC amount `{s}`: {e}"))),
        _ => Err(CoreError::InvalidData(format!(
            "expected numeric BTC amount, got: {value}"
        ))),
    }
}

pub(super) fn parse_listunspent_result(
    raw: serde_json::Value,
) -> Result<Vec<UnspentOutput>, CoreError> {
    let entries = raw
        .as_array()
        .ok_or_else(|| CoreError::InvalidData("listunspent result is not an array".into()))?;

    entries
        .iter()
        .map(|entry| {
            let txid = parse_txid(entry.get("txid"), "listunspent.txid")?;
            let vout = parse_integer_required::<u32, false>(entry.get("vout"), "listunspent.vout")?;
            let amount = parse_btc_amount(entry.get("amount").ok_or_else(|| {
                CoreError::InvalidData("missing amount in listunspent entry".into())
            })?)?;
            let spendable = entry
                .get("spendable")
                .and_then(serde_json::Value::as_bool)
                .ok_or_else(|| {
                    CoreError::InvalidData("missing spendable in listunspent entry".into())
                })?;
            let address = entry
                .get("address")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned);
            let confirmations =
                parse_integer_optional::<u32, false>(entry.get("confirmations")).unwrap_or(0);

            Ok(UnspentOutput {
                txid,
                vout,
                amount,
                spendable,
                address,
                confirmations,
            })
        })
        .collect()
}

pub(super) fn parse_signrawtransaction_result(
    raw: serde_json::Value,
) -> Result<SignedTransaction, CoreError> {
    let hex = raw
        .get("hex")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| CoreError::InvalidData("missing hex in sign result".into()))?
        .to_owned();
    let complete = raw
        .get("complete")
        .and_then(serde_json::Value::as_bool)
        .ok_or_else(|| CoreError::InvalidData("missing complete in sign result".into()))?;

    let errors = raw
        .get("errors")
        .and_then(serde_json::Value::as_array)
        .map(|items| items.iter().map(describe_sign_error).collect())
        .unwrap_or_default();

    Ok(SignedTransaction {
        hex,
        complete,
        errors,
    })
}

fn describe_sign_error(item: &serde_json::Value) -> String {
    let message = item
        .get("error")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unknown error");
    match (
        item.get("txid").and_then(serde_json::Value::as_str),
        item.get("vout").and_then(serde_json::Value::as_u64),
    ) {
        (Some(txid), Some(vout)) => format!("{txid}:{vout}: {message}"),
        _ => message.to_owned(),
    }
}

pub(super) fn parse_gettransaction_result(
    raw: serde_json::Value,
) -> Result<WalletTransaction, CoreError> {
    let txid = parse_txid(raw.get("txid"), "txid")?;
    let amount = parse_signed_btc_amount(
        raw.get("amount")
            .ok_or_else(|| CoreError::InvalidData("missing amount".into()))?,
    )?;
    let fee = raw.get("fee").map(parse_signed_btc_amount).transpose()?;
    let confirmations =
        parse_integer_required::<i64, true>(raw.get("confirmations"), "confirmations")?;
    let block_hash = parse_opt_block_hash(raw.get("blockhash"))?;
    let time = parse_integer_optional::<u64, false>(raw.get("time"));
    let hex = raw
        .get("hex")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_owned();

    Ok(WalletTransaction {
        txid,
        amount,
        fee,
        confirmations,
        block_hash,
        time,
        hex,
    })
}
