use bitcoin::Amount;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid transfer: {0}")]
    InvalidTransfer(String),

    #[error("invalid address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid txid `{txid}`: {reason}")]
    InvalidTxid { txid: String, reason: String },

    #[error("insufficient funds: {available} available, {required} required")]
    InsufficientFunds { available: Amount, required: Amount },

    #[error("signing incomplete: {}", describe_sign_errors(.errors))]
    SigningIncomplete { errors: Vec<String> },

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("invalid node data: {0}")]
    InvalidData(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures talking to the node, kept separate from business-rule errors so
/// callers can tell "the node said no" apart from "we never reached it".
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node returned error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("invalid JSON-RPC response: {0}")]
    InvalidResponse(String),
}

fn describe_sign_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        "node did not sign all inputs".to_owned()
    } else {
        errors.join("; ")
    }
}
