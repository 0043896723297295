pub mod error;
pub mod query;
pub mod rpc;
pub mod select;
#[cfg(test)]
mod test_util;
pub mod transfer;
pub mod types;
pub mod wallet;

pub use error::{CoreError, RpcError};
pub use rpc::{HttpRpcClient, NodeRpc};
pub use types::{TransferRequest, UnspentOutput, Wallet};
