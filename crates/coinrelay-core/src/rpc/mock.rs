use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bitcoin::hashes::Hash;
use bitcoin::{Address, Amount, BlockHash, Txid};

use crate::error::{CoreError, RpcError};
use crate::types::{
    AmountMap, BlockHeight, ChainInfo, SignedTransaction, TransactionInput, UnspentOutput,
    WalletTransaction,
};

use super::NodeRpc;

/// Raw transaction hex returned by the mock's `createrawtransaction`.
pub const MOCK_RAW_TX_HEX: &str = "0200000000000000";
/// Signed hex returned by the mock's signing call.
pub const MOCK_SIGNED_TX_HEX: &str = "0200000001000000";

/// A mock node for testing. Serves canned data populated via the builder
/// and records every RPC method invoked, in order.
pub struct MockRpc {
    unspent: Vec<UnspentOutput>,
    balance: Amount,
    block_count: BlockHeight,
    sign_complete: bool,
    sign_errors: Vec<String>,
    broadcast_txid: Txid,
    broadcast_error: Option<(i64, String)>,
    transactions: HashMap<Txid, WalletTransaction>,
    chain_info: ChainInfo,
    calls: Mutex<Vec<&'static str>>,
    created: Mutex<Vec<(Vec<TransactionInput>, AmountMap, u32)>>,
}

impl MockRpc {
    pub fn builder() -> MockRpcBuilder {
        MockRpcBuilder {
            unspent: Vec::new(),
            balance: Amount::ZERO,
            block_count: BlockHeight(100),
            sign_complete: true,
            sign_errors: Vec::new(),
            broadcast_txid: Txid::from_byte_array([0xab; 32]),
            broadcast_error: None,
            transactions: HashMap::new(),
            chain_info: ChainInfo {
                chain: "regtest".into(),
                blocks: 100,
                best_block_hash: BlockHash::all_zeros(),
                pruned: false,
            },
        }
    }

    /// Every RPC method invoked so far, in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// Arguments of every `createrawtransaction` call so far.
    pub fn created(&self) -> Vec<(Vec<TransactionInput>, AmountMap, u32)> {
        self.created.lock().expect("mock create log poisoned").clone()
    }

    fn record(&self, method: &'static str) {
        self.calls.lock().expect("mock call log poisoned").push(method);
    }
}

pub struct MockRpcBuilder {
    unspent: Vec<UnspentOutput>,
    balance: Amount,
    block_count: BlockHeight,
    sign_complete: bool,
    sign_errors: Vec<String>,
    broadcast_txid: Txid,
    broadcast_error: Option<(i64, String)>,
    transactions: HashMap<Txid, WalletTransaction>,
    chain_info: ChainInfo,
}

impl MockRpcBuilder {
    pub fn with_unspent(mut self, utxo: UnspentOutput) -> Self {
        self.unspent.push(utxo);
        self
    }

    pub fn with_balance(mut self, balance: Amount) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_block_count(mut self, height: u32) -> Self {
        self.block_count = BlockHeight(height);
        self
    }

    /// Make signing report `complete: false` with the given input errors.
    pub fn with_incomplete_signing(mut self, errors: Vec<String>) -> Self {
        self.sign_complete = false;
        self.sign_errors = errors;
        self
    }

    pub fn with_broadcast_txid(mut self, txid: Txid) -> Self {
        self.broadcast_txid = txid;
        self
    }

    /// Make `sendrawtransaction` fail with a node error.
    pub fn with_broadcast_error(mut self, code: i64, message: &str) -> Self {
        self.broadcast_error = Some((code, message.to_owned()));
        self
    }

    pub fn with_transaction(mut self, tx: WalletTransaction) -> Self {
        self.transactions.insert(tx.txid, tx);
        self
    }

    pub fn with_chain_info(mut self, info: ChainInfo) -> Self {
        self.chain_info = info;
        self
    }

    pub fn build(self) -> MockRpc {
        MockRpc {
            unspent: self.unspent,
            balance: self.balance,
            block_count: self.block_count,
            sign_complete: self.sign_complete,
            sign_errors: self.sign_errors,
            broadcast_txid: self.broadcast_txid,
            broadcast_error: self.broadcast_error,
            transactions: self.transactions,
            chain_info: self.chain_info,
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl NodeRpc for MockRpc {
    async fn get_block_count(&self) -> Result<BlockHeight, CoreError> {
        self.record("getblockcount");
        Ok(self.block_count)
    }

    async fn get_balance(&self, _account: &str) -> Result<Amount, CoreError> {
        self.record("getbalance");
        Ok(self.balance)
    }

    async fn list_unspent(&self) -> Result<Vec<UnspentOutput>, CoreError> {
        self.record("listunspent");
        Ok(self.unspent.clone())
    }

    async fn create_raw_transaction(
        &self,
        inputs: &[TransactionInput],
        outputs: &AmountMap,
        lock_time: u32,
    ) -> Result<String, CoreError> {
        self.record("createrawtransaction");
        self.created
            .lock()
            .expect("mock create log poisoned")
            .push((inputs.to_vec(), outputs.clone(), lock_time));
        Ok(MOCK_RAW_TX_HEX.to_owned())
    }

    async fn sign_raw_transaction(&self, tx_hex: &str) -> Result<SignedTransaction, CoreError> {
        self.record("signrawtransaction");
        let hex = if self.sign_complete {
            MOCK_SIGNED_TX_HEX.to_owned()
        } else {
            tx_hex.to_owned()
        };
        Ok(SignedTransaction {
            hex,
            complete: self.sign_complete,
            errors: self.sign_errors.clone(),
        })
    }

    async fn send_raw_transaction(
        &self,
        _tx_hex: &str,
        _allow_high_fees: bool,
    ) -> Result<Txid, CoreError> {
        self.record("sendrawtransaction");
        match &self.broadcast_error {
            Some((code, message)) => Err(RpcError::ServerError {
                code: *code,
                message: message.clone(),
            }
            .into()),
            None => Ok(self.broadcast_txid),
        }
    }

    async fn get_transaction(&self, txid: &Txid) -> Result<WalletTransaction, CoreError> {
        self.record("gettransaction");
        self.transactions.get(txid).cloned().ok_or_else(|| {
            RpcError::ServerError {
                code: -5,
                message: "Invalid or non-wallet transaction id".to_owned(),
            }
            .into()
        })
    }

    async fn send_to_address(
        &self,
        _address: &Address,
        _amount: Amount,
    ) -> Result<Txid, CoreError> {
        self.record("sendtoaddress");
        Ok(self.broadcast_txid)
    }

    async fn get_blockchain_info(&self) -> Result<ChainInfo, CoreError> {
        self.record("getblockchaininfo");
        Ok(self.chain_info.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[tokio::test]
    async fn with_chain_info_overrides_defaults() {
        let custom_info = ChainInfo {
            chain: "main".into(),
            blocks: 800_000,
            best_block_hash: BlockHash::all_zeros(),
            pruned: true,
        };
        let rpc = MockRpc::builder()
            .with_chain_info(custom_info.clone())
            .build();
        let info = rpc.get_blockchain_info().await.unwrap();
        assert_eq!(info.chain, "main");
        assert_eq!(info.blocks, 800_000);
        assert!(info.pruned);
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let rpc = MockRpc::builder()
            .with_unspent(utxo(1, 5_000, true))
            .build();
        rpc.get_block_count().await.unwrap();
        let unspent = rpc.list_unspent().await.unwrap();
        assert_eq!(unspent.len(), 1);
        assert_eq!(rpc.calls(), vec!["getblockcount", "listunspent"]);
    }

    #[tokio::test]
    async fn unknown_transaction_is_node_error() {
        let rpc = MockRpc::builder().build();
        let err = rpc
            .get_transaction(&txid_from_byte(9))
            .await
            .expect_err("unknown txid must fail");
        assert!(matches!(
            err,
            CoreError::Rpc(RpcError::ServerError { code: -5, .. })
        ));
    }
}
