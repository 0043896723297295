use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bitcoin::{Address, Amount, Txid};
use reqwest::header;
use tracing::{debug, trace};

use crate::error::{CoreError, RpcError};
use crate::types::{
    AmountMap, BlockHeight, ChainInfo, SignedTransaction, TransactionInput, UnspentOutput,
    WalletTransaction,
};

use super::super::NodeRpc;
use super::connection::{parse_connection, RpcAuth};
use super::parsing::{
    parse_btc_amount, parse_gettransaction_result, parse_integer_required,
    parse_listunspent_result, parse_signrawtransaction_result, parse_txid,
};
use super::protocol::{parse_jsonrpc_error, JsonRpcRequest, JsonRpcResponse};

/// Bitcoin Core JSON-RPC client over HTTP(S).
///
/// One instance owns one pooled `reqwest::Client`; create it once at
/// startup and pass it to every operation that needs the node.
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: String,
    auth: Option<RpcAuth>,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a new client.
    ///
    /// `connection` accepts `host:port` (plain HTTP) or an `http://` /
    /// `https://` URL.
    ///
    /// Authentication precedence:
    /// 1. explicit `user` + `pass`
    /// 2. cookie file (`username:password`) from `cookie_file`
    /// 3. no auth
    pub fn new(
        connection: &str,
        user: Option<&str>,
        pass: Option<&str>,
        cookie_file: Option<&Path>,
    ) -> Result<Self, CoreError> {
        let auth = RpcAuth::resolve(user, pass, cookie_file)?;
        let url = parse_connection(connection)?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CoreError::Config(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            auth,
            next_id: AtomicU64::new(initial_request_id()),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn rpc_call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let mut builder = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&req);
        if let Some(auth) = &self.auth {
            builder = auth.apply(builder);
        }

        let response = builder.send().await.map_err(RpcError::Transport)?;
        let status = response.status();

        let body = response.text().await.map_err(RpcError::Transport)?;
        debug!(rpc.id = id, rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.id = id, rpc.method = method, body = %body, "rpc response body");

        // Bitcoin Core answers RPC errors with HTTP 500 and a JSON body, so
        // the body is decoded before the status is judged.
        let decoded: JsonRpcResponse = serde_json::from_str(&body).map_err(|e| {
            RpcError::InvalidResponse(format!("decode JSON-RPC response ({status}): {e}; body={body}"))
        })?;

        if let Some(err) = decoded.error.filter(|e| !e.is_null()) {
            return Err(parse_jsonrpc_error(err));
        }

        Ok(decoded.result.unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl NodeRpc for HttpRpcClient {
    async fn get_block_count(&self) -> Result<BlockHeight, CoreError> {
        let raw = self.rpc_call("getblockcount", Vec::new()).await?;
        parse_integer_required::<u32, false>(Some(&raw), "getblockcount").map(BlockHeight)
    }

    async fn get_balance(&self, account: &str) -> Result<Amount, CoreError> {
        let raw = self
            .rpc_call("getbalance", vec![serde_json::json!(account)])
            .await?;
        parse_btc_amount(&raw)
    }

    async fn list_unspent(&self) -> Result<Vec<UnspentOutput>, CoreError> {
        let raw = self.rpc_call("listunspent", Vec::new()).await?;
        parse_listunspent_result(raw)
    }

    async fn create_raw_transaction(
        &self,
        inputs: &[TransactionInput],
        outputs: &AmountMap,
        lock_time: u32,
    ) -> Result<String, CoreError> {
        let inputs_json = serde_json::to_value(inputs)
            .map_err(|e| CoreError::InvalidData(format!("encode inputs: {e}")))?;
        let raw = self
            .rpc_call(
                "createrawtransaction",
                vec![
                    inputs_json,
                    outputs.to_json(),
                    serde_json::json!(lock_time),
                ],
            )
            .await?;
        raw.as_str()
            .map(str::to_owned)
            .ok_or_else(|| CoreError::InvalidData("createrawtransaction result is not a hex string".into()))
    }

    async fn sign_raw_transaction(&self, tx_hex: &str) -> Result<SignedTransaction, CoreError> {
        let raw = self
            .rpc_call(
                "signrawtransactionwithwallet",
                vec![serde_json::json!(tx_hex)],
            )
            .await?;
        parse_signrawtransaction_result(raw)
    }

    async fn send_raw_transaction(
        &self,
        tx_hex: &str,
        allow_high_fees: bool,
    ) -> Result<Txid, CoreError> {
        let mut params = vec![serde_json::json!(tx_hex)];
        if allow_high_fees {
            // maxfeerate of zero disables the node's fee sanity check.
            params.push(serde_json::json!(0));
        }
        let raw = self.rpc_call("sendrawtransaction", params).await?;
        parse_txid(Some(&raw), "sendrawtransaction result")
    }

    async fn get_transaction(&self, txid: &Txid) -> Result<WalletTransaction, CoreError> {
        let raw = self
            .rpc_call("gettransaction", vec![serde_json::json!(txid.to_string())])
            .await?;
        parse_gettransaction_result(raw)
    }

    async fn send_to_address(
        &self,
        address: &Address,
        amount: Amount,
    ) -> Result<Txid, CoreError> {
        let raw = self
            .rpc_call(
                "sendtoaddress",
                vec![
                    serde_json::json!(address.to_string()),
                    serde_json::json!(amount.to_btc()),
                ],
            )
            .await?;
        parse_txid(Some(&raw), "sendtoaddress result")
    }

    async fn get_blockchain_info(&self) -> Result<ChainInfo, CoreError> {
        let raw = self.rpc_call("getblockchaininfo", Vec::new()).await?;
        let info: ChainInfo = serde_json::from_value(raw).map_err(|e| {
            CoreError::InvalidData(format!("invalid getblockchaininfo result: {e}"))
        })?;
        Ok(info)
    }
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
