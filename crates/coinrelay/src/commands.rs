//! Command dispatch. Every command takes the node client explicitly.

use std::sync::Arc;

use bitcoin::Network;
use eyre::{eyre, WrapErr};

use coinrelay_core::rpc::NodeRpc;
use coinrelay_core::wallet::generate_wallets;
use coinrelay_core::{query, transfer, TransferRequest};

use crate::cli::{Command, TransferArgs};

pub async fn run(command: Command, rpc: Arc<dyn NodeRpc>, network: Network) -> eyre::Result<()> {
    match command {
        Command::BlockCount => {
            let height = query::block_count(rpc.as_ref())
                .await
                .context("query block count")?;
            println!("{height}");
        }
        Command::Balance { account } => {
            let balance = query::balance(rpc.as_ref(), &account)
                .await
                .context("query balance")?;
            println!("{}", balance.to_btc());
        }
        Command::Tx { txid } => {
            let tx = query::query_transaction(rpc.as_ref(), &txid)
                .await
                .context("query transaction")?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
        Command::Unspent => {
            let unspent = rpc
                .list_unspent()
                .await
                .context("list unspent outputs")?;
            println!("{}", serde_json::to_string_pretty(&unspent)?);
        }
        Command::Transfer(args) => {
            let txid = transfer::transfer(rpc.as_ref(), network, &transfer_request(&args))
                .await
                .context("transfer")?;
            println!("{txid}");
        }
        Command::SendTo { to, amount } => {
            let txid = query::transfer_to(rpc.as_ref(), network, &to, amount)
                .await
                .context("send to address")?;
            println!("{txid}");
        }
        Command::Demo(args) => {
            // The sequence runs as its own task; its outcome, including a
            // panic, is joined here and returned to the caller.
            let handle = tokio::spawn(demo(rpc, network, args));
            handle
                .await
                .map_err(|e| eyre!("demonstration task failed: {e}"))??;
        }
        // main handles it before the node connection is opened.
        Command::NewWallets { .. } => unreachable!("new-wallets never reaches node dispatch"),
    }
    Ok(())
}

/// Print fresh wallets as JSON. Runs without a node.
pub fn new_wallets(count: usize, network: Network) -> eyre::Result<()> {
    let wallets = generate_wallets(count, network);
    println!("{}", serde_json::to_string_pretty(&wallets)?);
    Ok(())
}

fn transfer_request(args: &TransferArgs) -> TransferRequest {
    TransferRequest {
        from: args.from.clone(),
        to: args.to.clone(),
        amount: args.amount,
        fee: args.fee,
    }
}

async fn demo(rpc: Arc<dyn NodeRpc>, network: Network, args: TransferArgs) -> eyre::Result<()> {
    let rpc = rpc.as_ref();

    query::block_count(rpc).await.context("query block count")?;
    query::balance(rpc, query::ALL_ACCOUNTS)
        .await
        .context("query balance")?;

    let txid = transfer::transfer(rpc, network, &transfer_request(&args))
        .await
        .context("transfer")?;
    query::query_transaction(rpc, &txid.to_string())
        .await
        .context("query broadcast transaction")?;

    tracing::info!(%txid, "demonstration sequence finished");
    Ok(())
}
