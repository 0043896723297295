mod cli;
mod commands;
mod config;

use std::sync::Arc;

use bitcoin::Network;
use clap::Parser;
use eyre::{eyre, WrapErr};

use coinrelay_core::rpc::{HttpRpcClient, NodeRpc};

use crate::cli::Command;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    if let Command::NewWallets { count, network } = args.command {
        return commands::new_wallets(count, network);
    }

    let file_config = config::load_file_config(args.config.as_deref())?;
    let node = config::resolve(&args, file_config);

    // One client for the whole run; every command borrows it.
    let rpc: Arc<dyn NodeRpc> = Arc::new(
        HttpRpcClient::new(
            &node.endpoint,
            node.user.as_deref(),
            node.pass.as_deref(),
            node.cookie_file.as_deref(),
        )
        .context("configure node RPC client")?,
    );

    let chain_info = rpc.get_blockchain_info().await.map_err(|err| {
        let message = format_rpc_connect_error(&node.endpoint, &err.to_string());
        tracing::error!("{message}");
        eyre!(message).wrap_err("while attempting to connect to Bitcoin Core RPC")
    })?;
    let network = map_chain_to_network(&chain_info.chain)?;

    tracing::info!(
        chain = %chain_info.chain,
        blocks = chain_info.blocks,
        "connected to Bitcoin Core"
    );

    commands::run(args.command, rpc, network)
        .await
        .inspect_err(|err| tracing::error!("{err:#}"))
}

fn format_rpc_connect_error(endpoint: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("could not connect to RPC endpoint `{endpoint}`"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("dns error") {
        lines.push(
            "hint: hostname resolution failed; verify the endpoint hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("Connection refused")
        || source_error.contains("error sending request")
    {
        lines.push(
            "hint: nothing answered; verify bitcoind is running with -server and the RPC port"
                .into(),
        );
    } else if source_error.contains("invalid JSON-RPC response") {
        lines.push(
            "hint: the node rejected the request; verify --rpc-user/--rpc-pass or the cookie file"
                .into(),
        );
    } else if source_error.contains("Requested wallet does not exist")
        || source_error.contains("No wallet is loaded")
    {
        lines.push("hint: load a wallet with `bitcoin-cli loadwallet <name>`".into());
    }

    lines.join("\n")
}

fn map_chain_to_network(chain: &str) -> eyre::Result<Network> {
    match chain {
        "main" => Ok(Network::Bitcoin),
        "test" => Ok(Network::Testnet),
        "signet" => Ok(Network::Signet),
        "regtest" => Ok(Network::Regtest),
        _ => Err(eyre!(
            "unrecognized chain name `{chain}` from getblockchaininfo"
        )),
    }
}
