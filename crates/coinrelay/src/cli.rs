use std::path::PathBuf;

use bitcoin::{Denomination, Network, SignedAmount};
use clap::{Parser, Subcommand};

/// Query a Bitcoin Core node and relay wallet transfers through
/// its JSON-RPC interface.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// TOML config file. `conf/coinrelay.toml` is used when present.
    #[arg(long, env = "COINRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Node RPC endpoint, `host:port` or an HTTP(S) URL.
    #[arg(long, env = "COINRELAY_RPC_URL")]
    pub rpc_url: Option<String>,

    /// RPC username.
    #[arg(long, env = "COINRELAY_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password.
    #[arg(long, env = "COINRELAY_RPC_PASS")]
    pub rpc_pass: Option<String>,

    /// Bitcoin Core `.cookie` file, used when no user/password is given.
    #[arg(long, env = "COINRELAY_RPC_COOKIE_FILE")]
    pub rpc_cookie_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the current block height.
    BlockCount,

    /// Print the wallet balance in BTC.
    Balance {
        /// Account to query; `*` covers every account.
        #[arg(long, default_value = "*")]
        account: String,
    },

    /// Look up a wallet transaction by id.
    Tx { txid: String },

    /// List the wallet's unspent outputs.
    Unspent,

    /// Select inputs, build, sign and broadcast a transfer.
    Transfer(TransferArgs),

    /// Let the node wallet fund and send a payment in one step.
    SendTo {
        /// Destination address.
        #[arg(long)]
        to: String,

        /// Amount in BTC.
        #[arg(long, value_parser = parse_btc, allow_negative_numbers = true)]
        amount: SignedAmount,
    },

    /// Generate fresh key pairs and addresses without contacting the node.
    NewWallets {
        #[arg(long, default_value = "2")]
        count: usize,

        #[arg(long, default_value = "regtest")]
        network: Network,
    },

    /// Run the demonstration sequence: block height, balance, transfer, and
    /// a lookup of the broadcast transaction.
    Demo(TransferArgs),
}

#[derive(clap::Args, Clone)]
pub struct TransferArgs {
    /// Sending address; receives the change.
    #[arg(long)]
    pub from: String,

    /// Destination address.
    #[arg(long)]
    pub to: String,

    /// Amount in BTC.
    #[arg(long, value_parser = parse_btc, allow_negative_numbers = true)]
    pub amount: SignedAmount,

    /// Fee in BTC.
    #[arg(long, value_parser = parse_btc, allow_negative_numbers = true)]
    pub fee: SignedAmount,
}

fn parse_btc(value: &str) -> Result<SignedAmount, String> {
    SignedAmount::from_str_in(value, Denomination::Bitcoin)
        .map_err(|e| format!("invalid BTC amount `{value}`: {e}"))
}
