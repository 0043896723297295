//! Native JSON-RPC client for Bitcoin Core compatible endpoints.
//!
//! Implements [`NodeRpc`](super::NodeRpc) over JSON-RPC using `reqwest`,
//! with plain HTTP or HTTPS transport and basic or cookie authentication.

mod client;
mod connection;
mod parsing;
mod protocol;

pub use client::HttpRpcClient;
