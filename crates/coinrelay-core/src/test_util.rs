//! Shared test helpers for `coinrelay-core` unit tests.
//!
//! Builders for unspent outputs, addresses and wallet transactions so tests
//! across modules share one source of dummy data.

use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{Secp256k1, SecretKey};
use bitcoin::{Address, Amount, CompressedPublicKey, Network, SignedAmount, Txid};

use crate::types::{UnspentOutput, WalletTransaction};

// ==============================================================================
// Txid Helpers
// ==============================================================================

/// Create a deterministic `Txid` from a single distinguishing byte.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

// ==============================================================================
// Unspent Output Builders
// ==============================================================================

/// An unspent output of `sats` at `txid_from_byte(id):0`.
pub fn utxo(id: u8, sats: u64, spendable: bool) -> UnspentOutput {
    UnspentOutput {
        txid: txid_from_byte(id),
        vout: 0,
        amount: Amount::from_sat(sats),
        spendable,
        address: None,
        confirmations: 6,
    }
}

// ==============================================================================
// Addresses
// ==============================================================================

/// A deterministic P2WPKH address derived from a secret key filled with `seed`.
pub fn test_address(seed: u8, network: Network) -> Address {
    let secp = Secp256k1::new();
    let secret = SecretKey::from_slice(&[seed; 32]).expect("seed must form a valid secret key");
    let public = CompressedPublicKey(secret.public_key(&secp));
    Address::p2wpkh(&public, network)
}

/// The sending wallet's address in transfer tests.
pub fn from_address() -> Address {
    test_address(1, Network::Regtest)
}

/// The payee's address in transfer tests.
pub fn to_address() -> Address {
    test_address(2, Network::Regtest)
}

// ==============================================================================
// Wallet Transaction Builders
// ==============================================================================

pub fn wallet_tx(txid: Txid, sats: i64, confirmations: i64) -> WalletTransaction {
    WalletTransaction {
        txid,
        amount: SignedAmount::from_sat(sats),
        fee: None,
        confirmations,
        block_hash: None,
        time: Some(1_700_000_000),
        hex: "02000000".to_owned(),
    }
}
