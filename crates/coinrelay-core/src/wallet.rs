//! Throwaway key generation for test setups. Nothing here touches the node.

use bitcoin::secp256k1::Secp256k1;
use bitcoin::{Address, CompressedPublicKey, Network, PrivateKey};

use crate::types::Wallet;

/// Generate `count` fresh wallets: a random key, its WIF encoding, and the
/// matching P2WPKH address on `network`.
pub fn generate_wallets(count: usize, network: Network) -> Vec<Wallet> {
    let secp = Secp256k1::new();
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|_| {
            let (secret_key, public_key) = secp.generate_keypair(&mut rng);
            let private_key = PrivateKey::new(secret_key, network);
            let address = Address::p2wpkh(&CompressedPublicKey(public_key), network);
            Wallet {
                address: address.to_string(),
                private_key: private_key.to_wif(),
            }
        })
        .collect()
}
