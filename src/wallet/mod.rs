//! Wallet records handed to the outside world.
//!
//! A [`WalletRecord`] bundles the address with both keys as lowercase hex.
//! The [`store`] submodule persists records as JSON.

pub mod store;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{self, Address, KeyPair, KeyPairGenerator, Network, PrivateKey};

pub use store::{load_wallets, save_wallets, WalletFile, DEFAULT_WALLET_FILE, PRIVATE_KEY_WARNING};

/// Errors raised while building, saving, or loading wallets.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error(transparent)]
    Crypto(#[from] crypto::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed wallet file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Wallet record mismatch: stored {field} does not match the private key")]
    RecordMismatch { field: &'static str },
}

/// The externally consumed result of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct WalletRecord {
    /// Base58 address
    pub address: String,
    /// Compressed public key, lowercase hex (66 characters)
    pub public_key: String,
    /// Private key, lowercase hex (64 characters)
    pub private_key: String,
}

impl WalletRecord {
    /// Builds the record for a keypair.
    pub fn from_keypair(keypair: &KeyPair, network: Network) -> crypto::Result<Self> {
        let address = Address::from_public_key(keypair.public_key().as_bytes(), network)?;

        Ok(Self {
            address: address.to_base58(),
            public_key: keypair.public_key_hex(),
            private_key: keypair.private_key_hex(),
        })
    }

    /// Checks that the stored address and public key follow from the stored
    /// private key.
    pub fn verify(&self, network: Network) -> Result<(), WalletError> {
        let private_key = PrivateKey::from_hex(&self.private_key)?;
        let expected = derive_wallet(private_key, network)?;

        if expected.public_key != self.public_key.to_lowercase() {
            return Err(WalletError::RecordMismatch {
                field: "public_key",
            });
        }
        Address::decode(&self.address, network)?;
        if expected.address != self.address {
            return Err(WalletError::RecordMismatch { field: "address" });
        }

        Ok(())
    }
}

/// Generates a fresh wallet from the operating system CSPRNG.
pub fn generate_wallet(network: Network) -> crypto::Result<WalletRecord> {
    generate_wallet_with(&mut KeyPairGenerator::new(), network)
}

/// Generates a fresh wallet from the given generator.
pub fn generate_wallet_with<R>(
    generator: &mut KeyPairGenerator<R>,
    network: Network,
) -> crypto::Result<WalletRecord>
where
    R: rand::RngCore + rand::CryptoRng,
{
    let keypair = generator.generate()?;
    WalletRecord::from_keypair(&keypair, network)
}

/// Derives the wallet for an existing private key.
pub fn derive_wallet(private_key: PrivateKey, network: Network) -> crypto::Result<WalletRecord> {
    let keypair = KeyPair::from_private_key(private_key)?;
    WalletRecord::from_keypair(&keypair, network)
}
