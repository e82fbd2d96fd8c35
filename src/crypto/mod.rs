//! Cryptographic operations for TRU key and address generation.
//!
//! This module provides:
//! - Secure random key generation using secp256k1
//! - Compressed public key encoding
//! - Address derivation (SHA-256, RIPEMD-160, Base58Check)

mod address;
pub mod hash;
mod keypair;

pub use address::{Address, Network, ADDRESS_PAYLOAD_LEN, CHECKSUM_LEN};
pub use keypair::{KeyPair, KeyPairGenerator, PrivateKey, PublicKey, PUBLIC_KEY_LEN};

/// Errors raised by key generation and address encoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Secure entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Private key is zero or not below the curve order")]
    InvalidScalar,

    #[error("Public key must be {expected} bytes, got {actual}")]
    EncodingError { expected: usize, actual: usize },

    #[error("Invalid base58 string: {0}")]
    InvalidBase58(String),

    #[error("Decoded address must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Version byte mismatch: expected 0x{expected:02x}, got 0x{actual:02x}")]
    VersionMismatch { expected: u8, actual: u8 },

    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, Error>;
