//! Digest primitives used by the address pipeline.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA-256 of arbitrary bytes (output 32 bytes).
pub fn sha256(input: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(input));
    out
}

/// SHA-256 applied twice, as used for the address checksum.
pub fn double_sha256(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

/// RIPEMD-160 of arbitrary bytes (output 20 bytes).
pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(input));
    out
}

/// RIPEMD-160 over SHA-256 (the 20-byte public key hash).
pub fn hash160(input: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(input))
}
