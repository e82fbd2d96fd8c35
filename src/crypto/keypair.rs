//! secp256k1 keypair generation.

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use secp256k1::{Secp256k1, SecretKey, SignOnly};
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{Error, Result};

/// Length of a private key in bytes.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Length of a compressed public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Scalar draws allowed before the entropy source is considered broken.
const MAX_SCALAR_DRAWS: usize = 64;

/// A secp256k1 private key (32 bytes, big-endian, `0 < k < n`).
///
/// The bytes are wiped from memory when the key is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; PRIVATE_KEY_LEN]);

impl PrivateKey {
    /// Creates a private key from raw bytes.
    ///
    /// Fails with [`Error::InvalidScalar`] if the value is zero or not below
    /// the curve order.
    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LEN]) -> Result<Self> {
        SecretKey::from_slice(&bytes).map_err(|_| Error::InvalidScalar)?;
        Ok(Self(bytes))
    }

    /// Parses a private key from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut decoded = hex::decode(s.trim())?;
        let bytes: std::result::Result<[u8; PRIVATE_KEY_LEN], _> = decoded.as_slice().try_into();
        decoded.zeroize();

        let bytes = bytes.map_err(|_| Error::InvalidHex(hex::FromHexError::InvalidStringLength))?;
        Self::from_bytes(bytes)
    }

    /// Returns the private key bytes.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.0
    }

    /// Returns the private key as a lowercase hex string (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_slice(&self.0).map_err(|_| Error::InvalidScalar)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Compresses a curve point.
    ///
    /// The prefix is `0x02` for an even y-coordinate and `0x03` for an odd
    /// one, followed by the fixed-width 32-byte big-endian x-coordinate.
    pub fn from_point(point: &secp256k1::PublicKey) -> Self {
        // 0x04 || x (32) || y (32)
        let uncompressed = point.serialize_uncompressed();

        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes[0] = if uncompressed[64] & 1 == 0 { 0x02 } else { 0x03 };
        bytes[1..].copy_from_slice(&uncompressed[1..33]);

        Self(bytes)
    }

    /// Returns the compressed key bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Returns the key as a lowercase hex string (66 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A private key together with its compressed public key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random keypair from the operating system CSPRNG.
    pub fn generate() -> Result<Self> {
        KeyPairGenerator::new().generate()
    }

    /// Derives the keypair for an existing private key.
    ///
    /// The same private key always yields the same public key.
    pub fn from_private_key(private_key: PrivateKey) -> Result<Self> {
        let secp = Secp256k1::signing_only();
        Self::derive(&secp, private_key)
    }

    /// Derives the keypair for raw private key bytes.
    pub fn from_secret_bytes(bytes: [u8; PRIVATE_KEY_LEN]) -> Result<Self> {
        Self::from_private_key(PrivateKey::from_bytes(bytes)?)
    }

    fn derive(secp: &Secp256k1<SignOnly>, private_key: PrivateKey) -> Result<Self> {
        let mut secret_key = private_key.secret_key()?;
        let point = secp256k1::PublicKey::from_secret_key(secp, &secret_key);
        secret_key.non_secure_erase();

        Ok(Self {
            private_key,
            public_key: PublicKey::from_point(&point),
        })
    }

    /// Returns the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Returns the compressed public key.
    #[inline]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the private key as a hex string (64 characters).
    pub fn private_key_hex(&self) -> String {
        self.private_key.to_hex()
    }

    /// Returns the public key as a hex string (66 characters).
    pub fn public_key_hex(&self) -> String {
        self.public_key.to_hex()
    }
}

/// Generates keypairs from a cryptographically secure random source.
///
/// Each call to [`generate`](Self::generate) is independent; the generator
/// keeps no state besides its random source.
pub struct KeyPairGenerator<R = OsRng> {
    rng: R,
    secp: Secp256k1<SignOnly>,
}

impl KeyPairGenerator<OsRng> {
    /// Creates a generator backed by the operating system CSPRNG.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for KeyPairGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> KeyPairGenerator<R> {
    /// Creates a generator backed by the given secure random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            secp: Secp256k1::signing_only(),
        }
    }

    /// Generates a fresh keypair.
    ///
    /// Fails with [`Error::EntropyUnavailable`] if the random source cannot
    /// supply bytes; nothing is returned in that case.
    pub fn generate(&mut self) -> Result<KeyPair> {
        let private_key = self.draw_private_key()?;
        let keypair = KeyPair::derive(&self.secp, private_key)?;
        debug!(public_key = %keypair.public_key, "generated keypair");
        Ok(keypair)
    }

    /// Draws 32 bytes until they form a valid scalar.
    fn draw_private_key(&mut self) -> Result<PrivateKey> {
        let mut bytes = [0u8; PRIVATE_KEY_LEN];

        for attempt in 1..=MAX_SCALAR_DRAWS {
            if let Err(e) = self.rng.try_fill_bytes(&mut bytes) {
                bytes.zeroize();
                return Err(Error::EntropyUnavailable(e.to_string()));
            }

            match PrivateKey::from_bytes(bytes) {
                Ok(private_key) => {
                    bytes.zeroize();
                    return Ok(private_key);
                }
                Err(Error::InvalidScalar) => {
                    warn!(attempt, "random scalar outside curve order, redrawing");
                }
                Err(e) => {
                    bytes.zeroize();
                    return Err(e);
                }
            }
        }

        bytes.zeroize();
        Err(Error::InvalidScalar)
    }
}
