//! TRU address representation and Base58Check encoding.
//!
//! Address payload layout (25 bytes):
//! - version byte (1)
//! - RIPEMD-160(SHA-256(compressed public key)) (20)
//! - first 4 bytes of SHA-256(SHA-256(version || hash)) (4)

use std::fmt;
use std::str::FromStr;

use super::hash::{double_sha256, hash160};
use super::{Error, Result, PUBLIC_KEY_LEN};

/// Length of the public key hash in bytes.
pub const HASH160_LEN: usize = 20;

/// Length of the checksum appended to the versioned hash.
pub const CHECKSUM_LEN: usize = 4;

/// Length of the full decoded address payload.
pub const ADDRESS_PAYLOAD_LEN: usize = 1 + HASH160_LEN + CHECKSUM_LEN;

/// The ledger namespace an address belongs to, selected by its version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Main TRU ledger (version byte `0x00`)
    #[default]
    Mainnet,
    /// Test ledger (version byte `0x6f`)
    Testnet,
}

impl Network {
    /// Returns the version byte prepended to the public key hash.
    #[inline]
    pub const fn version_byte(self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x6f,
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            _ => Err(format!("Unknown network: {}", s)),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

/// A TRU address: a checksummed, versioned public key hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    payload: [u8; ADDRESS_PAYLOAD_LEN],
    network: Network,
}

impl Address {
    /// Derives the address of a compressed public key.
    ///
    /// Fails with [`Error::EncodingError`] unless `public_key` is exactly
    /// 33 bytes.
    pub fn from_public_key(public_key: &[u8], network: Network) -> Result<Self> {
        if public_key.len() != PUBLIC_KEY_LEN {
            return Err(Error::EncodingError {
                expected: PUBLIC_KEY_LEN,
                actual: public_key.len(),
            });
        }

        Ok(Self::from_hash160(&hash160(public_key), network))
    }

    /// Builds an address from an already computed public key hash.
    pub fn from_hash160(hash: &[u8; HASH160_LEN], network: Network) -> Self {
        let mut payload = [0u8; ADDRESS_PAYLOAD_LEN];
        payload[0] = network.version_byte();
        payload[1..=HASH160_LEN].copy_from_slice(hash);

        let checksum = checksum(&payload[..=HASH160_LEN]);
        payload[1 + HASH160_LEN..].copy_from_slice(&checksum);

        Self { payload, network }
    }

    /// Decodes and validates a Base58 address for the given network.
    ///
    /// Rejects strings that are not Base58, do not decode to 25 bytes, carry
    /// a checksum that does not match, or use another network's version byte.
    pub fn decode(s: &str, network: Network) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| Error::InvalidBase58(e.to_string()))?;

        let payload: [u8; ADDRESS_PAYLOAD_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| Error::InvalidLength {
                    expected: ADDRESS_PAYLOAD_LEN,
                    actual: bytes.len(),
                })?;

        let (versioned, actual) = payload.split_at(1 + HASH160_LEN);
        let expected = checksum(versioned);
        if actual != expected.as_slice() {
            return Err(Error::ChecksumMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }

        if payload[0] != network.version_byte() {
            return Err(Error::VersionMismatch {
                expected: network.version_byte(),
                actual: payload[0],
            });
        }

        Ok(Self { payload, network })
    }

    /// Returns true if `s` is a valid address for the given network.
    pub fn is_valid(s: &str, network: Network) -> bool {
        Self::decode(s, network).is_ok()
    }

    /// Returns the full 25-byte payload.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_PAYLOAD_LEN] {
        &self.payload
    }

    /// Returns the version byte.
    #[inline]
    pub const fn version(&self) -> u8 {
        self.payload[0]
    }

    /// Returns the network this address belongs to.
    #[inline]
    pub const fn network(&self) -> Network {
        self.network
    }

    /// Returns the 20-byte public key hash.
    pub fn hash160(&self) -> &[u8] {
        &self.payload[1..=HASH160_LEN]
    }

    /// Returns the 4-byte checksum.
    pub fn checksum(&self) -> &[u8] {
        &self.payload[1 + HASH160_LEN..]
    }

    /// Returns the Base58 text form.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.payload).into_string()
    }
}

/// First four bytes of SHA-256(SHA-256(data)).
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = double_sha256(data);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

impl FromStr for Address {
    type Err = Error;

    /// Parses a mainnet address.
    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s, Network::Mainnet)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::{ripemd160, sha256};
    use crate::crypto::KeyPair;

    const GENERATOR_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    /// Address of private key 1 (compressed).
    const GENERATOR_ADDRESS: &str = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";

    const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

    fn generator_pubkey() -> Vec<u8> {
        hex::decode(GENERATOR_COMPRESSED).unwrap()
    }

    #[test]
    fn test_known_address() {
        let address = Address::from_public_key(&generator_pubkey(), Network::Mainnet).unwrap();
        assert_eq!(address.to_base58(), GENERATOR_ADDRESS);
        assert_eq!(
            hex::encode(address.hash160()),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn test_manual_pipeline_matches_encoder() {
        let pubkey = generator_pubkey();

        let digest1 = sha256(&pubkey);
        let digest2 = ripemd160(&digest1);
        let mut versioned = vec![0x00];
        versioned.extend_from_slice(&digest2);
        let check = sha256(&sha256(&versioned));
        let mut payload = versioned.clone();
        payload.extend_from_slice(&check[..4]);
        let manual = bs58::encode(&payload).into_string();

        let address = Address::from_public_key(&pubkey, Network::Mainnet).unwrap();
        assert_eq!(address.as_bytes().as_slice(), payload.as_slice());
        assert_eq!(address.to_base58(), manual);
    }

    #[test]
    fn test_wrong_public_key_length() {
        let pubkey = generator_pubkey();

        let err = Address::from_public_key(&pubkey[..32], Network::Mainnet).unwrap_err();
        assert!(matches!(
            err,
            Error::EncodingError {
                expected: 33,
                actual: 32
            }
        ));

        let uncompressed = [0x04u8; 65];
        assert!(matches!(
            Address::from_public_key(&uncompressed, Network::Mainnet),
            Err(Error::EncodingError { actual: 65, .. })
        ));
    }

    #[test]
    fn test_leading_zero_bytes_become_ones() {
        let address = Address::from_hash160(&[0u8; HASH160_LEN], Network::Mainnet);
        let text = address.to_base58();
        assert_eq!(text, "1111111111111111111114oLvT2");

        let decoded = Address::decode(&text, Network::Mainnet).unwrap();
        assert_eq!(decoded.as_bytes().len(), ADDRESS_PAYLOAD_LEN);
        assert_eq!(decoded, address);
    }

    #[test]
    fn test_decode_round_trip() {
        for _ in 0..100 {
            let keypair = KeyPair::generate().unwrap();
            let address =
                Address::from_public_key(keypair.public_key().as_bytes(), Network::Mainnet)
                    .unwrap();
            let text = address.to_string();

            assert!(text.starts_with('1'));
            let decoded: Address = text.parse().unwrap();
            assert_eq!(decoded.as_bytes().len(), ADDRESS_PAYLOAD_LEN);
            assert_eq!(decoded.version(), 0x00);
            assert_eq!(decoded, address);
        }
    }

    /// Returns (rejected, total) over every single-character substitution.
    fn count_rejected_mutations(address: &str) -> (usize, usize) {
        let mut total = 0usize;
        let mut rejected = 0usize;

        for (i, original) in address.char_indices() {
            for replacement in BASE58_ALPHABET.chars().filter(|&c| c != original) {
                let mut mutated = String::with_capacity(address.len());
                mutated.push_str(&address[..i]);
                mutated.push(replacement);
                mutated.push_str(&address[i + 1..]);

                total += 1;
                if !Address::is_valid(&mutated, Network::Mainnet) {
                    rejected += 1;
                }
            }
        }

        (rejected, total)
    }

    #[test]
    fn test_single_character_mutations_rejected() {
        let (rejected, total) = count_rejected_mutations(GENERATOR_ADDRESS);
        assert!(total > 0);
        assert!(rejected * 256 >= total * 255, "{}/{} rejected", rejected, total);
    }

    #[test]
    fn test_generated_address_mutations_rejected() {
        let mut total = 0usize;
        let mut rejected = 0usize;

        for _ in 0..10 {
            let keypair = KeyPair::generate().unwrap();
            let address =
                Address::from_public_key(keypair.public_key().as_bytes(), Network::Mainnet)
                    .unwrap()
                    .to_base58();
            assert!(Address::is_valid(&address, Network::Mainnet));

            let (r, t) = count_rejected_mutations(&address);
            rejected += r;
            total += t;
        }

        assert!(total > 0);
        assert!(rejected * 256 >= total * 255, "{}/{} rejected", rejected, total);
    }

    #[test]
    fn test_checksum_mismatch() {
        let address = Address::from_public_key(&generator_pubkey(), Network::Mainnet).unwrap();
        let mut payload = *address.as_bytes();
        payload[ADDRESS_PAYLOAD_LEN - 1] ^= 0x01;
        let tampered = bs58::encode(payload).into_string();

        assert!(matches!(
            Address::decode(&tampered, Network::Mainnet),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_base58_rejected() {
        for bad in ["0BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMl", "1O", "I1"] {
            assert!(matches!(
                Address::decode(bad, Network::Mainnet),
                Err(Error::InvalidBase58(_))
            ));
        }
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = bs58::encode([0u8; 24]).into_string();
        assert!(matches!(
            Address::decode(&short, Network::Mainnet),
            Err(Error::InvalidLength {
                expected: 25,
                actual: 24
            })
        ));
        assert!(matches!(
            Address::decode("", Network::Mainnet),
            Err(Error::InvalidLength { actual: 0, .. })
        ));
    }

    #[test]
    fn test_network_version_byte() {
        let pubkey = generator_pubkey();
        let testnet = Address::from_public_key(&pubkey, Network::Testnet).unwrap();
        assert_eq!(testnet.version(), 0x6f);
        assert!(testnet.to_base58().starts_with('m') || testnet.to_base58().starts_with('n'));

        let mainnet = Address::from_public_key(&pubkey, Network::Mainnet).unwrap();
        assert_eq!(testnet.hash160(), mainnet.hash160());

        assert!(matches!(
            Address::decode(&testnet.to_base58(), Network::Mainnet),
            Err(Error::VersionMismatch {
                expected: 0x00,
                actual: 0x6f
            })
        ));
        assert!(Address::is_valid(&testnet.to_base58(), Network::Testnet));
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("TEST".parse::<Network>().unwrap(), Network::Testnet);
        assert!("regtest".parse::<Network>().is_err());
    }
}
