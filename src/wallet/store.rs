//! JSON persistence for generated wallets.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::crypto::Network;

use super::{WalletError, WalletRecord};

/// File written when no output path is given.
pub const DEFAULT_WALLET_FILE: &str = "tru_wallet.json";

/// Reminder stored alongside every saved key.
pub const PRIVATE_KEY_WARNING: &str = "KEEP YOUR PRIVATE KEY SECRET!";

/// A wallet record as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletFile {
    #[serde(flatten)]
    pub record: WalletRecord,
    /// Local creation time, ISO-8601
    pub created: String,
    pub warning: String,
}

impl WalletFile {
    /// Stamps a record with the current local time and the key warning.
    pub fn new(record: WalletRecord) -> Self {
        Self {
            record,
            created: chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            warning: PRIVATE_KEY_WARNING.to_string(),
        }
    }
}

/// On-disk layout: a single object for one wallet, an array for a batch.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Contents {
    One(WalletFile),
    Many(Vec<WalletFile>),
}

/// Writes wallets to `path` as pretty-printed JSON.
///
/// The file ends up with owner-only permissions on Unix, including when it
/// already existed with wider ones; its old contents are replaced.
pub fn save_wallets(path: &Path, wallets: &[WalletFile]) -> Result<(), WalletError> {
    let json = match wallets {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // mode() only applies on creation; restrict before any key is written
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.set_len(0)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;

    info!(path = %path.display(), count = wallets.len(), "wallet saved");
    Ok(())
}

/// Reads wallets back from `path` and checks every record against its
/// private key.
pub fn load_wallets(path: &Path, network: Network) -> Result<Vec<WalletFile>, WalletError> {
    let json = fs::read_to_string(path)?;
    let wallets = match serde_json::from_str(&json)? {
        Contents::One(wallet) => vec![wallet],
        Contents::Many(wallets) => wallets,
    };

    for wallet in &wallets {
        wallet.record.verify(network)?;
    }

    Ok(wallets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::generate_wallet;

    #[test]
    fn test_field_layout() {
        let wallet = WalletFile::new(generate_wallet(Network::Mainnet).unwrap());
        let json = serde_json::to_string_pretty(&wallet).unwrap();

        let keys: Vec<usize> = ["address", "public_key", "private_key", "created", "warning"]
            .iter()
            .map(|k| json.find(&format!("\"{}\"", k)).unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains(PRIVATE_KEY_WARNING));
        assert!(json.contains("\n  \"address\""));
    }

    #[test]
    fn test_created_timestamp_format() {
        let wallet = WalletFile::new(generate_wallet(Network::Mainnet).unwrap());
        assert!(chrono::NaiveDateTime::parse_from_str(&wallet.created, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
    }

    #[test]
    fn test_save_and_load_single() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_WALLET_FILE);

        let wallet = WalletFile::new(generate_wallet(Network::Mainnet).unwrap());
        save_wallets(&path, std::slice::from_ref(&wallet)).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.is_object());

        let loaded = load_wallets(&path, Network::Mainnet).unwrap();
        assert_eq!(loaded, vec![wallet]);
    }

    #[test]
    fn test_save_and_load_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");

        let wallets: Vec<WalletFile> = (0..3)
            .map(|_| WalletFile::new(generate_wallet(Network::Testnet).unwrap()))
            .collect();
        save_wallets(&path, &wallets).unwrap();

        let loaded = load_wallets(&path, Network::Testnet).unwrap();
        assert_eq!(loaded, wallets);
        assert!(load_wallets(&path, Network::Mainnet).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_WALLET_FILE);
        let wallet = WalletFile::new(generate_wallet(Network::Mainnet).unwrap());
        save_wallets(&path, &[wallet]).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_tightens_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_WALLET_FILE);
        fs::write(&path, "old contents that are longer than nothing").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let wallet = WalletFile::new(generate_wallet(Network::Mainnet).unwrap());
        save_wallets(&path, std::slice::from_ref(&wallet)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(load_wallets(&path, Network::Mainnet).unwrap(), vec![wallet]);
    }

    #[test]
    fn test_load_rejects_tampered_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_WALLET_FILE);

        let mut wallet = WalletFile::new(generate_wallet(Network::Mainnet).unwrap());
        wallet.record.address = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH".into();
        save_wallets(&path, &[wallet]).unwrap();

        assert!(matches!(
            load_wallets(&path, Network::Mainnet),
            Err(WalletError::RecordMismatch { field: "address" })
        ));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_WALLET_FILE);
        fs::write(&path, "{\"address\": 1}").unwrap();

        assert!(matches!(
            load_wallets(&path, Network::Mainnet),
            Err(WalletError::Json(_))
        ));
    }
}
