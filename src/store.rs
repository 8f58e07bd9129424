use crate::slippage::DEFAULT_SLIPPAGE;
use crate::tokens::TokenAccount;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletEntry {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_slippage")]
    pub slippage: f64,
}

fn default_slippage() -> f64 {
    DEFAULT_SLIPPAGE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slippage: DEFAULT_SLIPPAGE,
        }
    }
}

/// Snapshot produced by the fetcher for one wallet: the display-ordered
/// signature sequence plus whatever records and token accounts it resolved.
/// `order` may reference signatures absent from `transactions`; the
/// activity grouper skips those.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityImport {
    pub order: Vec<String>,
    #[serde(default)]
    pub transactions: HashMap<String, Value>,
    #[serde(default)]
    pub tokens: Vec<TokenAccount>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct WalletStore {
    #[serde(default)]
    pub wallets: Vec<WalletEntry>,
    /// Raw transaction records keyed by signature, shared across wallets.
    #[serde(default)]
    pub transactions: HashMap<String, Value>,
    /// Per-address display order of signatures, newest first as fetched.
    #[serde(default)]
    pub history: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub tokens: HashMap<String, Vec<TokenAccount>>,
    #[serde(default)]
    pub settings: Settings,
}

impl WalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::storage_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::storage_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).context("Failed to read wallet store")?;

        let mut store: WalletStore =
            serde_json::from_str(&content).context("Failed to parse wallet store")?;

        // Clean up any whitespace
        for wallet in &mut store.wallets {
            wallet.name = wallet.name.trim().to_string();
            wallet.address = wallet.address.trim().to_string();
        }

        Ok(store)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize wallet store")?;

        fs::write(path, content).context("Failed to write wallet store")?;

        Ok(())
    }

    fn storage_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("GALLEON_STORE") {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir().context("Failed to get home directory")?;

        Ok(home.join(".galleon").join("store.json"))
    }

    pub fn add_wallet(&mut self, name: String, address: String) -> Result<()> {
        let name = name.trim().to_string();
        let address = address.trim().to_string();

        if self.wallets.iter().any(|w| w.name == name) {
            anyhow::bail!("Wallet with name '{}' already exists", name);
        }

        Pubkey::from_str(&address).context("Invalid Solana address")?;

        self.wallets.push(WalletEntry { name, address });
        Ok(())
    }

    pub fn remove_wallet(&mut self, identifier: &str) -> Result<()> {
        let initial_len = self.wallets.len();
        // Remove by name or address
        self.wallets
            .retain(|w| w.name != identifier && w.address != identifier);

        if self.wallets.len() == initial_len {
            anyhow::bail!("Wallet with name or address '{}' not found", identifier);
        }

        Ok(())
    }

    pub fn find_wallet(&self, identifier: &str) -> Option<&WalletEntry> {
        self.wallets
            .iter()
            .find(|w| w.name == identifier || w.address == identifier)
    }

    /// Merge one fetcher snapshot: new records extend the shared cache, and
    /// the wallet's order and token accounts are replaced wholesale.
    pub fn import_activity(&mut self, address: &str, import: ActivityImport) -> Result<()> {
        let address = address.trim();

        Pubkey::from_str(address).context("Invalid Solana address")?;

        self.transactions.extend(import.transactions);
        self.history.insert(address.to_string(), import.order);

        if !import.tokens.is_empty() {
            self.tokens.insert(address.to_string(), import.tokens);
        }

        Ok(())
    }

    pub fn history_for(&self, address: &str) -> &[String] {
        self.history.get(address).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tokens_for(&self, address: &str) -> Vec<TokenAccount> {
        self.tokens.get(address).cloned().unwrap_or_default()
    }
}
