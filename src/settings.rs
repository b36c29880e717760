use std::path::PathBuf;

use serde::Deserialize;

use crate::amounts::{Sign, DEFAULT_CURRENCY_SIGN};
use crate::vault::{Vault, VaultReadable};

fn default_data_file() -> String {
    "bills.json".to_string()
}

fn default_currency_sign() -> Sign {
    DEFAULT_CURRENCY_SIGN.to_string()
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BillsVaultValues {
    /// Relative to the vault directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default = "default_currency_sign")]
    pub currency_sign: Sign,
}

impl Default for BillsVaultValues {
    fn default() -> Self {
        BillsVaultValues {
            data_file: default_data_file(),
            currency_sign: default_currency_sign(),
        }
    }
}

impl VaultReadable for BillsVaultValues {
    const KEY: &'static str = "bills";
}

impl BillsVaultValues {
    pub fn data_path<V: Vault>(&self, vault: &V) -> PathBuf {
        vault.path().join(&self.data_file)
    }
}
