use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{from_reader, from_value, Value};

use crate::error::BillError;

const CONFIG_FILE: &str = "config.json";

/// A directory holding the bills document and an optional `config.json`.
pub trait Vault {
    fn path(&self) -> &Path;

    /// `None` when there is no config file or it has no entry under `key`.
    fn read_vault_values<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BillError>;
}

pub trait VaultReadable: DeserializeOwned + Default {
    const KEY: &'static str;

    fn from_vault<V: Vault>(vault: &V) -> Result<Self, BillError> {
        Ok(vault.read_vault_values(Self::KEY)?.unwrap_or_default())
    }
}

pub struct VaultImpl {
    pub path: PathBuf,
}

impl Vault for VaultImpl {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_vault_values<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BillError> {
        let path = self.path.join(CONFIG_FILE);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let mut config: Value = from_reader(BufReader::new(file)).map_err(|error| {
            BillError::Storage(format!("Could not read {}: {}", path.display(), error))
        })?;

        match config.get_mut(key).map(Value::take) {
            Some(values) => from_value(values).map(Some).map_err(|error| {
                BillError::Storage(format!("Invalid '{}' section in {}: {}", key, path.display(), error))
            }),
            None => Ok(None),
        }
    }
}
