use std::collections::HashSet;
use std::fs::{read_to_string, write};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{from_str, from_value, to_string_pretty, Value};

use super::BillStore;
use crate::bill::Bill;
use crate::category::{default_categories, ensure_unique, normalize, Category};
use crate::error::BillError;

/// Older documents keep their bills under `contas`.
#[derive(Deserialize, Default)]
struct RawDocument {
    #[serde(default)]
    bills: Option<Vec<Value>>,
    #[serde(default)]
    contas: Option<Vec<Value>>,
    #[serde(default)]
    categories: Vec<Value>,
}

impl RawDocument {
    /// Records under `bills` come first. Records under `contas` follow unless
    /// their id is already stored under `bills`.
    fn bill_records(&self) -> Vec<&Value> {
        let mut records: Vec<&Value> = self.bills.iter().flatten().collect();
        let known: HashSet<&str> = records.iter().filter_map(|value| text_field(*value, "id")).collect();
        records.extend(
            self.contas
                .iter()
                .flatten()
                .filter(|value| text_field(*value, "id").map_or(true, |id| !known.contains(id))),
        );
        records
    }

    fn into_contents(self, now: NaiveDateTime) -> Contents {
        let bills = read_bills(self.bill_records(), now);
        Contents {
            bills,
            categories: normalize(read_categories(self.categories)),
        }
    }
}

fn text_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|text| !text.trim().is_empty())
}

/// A record without an id or creation time would get new ones on every read.
fn lacks_identity(value: &Value) -> bool {
    text_field(value, "id").is_none() || text_field(value, "created_at").is_none()
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    bills: &'a [Bill],
    categories: &'a [Category],
}

struct Contents {
    bills: Vec<Bill>,
    categories: Vec<Category>,
}

impl Contents {
    fn position(&self, id: &str) -> Result<usize, BillError> {
        self.bills
            .iter()
            .position(|bill| bill.id() == id)
            .ok_or_else(|| BillError::not_found(id))
    }
}

/// Bills and categories kept in one JSON document inside the vault.
pub struct VaultBillStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl VaultBillStore {
    /// Writes a document holding only the default categories when none exists
    /// yet. Stored bills without an id or creation time get them here, once,
    /// and the document is rewritten so later reads see the same values.
    pub fn open(path: PathBuf) -> Result<VaultBillStore, BillError> {
        let store = VaultBillStore {
            path,
            lock: Mutex::new(()),
        };

        {
            let _guard = store.lock.lock()?;
            if !store.path.exists() {
                debug!("Creating bill document at {}", store.path.display());
                store.save(&Contents {
                    bills: vec![],
                    categories: default_categories(),
                })?;
            } else if let Some(document) = store.read_document()? {
                let missing = document
                    .bill_records()
                    .into_iter()
                    .filter(|value| lacks_identity(*value))
                    .count();
                if missing > 0 {
                    info!(
                        "Assigning ids to {} stored bill(s) in {}",
                        missing,
                        store.path.display()
                    );
                    store.save(&document.into_contents(Local::now().naive_local()))?;
                }
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file holds something other than a bill document.
    fn read_document(&self) -> Result<Option<RawDocument>, BillError> {
        let raw = match read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Some(RawDocument::default()));
        }
        match from_str(&raw) {
            Ok(document) => Ok(Some(document)),
            Err(e) => {
                error!(
                    "{} is not a valid bill document, reading it as empty: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn load(&self) -> Result<Contents, BillError> {
        let document = self.read_document()?.unwrap_or_default();
        Ok(document.into_contents(Local::now().naive_local()))
    }

    fn save(&self, contents: &Contents) -> Result<(), BillError> {
        let document = DocumentRef {
            bills: &contents.bills,
            categories: &contents.categories,
        };
        write(&self.path, to_string_pretty(&document)?)?;
        Ok(())
    }

    fn inspect<T>(&self, f: impl FnOnce(&Contents) -> Result<T, BillError>) -> Result<T, BillError> {
        let _guard = self.lock.lock()?;
        let contents = self.load()?;
        f(&contents)
    }

    /// Nothing is written when `f` fails.
    fn modify<T>(&self, f: impl FnOnce(&mut Contents) -> Result<T, BillError>) -> Result<T, BillError> {
        let _guard = self.lock.lock()?;
        let mut contents = self.load()?;
        let result = f(&mut contents)?;
        self.save(&contents)?;
        Ok(result)
    }
}

fn read_bills(raw: Vec<&Value>, now: NaiveDateTime) -> Vec<Bill> {
    raw.into_iter()
        .filter_map(|value| {
            let shown = value.to_string();
            match Bill::from_value(value.clone(), now) {
                Ok(bill) => Some(bill),
                Err(e) => {
                    warn!("Skipping unreadable bill {}: {}", shown, e);
                    None
                }
            }
        })
        .collect()
}

fn read_categories(raw: Vec<Value>) -> Vec<Category> {
    raw.into_iter()
        .filter_map(|value| match from_value::<Category>(value) {
            Ok(category) => Some(category),
            Err(e) => {
                warn!("Skipping unreadable category: {}", e);
                None
            }
        })
        .collect()
}

impl BillStore for VaultBillStore {
    fn list_all(&self) -> Result<Vec<Bill>, BillError> {
        self.inspect(|contents| Ok(contents.bills.clone()))
    }

    fn insert_batch(&self, bills: Vec<Bill>) -> Result<(), BillError> {
        if bills.is_empty() {
            return Ok(());
        }
        self.modify(|contents| {
            contents.bills.extend(bills);
            Ok(())
        })
    }

    fn get_by_id(&self, id: &str) -> Result<Bill, BillError> {
        self.inspect(|contents| {
            let position = contents.position(id)?;
            Ok(contents.bills[position].clone())
        })
    }

    fn replace(&self, bill: Bill) -> Result<(), BillError> {
        self.modify(|contents| {
            let position = contents.position(bill.id())?;
            contents.bills[position] = bill;
            Ok(())
        })
    }

    fn delete(&self, id: &str) -> Result<(), BillError> {
        self.modify(|contents| {
            let position = contents.position(id)?;
            contents.bills.remove(position);
            Ok(())
        })
    }

    fn categories(&self) -> Result<Vec<Category>, BillError> {
        self.inspect(|contents| Ok(contents.categories.clone()))
    }

    fn add_category(&self, category: Category) -> Result<(), BillError> {
        self.modify(|contents| {
            ensure_unique(&contents.categories, &category)?;
            contents.categories.push(category);
            Ok(())
        })
    }
}
