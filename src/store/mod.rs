//! Persistence of bills and categories.
//!
//! Every store operation is a whole read-modify-write cycle under a single
//! lock. The lock keeps the file from being corrupted by interleaved writes
//! but does not make sequences of calls atomic: two generator runs racing
//! each other can both pass the duplicate check and insert the same
//! instance twice. Fixing that requires a transactional store.

#[cfg(test)]
use mockall::automock;

use crate::bill::Bill;
use crate::category::Category;
use crate::error::BillError;
use crate::period::MonthKey;

#[cfg(test)]
mod memory_store;
mod vault_store;

#[cfg(test)]
pub use memory_store::MemoryBillStore;
pub use vault_store::VaultBillStore;

/// Recognizes bills descending from a recurrence origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OriginMatch {
    origin_id: String,
    legacy_name: String,
    legacy_month: MonthKey,
    exclude_id: Option<String>,
}

impl OriginMatch {
    /// Used before generating an instance. The origin itself never counts
    /// as its own duplicate.
    pub fn for_duplicates(origin: &Bill) -> OriginMatch {
        OriginMatch {
            origin_id: origin.id().to_string(),
            legacy_name: origin.name().to_string(),
            legacy_month: *origin.month(),
            exclude_id: Some(origin.id().to_string()),
        }
    }

    /// Used to find the previous month's amount of a fixed recurrence. The
    /// origin matches itself, so the first instance inherits its amount.
    pub fn for_carry_forward(origin: &Bill) -> OriginMatch {
        OriginMatch {
            exclude_id: None,
            ..OriginMatch::for_duplicates(origin)
        }
    }

    // Records written before instances were linked to their origin are
    // recognized by the origin's name and month. Any unlinked bill sharing
    // both also matches, even when it belongs to an unrelated origin.
    pub fn matches(&self, bill: &Bill) -> bool {
        match bill.recurrence_origin_id() {
            Some(origin_id) => origin_id == self.origin_id,
            None => {
                bill.name() == self.legacy_name
                    && bill.month() == &self.legacy_month
                    && self.exclude_id.as_deref() != Some(bill.id())
            }
        }
    }
}

pub fn find_matching<'a>(bills: &'a [Bill], month: &MonthKey, matcher: &OriginMatch) -> Option<&'a Bill> {
    bills
        .iter()
        .find(|bill| bill.month() == month && matcher.matches(bill))
}

#[cfg_attr(test, automock)]
pub trait BillStore {
    fn list_all(&self) -> Result<Vec<Bill>, BillError>;

    fn find_by(&self, month: &MonthKey, matcher: &OriginMatch) -> Result<Option<Bill>, BillError> {
        let bills = self.list_all()?;
        Ok(find_matching(&bills, month, matcher).cloned())
    }

    /// Appends all bills in a single write.
    fn insert_batch(&self, bills: Vec<Bill>) -> Result<(), BillError>;

    fn get_by_id(&self, id: &str) -> Result<Bill, BillError>;

    /// Overwrites the stored bill carrying the same id.
    fn replace(&self, bill: Bill) -> Result<(), BillError>;

    fn delete(&self, id: &str) -> Result<(), BillError>;

    fn categories(&self) -> Result<Vec<Category>, BillError>;

    fn add_category(&self, category: Category) -> Result<(), BillError>;
}
