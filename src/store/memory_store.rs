use std::sync::Mutex;

use super::BillStore;
use crate::bill::Bill;
use crate::category::{default_categories, ensure_unique, Category};
use crate::error::BillError;

pub struct MemoryBillStore {
    bills: Mutex<Vec<Bill>>,
    categories: Mutex<Vec<Category>>,
}

impl MemoryBillStore {
    pub fn new(bills: Vec<Bill>) -> MemoryBillStore {
        MemoryBillStore {
            bills: Mutex::new(bills),
            categories: Mutex::new(default_categories()),
        }
    }
}

impl Default for MemoryBillStore {
    fn default() -> Self {
        MemoryBillStore::new(vec![])
    }
}

impl BillStore for MemoryBillStore {
    fn list_all(&self) -> Result<Vec<Bill>, BillError> {
        Ok(self.bills.lock()?.clone())
    }

    fn insert_batch(&self, bills: Vec<Bill>) -> Result<(), BillError> {
        self.bills.lock()?.extend(bills);
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> Result<Bill, BillError> {
        self.bills
            .lock()?
            .iter()
            .find(|bill| bill.id() == id)
            .cloned()
            .ok_or_else(|| BillError::not_found(id))
    }

    fn replace(&self, bill: Bill) -> Result<(), BillError> {
        let mut bills = self.bills.lock()?;
        let stored = bills
            .iter_mut()
            .find(|stored| stored.id() == bill.id())
            .ok_or_else(|| BillError::not_found(bill.id()))?;
        *stored = bill;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), BillError> {
        let mut bills = self.bills.lock()?;
        let before = bills.len();
        bills.retain(|bill| bill.id() != id);
        if bills.len() == before {
            return Err(BillError::not_found(id));
        }
        Ok(())
    }

    fn categories(&self) -> Result<Vec<Category>, BillError> {
        Ok(self.categories.lock()?.clone())
    }

    fn add_category(&self, category: Category) -> Result<(), BillError> {
        let mut categories = self.categories.lock()?;
        ensure_unique(&categories, &category)?;
        categories.push(category);
        Ok(())
    }
}
