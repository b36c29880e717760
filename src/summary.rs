use rust_decimal::Decimal;

use crate::amounts::Figure;
use crate::bill::Bill;
use crate::period::MonthKey;

/// Category filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillFilter {
    pub month: MonthKey,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl BillFilter {
    pub fn for_month(month: MonthKey) -> BillFilter {
        BillFilter {
            month,
            category: None,
            search: None,
        }
    }

    pub fn accepts(&self, bill: &Bill) -> bool {
        if bill.month() != &self.month {
            return false;
        }

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty() && *category != ALL_CATEGORIES);
        if let Some(category) = category {
            if bill.category() != category {
                return false;
            }
        }

        let search = self
            .search
            .as_deref()
            .map(|search| search.trim().to_lowercase())
            .filter(|search| !search.is_empty());
        match search {
            Some(search) => bill.name().to_lowercase().contains(&search),
            None => true,
        }
    }

    /// Keeps stored order.
    pub fn apply<'a>(&self, bills: &'a [Bill]) -> Vec<&'a Bill> {
        bills.iter().filter(|bill| self.accepts(bill)).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub pending_count: usize,
    pub paid_count: usize,
    pub total_count: usize,
    pub total_amount: Figure,
    pub paid_amount: Figure,
    pub pending_amount: Figure,
}

impl Summary {
    pub fn of<'a>(bills: impl IntoIterator<Item = &'a Bill>) -> Summary {
        let mut summary = Summary {
            pending_count: 0,
            paid_count: 0,
            total_count: 0,
            total_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            pending_amount: Decimal::ZERO,
        };

        for bill in bills {
            summary.total_count += 1;
            summary.total_amount += *bill.amount();
            if bill.is_paid() {
                summary.paid_count += 1;
                summary.paid_amount += bill.settled_amount();
            } else {
                summary.pending_count += 1;
            }
        }

        summary.pending_amount = summary.total_amount - summary.paid_amount;
        summary
    }
}
