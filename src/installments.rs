use chrono::NaiveDateTime;

use crate::amounts::split_installments;
use crate::bill::{Bill, InstallmentPosition, NewBill};
use crate::error::BillError;

/// Turns a purchase paid in `parts` monthly installments into one bill per
/// month, starting at the month of `draft`. Each part is named `"<name> (i/N)"`
/// and the amounts add up to the draft's amount.
pub fn materialize_installments(draft: NewBill, parts: u32, now: NaiveDateTime) -> Result<Vec<Bill>, BillError> {
    if parts == 0 {
        return Err(BillError::validation("The number of installments must be at least 1"));
    }
    draft.validate()?;

    if parts == 1 {
        return Ok(vec![Bill::create(draft, now)?]);
    }

    let name = draft.name.trim().to_string();
    split_installments(draft.amount, parts)
        .into_iter()
        .zip(1..=parts)
        .map(|(amount, index)| -> Result<Bill, BillError> {
            let month = draft.month.add_months(index as i32 - 1).ok_or_else(|| {
                BillError::validation(format!("Installment {} of {} falls outside the calendar", index, parts))
            })?;

            let part = NewBill {
                name: format!("{} ({}/{})", name, index, parts),
                amount,
                month,
                ..draft.clone()
            };
            Ok(Bill::create(part, now)?.into_installment(InstallmentPosition { index, total: parts }))
        })
        .collect()
}
