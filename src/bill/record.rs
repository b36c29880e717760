use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amounts::{quantize, Figure};
use crate::category::UNCATEGORIZED;
use crate::error::BillError;
use crate::period::MonthKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Paid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    /// Only next month is seeded, with a zero amount to be filled in later.
    Indefinite,
    /// Repeats for `recurrence_span_months` months counting the origin.
    Fixed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecurrenceDeclaration {
    pub kind: RecurrenceKind,
    pub span_months: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallmentPosition {
    /// 1-based
    pub index: u32,
    pub total: u32,
}

/// What a user provides when recording a bill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBill {
    pub name: String,
    pub amount: Figure,
    pub month: MonthKey,
    pub category: Option<String>,
    pub notes: String,
    pub recurrence: Option<RecurrenceDeclaration>,
}

impl NewBill {
    pub fn validate(&self) -> Result<(), BillError> {
        validate_name(&self.name)?;
        validate_amount(&self.amount)
    }
}

/// Fields a user may change on an existing bill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillEdit {
    pub name: String,
    pub amount: Figure,
    pub month: MonthKey,
    pub category: Option<String>,
    pub notes: String,
}

/// One month's instance of an obligation.
///
/// A bill with a `recurrence_origin_id` was generated from the origin it
/// points to. A bill without one but with a recurrence kind is an origin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bill {
    pub(super) id: String,
    pub(super) name: String,
    pub(super) amount: Figure,
    pub(super) month: MonthKey,
    pub(super) category: String,
    pub(super) notes: String,
    pub(super) status: BillStatus,
    pub(super) paid_at: Option<NaiveDateTime>,
    pub(super) paid_amount: Option<Figure>,
    pub(super) created_at: NaiveDateTime,
    pub(super) recurrent: bool,
    pub(super) recurrence_kind: Option<RecurrenceKind>,
    pub(super) recurrence_span_months: u32,
    pub(super) recurrence_origin_id: Option<String>,
    pub(super) is_installment: bool,
    pub(super) installment_count: u32,
    // Both set or both empty
    pub(super) installment_index: Option<u32>,
    pub(super) installment_total: Option<u32>,
}

pub(super) fn validate_name(name: &str) -> Result<(), BillError> {
    if name.trim().is_empty() {
        return Err(BillError::validation("The bill name cannot be empty"));
    }
    Ok(())
}

pub(super) fn validate_amount(amount: &Figure) -> Result<(), BillError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(BillError::validation(format!(
            "The bill amount cannot be negative ({})",
            amount
        )));
    }
    Ok(())
}

pub(super) fn category_or_default(category: Option<String>) -> String {
    category
        .map(|category| category.trim().to_string())
        .filter(|category| !category.is_empty())
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

impl Bill {
    pub fn create(new_bill: NewBill, now: NaiveDateTime) -> Result<Bill, BillError> {
        new_bill.validate()?;

        let (recurrent, recurrence_kind, recurrence_span_months) = match new_bill.recurrence {
            Some(declaration) => (true, Some(declaration.kind), declaration.span_months),
            None => (false, None, 0),
        };

        Ok(Bill {
            id: Uuid::new_v4().to_string(),
            name: new_bill.name.trim().to_string(),
            amount: quantize(new_bill.amount),
            month: new_bill.month,
            category: category_or_default(new_bill.category),
            notes: new_bill.notes,
            status: BillStatus::Pending,
            paid_at: None,
            paid_amount: None,
            created_at: now,
            recurrent,
            recurrence_kind,
            recurrence_span_months,
            recurrence_origin_id: None,
            is_installment: false,
            installment_count: 1,
            installment_index: None,
            installment_total: None,
        })
    }

    /// A pending copy of `origin` for `month`, linked back to it.
    pub fn recurring_instance(origin: &Bill, month: MonthKey, amount: Figure, now: NaiveDateTime) -> Bill {
        let recurrence_span_months = match origin.recurrence_kind {
            Some(RecurrenceKind::Fixed) => origin.recurrence_span_months,
            _ => 0,
        };

        Bill {
            id: Uuid::new_v4().to_string(),
            name: origin.name.clone(),
            amount: quantize(amount),
            month,
            category: origin.category.clone(),
            notes: origin.notes.clone(),
            status: BillStatus::Pending,
            paid_at: None,
            paid_amount: None,
            created_at: now,
            recurrent: true,
            recurrence_kind: origin.recurrence_kind,
            recurrence_span_months,
            recurrence_origin_id: Some(origin.id.clone()),
            is_installment: false,
            installment_count: 1,
            installment_index: None,
            installment_total: None,
        }
    }

    pub fn into_installment(self, position: InstallmentPosition) -> Bill {
        Bill {
            is_installment: true,
            installment_count: position.total.max(1),
            installment_index: Some(position.index),
            installment_total: Some(position.total),
            ..self
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> &Figure {
        &self.amount
    }

    pub fn month(&self) -> &MonthKey {
        &self.month
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn status(&self) -> BillStatus {
        self.status
    }

    pub fn paid_at(&self) -> Option<&NaiveDateTime> {
        self.paid_at.as_ref()
    }

    pub fn paid_amount(&self) -> Option<&Figure> {
        self.paid_amount.as_ref()
    }

    pub fn created_at(&self) -> &NaiveDateTime {
        &self.created_at
    }

    pub fn is_recurrent(&self) -> bool {
        self.recurrent
    }

    pub fn recurrence_kind(&self) -> Option<RecurrenceKind> {
        self.recurrence_kind
    }

    pub fn recurrence_span_months(&self) -> u32 {
        self.recurrence_span_months
    }

    pub fn recurrence_origin_id(&self) -> Option<&str> {
        self.recurrence_origin_id.as_deref()
    }

    pub fn is_installment(&self) -> bool {
        self.is_installment
    }

    pub fn installment_count(&self) -> u32 {
        self.installment_count
    }

    pub fn installment(&self) -> Option<InstallmentPosition> {
        match (self.installment_index, self.installment_total) {
            (Some(index), Some(total)) => Some(InstallmentPosition { index, total }),
            _ => None,
        }
    }

    /// Carries a recurrence declaration and was not generated from another bill.
    pub fn is_origin(&self) -> bool {
        self.recurrence_origin_id.is_none() && self.recurrence_kind.is_some()
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }

    /// Amount counted as paid: what was recorded when paying, or the bill
    /// amount for records paid before that was tracked.
    pub fn settled_amount(&self) -> Figure {
        self.paid_amount.unwrap_or(self.amount)
    }

    pub fn pay(&mut self, now: NaiveDateTime) {
        self.status = BillStatus::Paid;
        self.paid_at = Some(now);
        self.paid_amount = Some(self.amount);
    }

    pub fn revert_to_pending(&mut self) {
        self.status = BillStatus::Pending;
        self.paid_at = None;
        self.paid_amount = None;
    }

    /// Recurrence and installment linkage are left untouched.
    pub fn edit(&mut self, edit: BillEdit) -> Result<(), BillError> {
        validate_name(&edit.name)?;
        validate_amount(&edit.amount)?;

        self.name = edit.name.trim().to_string();
        self.amount = quantize(edit.amount);
        self.month = edit.month;
        self.category = category_or_default(edit.category);
        self.notes = edit.notes;
        Ok(())
    }
}
