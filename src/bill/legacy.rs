use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::record::{category_or_default, validate_amount, validate_name, Bill, BillStatus, RecurrenceKind};
use crate::amounts::{parse_money, quantize, Figure};
use crate::error::BillError;
use crate::period::MonthKey;

const UNTITLED: &str = "Untitled";

/// Every key a stored bill has been written with over time. Older files use
/// other names for the same fields, `amount` alone has had four.
#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredBill {
    id: Option<String>,
    name: Option<String>,
    title: Option<String>,

    amount: Option<Value>,
    amount_decimal: Option<Value>,
    valor: Option<Value>,
    value: Option<Value>,

    month: Option<String>,
    category: Option<String>,
    notes: Option<String>,
    status: Option<String>,
    paid_at: Option<String>,
    paid_amount: Option<Value>,
    created_at: Option<String>,

    recurrent: Option<bool>,
    recorrente: Option<bool>,
    recurrence_kind: Option<String>,
    rec_type: Option<String>,
    recurrence_span_months: Option<Value>,
    recorrencia_months: Option<Value>,
    recurrence_origin_id: Option<String>,
    rec_origin: Option<String>,

    is_installment: Option<bool>,
    parcelada: Option<bool>,
    installment_count: Option<Value>,
    parcelas: Option<Value>,
    installment_index: Option<Value>,
    parcel_index: Option<Value>,
    installment_total: Option<Value>,
    parcel_total: Option<Value>,
}

/// First value that is present and not blank.
fn first_present<'a>(candidates: &[&'a Option<Value>]) -> Option<&'a Value> {
    candidates.iter().copied().find_map(|candidate| match candidate {
        Some(Value::Null) | None => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
    })
}

fn first_text(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .copied()
        .find_map(|candidate| candidate.as_ref().filter(|s| !s.trim().is_empty()).cloned())
}

fn figure(value: &Value) -> Result<Figure, BillError> {
    match value {
        Value::String(raw) => parse_money(raw),
        Value::Number(number) => Decimal::from_str(&number.to_string())
            .or_else(|_| Decimal::from_scientific(&number.to_string()))
            .map(quantize)
            .map_err(|_| BillError::validation(format!("Could not read the amount {}", number))),
        other => Err(BillError::validation(format!("Could not read the amount {}", other))),
    }
}

fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|f| f as i64)),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

fn timestamp(raw: &str) -> Result<NaiveDateTime, BillError> {
    NaiveDateTime::from_str(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_local()))
        .map_err(|_| BillError::validation(format!("Invalid timestamp '{}'", raw)))
}

fn recurrence_kind(raw: Option<String>) -> Option<RecurrenceKind> {
    match raw?.trim().to_lowercase().as_str() {
        "indefinite" | "indef" => Some(RecurrenceKind::Indefinite),
        "fixed" => Some(RecurrenceKind::Fixed),
        _ => None,
    }
}

fn status(raw: Option<String>) -> Result<BillStatus, BillError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("pending") => Ok(BillStatus::Pending),
        Some("paid") => Ok(BillStatus::Paid),
        Some(other) => Err(BillError::validation(format!("Unknown bill status '{}'", other))),
    }
}

impl Bill {
    /// Reads a stored bill, whatever generation of the file format wrote it.
    /// `now` stands in for a missing creation time.
    pub fn from_value(value: Value, now: NaiveDateTime) -> Result<Bill, BillError> {
        let stored: StoredBill = serde_json::from_value(value)
            .map_err(|error| BillError::validation(format!("Malformed bill record: {}", error)))?;
        Bill::from_stored(stored, now)
    }

    fn from_stored(stored: StoredBill, now: NaiveDateTime) -> Result<Bill, BillError> {
        let amount = first_present(&[&stored.amount, &stored.amount_decimal, &stored.valor, &stored.value])
            .map(figure)
            .transpose()?
            .unwrap_or_else(|| quantize(Decimal::ZERO));
        validate_amount(&amount)?;

        let created_at = stored
            .created_at
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(timestamp)
            .transpose()?
            .unwrap_or(now);

        let month = match first_text(&[&stored.month]) {
            Some(raw) => MonthKey::parse(&raw)?,
            None => MonthKey::from_date(&created_at.date()),
        };

        let name = first_text(&[&stored.name, &stored.title]).unwrap_or_else(|| UNTITLED.to_string());
        validate_name(&name)?;

        let status = status(stored.status)?;
        let (paid_at, paid_amount) = match status {
            BillStatus::Paid => {
                let paid_at = stored
                    .paid_at
                    .as_deref()
                    .filter(|raw| !raw.trim().is_empty())
                    .map(timestamp)
                    .transpose()?;
                // An unreadable paid amount is dropped, the bill amount stands in for it
                let paid_amount = first_present(&[&stored.paid_amount]).and_then(|value| figure(value).ok());
                (paid_at, paid_amount)
            }
            BillStatus::Pending => (None, None),
        };

        let recurrence_kind = recurrence_kind(first_text(&[&stored.recurrence_kind, &stored.rec_type]));
        let recurrence_span_months = integer(first_present(&[
            &stored.recurrence_span_months,
            &stored.recorrencia_months,
        ]))
        .unwrap_or(0)
        .clamp(0, u32::MAX as i64) as u32;
        let recurrent = stored.recurrent.or(stored.recorrente).unwrap_or(false)
            || recurrence_kind.is_some()
            || recurrence_span_months > 0;

        let installment_count = integer(first_present(&[&stored.installment_count, &stored.parcelas]))
            .unwrap_or(1)
            .clamp(1, u32::MAX as i64) as u32;
        let is_installment = stored.is_installment.or(stored.parcelada).unwrap_or(false) || installment_count > 1;

        let installment_index = integer(first_present(&[&stored.installment_index, &stored.parcel_index]));
        let installment_total = integer(first_present(&[&stored.installment_total, &stored.parcel_total]));
        let (installment_index, installment_total) = match (installment_index, installment_total) {
            (Some(index), Some(total)) if index >= 1 && total >= index => {
                (Some(index as u32), Some(total as u32))
            }
            _ => (None, None),
        };

        Ok(Bill {
            id: first_text(&[&stored.id]).unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: name.trim().to_string(),
            amount,
            month,
            category: category_or_default(stored.category),
            notes: stored.notes.unwrap_or_default(),
            status,
            paid_at,
            paid_amount,
            created_at,
            recurrent,
            recurrence_kind,
            recurrence_span_months,
            recurrence_origin_id: first_text(&[&stored.recurrence_origin_id, &stored.rec_origin]),
            is_installment,
            installment_count,
            installment_index,
            installment_total,
        })
    }
}
