use chrono::NaiveDateTime;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::bill::{Bill, RecurrenceKind};
use crate::error::BillError;
use crate::period::MonthKey;
use crate::store::{find_matching, BillStore, OriginMatch};

/// Creates the instances of recurring bills that `target_key` is missing and
/// returns how many were stored. Running it twice for the same month adds
/// nothing the second time. An unreadable month key does nothing.
pub fn ensure_recurring_for_month<S: BillStore + ?Sized>(
    store: &S,
    target_key: &str,
    now: NaiveDateTime,
) -> Result<usize, BillError> {
    let target = match MonthKey::parse(target_key) {
        Ok(target) => target,
        Err(e) => {
            debug!("Not generating recurring bills: {}", e);
            return Ok(0);
        }
    };

    let bills = store.list_all()?;
    let generated = plan_recurring_instances(&bills, &target, now);
    let count = generated.len();

    if count > 0 {
        store.insert_batch(generated)?;
        info!("Generated {} recurring bill(s) for {}", count, target);
    }

    Ok(count)
}

/// The instances missing from `bills` for `target`, without storing them.
pub fn plan_recurring_instances(bills: &[Bill], target: &MonthKey, now: NaiveDateTime) -> Vec<Bill> {
    bills
        .iter()
        .filter(|bill| bill.is_origin())
        .filter_map(|origin| match instance_for(origin, bills, target, now) {
            Ok(instance) => instance,
            Err(e) => {
                warn!("Skipping recurrence of '{}' ({}): {}", origin.name(), origin.id(), e);
                None
            }
        })
        .collect()
}

fn instance_for(
    origin: &Bill,
    bills: &[Bill],
    target: &MonthKey,
    now: NaiveDateTime,
) -> Result<Option<Bill>, BillError> {
    if target < origin.month() {
        return Ok(None);
    }

    if find_matching(bills, target, &OriginMatch::for_duplicates(origin)).is_some() {
        return Ok(None);
    }

    let out_of_range = || BillError::validation(format!("Month out of range after {}", origin.month()));

    match origin.recurrence_kind() {
        // Only the month right after the origin, never further
        Some(RecurrenceKind::Indefinite) => {
            let next = origin.month().add_months(1).ok_or_else(out_of_range)?;
            if &next != target {
                return Ok(None);
            }
            Ok(Some(Bill::recurring_instance(origin, next, Decimal::ZERO, now)))
        }
        Some(RecurrenceKind::Fixed) => {
            let offset = target.months_since(origin.month());
            if offset < 1 || offset >= origin.recurrence_span_months() as i64 {
                return Ok(None);
            }

            let previous = target.add_months(-1).ok_or_else(out_of_range)?;
            let amount = find_matching(bills, &previous, &OriginMatch::for_carry_forward(origin))
                .map(|bill| *bill.amount())
                .unwrap_or(*origin.amount());

            Ok(Some(Bill::recurring_instance(origin, *target, amount, now)))
        }
        None => Ok(None),
    }
}
