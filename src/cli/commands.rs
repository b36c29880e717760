use chrono::NaiveDateTime;
use log::debug;

use super::argument_parsing::{AddArguments, BillsCommand, EditArguments, RecurrenceArgument};
use super::formatting::{format_added_bills, format_categories, format_month_screen, format_summary_screen};
use crate::amounts::format_money;
use crate::bill::{Bill, BillEdit, NewBill, RecurrenceDeclaration, RecurrenceKind};
use crate::category::Category;
use crate::error::BillError;
use crate::installments::materialize_installments;
use crate::period::MonthKey;
use crate::recurrence::ensure_recurring_for_month;
use crate::store::BillStore;
use crate::summary::{BillFilter, Summary};

/// Runs one command against `store` and returns what should be printed.
pub fn execute<S: BillStore + ?Sized>(
    command: BillsCommand,
    store: &S,
    sign: &str,
    now: NaiveDateTime,
) -> Result<String, BillError> {
    let current_month = MonthKey::from_date(&now.date());

    match command {
        BillsCommand::List { month, category, search } => {
            let month = month.unwrap_or(current_month);
            ensure_recurring_for_month(store, &month.to_string(), now)?;
            if month != current_month {
                ensure_recurring_for_month(store, &current_month.to_string(), now)?;
            }

            let bills = store.list_all()?;
            let filter = BillFilter {
                category,
                search,
                ..BillFilter::for_month(month)
            };
            let shown = filter.apply(&bills);
            let summary = Summary::of(shown.iter().copied());

            Ok(format_month_screen(&month, &shown, &summary, &store.categories()?, sign))
        }
        BillsCommand::Add(arguments) => {
            let parts = arguments.installments;
            let draft = new_bill(arguments, current_month)?;
            let bills = materialize_installments(draft, parts, now)?;
            store.insert_batch(bills.clone())?;
            Ok(format_added_bills(&bills, sign))
        }
        BillsCommand::Edit(arguments) => {
            let mut bill = store.get_by_id(&arguments.id)?;
            let edit = bill_edit(arguments, &bill);
            bill.edit(edit)?;
            store.replace(bill.clone())?;
            Ok(format!("Updated '{}' ({})\n", bill.name(), bill.month()))
        }
        BillsCommand::Pay { id } => {
            let mut bill = store.get_by_id(&id)?;
            bill.pay(now);
            store.replace(bill.clone())?;
            Ok(format!(
                "Paid '{}': {}\n",
                bill.name(),
                format_money(bill.paid_amount(), sign)
            ))
        }
        BillsCommand::Unpay { id } => {
            let mut bill = store.get_by_id(&id)?;
            bill.revert_to_pending();
            store.replace(bill.clone())?;
            Ok(format!("'{}' is pending again\n", bill.name()))
        }
        BillsCommand::Delete { id } => {
            let bill = store.get_by_id(&id)?;
            debug!("Deleting '{}' created at {}", bill.id(), bill.created_at());
            store.delete(&id)?;
            Ok(format!("Deleted '{}' ({})\n", bill.name(), bill.month()))
        }
        BillsCommand::AddCategory { name, icon } => {
            let category = Category::new(&name, icon.as_deref())?;
            let shown = format!("Added category {} {}\n", category.icon(), category.name());
            store.add_category(category)?;
            Ok(shown)
        }
        BillsCommand::Categories => Ok(format_categories(&store.categories()?)),
        BillsCommand::Summary => {
            let bills = store.list_all()?;
            Ok(format_summary_screen(&Summary::of(&bills), sign))
        }
        BillsCommand::Generate { month } => {
            let month = month.unwrap_or(current_month);
            let generated = ensure_recurring_for_month(store, &month.to_string(), now)?;
            Ok(format!("Generated {} recurring bill(s) for {}\n", generated, month))
        }
    }
}

fn new_bill(arguments: AddArguments, current_month: MonthKey) -> Result<NewBill, BillError> {
    let recurrence = match arguments.recurrence {
        None => None,
        Some(RecurrenceArgument::Fixed) if arguments.span == 0 => {
            return Err(BillError::validation("A fixed recurrence needs --span of at least one month"))
        }
        Some(kind) => Some(RecurrenceDeclaration {
            kind: RecurrenceKind::from(kind),
            span_months: match kind {
                RecurrenceArgument::Fixed => arguments.span,
                RecurrenceArgument::Indefinite => 0,
            },
        }),
    };
    debug!("Recording '{}' with recurrence {:?}", arguments.name, recurrence);

    Ok(NewBill {
        name: arguments.name,
        amount: arguments.amount,
        month: arguments.month.unwrap_or(current_month),
        category: arguments.category,
        notes: arguments.notes,
        recurrence,
    })
}

fn bill_edit(arguments: EditArguments, bill: &Bill) -> BillEdit {
    BillEdit {
        name: arguments.name.unwrap_or_else(|| bill.name().to_string()),
        amount: arguments.amount.unwrap_or(*bill.amount()),
        month: arguments.month.unwrap_or(*bill.month()),
        category: arguments.category.or_else(|| Some(bill.category().to_string())),
        notes: arguments.notes.unwrap_or_else(|| bill.notes().to_string()),
    }
}
