use comfy_table::Table;

use crate::amounts::format_money;
use crate::bill::{Bill, BillStatus, RecurrenceKind};
use crate::category::{icon_for, Category};
use crate::period::MonthKey;
use crate::summary::Summary;

pub fn format_month_screen(
    month: &MonthKey,
    bills: &[&Bill],
    summary: &Summary,
    categories: &[Category],
    sign: &str,
) -> String {
    let mut components = vec![title(&format!("Bills for {}", month))];

    if bills.is_empty() {
        components.push("No bills for this month".to_string());
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Id", "Name", "Amount", "Category", "Status", "Recurrence", "Installment"]);

        for bill in bills {
            table.add_row(vec![
                bill.id().to_string(),
                bill.name().to_string(),
                format_money(Some(bill.amount()), sign),
                format!("{} {}", icon_for(categories, bill.category()), bill.category()),
                format_status(bill, sign),
                format_recurrence(bill),
                format_installment(bill),
            ]);
        }
        components.push(table.to_string());
    }

    components.push(format_summary_section("Summary", summary, sign));
    components.push(footer());

    components.join("\n\n")
}

pub fn format_summary_screen(summary: &Summary, sign: &str) -> String {
    [format_summary_section("All bills", summary, sign), footer()].join("\n\n")
}

fn format_summary_section(name: &str, summary: &Summary, sign: &str) -> String {
    let mut table = Table::new();
    table.set_header(vec!["", "Bills", "Amount"]);
    table.add_row(vec![
        "Pending".to_string(),
        summary.pending_count.to_string(),
        format_money(Some(&summary.pending_amount), sign),
    ]);
    table.add_row(vec![
        "Paid".to_string(),
        summary.paid_count.to_string(),
        format_money(Some(&summary.paid_amount), sign),
    ]);
    table.add_row(vec![
        "Total".to_string(),
        summary.total_count.to_string(),
        format_money(Some(&summary.total_amount), sign),
    ]);

    format!("{}\n{}", title(name), table)
}

pub fn format_categories(categories: &[Category]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Icon", "Name"]);
    for category in categories {
        table.add_row(vec![category.icon(), category.name()]);
    }
    format!("{}\n{}\n", title("Categories"), table)
}

/// Listing of bills that were just stored, with the ids needed to act on them.
pub fn format_added_bills(bills: &[Bill], sign: &str) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Month", "Amount"]);
    for bill in bills {
        table.add_row(vec![
            bill.id().to_string(),
            bill.name().to_string(),
            bill.month().to_string(),
            format_money(Some(bill.amount()), sign),
        ]);
    }
    format!("{}\n{}\n", title(&format!("Added {} bill(s)", bills.len())), table)
}

fn format_status(bill: &Bill, sign: &str) -> String {
    match (bill.status(), bill.paid_at()) {
        (BillStatus::Paid, Some(paid_at)) => format!(
            "✅ paid {} on {}",
            format_money(Some(&bill.settled_amount()), sign),
            paid_at.format("%Y-%m-%d")
        ),
        (BillStatus::Paid, None) => "✅ paid".to_string(),
        (BillStatus::Pending, _) => "pending".to_string(),
    }
}

fn format_recurrence(bill: &Bill) -> String {
    match bill.recurrence_kind() {
        Some(RecurrenceKind::Indefinite) => "monthly".to_string(),
        Some(RecurrenceKind::Fixed) => format!("{} months", bill.recurrence_span_months()),
        // Older files flag a bill as recurrent without saying how
        None if bill.is_recurrent() => "recurrent".to_string(),
        None => String::new(),
    }
}

/// Position within the plan, or the plan size when an older file lost the position.
fn format_installment(bill: &Bill) -> String {
    match bill.installment() {
        Some(position) => format!("{}/{}", position.index, position.total),
        None if bill.is_installment() => format!("of {}", bill.installment_count()),
        None => String::new(),
    }
}

fn footer() -> String {
    format!("Release: {}\n", env!("RELEASE"))
}

pub fn title(string: &str) -> String {
    let string_length = string.chars().count();
    string.to_string() + "\n" + &"=".repeat(string_length)
}
