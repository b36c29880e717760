mod amounts;
mod bill;
mod category;
mod cli;
mod error;
mod installments;
mod period;
mod recurrence;
mod settings;
mod store;
mod summary;
mod vault;

use crate::cli::bills_operation;
fn main() {
    bills_operation()
}
