mod legacy;
mod record;

pub use record::{
    Bill, BillEdit, BillStatus, InstallmentPosition, NewBill, RecurrenceDeclaration, RecurrenceKind,
};
