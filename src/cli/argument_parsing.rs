use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::amounts::{parse_money, Figure};
use crate::bill::RecurrenceKind;
use crate::period::MonthKey;

fn parse_amount(s: &str) -> Result<Figure, String> {
    parse_money(s).map_err(|e| e.to_string())
}

fn parse_month(s: &str) -> Result<MonthKey, String> {
    MonthKey::parse(s).map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(name = "bills", about = "Keep track of monthly bills, recurring charges and installments")]
pub struct BillsOptions {
    /// Directory holding bills.json and config.json, the current directory by default
    #[arg(short = 'V', long, env = "BILLS_VAULT", global = true)]
    pub vault: Option<PathBuf>,

    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: BillsCommand,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecurrenceArgument {
    /// Seed next month with a zero amount
    Indefinite,
    /// Repeat the amount for --span months
    Fixed,
}

impl From<RecurrenceArgument> for RecurrenceKind {
    fn from(argument: RecurrenceArgument) -> Self {
        match argument {
            RecurrenceArgument::Indefinite => RecurrenceKind::Indefinite,
            RecurrenceArgument::Fixed => RecurrenceKind::Fixed,
        }
    }
}

#[derive(Subcommand)]
pub enum BillsCommand {
    /// Show the bills of a month, creating missing recurring ones first
    List {
        /// YYYY-MM, the current month by default
        #[arg(short, long, value_parser = parse_month)]
        month: Option<MonthKey>,

        /// "All" shows every category
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        search: Option<String>,
    },
    Add(AddArguments),
    Edit(EditArguments),
    Pay {
        id: String,
    },
    /// Put a paid bill back to pending
    Unpay {
        id: String,
    },
    Delete {
        id: String,
    },
    AddCategory {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        icon: Option<String>,
    },
    Categories,
    /// Totals over every stored bill
    Summary,
    /// Create the missing recurring bills of a month
    Generate {
        #[arg(short, long, value_parser = parse_month)]
        month: Option<MonthKey>,
    },
}

impl BillsCommand {
    /// Completes "Could not ..." in error messages.
    pub fn action(&self) -> &'static str {
        match self {
            BillsCommand::List { .. } => "list bills",
            BillsCommand::Add(_) => "add the bill",
            BillsCommand::Edit(_) => "edit the bill",
            BillsCommand::Pay { .. } => "pay the bill",
            BillsCommand::Unpay { .. } => "revert the payment",
            BillsCommand::Delete { .. } => "delete the bill",
            BillsCommand::AddCategory { .. } => "add the category",
            BillsCommand::Categories => "list categories",
            BillsCommand::Summary => "summarize bills",
            BillsCommand::Generate { .. } => "generate recurring bills",
        }
    }
}

#[derive(Args)]
pub struct AddArguments {
    #[arg(short, long)]
    pub name: String,

    /// Either 1.234,56 or 1,234.56
    #[arg(short, long, value_parser = parse_amount)]
    pub amount: Figure,

    /// YYYY-MM, the current month by default
    #[arg(short, long, value_parser = parse_month)]
    pub month: Option<MonthKey>,

    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(long, default_value = "")]
    pub notes: String,

    #[arg(short, long, value_enum)]
    pub recurrence: Option<RecurrenceArgument>,

    /// Months covered by a fixed recurrence, counting the first one
    #[arg(short, long, default_value_t = 0)]
    pub span: u32,

    /// Split the amount over this many consecutive months
    #[arg(short, long, default_value_t = 1)]
    pub installments: u32,
}

/// Options left out keep their current value.
#[derive(Args)]
pub struct EditArguments {
    pub id: String,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long, value_parser = parse_amount)]
    pub amount: Option<Figure>,

    #[arg(short, long, value_parser = parse_month)]
    pub month: Option<MonthKey>,

    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}
