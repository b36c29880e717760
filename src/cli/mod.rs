use std::env::current_dir;
use std::process::exit;

use chrono::Local;
use clap::Parser;
use log::debug;

use crate::error::BillError;
use crate::settings::BillsVaultValues;
use crate::store::VaultBillStore;
use crate::vault::{VaultImpl, VaultReadable};
use argument_parsing::BillsOptions;

mod argument_parsing;
mod commands;
mod formatting;
mod tests;

fn init_logging(arguments: &BillsOptions) {
    let default_level = if arguments.quiet {
        "error"
    } else if arguments.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

pub fn bills_operation() {
    let arguments = BillsOptions::parse();
    init_logging(&arguments);
    let action = arguments.command.action();

    let result: Result<String, BillError> = (|| {
        let vault_path = match &arguments.vault {
            Some(a) => a.clone(),
            None => current_dir()?,
        };
        let vault = VaultImpl { path: vault_path };

        let settings = BillsVaultValues::from_vault(&vault)?;
        let store = VaultBillStore::open(settings.data_path(&vault))?;
        debug!("Reading bills from {}", store.path().display());

        commands::execute(arguments.command, &store, &settings.currency_sign, Local::now().naive_local())
    })();

    match result {
        Ok(screen) => print!("{}", screen),
        Err(error) => {
            eprintln!("Could not {}: {}", action, error);
            exit(1)
        }
    }
}
