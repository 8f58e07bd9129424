mod activity;
mod cli;
mod slippage;
mod store;
mod tokens;
mod ui;
mod web;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::Read;
use store::{ActivityImport, WalletStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Add { name, address } => {
            add_wallet(name, address)?;
        }
        Commands::List => {
            list_wallets()?;
        }
        Commands::Remove { identifier } => {
            remove_wallet(identifier)?;
        }
        Commands::Import { name, file } => {
            import_activity(name, file)?;
        }
        Commands::Activity { name } => {
            show_activity(name)?;
        }
        Commands::Tokens { name } => {
            show_tokens(name)?;
        }
        Commands::Slippage { value } => {
            set_slippage(value)?;
        }
        Commands::Serve { port } => {
            web::start_server(port).await?;
        }
    }

    Ok(())
}

fn add_wallet(name: String, address: String) -> Result<()> {
    let mut store = WalletStore::load()?;
    store.add_wallet(name.clone(), address)?;
    store.save()?;

    ui::render_success(&format!("Added wallet '{}'", name));
    Ok(())
}

fn list_wallets() -> Result<()> {
    let store = WalletStore::load()?;
    ui::render_wallets(&store.wallets);
    Ok(())
}

fn remove_wallet(identifier: String) -> Result<()> {
    let mut store = WalletStore::load()?;

    match store.remove_wallet(&identifier) {
        Ok(()) => {
            store.save()?;
            ui::render_success(&format!("Removed wallet '{}'", identifier));
        }
        Err(e) => ui::render_error(&e.to_string()),
    }

    Ok(())
}

fn import_activity(name: String, file: Option<String>) -> Result<()> {
    let mut store = WalletStore::load()?;

    let address = match store.find_wallet(&name) {
        Some(wallet) => wallet.address.clone(),
        None => {
            ui::render_error(&format!("Wallet '{}' not found", name));
            return Ok(());
        }
    };

    let content = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot file '{}'", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read snapshot from stdin")?;
            buf
        }
    };

    let import: ActivityImport =
        serde_json::from_str(&content).context("Failed to parse activity snapshot")?;

    let imported = import.order.len();
    store.import_activity(&address, import)?;
    store.save()?;

    ui::render_success(&format!(
        "Imported {} signature(s) for wallet '{}'",
        imported, name
    ));
    Ok(())
}

fn show_activity(name: String) -> Result<()> {
    let store = WalletStore::load()?;

    let wallet = match store.find_wallet(&name) {
        Some(wallet) => wallet.clone(),
        None => {
            ui::render_error(&format!("Wallet '{}' not found", name));
            return Ok(());
        }
    };

    let buckets = activity::group_by_day(store.history_for(&wallet.address), &store.transactions);
    ui::render_activity(&wallet, &buckets);
    Ok(())
}

fn show_tokens(name: String) -> Result<()> {
    let store = WalletStore::load()?;

    let wallet = match store.find_wallet(&name) {
        Some(wallet) => wallet.clone(),
        None => {
            ui::render_error(&format!("Wallet '{}' not found", name));
            return Ok(());
        }
    };

    let mut accounts = store.tokens_for(&wallet.address);
    tokens::sort_for_display(&mut accounts);
    ui::render_tokens(&wallet, &accounts);
    Ok(())
}

fn set_slippage(value: Option<String>) -> Result<()> {
    let mut store = WalletStore::load()?;

    let value = match value {
        Some(value) => value,
        None => {
            ui::render_success(&format!("Slippage: {}%", store.settings.slippage));
            return Ok(());
        }
    };

    match slippage::parse(&value) {
        Some(parsed) if slippage::is_valid(parsed) => {
            store.settings.slippage = parsed;
            store.save()?;
            ui::render_success(&format!("Slippage set to {}%", parsed));
        }
        _ => ui::render_error(&format!("'{}' is not a valid slippage percentage", value)),
    }

    Ok(())
}
