use crate::activity::{self, DayBucket};
use crate::slippage;
use crate::store::WalletStore;
use crate::tokens;

use askama::Template;
use axum::{
    extract::Path,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Router,
};
use chrono::{DateTime, Local};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::net::SocketAddr;
use std::str::FromStr;
use tower_http::services::ServeDir;

// Custom filters for formatting amounts in templates
mod filters {
    pub fn format_amount(value: &f64) -> askama::Result<String> {
        let abs = value.abs();
        if abs > 0.0 && abs < 0.0001 {
            Ok(format!("{:.8}", value))
        } else if abs < 1.0 {
            Ok(format!("{:.6}", value))
        } else {
            Ok(add_commas(&format!("{:.4}", value)))
        }
    }

    fn add_commas(s: &str) -> String {
        let negative = s.starts_with('-');
        let s = s.trim_start_matches('-');
        let parts: Vec<&str> = s.split('.').collect();
        let integer_part = parts[0];
        let decimal_part = parts.get(1).unwrap_or(&"");

        let with_commas: String = integer_part
            .chars()
            .rev()
            .enumerate()
            .fold(String::new(), |mut acc, (i, c)| {
                if i > 0 && i % 3 == 0 {
                    acc.push(',');
                }
                acc.push(c);
                acc
            })
            .chars()
            .rev()
            .collect();

        let sign = if negative { "-" } else { "" };
        if decimal_part.is_empty() {
            format!("{}{}", sign, with_commas)
        } else {
            format!("{}{}.{}", sign, with_commas, decimal_part)
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    wallets: Vec<WalletRowView>,
    wallet_count: usize,
}

#[derive(Template)]
#[template(path = "wallet_row.html")]
struct WalletRowTemplate {
    wallet: WalletRowView,
}

struct WalletRowView {
    name: String,
    address: String,
}

#[derive(Template)]
#[template(path = "wallet.html")]
struct WalletTemplate {
    name: String,
    address: String,
    groups: Vec<ActivityGroupView>,
    tokens: Vec<TokenRowView>,
    slippage: String,
    presets: Vec<PresetView>,
    settings_error: String,
    error: String,
}

#[derive(Template)]
#[template(path = "activity.html")]
struct ActivityTemplate {
    groups: Vec<ActivityGroupView>,
}

#[derive(Template)]
#[template(path = "tokens.html")]
struct TokensTemplate {
    tokens: Vec<TokenRowView>,
}

#[derive(Template)]
#[template(path = "settings.html")]
struct SettingsTemplate {
    slippage: String,
    presets: Vec<PresetView>,
    settings_error: String,
}

struct PresetView {
    value: &'static str,
    active: bool,
}

fn preset_views(current: &str) -> Vec<PresetView> {
    slippage::PRESETS
        .iter()
        .map(|&value| PresetView {
            value,
            active: value == current,
        })
        .collect()
}

struct ActivityGroupView {
    label: Option<String>,
    rows: Vec<TransactionRowView>,
}

struct TransactionRowView {
    signature: String,
    sig_short: String,
    time: String,
    amount: f64,
    symbol: String,
    status: String,
}

struct TokenRowView {
    display_name: String,
    mint: String,
    balance: f64,
    decimals: u8,
}

#[derive(Deserialize)]
struct AddWalletForm {
    name: String,
    address: String,
}

#[derive(Deserialize)]
struct SlippageForm {
    slippage: String,
}

pub async fn start_server(port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/", get(index))
        .route("/wallets", post(add_wallet))
        .route("/wallets/:address", get(wallet_page).delete(remove_wallet))
        .route("/wallets/:address/activity", get(wallet_activity))
        .route("/wallets/:address/tokens", get(wallet_tokens))
        .route("/settings/slippage", post(update_slippage))
        .nest_service("/static", ServeDir::new("static"));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Starting Galleon web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn activity_groups(buckets: &[DayBucket]) -> Vec<ActivityGroupView> {
    let today = Local::now().date_naive();

    buckets
        .iter()
        .map(|bucket| ActivityGroupView {
            label: activity::day_label(bucket.date, today),
            rows: bucket
                .items
                .iter()
                .map(|tx| {
                    let time = tx
                        .timestamp
                        .filter(|&ts| ts != 0)
                        .and_then(|ts| DateTime::from_timestamp(ts, 0))
                        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
                        .unwrap_or_else(|| "Pending".to_string());

                    let sig_short = if tx.signature.len() > 16 {
                        format!("{}...", &tx.signature[..16])
                    } else {
                        tx.signature.clone()
                    };

                    let status = if tx.success { "Completed" } else { "Failed" };

                    TransactionRowView {
                        signature: tx.signature.clone(),
                        sig_short,
                        time,
                        amount: tx.amount,
                        symbol: tx.symbol.clone().unwrap_or_else(|| "SOL".to_string()),
                        status: status.to_string(),
                    }
                })
                .collect(),
        })
        .collect()
}

fn token_rows(store: &WalletStore, address: &str) -> Vec<TokenRowView> {
    let mut accounts = store.tokens_for(address);
    tokens::sort_for_display(&mut accounts);

    accounts
        .iter()
        .map(|token| TokenRowView {
            display_name: token.display_name(),
            mint: token.mint.clone(),
            balance: token.ui_amount(),
            decimals: token.decimals,
        })
        .collect()
}

fn slippage_display(value: f64) -> String {
    format!("{}", value)
}

async fn index() -> impl IntoResponse {
    let store = match WalletStore::load() {
        Ok(s) => s,
        Err(_) => WalletStore::new(),
    };

    let wallets: Vec<WalletRowView> = store
        .wallets
        .iter()
        .map(|w| WalletRowView {
            name: w.name.clone(),
            address: w.address.clone(),
        })
        .collect();

    let template = IndexTemplate {
        wallet_count: wallets.len(),
        wallets,
    };

    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e)))
}

async fn add_wallet(Form(form): Form<AddWalletForm>) -> impl IntoResponse {
    let mut store = match WalletStore::load() {
        Ok(s) => s,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Error: {}", e))),
    };

    if let Err(e) = store.add_wallet(form.name.clone(), form.address.clone()) {
        return (StatusCode::BAD_REQUEST, Html(format!("Error: {}", e)));
    }

    if let Err(e) = store.save() {
        return (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Error: {}", e)));
    }

    let template = WalletRowTemplate {
        wallet: WalletRowView {
            name: form.name.trim().to_string(),
            address: form.address.trim().to_string(),
        },
    };

    (StatusCode::OK, Html(template.render().unwrap_or_default()))
}

async fn remove_wallet(Path(name): Path<String>) -> impl IntoResponse {
    let mut store = match WalletStore::load() {
        Ok(s) => s,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Error: {}", e))),
    };

    if store.remove_wallet(&name).is_err() {
        return (StatusCode::NOT_FOUND, Html("Wallet not found".to_string()));
    }

    if let Err(e) = store.save() {
        return (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Error: {}", e)));
    }

    // Return empty to remove the row
    (StatusCode::OK, Html(String::new()))
}

async fn wallet_page(Path(address): Path<String>) -> impl IntoResponse {
    let store = match WalletStore::load() {
        Ok(s) => s,
        Err(e) => {
            let slippage = slippage_display(slippage::DEFAULT_SLIPPAGE);
            return Html(
                WalletTemplate {
                    name: String::new(),
                    address,
                    groups: vec![],
                    tokens: vec![],
                    presets: preset_views(&slippage),
                    slippage,
                    settings_error: String::new(),
                    error: format!("Failed to load wallet store: {}", e),
                }
                .render()
                .unwrap_or_default(),
            );
        }
    };

    let error = match Pubkey::from_str(&address) {
        Ok(_) => String::new(),
        Err(_) => format!("'{}' is not a valid wallet address", address),
    };

    let name = store
        .find_wallet(&address)
        .map(|w| w.name.clone())
        .unwrap_or_else(|| address.clone());

    let buckets = activity::group_by_day(store.history_for(&address), &store.transactions);
    let slippage = slippage_display(store.settings.slippage);

    Html(
        WalletTemplate {
            name,
            groups: activity_groups(&buckets),
            tokens: token_rows(&store, &address),
            presets: preset_views(&slippage),
            slippage,
            settings_error: String::new(),
            error,
            address,
        }
        .render()
        .unwrap_or_default(),
    )
}

async fn wallet_activity(Path(address): Path<String>) -> impl IntoResponse {
    let store = match WalletStore::load() {
        Ok(s) => s,
        Err(_) => WalletStore::new(),
    };

    let buckets = activity::group_by_day(store.history_for(&address), &store.transactions);

    Html(
        ActivityTemplate {
            groups: activity_groups(&buckets),
        }
        .render()
        .unwrap_or_default(),
    )
}

async fn wallet_tokens(Path(address): Path<String>) -> impl IntoResponse {
    let store = match WalletStore::load() {
        Ok(s) => s,
        Err(_) => WalletStore::new(),
    };

    Html(
        TokensTemplate {
            tokens: token_rows(&store, &address),
        }
        .render()
        .unwrap_or_default(),
    )
}

async fn update_slippage(Form(form): Form<SlippageForm>) -> impl IntoResponse {
    let mut store = match WalletStore::load() {
        Ok(s) => s,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Error: {}", e))),
    };

    let template = match slippage::parse(&form.slippage) {
        Some(value) if slippage::is_valid(value) => {
            store.settings.slippage = value;
            if let Err(e) = store.save() {
                return (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Error: {}", e)));
            }
            let slippage = slippage_display(value);
            SettingsTemplate {
                presets: preset_views(&slippage),
                slippage,
                settings_error: String::new(),
            }
        }
        _ => {
            let slippage = slippage_display(store.settings.slippage);
            SettingsTemplate {
                presets: preset_views(&slippage),
                slippage,
                settings_error: format!("'{}' is not a valid slippage percentage", form.slippage),
            }
        }
    };

    (StatusCode::OK, Html(template.render().unwrap_or_default()))
}
