use crate::activity::{day_label, DayBucket};
use crate::store::WalletEntry;
use crate::tokens::TokenAccount;
use chrono::{DateTime, Local};

fn format_amount(value: f64) -> String {
    let abs = value.abs();
    if abs > 0.0 && abs < 0.0001 {
        format!("{:.8}", value)
    } else if abs < 1.0 {
        format!("{:.6}", value)
    } else {
        format!("{:.4}", value)
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let prefix_len = (max_len - 3) / 2;
        let suffix_len = max_len - 3 - prefix_len;
        format!(
            "{}...{}",
            s.chars().take(prefix_len).collect::<String>(),
            s.chars().skip(s.chars().count() - suffix_len).collect::<String>()
        )
    }
}

pub fn render_wallets(wallets: &[WalletEntry]) {
    if wallets.is_empty() {
        println!("\nNo wallets tracked yet. Use 'galleon add' to add wallets.\n");
        return;
    }

    // Get terminal width, default to 120 if detection fails
    let term_width = if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        w as usize
    } else {
        120
    };

    // 5 chars for borders and separators (│ X │ X │)
    let available_width = term_width.saturating_sub(5);

    let min_name = 15;
    let min_address = 20;
    let min_total = min_name + min_address;

    let (name_width, address_width) = if available_width < min_total {
        (min_name, min_address)
    } else {
        // Give most of the extra space to the address column
        let extra = available_width - min_total;
        (min_name + (extra * 3) / 10, min_address + (extra * 7) / 10)
    };

    let table_width = name_width + address_width + 5;

    println!("\n╭{}╗", "─".repeat(table_width - 2));
    let title = "TRACKED WALLETS";
    let title_padding = (table_width - 2 - title.len()) / 2;
    println!(
        "│{}{}{}│",
        " ".repeat(title_padding),
        title,
        " ".repeat(table_width - 2 - title_padding - title.len())
    );
    println!("├{}┬{}┤", "─".repeat(name_width), "─".repeat(address_width));
    println!(
        "│{:^nw$}│{:^aw$}│",
        "Name",
        "Address",
        nw = name_width,
        aw = address_width
    );
    println!("├{}┼{}┤", "─".repeat(name_width), "─".repeat(address_width));

    for wallet in wallets {
        println!(
            "│{:<nw$}│{:<aw$}│",
            truncate_string(&wallet.name, name_width),
            truncate_string(&wallet.address, address_width),
            nw = name_width,
            aw = address_width
        );
    }

    println!("├{}┴{}┤", "─".repeat(name_width), "─".repeat(address_width));
    let footer = format!("Total: {} wallet(s)", wallets.len());
    println!("│{}{}│", footer, " ".repeat(table_width - 2 - footer.len()));
    println!("╰{}╯\n", "─".repeat(table_width - 2));
}

pub fn render_activity(wallet: &WalletEntry, buckets: &[DayBucket]) {
    const MIN_WIDTH: usize = 79;

    let today = Local::now().date_naive();

    // Collect all content lines to calculate max width
    let mut lines = Vec::new();
    lines.push(format!("Wallet: {}", wallet.name));
    lines.push(format!("Address: {}", wallet.address));

    let mut body: Vec<String> = Vec::new();
    for bucket in buckets {
        if let Some(label) = day_label(bucket.date, today) {
            body.push(label.to_uppercase());
        }
        for tx in &bucket.items {
            let time = tx
                .timestamp
                .filter(|&ts| ts != 0)
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
                .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string());

            let status = if tx.success { "" } else { "  [failed]" };
            let symbol = tx.symbol.as_deref().unwrap_or("SOL");

            body.push(format!(
                "  {}  {}  {:>14} {}{}",
                time,
                truncate_string(&tx.signature, 20),
                format_amount(tx.amount),
                symbol,
                status
            ));
        }
    }
    lines.extend(body);

    let max_content_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(MIN_WIDTH);
    let box_width = max_content_width.max(MIN_WIDTH);

    println!("\n╔{}╗", "═".repeat(box_width + 2));
    println!("║  {:<width$}║", lines[0], width = box_width);
    println!("║  {:<width$}║", lines[1], width = box_width);
    println!("╠{}╣", "═".repeat(box_width + 2));

    if buckets.is_empty() {
        println!("║  {:<width$}║", "No activity yet", width = box_width);
    } else {
        for line in &lines[2..] {
            println!("║  {:<width$}║", line, width = box_width);
        }
    }

    let total: usize = buckets.iter().map(|b| b.items.len()).sum();
    println!("╠{}╣", "═".repeat(box_width + 2));
    println!(
        "║  {:<width$}║",
        format!("Total: {} transaction(s)", total),
        width = box_width
    );
    println!("╚{}╝\n", "═".repeat(box_width + 2));
}

pub fn render_tokens(wallet: &WalletEntry, tokens: &[TokenAccount]) {
    const MIN_WIDTH: usize = 79;

    let mut lines = Vec::new();
    lines.push(format!("Wallet: {}", wallet.name));
    lines.push(format!("Address: {}", wallet.address));

    for token in tokens {
        lines.push(token.display_name());
        let mint_display = if token.mint.len() > 44 {
            format!(
                "    Mint: {}...{}",
                &token.mint[..20],
                &token.mint[token.mint.len() - 20..]
            )
        } else {
            format!("    Mint: {}", token.mint)
        };
        lines.push(mint_display);
        lines.push(format!("    Balance: {}", format_amount(token.ui_amount())));
        lines.push(format!("    Decimals: {}", token.decimals));
    }

    let max_content_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(MIN_WIDTH);
    let box_width = max_content_width.max(MIN_WIDTH);

    println!("\n╔{}╗", "═".repeat(box_width + 2));
    println!("║  {:<width$}║", lines[0], width = box_width);
    println!("║  {:<width$}║", lines[1], width = box_width);
    println!("╠{}╣", "═".repeat(box_width + 2));

    if tokens.is_empty() {
        println!("║  {:<width$}║", "Token Balances: None", width = box_width);
    } else {
        println!("║  {:<width$}║", "TOKEN BALANCES", width = box_width);
        println!("╟{}╢", "─".repeat(box_width + 2));

        let mut line_idx = 2;
        for _ in tokens {
            println!("║  {:<width$}║", lines[line_idx], width = box_width); // Token name
            println!("║  {:<width$}║", lines[line_idx + 1], width = box_width); // Mint
            println!("║  {:<width$}║", lines[line_idx + 2], width = box_width); // Balance
            println!("║  {:<width$}║", lines[line_idx + 3], width = box_width); // Decimals
            println!("╟{}╢", "─".repeat(box_width + 2));
            line_idx += 4;
        }
    }

    println!("╚{}╝\n", "═".repeat(box_width + 2));
}

pub fn render_error(error: &str) {
    println!("\n╭─────────────────────────────────────────────────────────────────────────────────╮");
    println!("│ ERROR                                                                            │");
    println!("├─────────────────────────────────────────────────────────────────────────────────┤");
    println!("│ {}                                                                              │", error);
    println!("╰─────────────────────────────────────────────────────────────────────────────────╯\n");
}

pub fn render_success(message: &str) {
    println!("\n{}\n", message);
}
