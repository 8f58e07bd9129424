use serde::{Deserialize, Serialize};

/// A token holding as imported from the fetcher snapshot. `amount` is the
/// raw on-chain amount (token-lamports), `decimals` scales it for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenAccount {
    pub mint: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    pub amount: u64,
    pub decimals: u8,
}

impl TokenAccount {
    pub fn ui_amount(&self) -> f64 {
        if self.decimals > 0 {
            self.amount as f64 / 10_f64.powi(self.decimals as i32)
        } else {
            self.amount as f64
        }
    }

    pub fn display_name(&self) -> String {
        match (&self.name, &self.symbol) {
            (Some(name), Some(symbol)) => format!("{} ({})", name, symbol),
            (Some(name), None) => name.clone(),
            (None, Some(symbol)) => symbol.clone(),
            (None, None) => "Unknown Token".to_string(),
        }
    }
}

/// Order token accounts for display: largest raw balance first. The sort is
/// stable, so accounts with equal balances keep their imported order.
pub fn sort_for_display(accounts: &mut [TokenAccount]) {
    accounts.sort_by(|a, b| b.amount.cmp(&a.amount));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(mint: &str, amount: u64) -> TokenAccount {
        TokenAccount {
            mint: mint.to_string(),
            name: None,
            symbol: None,
            amount,
            decimals: 6,
        }
    }

    #[test]
    fn sorts_descending_by_raw_amount() {
        let mut accounts = vec![account("a", 5), account("b", 500), account("c", 50)];
        sort_for_display(&mut accounts);

        let mints: Vec<&str> = accounts.iter().map(|a| a.mint.as_str()).collect();
        assert_eq!(mints, vec!["b", "c", "a"]);
    }

    #[test]
    fn equal_balances_keep_imported_order() {
        let mut accounts = vec![
            account("first", 100),
            account("second", 100),
            account("third", 200),
            account("fourth", 100),
        ];
        sort_for_display(&mut accounts);

        let mints: Vec<&str> = accounts.iter().map(|a| a.mint.as_str()).collect();
        assert_eq!(mints, vec!["third", "first", "second", "fourth"]);
    }

    #[test]
    fn ui_amount_scales_by_decimals() {
        let mut token = account("m", 1_500_000);
        assert_eq!(token.ui_amount(), 1.5);

        token.decimals = 0;
        assert_eq!(token.ui_amount(), 1_500_000.0);
    }

    #[test]
    fn display_name_falls_back_through_symbol() {
        let mut token = account("m", 1);
        assert_eq!(token.display_name(), "Unknown Token");

        token.symbol = Some("USDC".to_string());
        assert_eq!(token.display_name(), "USDC");

        token.name = Some("USD Coin".to_string());
        assert_eq!(token.display_name(), "USD Coin (USDC)");

        token.symbol = None;
        assert_eq!(token.display_name(), "USD Coin");
    }
}
