use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "galleon")]
#[command(about = "Wallet activity and token viewer", long_about = None)]
#[command(after_help = "Examples:
  galleon add -n \"Hot Wallet\" -a 5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM6
  galleon list
  galleon import \"Hot Wallet\" -f activity.json
  galleon activity \"Hot Wallet\"
  galleon tokens \"Hot Wallet\"
  galleon slippage 0.5
  galleon serve --port 3000")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a wallet to track
    Add {
        /// Name/label for this wallet
        #[arg(short, long)]
        name: String,

        /// The wallet address (base58 Solana pubkey)
        #[arg(short, long)]
        address: String,
    },

    /// List tracked wallets
    List,

    /// Remove a wallet by name or address
    Remove {
        /// Name or address to remove
        identifier: String,
    },

    /// Import an activity snapshot produced by a fetcher
    Import {
        /// Name or address of the wallet the snapshot belongs to
        name: String,

        /// Path to the snapshot JSON file (defaults to stdin)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Show a wallet's activity feed, grouped by day
    Activity {
        /// Name or address of the wallet
        name: String,
    },

    /// Show a wallet's token balances, largest first
    Tokens {
        /// Name or address of the wallet
        name: String,
    },

    /// Show or set the swap slippage percentage
    Slippage {
        /// New slippage value in percent (omit to show the current value)
        value: Option<String>,
    },

    /// Start the web interface
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}
