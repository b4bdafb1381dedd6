//! Clothesline CLI - user management and data-file inspection.
//!
//! # Usage
//!
//! ```bash
//! # Create a user without going through the API
//! clothesline user create -e amina@example.com -n "Amina Bello" -p secret1
//!
//! # Summarize the data file
//! clothesline data show
//! ```
//!
//! # Commands
//!
//! - `user create` - Register a user directly in the data file
//! - `data show` - Print a summary of the data file
//!
//! The data file location comes from `CLOTHESLINE_DATA_PATH` (default:
//! `clothesline.json`), same as the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "clothesline")]
#[command(author, version, about = "Clothesline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Inspect the data file
    Data {
        #[command(subcommand)]
        action: DataAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password (min 6 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum DataAction {
    /// Print a summary of the data file
    Show,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                password,
            } => {
                commands::user::create(&email, &name, &password).await?;
            }
        },
        Commands::Data { action } => match action {
            DataAction::Show => commands::data::show().await?,
        },
    }
    Ok(())
}
