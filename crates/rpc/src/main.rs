//! Elastic CLI - Main entry point

use clap::{Parser, Subcommand};
use elastic_core::{AccountId, Amount};
use elastic_ledger::{LedgerCommand, LedgerConfig};
use elastic_rpc::{commands, AppContext};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "elastic")]
#[command(about = "Elastic - Rebasing token ledger", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Optional correlation ID for mutating commands
    #[arg(long, global = true)]
    correlation_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the ledger and write the genesis record
    Init {
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Initial supply (raw units, overrides config)
        #[arg(long)]
        supply: Option<Amount>,
        /// Deployer and initial admin (overrides config)
        #[arg(long)]
        admin: Option<AccountId>,
    },

    /// Show the balance of an account
    Balance { account: AccountId },

    /// Show the total supply
    Supply,

    /// Show the current index
    Index,

    /// Show the raw shares of an account
    Shares { account: AccountId },

    /// Show the allowance of a spender over an owner's balance
    Allowance { owner: AccountId, spender: AccountId },

    /// Transfer from the caller
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },

    /// Transfer on behalf of an owner, using the spender's allowance
    TransferFrom {
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },

    /// Set an allowance (overwrites)
    Approve {
        owner: AccountId,
        spender: AccountId,
        amount: Amount,
    },

    /// Contract the index by 1% (admin only)
    Rebase { caller: AccountId },

    /// Hand admin over to another account (admin only)
    TransferAdmin {
        caller: AccountId,
        new_admin: AccountId,
    },

    /// Verify the hash chain and ledger invariants
    Audit,

    /// Show metadata and headline state
    Info,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    // Audit reads the journal itself so it can report a broken chain
    if let Commands::Audit = cli.command {
        return commands::audit(&cli.data);
    }

    let mut ctx = AppContext::new(&cli.data)?;
    let correlation_id = cli
        .correlation_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let command = match cli.command {
        Commands::Init {
            config,
            supply,
            admin,
        } => {
            let mut config = match config {
                Some(path) => LedgerConfig::from_file(&path)?,
                None => LedgerConfig::default(),
            };
            if let Some(supply) = supply {
                config.initial_supply = supply;
            }
            if let Some(admin) = admin {
                config.admin = admin;
            }
            return commands::init(&mut ctx, config, &correlation_id);
        }

        Commands::Balance { account } => return commands::balance(&ctx, &account),
        Commands::Supply => return commands::supply(&ctx),
        Commands::Index => return commands::index(&ctx),
        Commands::Shares { account } => return commands::shares(&ctx, &account),
        Commands::Allowance { owner, spender } => {
            return commands::allowance(&ctx, &owner, &spender)
        }
        Commands::Audit => return commands::audit(&cli.data),
        Commands::Info => return commands::info(&ctx),

        Commands::Transfer { from, to, amount } => LedgerCommand::Transfer {
            caller: from,
            to,
            amount,
        },
        Commands::TransferFrom {
            spender,
            from,
            to,
            amount,
        } => LedgerCommand::TransferFrom {
            caller: spender,
            from,
            to,
            amount,
        },
        Commands::Approve {
            owner,
            spender,
            amount,
        } => LedgerCommand::Approve {
            caller: owner,
            spender,
            amount,
        },
        Commands::Rebase { caller } => LedgerCommand::Rebase { caller },
        Commands::TransferAdmin { caller, new_admin } => {
            LedgerCommand::TransferAdmin { caller, new_admin }
        }
    };

    commands::execute(&mut ctx, command, &correlation_id)
}
