//! Cashflow CLI - Personal finance ledger with AI spending insights
//!
//! Usage:
//!   cashflow init                              Initialize database
//!   cashflow categories add Food --type expense
//!   cashflow transactions add -t expense -a 12.50 -c Food
//!   cashflow transactions suggest "Pizza night" --type expense
//!   cashflow summary monthly --month 5 --year 2024
//!   cashflow insights --period weekly          Ask the model about this week
//!   cashflow serve --port 3000                 Start web server

mod cli;
mod commands;


use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cashflow_core::config::Config;
use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Categories { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_categories_list(&db, None),
                Some(CategoriesAction::List { category_type }) => {
                    commands::cmd_categories_list(&db, category_type.as_deref())
                }
                Some(CategoriesAction::Add {
                    name,
                    category_type,
                }) => commands::cmd_categories_add(&db, &name, &category_type),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_transactions_list(&db, None, None),
                Some(TransactionsAction::List { from, to }) => {
                    commands::cmd_transactions_list(&db, from, to)
                }
                Some(TransactionsAction::Add {
                    transaction_type,
                    amount,
                    category,
                    date,
                    description,
                }) => commands::cmd_transactions_add(
                    &db,
                    &transaction_type,
                    amount,
                    &category,
                    date,
                    &description,
                ),
                Some(TransactionsAction::Suggest {
                    description,
                    transaction_type,
                }) => {
                    let generator = commands::build_generator(&config);
                    commands::cmd_transactions_suggest(
                        &db,
                        &generator,
                        &description,
                        &transaction_type,
                    )
                    .await
                    .map(|_| ())
                }
            }
        }
        Commands::Summary { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_summary_monthly(&db, None, None),
                Some(SummaryAction::Balance) => commands::cmd_summary_balance(&db),
                Some(SummaryAction::Monthly { month, year }) => {
                    commands::cmd_summary_monthly(&db, month, year)
                }
                Some(SummaryAction::Categories { month, year }) => {
                    commands::cmd_summary_categories(&db, month, year)
                }
            }
        }
        Commands::Insights {
            period,
            date,
            json,
            show_prompt,
        } => {
            let db = commands::open_db(&cli.db)?;
            let generator = commands::build_generator(&config);
            let options = commands::InsightsOptions {
                period,
                date,
                json,
                show_prompt,
            };
            commands::cmd_insights(&db, &generator, &options).await
        }
        Commands::Status => commands::cmd_status(&cli.db, &config).await,
        Commands::Serve { port, host } => {
            let mut settings = config.server.clone();
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(host) = host {
                settings.host = host;
            }
            commands::cmd_serve(&cli.db, &config, settings).await
        }
    }
}
