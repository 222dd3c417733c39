use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use kit_lending::config::Config;
use kit_lending::http_client::HttpClient;
use kit_lending::lending::{
    validate_request_now, BorrowingWorkflow, Clock, RequestStatus, SubmitRequest, SystemClock,
};
use kit_lending::models::{Kit, RequestFilter, RequestType, Wallet};
use kit_lending::services::{
    RestAuthService, RestBorrowingRequestService, RestKitDirectory, RestNotificationService,
    RestWalletService,
};
use kit_lending::session::SessionManager;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kit-lending")]
#[command(about = "Campus IoT kit lending client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Account email
    #[arg(long, global = true, env = "KIT_LENDING_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "KIT_LENDING_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List kits in the catalog
    Kits,
    /// Show the wallet balance and history
    Wallet,
    /// Add funds to the wallet
    TopUp { amount: i64 },
    /// Check a request locally without calling the API
    Validate {
        #[arg(long)]
        balance: i64,
        #[arg(long)]
        deposit: i64,
        /// DD/MM/YYYY or YYYY-MM-DD
        #[arg(long)]
        return_date: String,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Submit a borrowing request
    Submit {
        kit_id: String,
        /// DD/MM/YYYY or YYYY-MM-DD
        #[arg(long)]
        return_date: String,
        #[arg(long)]
        reason: String,
        /// Borrow individual components instead of the whole kit
        #[arg(long)]
        component: bool,
    },
    /// List borrowing requests
    Requests {
        #[arg(long)]
        status: Option<RequestStatus>,
    },
    /// Approve a pending request
    Approve { request_id: String },
    /// Reject a pending request
    Reject {
        request_id: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Record handover of an approved kit
    Collect { request_id: String },
    /// Check in a borrowed kit
    Return { request_id: String },
    /// List notifications
    Notifications,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kit_lending=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Commands::Validate {
        balance,
        deposit,
        return_date,
        reason,
    } = &cli.command
    {
        let wallet = Wallet {
            owner_id: "local".to_string(),
            balance: *balance,
        };
        let kit = Kit {
            id: "local".to_string(),
            name: "local".to_string(),
            quantity_total: 1,
            quantity_available: 1,
            deposit_amount: *deposit,
            description: None,
        };
        match validate_request_now(&wallet, &kit, RequestType::BorrowKit, return_date, reason) {
            Ok(normalized) => print_json(&normalized)?,
            Err(e) => {
                tracing::warn!("Validation failed: {}", e);
                println!("invalid: {}", e);
            }
        }
        return Ok(());
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Using API at {}", config.api_url);

    let http_client = Arc::new(HttpClient::new(&config.api_url, config.http_timeout())?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let mut sessions = SessionManager::new(
        Arc::new(RestAuthService::new(http_client.clone())),
        clock.clone(),
    );
    let email = cli.email.context("--email or KIT_LENDING_EMAIL is required")?;
    let password = cli
        .password
        .context("--password or KIT_LENDING_PASSWORD is required")?;
    sessions.login(&email, &password).await?;
    let session = sessions.current()?.clone();

    let workflow = BorrowingWorkflow::new(
        Arc::new(RestKitDirectory::new(http_client.clone())),
        Arc::new(RestWalletService::new(http_client.clone())),
        Arc::new(RestBorrowingRequestService::new(http_client.clone())),
        Arc::new(RestNotificationService::new(http_client.clone())),
        config.refund_policy(),
        clock,
    );

    match cli.command {
        Commands::Kits => print_json(&workflow.kits(&session).await?)?,
        Commands::Wallet => {
            print_json(&workflow.wallet(&session).await?)?;
            print_json(&workflow.transactions(&session).await?)?;
        }
        Commands::TopUp { amount } => print_json(&workflow.top_up(&session, amount).await?)?,
        Commands::Submit {
            kit_id,
            return_date,
            reason,
            component,
        } => {
            let request_type = if component {
                RequestType::BorrowComponent
            } else {
                RequestType::BorrowKit
            };
            let input = SubmitRequest {
                kit_id,
                request_type,
                return_date,
                reason,
            };
            print_json(&workflow.submit(&session, input).await?)?;
        }
        Commands::Requests { status } => {
            let filter = RequestFilter {
                requester_id: None,
                status,
            };
            print_json(&workflow.list_requests(&session, filter).await?)?;
        }
        Commands::Approve { request_id } => {
            print_json(&workflow.approve(&session, &request_id).await?)?
        }
        Commands::Reject { request_id, note } => {
            print_json(&workflow.reject(&session, &request_id, note).await?)?
        }
        Commands::Collect { request_id } => {
            print_json(&workflow.collect(&session, &request_id).await?)?
        }
        Commands::Return { request_id } => {
            print_json(&workflow.return_kit(&session, &request_id).await?)?
        }
        Commands::Notifications => print_json(&workflow.notifications(&session).await?)?,
        Commands::Validate { .. } => {}
    }

    workflow.flush_notifications().await;
    sessions.logout();
    Ok(())
}
