//! Ticket queue demo.
//!
//! Runs the scripted walkthrough against the configured store.
//!
//! # Usage
//!
//! ```bash
//! # In-memory store
//! cargo run -p ticket-queue-demo
//!
//! # PostgreSQL store
//! TICKET_STORE=postgres DATABASE_URL=postgres://localhost/ticket_queue \
//!     cargo run -p ticket-queue-demo
//! ```

use std::sync::Arc;
use ticket_queue_core::environment::SystemClock;
use ticket_queue_core::{AdminSession, SharedSecretGate, TicketLedger};
use ticket_queue_demo::{Config, StoreBackend};
use ticket_queue_postgres::PostgresTicketStore;
use ticket_queue_testing::InMemoryTicketStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| ticket_queue_demo::config::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(store = %config.store, "Configuration loaded");

    let session = AdminSession::new(SharedSecretGate::new(config.admin.secret.clone()));
    let clock = Arc::new(SystemClock);

    let summary = match config.store {
        StoreBackend::Memory => {
            let ledger = TicketLedger::new(InMemoryTicketStore::new(), clock);
            ticket_queue_demo::run(&ledger, &session, &config.admin.secret).await?
        }
        StoreBackend::Postgres => {
            let store = PostgresTicketStore::connect_with(&config.postgres).await?;
            store.migrate().await?;
            tracing::info!("✓ Migrations applied");

            let ledger = TicketLedger::new(store, clock);
            ticket_queue_demo::run(&ledger, &session, &config.admin.secret).await?
        }
    };

    tracing::info!(total = summary.total(), "Walkthrough complete");
    Ok(())
}
