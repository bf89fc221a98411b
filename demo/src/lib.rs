//! Scripted walkthrough of the ticket queue.
//!
//! Two visitors request tickets, an operator logs into the admin view and
//! works the queue, and the final counts are reported. The same script runs
//! against any [`TicketStore`].

pub mod config;

pub use config::{AdminConfig, Config, StoreBackend};

use thiserror::Error;
use ticket_queue_core::{
    AccessGate, AdminSession, LedgerError, QueueSummary, TicketLedger, TicketState, TicketStore,
    TicketsByState,
};

/// Errors that stop the walkthrough.
#[derive(Error, Debug)]
pub enum DemoError {
    /// The configured admin secret was refused by the gate.
    #[error("Admin access denied")]
    AccessDenied,

    /// A step the ledger must refuse was accepted.
    #[error("Ledger accepted {0}")]
    RuleViolation(String),

    /// A ledger operation failed unexpectedly.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Runs the scripted walkthrough and returns the final queue counts.
///
/// # Errors
///
/// Returns [`DemoError::AccessDenied`] if `admin_secret` does not open the
/// gate, or [`DemoError::Ledger`] if a step that should succeed fails.
pub async fn run<S, G>(
    ledger: &TicketLedger<S>,
    session: &AdminSession<G>,
    admin_secret: &str,
) -> Result<QueueSummary, DemoError>
where
    S: TicketStore,
    G: AccessGate,
{
    println!("=== Ticket Queue ===\n");

    println!("Requesting tickets...");
    let ana = ledger.create_ticket("Ana", "Consulta").await?;
    let luis = ledger.create_ticket("  Luis  ", "Reclamo").await?;
    println!("  {} {} ({})", ana.number(), ana.holder_name(), ana.note());
    println!("  {} {} ({})", luis.number(), luis.holder_name(), luis.note());

    let error = expect_rejection(
        "a blank request",
        ledger.create_ticket("   ", "Sin nombre").await,
        |e| matches!(e, LedgerError::Validation { .. }),
    )?;
    println!("  rejected: {error}");

    println!("\nOpening the admin view...");
    if !session.login("not-the-secret") {
        println!("  wrong secret refused");
    }
    if !session.login(admin_secret) {
        return Err(DemoError::AccessDenied);
    }
    println!("  logged in");

    print_board(&ledger.list_by_state().await?);

    println!("\nWorking the queue...");
    let state = ledger.advance(ana.id()).await?;
    println!("  {} -> {state}", ana.number());
    ledger.transition(luis.id(), TicketState::InProgress).await?;
    println!("  {} -> {}", luis.number(), TicketState::InProgress);
    let state = ledger.advance(ana.id()).await?;
    println!("  {} -> {state}", ana.number());

    let error = expect_rejection(
        "a backward move",
        ledger.transition(ana.id(), TicketState::Waiting).await,
        |e| matches!(e, LedgerError::IllegalTransition { .. }),
    )?;
    println!("  refused: {error}");

    print_board(&ledger.list_by_state().await?);

    println!("\nRemoving {}...", ana.number());
    ledger.remove(ana.id()).await?;
    ledger.remove(ana.id()).await?;

    let next = ledger.create("Marta", "Turno nuevo").await?;
    println!("  next ticket issued: {next}");

    let summary = ledger.summary().await?;
    println!("\nFinal counts: {summary}");

    session.logout();
    println!("Logged out");

    Ok(summary)
}

/// Passes through the error `refused` expects; anything else stops the walkthrough.
fn expect_rejection<T>(
    step: &str,
    result: Result<T, LedgerError>,
    refused: impl FnOnce(&LedgerError) -> bool,
) -> Result<LedgerError, DemoError> {
    match result {
        Err(error) if refused(&error) => Ok(error),
        Err(error) => Err(error.into()),
        Ok(_) => Err(DemoError::RuleViolation(step.to_string())),
    }
}

fn print_board(view: &TicketsByState) {
    for state in TicketState::ALL {
        let tickets = view.get(state);
        println!("\n  {state} ({})", tickets.len());
        for ticket in tickets {
            println!(
                "    {} {} - {}",
                ticket.number(),
                ticket.holder_name(),
                ticket.note()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_queue_core::{StoreError, TicketId};

    fn is_validation(error: &LedgerError) -> bool {
        matches!(error, LedgerError::Validation { .. })
    }

    #[test]
    fn accepted_step_stops_the_walkthrough() {
        let result = expect_rejection("a blank request", Ok(()), is_validation);

        assert!(matches!(
            result,
            Err(DemoError::RuleViolation(step)) if step == "a blank request"
        ));
    }

    #[test]
    fn expected_refusal_passes_through() {
        let id = TicketId::new();
        let refused: Result<(), _> = Err(LedgerError::IllegalTransition {
            id,
            from: TicketState::Done,
            to: TicketState::Waiting,
        });

        let error = expect_rejection("a backward move", refused, |e| {
            matches!(e, LedgerError::IllegalTransition { .. })
        })
        .unwrap();
        assert!(matches!(error, LedgerError::IllegalTransition { .. }));
    }

    #[test]
    fn unrelated_failure_is_reported_as_ledger_error() {
        let failed: Result<(), _> = Err(LedgerError::from(StoreError::Unavailable(
            "down".to_string(),
        )));

        let result = expect_rejection("a blank request", failed, is_validation);
        assert!(matches!(
            result,
            Err(DemoError::Ledger(LedgerError::Persistence(_)))
        ));
    }
}
