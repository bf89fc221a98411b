//! # Ticket Queue Core
//!
//! Numbering and lifecycle rules for a visitor queue.
//!
//! Visitors request a ticket and receive a sequence number. An administrator
//! moves each ticket through `Waiting → InProgress → Done`, or removes it.
//!
//! ## Core Concepts
//!
//! - **Ticket**: a numbered request with a holder name, a note and a state
//! - **`TicketLedger`**: owns every rule (validation, numbering, transitions)
//! - **`TicketStore`**: persistence seam; assigns numbers atomically
//! - **Clock**: injected time source
//! - **`AccessGate`**: single credential check guarding the admin view
//!
//! ## Example
//!
//! ```ignore
//! use ticket_queue_core::{TicketLedger, TicketState, environment::SystemClock};
//! use ticket_queue_testing::InMemoryTicketStore;
//!
//! let ledger = TicketLedger::new(InMemoryTicketStore::new(), Arc::new(SystemClock));
//! let number = ledger.create("Ana", "Consulta").await?;
//! assert_eq!(number.get(), 1);
//! ```

pub mod environment;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{Field, LedgerError, StoreError};
pub use gate::{AccessGate, AdminSession, SharedSecretGate};
pub use ledger::TicketLedger;
pub use store::{StateUpdate, TicketStore};
pub use types::{
    NewTicket, QueueSummary, Ticket, TicketId, TicketNumber, TicketState, TicketsByState,
};
