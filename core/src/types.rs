//! Domain types for the ticket queue.
//!
//! A queue is a collection of numbered tickets. Each ticket moves through a
//! fixed lifecycle, `Waiting → InProgress → Done`, and carries the holder's
//! name and a short note explaining the visit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TicketId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence number printed on a ticket.
///
/// Numbers start at 1 and are handed out by the store from a high-water
/// mark, so a number is never reused even after its ticket is deleted.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TicketNumber(u64);

impl TicketNumber {
    /// The first number issued by an empty store.
    pub const FIRST: Self = Self(1);

    /// Wraps a raw number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the number that follows this one, or `None` once the
    /// numbering space is exhausted.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Position of a ticket in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    /// Requested, not yet attended (initial state)
    Waiting,
    /// Currently being attended
    InProgress,
    /// Attended (terminal state)
    Done,
}

impl TicketState {
    /// All states in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Waiting, Self::InProgress, Self::Done];

    /// The only state reachable from `self`, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::InProgress),
            Self::InProgress => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Whether moving from `self` to `target` is a legal transition.
    ///
    /// Only single forward steps are legal. Self-transitions, backward moves
    /// and skips (`Waiting → Done`) are rejected.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Whether the ticket has reached the end of its lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Stable text form, used as the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown ticket state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown ticket state: {0}")]
pub struct ParseTicketStateError(pub String);

impl FromStr for TicketState {
    type Err = ParseTicketStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(ParseTicketStateError(other.to_string())),
        }
    }
}

// ============================================================================
// Tickets
// ============================================================================

/// A ticket that has been validated by the ledger but not yet numbered.
///
/// Stores turn a candidate into a [`Ticket`] by assigning the next number
/// from their high-water mark.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    /// Identifier chosen by the ledger
    pub id: TicketId,
    /// Trimmed holder name
    pub holder_name: String,
    /// Trimmed note
    pub note: String,
    /// Creation time from the ledger's clock
    pub created_at: DateTime<Utc>,
}

impl NewTicket {
    /// Completes the candidate with its assigned number.
    ///
    /// The resulting ticket always starts in [`TicketState::Waiting`].
    #[must_use]
    pub fn into_ticket(self, number: TicketNumber) -> Ticket {
        Ticket {
            id: self.id,
            number,
            holder_name: self.holder_name,
            note: self.note,
            created_at: self.created_at,
            state: TicketState::Waiting,
        }
    }
}

/// A numbered ticket in the queue.
///
/// Fields are read-only: `id`, `number` and `created_at` never change, and
/// `state` only changes through the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    number: TicketNumber,
    holder_name: String,
    note: String,
    created_at: DateTime<Utc>,
    state: TicketState,
}

impl Ticket {
    /// Rebuilds a ticket from persisted columns.
    ///
    /// Only stores should call this, when hydrating rows they previously
    /// produced through [`NewTicket::into_ticket`].
    #[must_use]
    pub const fn restore(
        id: TicketId,
        number: TicketNumber,
        holder_name: String,
        note: String,
        created_at: DateTime<Utc>,
        state: TicketState,
    ) -> Self {
        Self {
            id,
            number,
            holder_name,
            note,
            created_at,
            state,
        }
    }

    /// Unique identifier
    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.id
    }

    /// Sequence number
    #[must_use]
    pub const fn number(&self) -> TicketNumber {
        self.number
    }

    /// Name of the person holding the ticket
    #[must_use]
    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    /// Reason for the visit
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// When the ticket was requested
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> TicketState {
        self.state
    }

    /// Returns a copy of this ticket in `state`.
    ///
    /// Used by stores after a successful compare-and-set update.
    #[must_use]
    pub fn with_state(self, state: TicketState) -> Self {
        Self { state, ..self }
    }

    /// Canonical ordering key: creation time, then number.
    #[must_use]
    pub const fn sort_key(&self) -> (DateTime<Utc>, TicketNumber) {
        (self.created_at, self.number)
    }
}

// ============================================================================
// Views
// ============================================================================

/// Tickets partitioned by lifecycle state, each in canonical order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketsByState {
    /// Tickets still waiting
    pub waiting: Vec<Ticket>,
    /// Tickets being attended
    pub in_progress: Vec<Ticket>,
    /// Attended tickets
    pub done: Vec<Ticket>,
}

impl TicketsByState {
    /// Partitions tickets by state, keeping their relative order.
    #[must_use]
    pub fn partition(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let mut view = Self::default();
        for ticket in tickets {
            match ticket.state() {
                TicketState::Waiting => view.waiting.push(ticket),
                TicketState::InProgress => view.in_progress.push(ticket),
                TicketState::Done => view.done.push(ticket),
            }
        }
        view
    }

    /// Tickets in `state`.
    #[must_use]
    pub fn get(&self, state: TicketState) -> &[Ticket] {
        match state {
            TicketState::Waiting => &self.waiting,
            TicketState::InProgress => &self.in_progress,
            TicketState::Done => &self.done,
        }
    }

    /// Total number of tickets across all partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waiting.len() + self.in_progress.len() + self.done.len()
    }

    /// Whether every partition is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-state counts.
    #[must_use]
    pub fn summary(&self) -> QueueSummary {
        QueueSummary {
            waiting: self.waiting.len(),
            in_progress: self.in_progress.len(),
            done: self.done.len(),
        }
    }
}

/// Ticket counts per state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSummary {
    /// Waiting tickets
    pub waiting: usize,
    /// Tickets in progress
    pub in_progress: usize,
    /// Done tickets
    pub done: usize,
}

impl QueueSummary {
    /// Total tickets in the queue
    #[must_use]
    pub const fn total(&self) -> usize {
        self.waiting + self.in_progress + self.done
    }
}

impl fmt::Display for QueueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "waiting: {}, in progress: {}, done: {}",
            self.waiting, self.in_progress, self.done
        )
    }
}
