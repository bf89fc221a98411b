//! Administrative access gate.
//!
//! Access to the admin view is a single credential check against a
//! configured secret. There are no sessions, tokens, lockouts or audit
//! records; a wrong secret is simply `false`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Single-shot credential check.
pub trait AccessGate: Send + Sync {
    /// Returns `true` if `candidate` grants admin access.
    fn check_secret(&self, candidate: &str) -> bool;
}

/// Gate that compares candidates against one shared secret.
///
/// The comparison is exact: surrounding whitespace is significant and an
/// empty candidate never matches.
#[derive(Clone)]
pub struct SharedSecretGate {
    secret: String,
}

impl SharedSecretGate {
    /// Creates a gate for `secret`.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for SharedSecretGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecretGate")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl AccessGate for SharedSecretGate {
    fn check_secret(&self, candidate: &str) -> bool {
        !candidate.is_empty() && candidate == self.secret
    }
}

/// Login state for the admin view.
///
/// Holds whether the current operator has passed the gate. Logging out
/// simply clears the flag; nothing expires on its own.
#[derive(Debug)]
pub struct AdminSession<G> {
    gate: G,
    authenticated: AtomicBool,
}

impl<G: AccessGate> AdminSession<G> {
    /// Creates a logged-out session guarded by `gate`.
    #[must_use]
    pub const fn new(gate: G) -> Self {
        Self {
            gate,
            authenticated: AtomicBool::new(false),
        }
    }

    /// Attempts to log in. Returns whether the secret was accepted.
    ///
    /// A failed attempt leaves an existing login untouched.
    pub fn login(&self, candidate: &str) -> bool {
        if self.gate.check_secret(candidate) {
            self.authenticated.store(true, Ordering::Release);
            info!("Admin logged in");
            true
        } else {
            warn!("Rejected admin login attempt");
            false
        }
    }

    /// Logs out.
    pub fn logout(&self) {
        if self.authenticated.swap(false, Ordering::AcqRel) {
            info!("Admin logged out");
        }
    }

    /// Whether an operator is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }
}
