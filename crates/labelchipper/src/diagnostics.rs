//! # Deduplicated Diagnostics
//!
//! Data-quality conditions found during resolution (unparseable generations,
//! forced picks between ambiguous labels) are recovered locally and reported
//! through a [`DiagnosticLog`], which forwards each distinct message to the
//! `log` facade at most once.
//!
//! The log is passed explicitly into resolution calls; a fresh log per run
//! (or per test) resets the deduplication state.

use log::Level;
use parking_lot::Mutex;

use crate::types::{LCHashSet, hash_set_new};

/// A recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The log level the message was emitted at.
    pub level: Level,

    /// The message.
    pub message: String,
}

#[derive(Debug, Default)]
struct DiagnosticState {
    seen: LCHashSet<String>,
    records: Vec<Diagnostic>,
}

/// "Log each distinct message at most once" sink.
///
/// Internally synchronized; safe to share across resolution threads.
#[derive(Debug)]
pub struct DiagnosticLog {
    state: Mutex<DiagnosticState>,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticLog {
    /// Create a new, empty diagnostic log.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DiagnosticState {
                seen: hash_set_new(),
                records: Vec::new(),
            }),
        }
    }

    /// Emit a message, unless an identical message was already emitted.
    ///
    /// ## Arguments
    /// * `level` - The log level to emit at.
    /// * `message` - The message.
    ///
    /// ## Returns
    /// `true` if the message was new, and was emitted.
    pub fn log_once(
        &self,
        level: Level,
        message: impl Into<String>,
    ) -> bool {
        let message = message.into();

        let mut state = self.state.lock();
        if state.seen.contains(&message) {
            return false;
        }
        state.seen.insert(message.clone());

        log::log!(level, "{}", message);
        state.records.push(Diagnostic { level, message });
        true
    }

    /// Has this message been emitted?
    pub fn contains(
        &self,
        message: &str,
    ) -> bool {
        self.state.lock().seen.contains(message)
    }

    /// Get the number of distinct messages emitted.
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Check if no messages have been emitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a copy of the emitted diagnostics, in emission order.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.state.lock().records.clone()
    }

    /// Forget all emitted messages.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.seen.clear();
        state.records.clear();
    }
}
