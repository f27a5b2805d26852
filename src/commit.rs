//! Submitting a batch of statements to the backend and reconciling the
//! pending changeset with the outcome.
//!
//! A commit moves through `Idle → Committing → (Succeeded | Failed)`. Only one
//! commit may be in flight at a time. On success the changeset is cleared; on
//! failure it is left exactly as it was, so that the operator can fix the
//! statements and retry the same batch. A batch abandoned before the backend
//! answers, through [`CommitCoordinator::abort`] or by dropping the future of
//! [`CommitCoordinator::commit`], also ends in `Failed` with the changeset
//! kept, since the backend may or may not have applied it.
//!
//! The statements committed are whatever text the caller passes, usually the
//! output of [`ChangeSet::sql_statements`], possibly edited by the operator.
//! Edited text is never parsed back into the changeset.

mod backend;

pub use backend::MutationBackend;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Display;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::builders::ChangeSet;
use crate::errors::Error;

/// State message recorded when a commit is abandoned before the backend answers.
const CANCELLED: &str = "commit cancelled before the backend answered";

/// Source of batch tickets, unique across every coordinator.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(0);

/// The state of the most recent commit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommitState {
    /// No commit has been attempted yet.
    #[default]
    Idle,
    /// A batch is awaiting the backend.
    Committing,
    /// The last batch was applied.
    Succeeded,
    /// The last batch was rejected or abandoned, with the given message.
    Failed(String),
}

/// A batch handed out by [`CommitCoordinator::begin`], to be returned to
/// [`CommitCoordinator::finish`] or [`CommitCoordinator::abort`] of the same
/// coordinator.
#[derive(Debug)]
pub struct CommitBatch {
    statements: Vec<String>,
    generation: u64,
    ticket: u64,
}

impl CommitBatch {
    /// The statements to send to the backend.
    #[inline]
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }
}

/// Drives commit attempts for one table view session.
#[derive(Debug, Default)]
pub struct CommitCoordinator {
    state: CommitState,
    in_flight: Option<u64>,
}

impl CommitCoordinator {
    /// Create an idle coordinator.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The state of the most recent commit attempt.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &CommitState {
        &self.state
    }

    /// Whether a batch is awaiting the backend. Callers should disable
    /// interactive edits while this holds.
    #[inline]
    #[must_use]
    pub fn is_committing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Starts a commit of `statements` for the pending `changes`.
    ///
    /// Blank statements are dropped; the others are sent verbatim.
    ///
    /// # Errors
    ///
    /// * `CommitInProgress` - If a commit is already in flight.
    /// * `EmptyCommit` - If no non-blank statement was given.
    ///
    /// The coordinator state is unchanged on error.
    pub fn begin(
        &mut self,
        changes: &ChangeSet,
        statements: Vec<String>,
    ) -> Result<CommitBatch, Error> {
        if self.is_committing() {
            return Err(Error::CommitInProgress);
        }
        let statements: Vec<String> = statements
            .into_iter()
            .filter(|statement| !statement.trim().is_empty())
            .collect();
        if statements.is_empty() {
            return Err(Error::EmptyCommit);
        }
        let ticket = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(statements = statements.len(), ticket, "commit started");
        self.state = CommitState::Committing;
        self.in_flight = Some(ticket);
        Ok(CommitBatch {
            statements,
            generation: changes.generation(),
            ticket,
        })
    }

    /// Completes the commit of `batch` with the backend's `outcome`.
    ///
    /// On success, `changes` is cleared unless it was already cleared while
    /// the batch was in flight, in which case it holds edits against a newer
    /// snapshot and is left alone. On failure, `changes` is not touched.
    ///
    /// # Errors
    ///
    /// * `NoCommitInProgress` - If no commit is in flight.
    /// * `ForeignBatch` - If `batch` is not the one this coordinator has in flight.
    /// * `CommitFailed` - If `outcome` is an error; carries its text verbatim.
    pub fn finish<E: Display>(
        &mut self,
        changes: &mut ChangeSet,
        batch: CommitBatch,
        outcome: Result<(), E>,
    ) -> Result<(), Error> {
        self.release(&batch)?;
        match outcome {
            Ok(()) => {
                if changes.generation() == batch.generation {
                    changes.revert_all();
                } else {
                    tracing::debug!("snapshot replaced during commit, keeping newer edits");
                }
                tracing::info!(statements = batch.statements.len(), "commit succeeded");
                self.state = CommitState::Succeeded;
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(error = %message, "commit failed, pending changes kept");
                self.state = CommitState::Failed(message.clone());
                Err(Error::CommitFailed(message))
            }
        }
    }

    /// Abandons the commit of `batch` without a backend answer.
    ///
    /// The pending changes are kept and the state becomes `Failed`, since the
    /// backend may or may not have applied the batch.
    ///
    /// # Errors
    ///
    /// * `NoCommitInProgress` - If no commit is in flight.
    /// * `ForeignBatch` - If `batch` is not the one this coordinator has in flight.
    pub fn abort(&mut self, batch: CommitBatch) -> Result<(), Error> {
        self.release(&batch)?;
        self.cancel();
        Ok(())
    }

    /// Commits `statements` through `backend` in one round trip.
    ///
    /// This is [`CommitCoordinator::begin`], the backend call and
    /// [`CommitCoordinator::finish`] in sequence. Dropping the returned
    /// future before the backend answers aborts the commit.
    ///
    /// # Errors
    ///
    /// Fails under the conditions of [`CommitCoordinator::begin`] and
    /// [`CommitCoordinator::finish`].
    pub async fn commit<B: MutationBackend>(
        &mut self,
        changes: &mut ChangeSet,
        statements: Vec<String>,
        backend: &mut B,
    ) -> Result<(), Error> {
        let batch = self.begin(changes, statements)?;
        let in_flight = InFlight {
            coordinator: self,
            answered: false,
        };
        let outcome = backend.execute_mutations(batch.statements()).await;
        in_flight.finish(changes, batch, outcome)
    }

    /// Clears the in-flight marker if it belongs to `batch`.
    fn release(&mut self, batch: &CommitBatch) -> Result<(), Error> {
        match self.in_flight {
            None => Err(Error::NoCommitInProgress),
            Some(ticket) if ticket != batch.ticket => Err(Error::ForeignBatch),
            Some(_) => {
                self.in_flight = None;
                Ok(())
            }
        }
    }

    fn cancel(&mut self) {
        tracing::warn!("commit cancelled, pending changes kept");
        self.in_flight = None;
        self.state = CommitState::Failed(CANCELLED.into());
    }
}

/// Holds a coordinator while its batch awaits the backend, and cancels the
/// commit if dropped first.
struct InFlight<'a> {
    coordinator: &'a mut CommitCoordinator,
    answered: bool,
}

impl InFlight<'_> {
    fn finish<E: Display>(
        mut self,
        changes: &mut ChangeSet,
        batch: CommitBatch,
        outcome: Result<(), E>,
    ) -> Result<(), Error> {
        self.answered = true;
        self.coordinator.finish(changes, batch, outcome)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.answered {
            self.coordinator.cancel();
        }
    }
}

/// Splits operator-edited SQL text into statements.
///
/// Statements end at each `;` outside single- or double-quoted text, so line
/// breaks and whitespace inside quoted values are kept. Whitespace around a
/// statement is trimmed and empty statements are dropped. Trailing text
/// without a final `;` forms the last statement.
#[must_use]
pub fn split_statements(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match quote {
            // A doubled quote closes and reopens, which keeps it inside.
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == ';' => {
                push_statement(&mut statements, &text[start..=i]);
                start = i + 1;
            }
            None => {}
        }
    }
    push_statement(&mut statements, &text[start..]);
    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let statement = raw.trim();
    if !statement.is_empty() && statement != ";" {
        statements.push(statement.to_string());
    }
}
