//! The execution backend a commit batch is sent to.

use alloc::string::String;
use core::fmt::Display;
use core::future::Future;

/// A backend able to execute a batch of mutation statements in one round trip.
///
/// The batch is all-or-nothing from the caller's perspective: either every
/// statement was applied, or the call fails and the error is surfaced to the
/// operator as text.
pub trait MutationBackend {
    /// The error reported when the batch is rejected.
    type Error: Display;

    /// Executes `statements` as one batch.
    fn execute_mutations(
        &mut self,
        statements: &[String],
    ) -> impl Future<Output = Result<(), Self::Error>>;
}

