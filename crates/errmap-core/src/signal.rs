//! Cancellation and deadline signals recognised anywhere in an error chain.

use std::error::Error;
use std::io;

use thiserror::Error;

/// The caller withdrew the request before it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// An internal deadline elapsed before the operation completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline exceeded")]
pub struct DeadlineExceeded;

pub fn is_cancellation(link: &(dyn Error + 'static)) -> bool {
    if link.is::<Cancelled>() {
        return true;
    }
    link.downcast_ref::<tokio::task::JoinError>()
        .is_some_and(|join| join.is_cancelled())
}

pub fn is_timeout(link: &(dyn Error + 'static)) -> bool {
    if link.is::<DeadlineExceeded>() || link.is::<tokio::time::error::Elapsed>() {
        return true;
    }
    link.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::TimedOut)
}
