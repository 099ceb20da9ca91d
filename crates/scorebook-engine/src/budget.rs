//! Time limit on writing one sync's blobs

#![allow(clippy::result_large_err)]

use scorebook_core::errors::{ExError, ExErrorKind};
use scorebook_store::errors::Result;
use std::time::{Duration, Instant};

/// Source of the current instant
pub type Clock = fn() -> Instant;

/// Deadline for blob writes, measured from `start`
#[derive(Debug, Clone, Copy)]
pub struct WriteBudget {
    started: Instant,
    limit: Duration,
    clock: Clock,
}

impl WriteBudget {
    pub fn start(limit: Duration) -> Self {
        Self::start_with_clock(limit, Instant::now)
    }

    pub fn start_with_clock(limit: Duration, clock: Clock) -> Self {
        Self {
            started: clock(),
            limit,
            clock,
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Fail once the limit has been reached
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when the elapsed time is at least the limit.
    pub fn check(&self) -> Result<()> {
        let elapsed = (self.clock)().saturating_duration_since(self.started);
        if elapsed >= self.limit {
            return Err(ExError::new(ExErrorKind::Timeout)
                .with_op("materialize_image")
                .with_message(format!(
                    "Writing score images took longer than {}s",
                    self.limit.as_secs()
                )));
        }
        Ok(())
    }
}
