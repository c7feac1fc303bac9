//! Retry policy for transient failures.
//!
//! After an attempt raises an [`HttpError`], the [`RetryPolicy`] decides
//! whether to wait and resend the identical request:
//!
//! - **408 / 429** (client): wait for the delay the server announced and
//!   retry. These retries do not consume the attempt budget, so they go on
//!   for as long as the server keeps answering 408/429, unless a wall-clock
//!   ceiling has been configured.
//! - **500 / 502** (server): wait the configured server delay and retry,
//!   while fewer than [`MAX_RETRY`] budgeted retries have been made.
//! - **Timeout, empty reply, receive error, TLS connect error** (network):
//!   same as server errors.
//! - Everything else propagates unchanged.

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::errors::HttpError;
use crate::clients::http_response::rate_limit_delay;
use crate::config::ConnectionConfig;

/// Maximum number of budgeted retries per logical call.
pub const MAX_RETRY: u32 = 5;

/// What to do after a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for `delay` and resend.
    Retry {
        /// How long to wait before resending.
        delay: Duration,
        /// Whether this retry counts against [`MAX_RETRY`].
        consumes_budget: bool,
    },
    /// Propagate the error.
    GiveUp,
}

/// Per-call retry bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetryState {
    attempts_made: u32,
    rate_limit_waited: Duration,
}

impl RetryState {
    /// Creates a fresh state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of budgeted retries made so far.
    #[must_use]
    pub const fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    /// Returns the total time spent waiting out 408/429 responses.
    #[must_use]
    pub const fn rate_limit_waited(&self) -> Duration {
        self.rate_limit_waited
    }

    /// Clears all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records a retry that is about to happen.
    pub fn record(&mut self, decision: RetryDecision) {
        if let RetryDecision::Retry {
            delay,
            consumes_budget,
        } = decision
        {
            if consumes_budget {
                self.attempts_made += 1;
            } else {
                self.rate_limit_waited += delay;
            }
        }
    }
}

/// Decides whether a failed attempt is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    auto_retry: bool,
    max_retries: u32,
    server_retry_delay: Duration,
    rate_limit_wait_ceiling: Option<Duration>,
}

impl RetryPolicy {
    /// Builds the policy described by a connection configuration.
    #[must_use]
    pub const fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            auto_retry: config.auto_retry(),
            max_retries: MAX_RETRY,
            server_retry_delay: config.server_retry_delay(),
            rate_limit_wait_ceiling: config.rate_limit_wait_ceiling(),
        }
    }

    /// Returns the maximum number of budgeted retries.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Decides what to do about `error`.
    ///
    /// `headers` are the headers of the response that caused the error (empty
    /// for network errors); they carry the rate-limit reset delay.
    #[must_use]
    pub fn decide(
        &self,
        error: &HttpError,
        state: &RetryState,
        headers: &HashMap<String, String>,
    ) -> RetryDecision {
        if !self.auto_retry {
            return RetryDecision::GiveUp;
        }

        let budget_left = state.attempts_made < self.max_retries;
        match error {
            HttpError::Client(e) if matches!(e.code, 408 | 429) => {
                let delay = rate_limit_delay(headers).unwrap_or_default();
                if let Some(ceiling) = self.rate_limit_wait_ceiling {
                    if state.rate_limit_waited + delay > ceiling {
                        return RetryDecision::GiveUp;
                    }
                }
                RetryDecision::Retry {
                    delay,
                    consumes_budget: false,
                }
            }
            HttpError::Server(e) if matches!(e.code, 500 | 502) && budget_left => {
                RetryDecision::Retry {
                    delay: self.server_retry_delay,
                    consumes_budget: true,
                }
            }
            HttpError::Network(e) if e.code.is_transient() && budget_left => RetryDecision::Retry {
                delay: self.server_retry_delay,
                consumes_budget: true,
            },
            _ => RetryDecision::GiveUp,
        }
    }
}
