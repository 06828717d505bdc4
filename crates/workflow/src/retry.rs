use std::time::Duration;

/// How often the thumbnail offset is polled for, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_secs(10),
        }
    }
}

/// What a single call to the lookup function produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The function couldn't be invoked or its response couldn't be read
    TransportFailure,
    /// The function answered with a status other than 200
    NotOk,
    /// The function answered 200, with the offset if the body held a usable one
    Ok(Option<u64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupState {
    Pending { attempt: u32 },
    Succeeded { offset: u64 },
    FailedRetryable { next_attempt: u32, wait: bool },
    Exhausted,
}

impl LookupState {
    pub fn initial() -> Self {
        LookupState::Pending { attempt: 1 }
    }
}

impl RetryPolicy {
    /// Decide where the lookup goes after `attempt` (counting from 1) produced `outcome`.
    ///
    /// Any 200 ends the lookup, even when the body holds no usable offset.
    /// Only a non 200 status waits before the next attempt; a transport failure retries straight away.
    pub fn next_state(&self, attempt: u32, outcome: AttemptOutcome) -> LookupState {
        match outcome {
            AttemptOutcome::Ok(offset) => LookupState::Succeeded {
                offset: offset.unwrap_or_default(),
            },
            _ if attempt >= self.max_attempts => LookupState::Exhausted,
            AttemptOutcome::NotOk => LookupState::FailedRetryable {
                next_attempt: attempt + 1,
                wait: true,
            },
            AttemptOutcome::TransportFailure => LookupState::FailedRetryable {
                next_attempt: attempt + 1,
                wait: false,
            },
        }
    }
}
