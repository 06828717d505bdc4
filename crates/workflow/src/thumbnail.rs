use crate::retry::{AttemptOutcome, LookupState, RetryPolicy};
use lambda_runtime::tracing;
use model::lookup::{LookupRequest, LookupResponse};
use service::FunctionInvoker;
use std::sync::Arc;

pub const DEFAULT_THUMBNAIL_OFFSET: u64 = 0;

/// Finds the thumbnail frame offset recorded for a video by the media resource function.
pub struct ThumbnailLookup {
    invoker: Arc<dyn FunctionInvoker>,
    function_name: String,
    policy: RetryPolicy,
}

impl ThumbnailLookup {
    pub fn new(invoker: Arc<dyn FunctionInvoker>, function_name: String, policy: RetryPolicy) -> Self {
        ThumbnailLookup {
            invoker,
            function_name,
            policy,
        }
    }

    /// Never fails, any problem is logged and gives the default offset.
    pub async fn offset_for(&self, video_file_name: &str) -> u64 {
        let payload: Vec<u8> = match serde_json::to_vec(&LookupRequest::for_video(video_file_name)) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!("Could not build request for {}::{}", self.function_name, err);
                return DEFAULT_THUMBNAIL_OFFSET;
            }
        };

        let mut state: LookupState = LookupState::initial();

        loop {
            state = match state {
                LookupState::Pending { attempt } => {
                    let outcome: AttemptOutcome = self.attempt(payload.clone()).await;
                    tracing::debug!(attempt, ?outcome, "Thumbnail lookup attempt");

                    self.policy.next_state(attempt, outcome)
                }
                LookupState::FailedRetryable { next_attempt, wait } => {
                    if wait {
                        tokio::time::sleep(self.policy.delay).await;
                    }

                    LookupState::Pending {
                        attempt: next_attempt,
                    }
                }
                LookupState::Succeeded { offset } => return offset,
                LookupState::Exhausted => {
                    tracing::warn!(
                        video_file_name,
                        "No thumbnail offset after {} attempts, using default",
                        self.policy.max_attempts
                    );

                    return DEFAULT_THUMBNAIL_OFFSET;
                }
            }
        }
    }

    async fn attempt(&self, payload: Vec<u8>) -> AttemptOutcome {
        let raw: Vec<u8> = match self.invoker.invoke(&self.function_name, payload).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Could not fetch {}::{}", self.function_name, err);
                return AttemptOutcome::TransportFailure;
            }
        };

        let response: LookupResponse = match serde_json::from_slice(&raw) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("Unreadable response from {}::{}", self.function_name, err);
                return AttemptOutcome::TransportFailure;
            }
        };

        tracing::info!("Status code: {:?}", response.status_code);

        if response.is_ok() {
            AttemptOutcome::Ok(response.thumbnail_offset())
        } else {
            AttemptOutcome::NotOk
        }
    }
}
