use crate::{ErrorReporter, FunctionInvoker, ServiceError};
use async_trait::async_trait;
use model::event::IntakeEvent;
use serde::Serialize;
use std::sync::Arc;

/// Payload understood by the pipeline's error handler function.
#[derive(Debug, Serialize)]
pub struct ErrorReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<&'a str>,
    pub event: &'a IntakeEvent,
    pub function: &'a str,
    pub error: String,
}

/// Forwards errors to an error handler function.
pub struct FunctionErrorReporter {
    invoker: Arc<dyn FunctionInvoker>,
    error_handler: String,
    // Name of this function, so the handler knows where the error came from
    function_name: String,
}

impl FunctionErrorReporter {
    pub fn new(invoker: Arc<dyn FunctionInvoker>, error_handler: String, function_name: String) -> Self {
        FunctionErrorReporter {
            invoker,
            error_handler,
            function_name,
        }
    }
}

#[async_trait]
impl ErrorReporter for FunctionErrorReporter {
    async fn report(
        &self,
        event: &IntakeEvent,
        error: &(dyn std::error::Error + Send + Sync),
    ) -> Result<(), ServiceError> {
        let report: ErrorReport = ErrorReport {
            guid: event.guid.as_deref(),
            event,
            function: &self.function_name,
            error: error.to_string(),
        };
        let payload: Vec<u8> =
            serde_json::to_vec(&report).map_err(|err| ServiceError::BadRequest(err.into()))?;

        self.invoker.invoke(&self.error_handler, payload).await?;

        Ok(())
    }
}
