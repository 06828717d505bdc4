use async_trait::async_trait;
use model::Error;
use model::event::IntakeEvent;
use std::fmt::{Display, Formatter};

pub mod reporter;

/// Synchronous request/response call to another function.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Invoke `function_name` with a JSON payload and return the raw response payload.
    async fn invoke(&self, function_name: &str, payload: Vec<u8>) -> Result<Vec<u8>, ServiceError>;
}

/// Receives every error which stops an intake, along with the event which caused it.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report(
        &self,
        event: &IntakeEvent,
        error: &(dyn std::error::Error + Send + Sync),
    ) -> Result<(), ServiceError>;
}

/// Errors arising from calling another function.
#[derive(Debug)]
pub enum ServiceError {
    // The request couldn't be serialized
    BadRequest(Error),
    // The call itself failed
    Transport(Error),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::BadRequest(err) => write!(f, "BadRequest({err})"),
            ServiceError::Transport(err) => write!(f, "Transport({err})"),
        }
    }
}

impl std::error::Error for ServiceError {}
