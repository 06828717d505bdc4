use async_trait::async_trait;
use aws_sdk_lambda::operation::invoke::InvokeOutput;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{InvocationType, LogType};
use lambda_runtime::tracing;
use service::{FunctionInvoker, ServiceError};
use std::sync::Arc;

/// Invokes other Lambda functions and waits for their response.
pub struct LambdaInvoker {
    lambda_client: Arc<aws_sdk_lambda::Client>,
}

impl LambdaInvoker {
    pub fn new(lambda_client: Arc<aws_sdk_lambda::Client>) -> Self {
        LambdaInvoker { lambda_client }
    }
}

#[async_trait]
impl FunctionInvoker for LambdaInvoker {
    async fn invoke(&self, function_name: &str, payload: Vec<u8>) -> Result<Vec<u8>, ServiceError> {
        let output: InvokeOutput = self
            .lambda_client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::RequestResponse)
            .log_type(LogType::Tail)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|err| ServiceError::Transport(err.into_service_error().into()))?;

        // The payload then holds the error rather than a response
        if let Some(function_error) = output.function_error() {
            tracing::warn!(function_name, function_error, "Invoked function returned an error");
        }

        Ok(output.payload.map(Blob::into_inner).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_lambda::operation::invoke::InvokeError;
    use aws_sdk_lambda::types::error::ResourceNotFoundException;
    use aws_smithy_mocks::{mock, mock_client, Rule};

    #[tokio::test]
    async fn invoke_returns_response_payload() {
        let invoke_rule: Rule = mock!(aws_sdk_lambda::Client::invoke)
            .match_requests(|req| {
                req.function_name() == Some("media-resource")
                    && req.invocation_type() == Some(&InvocationType::RequestResponse)
                    && req.payload().map(|blob| blob.as_ref()) == Some(b"{}".as_slice())
            })
            .then_output(|| {
                InvokeOutput::builder()
                    .status_code(200)
                    .payload(Blob::new(r#"{"statusCode":200}"#))
                    .build()
            });
        let invoker: LambdaInvoker =
            LambdaInvoker::new(Arc::new(mock_client!(aws_sdk_lambda, [&invoke_rule])));

        let response: Vec<u8> = invoker
            .invoke("media-resource", b"{}".to_vec())
            .await
            .expect("Invoke should succeed");

        assert_eq!(br#"{"statusCode":200}"#.to_vec(), response);
    }

    #[tokio::test]
    async fn invoke_returns_function_error_payload() {
        let invoke_rule: Rule = mock!(aws_sdk_lambda::Client::invoke).then_output(|| {
            InvokeOutput::builder()
                .status_code(200)
                .function_error("Unhandled")
                .payload(Blob::new(r#"{"errorMessage":"boom"}"#))
                .build()
        });
        let invoker: LambdaInvoker =
            LambdaInvoker::new(Arc::new(mock_client!(aws_sdk_lambda, [&invoke_rule])));

        let response: Vec<u8> = invoker
            .invoke("media-resource", b"{}".to_vec())
            .await
            .expect("Function errors are returned as payloads");

        assert_eq!(br#"{"errorMessage":"boom"}"#.to_vec(), response);
    }

    #[tokio::test]
    async fn invoke_failure_is_transport_error() {
        let invoke_rule: Rule = mock!(aws_sdk_lambda::Client::invoke).then_error(|| {
            InvokeError::ResourceNotFoundException(ResourceNotFoundException::builder().build())
        });
        let invoker: LambdaInvoker =
            LambdaInvoker::new(Arc::new(mock_client!(aws_sdk_lambda, [&invoke_rule])));

        let result: Result<Vec<u8>, ServiceError> = invoker.invoke("missing", b"{}".to_vec()).await;

        assert!(matches!(result, Err(ServiceError::Transport(_))));
    }
}
