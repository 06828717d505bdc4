use async_trait::async_trait;
use aws_sdk_lambda::operation::invoke::InvokeOutput;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_s3::operation::get_object::{GetObjectError, GetObjectOutput};
use aws_sdk_s3::operation::head_object::{HeadObjectError, HeadObjectOutput};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::error::{NoSuchKey, NotFound};
use aws_smithy_mocks::{mock, mock_client, Rule, RuleMode};
use model::env::*;
use model::event::{EventRecord, IntakeEvent, S3Entity, S3Object};
use serde_json::{json, Value};
use service::{ErrorReporter, FunctionInvoker, ServiceError};
use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::Mutex;
use store::StoreErrorReason::NotFound as StoreNotFound;
use store::StoreOperation::{GetObject, HeadObject};
use store::{ObjectStore, StoreError};

/// Test environment values
pub const TEST_SOURCE_BUCKET: &str = "vod-source";
pub const TEST_DESTINATION_BUCKET: &str = "vod-destination";
pub const TEST_MEDIA_RESOURCE_FUNCTION: &str = "media-resource";
pub const TEST_ERROR_HANDLER: &str = "error-handler";

/// Variables for a complete configuration with `FrameCapture` on and `EnableMediaPackage` off
pub fn default_env_vars() -> Vec<(String, String)> {
    [
        (WORKFLOW_NAME, "vod-workflow"),
        (SOURCE_BUCKET, TEST_SOURCE_BUCKET),
        (DESTINATION_BUCKET, TEST_DESTINATION_BUCKET),
        (CLOUD_FRONT, "d111111abcdef8.cloudfront.net"),
        (FRAME_CAPTURE, "true"),
        (ARCHIVE_SOURCE, "DISABLED"),
        (JOB_TEMPLATE_2160P, "tpl_2160p"),
        (JOB_TEMPLATE_1080P, "tpl_1080p"),
        (JOB_TEMPLATE_720P, "tpl_720p"),
        (INPUT_ROTATE, "DEGREE_0"),
        (ACCELERATED_TRANSCODING, "PREFERRED"),
        (ENABLE_SNS, "true"),
        (ENABLE_SQS, "false"),
        (ENABLE_MEDIA_PACKAGE, "false"),
        (MEDIA_RESOURCE_FUNCTION, TEST_MEDIA_RESOURCE_FUNCTION),
        (ERROR_HANDLER_FUNCTION, TEST_ERROR_HANDLER),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

/// Setup default environment variables used in testing
pub fn setup_default_env() {
    for (key, value) in default_env_vars() {
        unsafe {
            env::set_var(key, value);
        }
    }
}

/// An event for an upload of `key`, which should already be URL encoded
pub fn intake_event(guid: &str, trigger: &str, key: &str) -> IntakeEvent {
    IntakeEvent {
        guid: Some(guid.to_string()),
        workflow_trigger: Some(trigger.to_string()),
        records: vec![EventRecord {
            s3: S3Entity {
                object: S3Object {
                    key: Some(key.to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Response payload of the media resource function
pub fn lookup_payload(status_code: i64, body: Value) -> Vec<u8> {
    json!({ "statusCode": status_code, "body": body.to_string() })
        .to_string()
        .into_bytes()
}

/// Object store holding objects in a map, recording existence checks.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    head_requests: Mutex<Vec<(String, String)>>,
}

impl InMemoryObjectStore {
    pub fn with_object(self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body.into());

        self
    }

    pub fn head_requests(&self) -> Vec<(String, String)> {
        self.head_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::new(bucket, key, GetObject, StoreNotFound))
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.head_requests
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));

        if self
            .objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
        {
            Ok(())
        } else {
            Err(StoreError::new(bucket, key, HeadObject, StoreNotFound))
        }
    }
}

/// Function invoker replaying a fixed list of responses, then failing.
/// An `Err` entry is returned as a transport error.
pub struct ScriptedInvoker {
    responses: Mutex<VecDeque<Result<Vec<u8>, String>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedInvoker {
    pub fn new(responses: Vec<Result<Vec<u8>, String>>) -> Self {
        ScriptedInvoker {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers 200 with the given offset
    pub fn with_offset(offset: i64) -> Self {
        Self::new(vec![Ok(lookup_payload(
            200,
            json!({ "ThumbNailFrameOffset": offset }),
        ))])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Function names and JSON payloads of every call so far
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FunctionInvoker for ScriptedInvoker {
    async fn invoke(&self, function_name: &str, payload: Vec<u8>) -> Result<Vec<u8>, ServiceError> {
        let payload: Value = serde_json::from_slice(&payload).unwrap_or(Value::Null);
        self.calls
            .lock()
            .unwrap()
            .push((function_name.to_string(), payload));

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(err)) => Err(ServiceError::Transport(err.into())),
            None => Err(ServiceError::Transport("no scripted response left".into())),
        }
    }
}

/// Error reporter keeping the message of every report.
#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(IntakeEvent, String)>>,
    unreachable: bool,
}

impl RecordingReporter {
    /// Records every report but fails to deliver it
    pub fn unreachable() -> Self {
        RecordingReporter {
            unreachable: true,
            ..Default::default()
        }
    }

    pub fn report_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    pub fn reports(&self) -> Vec<(IntakeEvent, String)> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ErrorReporter for RecordingReporter {
    async fn report(
        &self,
        event: &IntakeEvent,
        error: &(dyn std::error::Error + Send + Sync),
    ) -> Result<(), ServiceError> {
        self.reports
            .lock()
            .unwrap()
            .push((event.clone(), error.to_string()));

        if self.unreachable {
            return Err(ServiceError::Transport("error handler unreachable".into()));
        }

        Ok(())
    }
}

/// A mock S3 client serving `objects` from any bucket, any other key is missing
pub fn create_mock_s3_client(objects: Vec<(String, Vec<u8>)>) -> aws_sdk_s3::Client {
    let mut rules: Vec<Rule> = Vec::new();

    for (key, body) in objects {
        let get_key: String = key.clone();
        let head_key: String = key;

        rules.push(
            mock!(aws_sdk_s3::Client::get_object)
                .match_requests(move |req| req.key() == Some(get_key.as_str()))
                .sequence()
                .output(move || {
                    GetObjectOutput::builder()
                        .body(ByteStream::from(body.clone()))
                        .build()
                })
                .repeatedly()
                .build(),
        );
        rules.push(
            mock!(aws_sdk_s3::Client::head_object)
                .match_requests(move |req| req.key() == Some(head_key.as_str()))
                .sequence()
                .output(|| HeadObjectOutput::builder().build())
                .repeatedly()
                .build(),
        );
    }

    rules.push(
        mock!(aws_sdk_s3::Client::get_object)
            .sequence()
            .error(|| GetObjectError::NoSuchKey(NoSuchKey::builder().build()))
            .repeatedly()
            .build(),
    );
    rules.push(
        mock!(aws_sdk_s3::Client::head_object)
            .sequence()
            .error(|| HeadObjectError::NotFound(NotFound::builder().build()))
            .repeatedly()
            .build(),
    );

    mock_client!(aws_sdk_s3, RuleMode::MatchAny, &rules)
}

/// A mock Lambda client answering the media resource function with `lookup_response`
/// and any other function with an empty object
pub fn create_mock_lambda_client(lookup_response: Vec<u8>) -> aws_sdk_lambda::Client {
    let lookup_rule: Rule = mock!(aws_sdk_lambda::Client::invoke)
        .match_requests(|req| req.function_name() == Some(TEST_MEDIA_RESOURCE_FUNCTION))
        .sequence()
        .output(move || {
            InvokeOutput::builder()
                .status_code(200)
                .payload(Blob::new(lookup_response.clone()))
                .build()
        })
        .repeatedly()
        .build();
    let other_rule: Rule = mock!(aws_sdk_lambda::Client::invoke)
        .sequence()
        .output(|| {
            InvokeOutput::builder()
                .status_code(200)
                .payload(Blob::new("{}"))
                .build()
        })
        .repeatedly()
        .build();

    mock_client!(aws_sdk_lambda, RuleMode::MatchAny, [&lookup_rule, &other_rule])
}
