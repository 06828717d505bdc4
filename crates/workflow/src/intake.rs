use crate::config::IntakeConfig;
use crate::retry::RetryPolicy;
use crate::thumbnail::{ThumbnailLookup, DEFAULT_THUMBNAIL_OFFSET};
use chrono::{SecondsFormat, Utc};
use lambda_runtime::tracing;
use model::WorkflowTrigger;
use model::event::IntakeEvent;
use model::state::{WorkflowState, INGEST_STATUS};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use service::{ErrorReporter, FunctionInvoker};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use store::{ObjectStore, StoreError};

const SRC_VIDEO: &str = "srcVideo";

/// Builds the workflow state for a new upload.
pub struct IntakeValidator {
    config: Arc<IntakeConfig>,
    store: Arc<dyn ObjectStore>,
    thumbnails: ThumbnailLookup,
    reporter: Arc<dyn ErrorReporter>,
}

impl IntakeValidator {
    pub fn new(
        config: Arc<IntakeConfig>,
        store: Arc<dyn ObjectStore>,
        invoker: Arc<dyn FunctionInvoker>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self::with_retry_policy(config, store, invoker, reporter, RetryPolicy::default())
    }

    pub fn with_retry_policy(
        config: Arc<IntakeConfig>,
        store: Arc<dyn ObjectStore>,
        invoker: Arc<dyn FunctionInvoker>,
        reporter: Arc<dyn ErrorReporter>,
        policy: RetryPolicy,
    ) -> Self {
        let thumbnails: ThumbnailLookup =
            ThumbnailLookup::new(invoker, config.media_resource_function.clone(), policy);

        IntakeValidator {
            config,
            store,
            thumbnails,
            reporter,
        }
    }

    /// Validate the upload behind `event` and compose its workflow state.
    ///
    /// Every error is handed to the reporter before being returned as is.
    pub async fn handle(&self, event: &IntakeEvent) -> Result<WorkflowState, IntakeError> {
        tracing::info!(
            "REQUEST:: {}",
            serde_json::to_string_pretty(event).unwrap_or_default()
        );

        match self.validate(event).await {
            Ok(state) => Ok(state),
            Err(err) => {
                tracing::error!("Intake failed: {}", err);

                if let Err(report_err) = self.reporter.report(event, &err).await {
                    tracing::error!("Could not report intake failure: {}", report_err);
                }

                Err(err)
            }
        }
    }

    async fn validate(&self, event: &IntakeEvent) -> Result<WorkflowState, IntakeError> {
        let start_time: String = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let trigger: WorkflowTrigger = event
            .workflow_trigger
            .as_deref()
            .ok_or(IntakeError::UndefinedTrigger)?
            .parse()
            .map_err(|_| IntakeError::UndefinedTrigger)?;

        let mut state: WorkflowState = match trigger {
            WorkflowTrigger::Metadata => self.from_metadata(event, start_time).await?,
            WorkflowTrigger::Video => self.from_video(event, start_time).await?,
        };

        // Set at the stack level, a metadata file can't change it
        state.enable_media_package = self.config.enable_media_package;

        Ok(state)
    }

    async fn from_metadata(
        &self,
        event: &IntakeEvent,
        start_time: String,
    ) -> Result<WorkflowState, IntakeError> {
        tracing::info!("Validating Metadata file::");

        let key: String = decode_object_key(event)?;
        let body: Vec<u8> = self
            .store
            .get_object(&self.config.source_bucket, &key)
            .await?;

        let metadata: Map<String, Value> = parse_metadata(&body)?;
        let src_video: String = match metadata.get(SRC_VIDEO) {
            Some(Value::String(src_video)) if !src_video.is_empty() => src_video.clone(),
            _ => return Err(IntakeError::MissingSrcVideo),
        };

        let mut state: WorkflowState =
            self.initial_state(event, start_time, WorkflowTrigger::Metadata, src_video);
        state.src_metadata_file = Some(key);

        let mut state: WorkflowState = state
            .merge_metadata(metadata)
            .map_err(|err| IntakeError::InvalidMetadata(err.to_string()))?;
        // SrcVideo normalizes onto srcVideo and may have emptied it
        if state.src_video.is_empty() {
            return Err(IntakeError::MissingSrcVideo);
        }

        // The bucket may have been overridden by the metadata file
        self.store
            .head_object(&state.src_bucket, &state.src_video)
            .await?;
        tracing::info!(src_video = state.src_video, "Source video is accessible");

        state.thumbnail_frame_offset = self.thumbnails.offset_for(&state.src_video).await;

        Ok(state)
    }

    async fn from_video(
        &self,
        event: &IntakeEvent,
        start_time: String,
    ) -> Result<WorkflowState, IntakeError> {
        let src_video: String = decode_object_key(event)?;

        let mut state: WorkflowState =
            self.initial_state(event, start_time, WorkflowTrigger::Video, src_video);
        state.thumbnail_frame_offset = self.thumbnails.offset_for(&state.src_video).await;

        Ok(state)
    }

    fn initial_state(
        &self,
        event: &IntakeEvent,
        start_time: String,
        trigger: WorkflowTrigger,
        src_video: String,
    ) -> WorkflowState {
        let config: &IntakeConfig = &self.config;

        WorkflowState {
            guid: event.guid.clone(),
            start_time,
            workflow_trigger: trigger,
            workflow_status: INGEST_STATUS.to_string(),
            workflow_name: config.workflow_name.clone(),
            src_bucket: config.source_bucket.clone(),
            dest_bucket: config.destination_bucket.clone(),
            cloud_front: config.cloud_front.clone(),
            frame_capture: config.frame_capture,
            archive_source: config.archive_source.clone(),
            job_template_2160p: config.job_template_2160p.clone(),
            job_template_1080p: config.job_template_1080p.clone(),
            job_template_720p: config.job_template_720p.clone(),
            input_rotate: config.input_rotate.clone(),
            accelerated_transcoding: config.accelerated_transcoding.clone(),
            enable_sns: config.enable_sns,
            enable_sqs: config.enable_sqs,
            src_video,
            src_metadata_file: None,
            thumbnail_frame_offset: DEFAULT_THUMBNAIL_OFFSET,
            enable_media_package: config.enable_media_package,
            extensions: Map::new(),
        }
    }
}

/// Key of the triggering object: `+` becomes a space, then percent escapes are decoded.
pub fn decode_object_key(event: &IntakeEvent) -> Result<String, IntakeError> {
    let key: String = event
        .object_key()
        .ok_or(IntakeError::MissingObjectKey)?
        .replace('+', " ");

    let malformed: bool = key.split('%').skip(1).any(|escape| {
        escape.len() < 2 || !escape.as_bytes()[..2].iter().all(u8::is_ascii_hexdigit)
    });
    if malformed {
        return Err(IntakeError::InvalidObjectKey(key));
    }

    match percent_decode_str(&key).decode_utf8() {
        Ok(decoded) => Ok(decoded.into_owned()),
        Err(_) => Err(IntakeError::InvalidObjectKey(key.clone())),
    }
}

fn parse_metadata(body: &[u8]) -> Result<Map<String, Value>, IntakeError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(metadata)) => Ok(metadata),
        // Without an object there's no srcVideo
        Ok(_) => Err(IntakeError::MissingSrcVideo),
        Err(err) => Err(IntakeError::InvalidMetadata(err.to_string())),
    }
}

/// Errors which stop the intake.
#[derive(Debug)]
pub enum IntakeError {
    // workflowTrigger is missing or unknown
    UndefinedTrigger,
    // The event has no Records[0].s3.object.key
    MissingObjectKey,
    InvalidObjectKey(String),
    InvalidMetadata(String),
    MissingSrcVideo,
    // Reading the metadata file or checking the source video failed
    Store(StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeErrorKind {
    Configuration,
    Input,
    NotFound,
    Backend,
}

impl IntakeError {
    pub fn kind(&self) -> IntakeErrorKind {
        match self {
            IntakeError::UndefinedTrigger => IntakeErrorKind::Configuration,
            IntakeError::MissingObjectKey
            | IntakeError::InvalidObjectKey(_)
            | IntakeError::InvalidMetadata(_)
            | IntakeError::MissingSrcVideo => IntakeErrorKind::Input,
            IntakeError::Store(err) if err.is_not_found() => IntakeErrorKind::NotFound,
            IntakeError::Store(_) => IntakeErrorKind::Backend,
        }
    }
}

impl From<StoreError> for IntakeError {
    fn from(value: StoreError) -> Self {
        IntakeError::Store(value)
    }
}

impl Display for IntakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IntakeError::UndefinedTrigger => f.write_str("event.workflowTrigger is not defined."),
            IntakeError::MissingObjectKey => {
                f.write_str("event.Records[0].s3.object.key is not defined.")
            }
            IntakeError::InvalidObjectKey(key) => write!(f, "object key is not URI encoded: {key}"),
            IntakeError::InvalidMetadata(reason) => write!(f, "metadata file is invalid: {reason}"),
            IntakeError::MissingSrcVideo => f.write_str("srcVideo is not defined in metadata::"),
            IntakeError::Store(err) => Display::fmt(err, f),
        }
    }
}

impl std::error::Error for IntakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IntakeError::Store(err) => Some(err),
            _ => None,
        }
    }
}
