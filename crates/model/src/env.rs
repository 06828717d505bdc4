/// Name of the workflow, copied into every record
pub const WORKFLOW_NAME: &str = "WorkflowName";
/// Bucket holding source videos and metadata files
pub const SOURCE_BUCKET: &str = "Source";
/// Bucket receiving transcoded outputs
pub const DESTINATION_BUCKET: &str = "Destination";
/// CloudFront distribution serving the destination bucket
pub const CLOUD_FRONT: &str = "CloudFront";
/// JSON encoded boolean
pub const FRAME_CAPTURE: &str = "FrameCapture";
pub const ARCHIVE_SOURCE: &str = "ArchiveSource";
pub const JOB_TEMPLATE_2160P: &str = "MediaConvert_Template_2160p";
pub const JOB_TEMPLATE_1080P: &str = "MediaConvert_Template_1080p";
pub const JOB_TEMPLATE_720P: &str = "MediaConvert_Template_720p";
pub const INPUT_ROTATE: &str = "InputRotate";
pub const ACCELERATED_TRANSCODING: &str = "AcceleratedTranscoding";
/// JSON encoded boolean
pub const ENABLE_SNS: &str = "EnableSns";
/// JSON encoded boolean
pub const ENABLE_SQS: &str = "EnableSqs";
/// JSON encoded boolean, cannot be overridden by a metadata file
pub const ENABLE_MEDIA_PACKAGE: &str = "EnableMediaPackage";
/// Function resolving the thumbnail frame offset of a video
pub const MEDIA_RESOURCE_FUNCTION: &str = "MediaResourceFunction";

/// Function notified when the intake fails
pub const ERROR_HANDLER_FUNCTION: &str = "ErrorHandler";
/// Set by the Lambda environment
pub const LAMBDA_FUNCTION_NAME: &str = "AWS_LAMBDA_FUNCTION_NAME";
