use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// Stack level settings, read from the environment once at start up.
///
/// `envy` matches fields against lowercased variable names, see `model::env`
/// for the variables themselves. Boolean flags must be exactly `true` or `false`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IntakeConfig {
    #[serde(rename = "workflowname")]
    pub workflow_name: String,
    #[serde(rename = "source")]
    pub source_bucket: String,
    #[serde(rename = "destination")]
    pub destination_bucket: String,
    #[serde(rename = "cloudfront")]
    pub cloud_front: String,
    #[serde(rename = "framecapture")]
    pub frame_capture: bool,
    #[serde(rename = "archivesource")]
    pub archive_source: String,
    #[serde(rename = "mediaconvert_template_2160p")]
    pub job_template_2160p: String,
    #[serde(rename = "mediaconvert_template_1080p")]
    pub job_template_1080p: String,
    #[serde(rename = "mediaconvert_template_720p")]
    pub job_template_720p: String,
    #[serde(rename = "inputrotate")]
    pub input_rotate: String,
    #[serde(rename = "acceleratedtranscoding")]
    pub accelerated_transcoding: String,
    #[serde(rename = "enablesns")]
    pub enable_sns: bool,
    #[serde(rename = "enablesqs")]
    pub enable_sqs: bool,
    #[serde(rename = "enablemediapackage")]
    pub enable_media_package: bool,
    #[serde(rename = "mediaresourcefunction")]
    pub media_resource_function: String,
    /// Function receiving failure reports
    #[serde(rename = "errorhandler")]
    pub error_handler: String,
    /// Name of this function as given by the Lambda environment, empty elsewhere
    #[serde(rename = "aws_lambda_function_name", default)]
    pub function_name: String,
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        envy::from_env().map_err(ConfigError)
    }

    pub fn from_vars<Vars>(vars: Vars) -> Result<Self, ConfigError>
    where
        Vars: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).map_err(ConfigError)
    }
}

/// A required variable was missing or couldn't be parsed.
#[derive(Debug)]
pub struct ConfigError(envy::Error);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid intake configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}
