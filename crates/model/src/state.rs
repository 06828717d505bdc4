use crate::WorkflowTrigger;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const INGEST_STATUS: &str = "Ingest";

/// Metadata keys which are replaced once the metadata file has been merged.
/// They're dropped from the file rather than type checked against the record.
const ASSIGNED_AFTER_MERGE: [&str; 2] = ["thumbnailFrameOffset", "enableMediaPackage"];

/// The record handed to the next stage of the pipeline.
///
/// Static configuration is copied in first, followed by the fields derived from
/// the trigger. Fields from a metadata file are merged on top and may shadow
/// either; anything the record doesn't know about lands in `extensions`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    pub start_time: String,
    pub workflow_trigger: WorkflowTrigger,
    pub workflow_status: String,
    pub workflow_name: String,

    pub src_bucket: String,
    pub dest_bucket: String,
    pub cloud_front: String,
    pub frame_capture: bool,
    pub archive_source: String,
    #[serde(rename = "jobTemplate_2160p")]
    pub job_template_2160p: String,
    #[serde(rename = "jobTemplate_1080p")]
    pub job_template_1080p: String,
    #[serde(rename = "jobTemplate_720p")]
    pub job_template_720p: String,
    pub input_rotate: String,
    pub accelerated_transcoding: String,
    pub enable_sns: bool,
    pub enable_sqs: bool,

    pub src_video: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_metadata_file: Option<String>,
    #[serde(default)]
    pub thumbnail_frame_offset: u64,
    #[serde(default)]
    pub enable_media_package: bool,

    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl WorkflowState {
    /// Merge the top level fields of a metadata file into the record.
    ///
    /// Keys have their first character lowercased. A key matching a typed field
    /// replaces it and must hold a value of the same type.
    pub fn merge_metadata(self, metadata: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut merged: Value = serde_json::to_value(self)?;

        if let Some(fields) = merged.as_object_mut() {
            for (key, value) in metadata {
                let key: String = normalize_key(&key);

                if !ASSIGNED_AFTER_MERGE.contains(&key.as_str()) {
                    fields.insert(key, value);
                }
            }
        }

        serde_json::from_value(merged)
    }
}

/// Lowercase the first character of a key, `SrcAudio` becomes `srcAudio`.
pub fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();

    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> WorkflowState {
        WorkflowState {
            guid: Some("guid-1".to_string()),
            start_time: "2020-01-01T00:00:00.000Z".to_string(),
            workflow_trigger: WorkflowTrigger::Metadata,
            workflow_status: INGEST_STATUS.to_string(),
            workflow_name: "vod".to_string(),
            src_bucket: "source".to_string(),
            dest_bucket: "destination".to_string(),
            cloud_front: "cdn.example.com".to_string(),
            frame_capture: false,
            archive_source: "DISABLED".to_string(),
            job_template_2160p: "tpl_2160p".to_string(),
            job_template_1080p: "tpl_1080p".to_string(),
            job_template_720p: "tpl_720p".to_string(),
            input_rotate: "DEGREE_0".to_string(),
            accelerated_transcoding: "PREFERRED".to_string(),
            enable_sns: true,
            enable_sqs: true,
            src_video: "video.mp4".to_string(),
            src_metadata_file: Some("video.json".to_string()),
            thumbnail_frame_offset: 0,
            enable_media_package: false,
            extensions: Map::new(),
        }
    }

    fn metadata(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("metadata must be an object"),
        }
    }

    #[test]
    fn normalize_lowercases_first_character_only() {
        assert_eq!("srcAudio", normalize_key("SrcAudio"));
        assert_eq!("srcVideo", normalize_key("srcVideo"));
        assert_eq!("jobTemplate_2160p", normalize_key("JobTemplate_2160p"));
        assert_eq!("aBC", normalize_key("ABC"));
        assert_eq!("", normalize_key(""));
    }

    #[test]
    fn state_serializes_with_pipeline_field_names() {
        let value: Value = serde_json::to_value(state()).unwrap();

        assert_eq!(json!("tpl_2160p"), value["jobTemplate_2160p"]);
        assert_eq!(json!("cdn.example.com"), value["cloudFront"]);
        assert_eq!(json!("Metadata"), value["workflowTrigger"]);
        assert_eq!(json!("video.json"), value["srcMetadataFile"]);
        assert_eq!(json!(0), value["thumbnailFrameOffset"]);
    }

    #[test]
    fn absent_optional_fields_are_omitted() {
        let mut state: WorkflowState = state();
        state.guid = None;
        state.src_metadata_file = None;

        let value: Value = serde_json::to_value(state).unwrap();

        assert!(value.get("guid").is_none());
        assert!(value.get("srcMetadataFile").is_none());
    }

    #[test]
    fn merge_shadows_known_fields_and_keeps_unknown_ones() {
        let merged: WorkflowState = state()
            .merge_metadata(metadata(json!({
                "srcVideo": "other.mp4",
                "FrameCapture": true,
                "JobTemplate_1080p": "custom_1080p",
                "SrcAudio": "audio.wav",
                "captions": ["en", "fr"]
            })))
            .unwrap();

        assert_eq!("other.mp4", merged.src_video);
        assert!(merged.frame_capture);
        assert_eq!("custom_1080p", merged.job_template_1080p);
        assert_eq!(Some(&json!("audio.wav")), merged.extensions.get("srcAudio"));
        assert_eq!(Some(&json!(["en", "fr"])), merged.extensions.get("captions"));
        assert!(merged.extensions.get("SrcAudio").is_none());
    }

    #[test]
    fn merge_ignores_fields_assigned_afterwards() {
        let merged: WorkflowState = state()
            .merge_metadata(metadata(json!({
                "srcVideo": "video.mp4",
                "thumbnailFrameOffset": -5,
                "EnableMediaPackage": "yes"
            })))
            .unwrap();

        assert_eq!(0, merged.thumbnail_frame_offset);
        assert!(!merged.enable_media_package);
        assert!(merged.extensions.is_empty());
    }

    #[test]
    fn merge_rejects_mistyped_known_field() {
        let result = state().merge_metadata(metadata(json!({
            "srcVideo": "video.mp4",
            "enableSns": "sometimes"
        })));

        assert!(result.is_err());
    }
}
