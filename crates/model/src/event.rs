use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The event starting a workflow, as forwarded by the step function.
///
/// Fields this crate doesn't read are kept in `other` so the whole event can be
/// handed to the error reporter unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntakeEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    // Kept as a string so an unknown trigger can be reported rather than rejected by the runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_trigger: Option<String>,
    #[serde(rename = "Records", default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<EventRecord>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl IntakeEvent {
    /// The still URL encoded key of the object which triggered the event.
    pub fn object_key(&self) -> Option<&str> {
        self.records.first()?.s3.object.key.as_deref()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct EventRecord {
    pub s3: S3Entity,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct S3Entity {
    pub object: S3Object,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct S3Object {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_reads_first_record_key() {
        let event: IntakeEvent = serde_json::from_value(json!({
            "guid": "a1",
            "workflowTrigger": "Video",
            "Records": [
                { "eventName": "ObjectCreated:Put", "s3": { "bucket": { "name": "src" }, "object": { "key": "my+video.mp4", "size": 10 } } },
                { "s3": { "object": { "key": "second.mp4" } } }
            ]
        }))
        .unwrap();

        assert_eq!(Some("a1"), event.guid.as_deref());
        assert_eq!(Some("Video"), event.workflow_trigger.as_deref());
        assert_eq!(Some("my+video.mp4"), event.object_key());
    }

    #[test]
    fn event_without_records_has_no_key() {
        let event: IntakeEvent =
            serde_json::from_value(json!({ "guid": "a1", "workflowTrigger": "Video" })).unwrap();

        assert_eq!(None, event.object_key());
    }

    #[test]
    fn event_keeps_unread_fields_when_serialized() {
        let original: Value = json!({
            "guid": "a1",
            "workflowTrigger": "Metadata",
            "Records": [
                { "eventTime": "2020-01-01T00:00:00.000Z", "s3": { "bucket": { "name": "src" }, "object": { "key": "meta.json", "eTag": "abc" } } }
            ],
            "extra": 5
        });

        let event: IntakeEvent = serde_json::from_value(original.clone()).unwrap();

        assert_eq!(original, serde_json::to_value(&event).unwrap());
    }
}
