use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API Gateway shaped request sent to the media resource function.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub http_method: String,
    pub query_string_parameters: LookupQuery,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LookupQuery {
    pub video_file_name: String,
}

impl LookupRequest {
    pub fn for_video(video_file_name: &str) -> Self {
        LookupRequest {
            http_method: "GET".to_string(),
            query_string_parameters: LookupQuery {
                video_file_name: video_file_name.to_string(),
            },
        }
    }
}

/// API Gateway shaped response returned by the media resource function.
///
/// A function error payload has neither field, which reads as a failed status.
/// `body` is kept as any JSON value so the status is readable whatever the body holds.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    #[serde(default)]
    pub status_code: Option<Value>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl LookupResponse {
    pub fn is_ok(&self) -> bool {
        self.status_code.as_ref().and_then(Value::as_f64) == Some(200.0)
    }

    /// The thumbnail offset held in the JSON encoded body, if there is a non-negative one.
    pub fn thumbnail_offset(&self) -> Option<u64> {
        let body: &str = self.body.as_ref()?.as_str()?;
        let body: ThumbnailBody = serde_json::from_str(body).ok()?;
        let offset: i64 = leading_integer(body.thumb_nail_frame_offset.as_ref()?)?;

        u64::try_from(offset).ok()
    }
}

#[derive(Debug, Deserialize, Default)]
struct ThumbnailBody {
    #[serde(rename = "ThumbNailFrameOffset", default)]
    thumb_nail_frame_offset: Option<Value>,
}

/// Integer read of a number or a string, stopping at the first non digit
/// so `"12px"` is 12 and `7.9` is 7.
fn leading_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float.trunc() as i64)
        }),
        Value::String(text) => {
            let text: &str = text.trim_start();
            let (negative, digits) = match text.as_bytes().first() {
                Some(b'-') => (true, &text[1..]),
                Some(b'+') => (false, &text[1..]),
                _ => (false, text),
            };
            let end: usize = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            let magnitude: i64 = digits[..end].parse().ok()?;

            Some(if negative { -magnitude } else { magnitude })
        }
        _ => None,
    }
}
