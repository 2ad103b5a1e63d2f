//! Share payload codec.
//!
//! Encode pipeline: project the list to its shareable subset, serialize
//! to JSON, percent-encode, then base64-encode into a URL query
//! parameter. The percent-encoding step exists so non-ASCII text
//! round-trips through base64 safely.
//!
//! Decoding is the exact inverse and is total: any malformed input is
//! logged and yields `None`, never an error to the caller.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::{DateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::domain::{ChecklistData, Priority, Task, TeamMember};

use super::ShareError;

/// Version stamped into every generated payload.
pub const SHARE_VERSION: &str = "1.2";

/// Safety threshold for the full share URL, kept below the shortening
/// service's hard limit of 65,536 characters.
pub const MAX_SHARE_URL_CHARS: usize = 60_000;

/// Origin used when composing share URLs; override with
/// `LISTO_SHARE_ORIGIN`.
pub const DEFAULT_SHARE_ORIGIN: &str = "https://listo.app";

/// Percent-encode everything except unreserved characters and the marks
/// that are safe inside a query value.
const PAYLOAD_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The shareable subset of a checklist.
///
/// Carries everything needed to fully reconstruct a working list (tasks
/// with subtasks, error notes and assignments, team, observations) plus
/// the share metadata; list identity and lifecycle dates stay behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedList {
    pub name: String,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub team: Vec<TeamMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_version: Option<String>,
}

impl SharedList {
    /// Project a full checklist to its shareable subset, stamping the
    /// share metadata.
    pub fn from_checklist(list: &ChecklistData) -> Self {
        Self {
            name: list.name.clone(),
            tasks: list.tasks.clone(),
            observations: list.observations.clone(),
            team: list.team.clone(),
            priority: list.priority,
            shared_at: Some(Utc::now()),
            share_version: Some(SHARE_VERSION.to_string()),
        }
    }
}

/// Encode a checklist into a URL-safe payload string.
pub fn encode_payload(list: &ChecklistData) -> Result<String, ShareError> {
    let shared = SharedList::from_checklist(list);
    let json = serde_json::to_string(&shared)?;
    let escaped = utf8_percent_encode(&json, PAYLOAD_SET).to_string();
    Ok(URL_SAFE_NO_PAD.encode(escaped))
}

fn share_origin() -> String {
    std::env::var("LISTO_SHARE_ORIGIN").unwrap_or_else(|_| DEFAULT_SHARE_ORIGIN.to_string())
}

/// Compose the full shareable URL for a checklist.
///
/// The URL length is checked against [`MAX_SHARE_URL_CHARS`] before the
/// payload goes anywhere; an over-limit list aborts generation with the
/// exact character overage and no network call is ever attempted.
pub fn generate_shareable_url(list: &ChecklistData) -> Result<String, ShareError> {
    let payload = encode_payload(list)?;
    let origin = share_origin();
    let url = format!("{}/?shared={}", origin.trim_end_matches('/'), payload);

    if url.len() > MAX_SHARE_URL_CHARS {
        return Err(ShareError::UrlTooLong {
            length: url.len(),
            overage: url.len() - MAX_SHARE_URL_CHARS,
            limit: MAX_SHARE_URL_CHARS,
        });
    }
    debug!("Generated share URL ({} characters)", url.len());
    Ok(url)
}

/// Extract the shared payload from a URL: the `shared` query parameter,
/// or the legacy `#shared=` / `#share-data=` fragments.
pub fn extract_shared_param(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    if let Some((_, value)) = parsed.query_pairs().find(|(key, _)| key == "shared") {
        return Some(value.into_owned());
    }

    let fragment = parsed.fragment()?;
    for prefix in ["shared=", "share-data="] {
        if let Some(payload) = fragment.strip_prefix(prefix) {
            return Some(payload.to_string());
        }
    }
    None
}

/// Decode a payload string back into a shared list.
///
/// Returns `None` on any failure (bad base64, bad UTF-8, bad JSON, or a
/// shape that fails structural validation); failures are logged and
/// treated as "no shared data present".
pub fn decode_payload(payload: &str) -> Option<SharedList> {
    // Older payloads used the standard alphabet
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD.decode(payload))
        .map_err(|e| warn!("Shared payload is not valid base64: {}", e))
        .ok()?;
    let escaped = String::from_utf8(bytes)
        .map_err(|e| warn!("Shared payload is not valid UTF-8: {}", e))
        .ok()?;
    let json = percent_decode_str(&escaped)
        .decode_utf8()
        .map_err(|e| warn!("Shared payload percent-decoding failed: {}", e))
        .ok()?;
    let value: Value = serde_json::from_str(&json)
        .map_err(|e| warn!("Shared payload is not valid JSON: {}", e))
        .ok()?;

    if !is_valid_shared_shape(&value) {
        warn!("Shared payload failed structural validation");
        return None;
    }

    serde_json::from_value(value)
        .map_err(|e| warn!("Shared payload deserialization failed: {}", e))
        .ok()
}

/// Decode the shared list carried by a URL, if any.
pub fn decode_shared_url(url: &str) -> Option<SharedList> {
    decode_payload(&extract_shared_param(url)?)
}

/// Structural validation: string `name`, array `tasks`; each task must
/// have a numeric `id`, string `name`, boolean `completed`, and
/// `subtasks`/`errors` arrays.
fn is_valid_shared_shape(value: &Value) -> bool {
    if !value.get("name").is_some_and(Value::is_string) {
        return false;
    }
    let Some(tasks) = value.get("tasks").and_then(Value::as_array) else {
        return false;
    };
    tasks.iter().all(|task| {
        task.get("id").is_some_and(Value::is_number)
            && task.get("name").is_some_and(Value::is_string)
            && task.get("completed").is_some_and(Value::is_boolean)
            && task.get("subtasks").is_some_and(Value::is_array)
            && task.get("errors").is_some_and(Value::is_array)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Subtask;

    fn groceries() -> ChecklistData {
        let mut list = ChecklistData::new("Groceries");
        let task_id = list.add_task("Milk");
        let task = list.task_mut(task_id).unwrap();
        task.subtasks.push(Subtask {
            id: 10,
            name: "2%".to_string(),
            completed: false,
            assigned_member: None,
        });
        list
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let list = groceries();
        let payload = encode_payload(&list).unwrap();
        let decoded = decode_payload(&payload).expect("payload should decode");

        assert_eq!(decoded.name, "Groceries");
        assert_eq!(decoded.tasks, list.tasks);
        assert_eq!(decoded.observations, list.observations);
        assert_eq!(decoded.team, list.team);
        assert!(!decoded.tasks[0].subtasks[0].completed);
        assert_eq!(decoded.share_version.as_deref(), Some(SHARE_VERSION));
        assert!(decoded.shared_at.is_some());
    }

    #[test]
    fn test_non_ascii_round_trip() {
        let mut list = ChecklistData::new("Mañana ✓");
        list.observations = "café — niño; 東京".to_string();
        list.add_task("Llamar a mamá");

        let payload = encode_payload(&list).unwrap();
        let decoded = decode_payload(&payload).unwrap();
        assert_eq!(decoded.name, "Mañana ✓");
        assert_eq!(decoded.observations, "café — niño; 東京");
        assert_eq!(decoded.tasks[0].name, "Llamar a mamá");
    }

    #[test]
    fn test_share_url_format() {
        let url = generate_shareable_url(&groceries()).unwrap();
        assert!(url.starts_with("https://listo.app/?shared="));
        let decoded = decode_shared_url(&url).unwrap();
        assert_eq!(decoded.name, "Groceries");
    }

    #[test]
    fn test_oversized_list_aborts_with_exact_overage() {
        let mut list = groceries();
        list.observations = "x".repeat(80_000);

        match generate_shareable_url(&list) {
            Err(ShareError::UrlTooLong {
                length,
                overage,
                limit,
            }) => {
                assert_eq!(limit, MAX_SHARE_URL_CHARS);
                assert_eq!(overage, length - MAX_SHARE_URL_CHARS);
                assert!(length > MAX_SHARE_URL_CHARS);
            }
            other => panic!("expected UrlTooLong, got {:?}", other.map(|u| u.len())),
        }
    }

    #[test]
    fn test_extract_from_query_and_legacy_fragments() {
        assert_eq!(
            extract_shared_param("https://listo.app/?shared=abc").as_deref(),
            Some("abc")
        );
        assert_eq!(
            extract_shared_param("https://listo.app/#shared=abc").as_deref(),
            Some("abc")
        );
        assert_eq!(
            extract_shared_param("https://listo.app/#share-data=abc").as_deref(),
            Some("abc")
        );
        assert_eq!(extract_shared_param("https://listo.app/"), None);
        assert_eq!(extract_shared_param("not a url"), None);
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        // Not base64
        assert!(decode_payload("!!!not-base64!!!").is_none());
        // Base64 of something that is not JSON
        assert!(decode_payload(&URL_SAFE_NO_PAD.encode("hello")).is_none());
        // Valid JSON, missing name
        assert!(decode_payload(&URL_SAFE_NO_PAD.encode(r#"{"tasks":[]}"#)).is_none());
        // Task with a string id fails structural validation
        let bad = r#"{"name":"x","tasks":[{"id":"1","name":"t","completed":false,"subtasks":[],"errors":[]}]}"#;
        assert!(decode_payload(&URL_SAFE_NO_PAD.encode(bad)).is_none());
        // Task missing its errors array
        let bad = r#"{"name":"x","tasks":[{"id":1,"name":"t","completed":false,"subtasks":[]}]}"#;
        assert!(decode_payload(&URL_SAFE_NO_PAD.encode(bad)).is_none());
    }

    #[test]
    fn test_decode_accepts_minimal_valid_shape() {
        let minimal = r#"{"name":"Bare","tasks":[]}"#;
        let decoded = decode_payload(&URL_SAFE_NO_PAD.encode(minimal)).unwrap();
        assert_eq!(decoded.name, "Bare");
        assert!(decoded.tasks.is_empty());
        assert!(decoded.shared_at.is_none());
    }

    #[test]
    fn test_decode_accepts_legacy_standard_alphabet() {
        let list = groceries();
        let shared = SharedList::from_checklist(&list);
        let json = serde_json::to_string(&shared).unwrap();
        let escaped = utf8_percent_encode(&json, PAYLOAD_SET).to_string();
        let payload = STANDARD.encode(escaped);

        assert_eq!(decode_payload(&payload).unwrap().name, "Groceries");
    }
}
