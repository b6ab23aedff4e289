//! Interpretation of ComfyUI `/history/{prompt_id}` responses.
//!
//! The endpoint returns `{}` while the prompt is queued or running and
//! `{ "<prompt_id>": { "outputs": { "<node_id>": { "images": [...] } } } }`
//! once it has finished.

use serde_json::Value;

use crate::queue::{JobHandle, OutputRef};
use crate::workflow::OUTPUT_NODE_ID;

/// Status of a job as derived from one history response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// No output for the output stage yet.
    Pending,
    /// The output stage produced an image.
    Complete(OutputRef),
    /// The response was not a JSON object.
    Unknown,
}

impl JobStatus {
    /// Derive the status of `handle` from a history response body.
    pub fn from_history(history: &Value, handle: &JobHandle) -> Self {
        let Some(entries) = history.as_object() else {
            return JobStatus::Unknown;
        };

        let first_image = entries
            .get(handle.as_str())
            .and_then(|entry| entry.get("outputs"))
            .and_then(|outputs| outputs.get(OUTPUT_NODE_ID))
            .and_then(|node| node.get("images"))
            .and_then(Value::as_array)
            .and_then(|images| images.first());

        match first_image.map(|image| serde_json::from_value::<OutputRef>(image.clone())) {
            Some(Ok(output)) => JobStatus::Complete(output),
            Some(Err(e)) => {
                tracing::warn!(
                    prompt_id = %handle,
                    error = %e,
                    "Unparseable image entry in ComfyUI history",
                );
                JobStatus::Unknown
            }
            None => JobStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn handle() -> JobHandle {
        JobHandle::new("abc")
    }

    #[test]
    fn empty_history_is_pending() {
        assert_eq!(JobStatus::from_history(&json!({}), &handle()), JobStatus::Pending);
    }

    #[test]
    fn other_prompt_is_pending() {
        let history = json!({ "zzz": { "outputs": { "9": { "images": [{ "filename": "a.png" }] } } } });
        assert_eq!(JobStatus::from_history(&history, &handle()), JobStatus::Pending);
    }

    #[test]
    fn entry_without_output_node_is_pending() {
        let history = json!({ "abc": { "outputs": { "8": {} } } });
        assert_eq!(JobStatus::from_history(&history, &handle()), JobStatus::Pending);
    }

    #[test]
    fn empty_image_list_is_pending() {
        let history = json!({ "abc": { "outputs": { "9": { "images": [] } } } });
        assert_eq!(JobStatus::from_history(&history, &handle()), JobStatus::Pending);
    }

    #[test]
    fn first_image_is_the_output() {
        let history = json!({
            "abc": {
                "outputs": {
                    "9": {
                        "images": [
                            { "filename": "generated_00001_.png", "subfolder": "", "type": "output" },
                            { "filename": "generated_00002_.png", "subfolder": "", "type": "output" }
                        ]
                    }
                }
            }
        });
        assert_eq!(
            JobStatus::from_history(&history, &handle()),
            JobStatus::Complete(OutputRef {
                filename: "generated_00001_.png".into(),
                subfolder: String::new(),
                kind: "output".into(),
            })
        );
    }

    #[test]
    fn null_subfolder_still_completes() {
        let history = json!({
            "abc": { "outputs": { "9": { "images": [
                { "filename": "generated_00003_.png", "subfolder": null, "type": "output" }
            ] } } }
        });
        assert_eq!(
            JobStatus::from_history(&history, &handle()),
            JobStatus::Complete(OutputRef {
                filename: "generated_00003_.png".into(),
                subfolder: String::new(),
                kind: "output".into(),
            })
        );
    }

    #[test]
    fn non_object_is_unknown() {
        assert_eq!(JobStatus::from_history(&json!([1, 2]), &handle()), JobStatus::Unknown);
        assert_eq!(JobStatus::from_history(&json!(null), &handle()), JobStatus::Unknown);
    }

    #[test]
    fn malformed_image_entry_is_unknown() {
        let history = json!({ "abc": { "outputs": { "9": { "images": [{ "name": "a.png" }] } } } });
        assert_eq!(JobStatus::from_history(&history, &handle()), JobStatus::Unknown);
    }
}
