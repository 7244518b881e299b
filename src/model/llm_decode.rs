use serde::Deserialize;

use crate::model::activity::Activity;

#[derive(Deserialize)]
struct RawActivity {
    title: Option<String>,
    description: Option<String>,
}

/// Strictly decode a JSON object with `title` and `description` into an
/// [`Activity`]. Both fields must be present and non-blank.
pub fn decode_activity_json(json: &str) -> Result<Activity, String> {
    let raw: RawActivity =
        serde_json::from_str(json).map_err(|e| format!("Invalid LLM output: {}", e))?;

    let title = raw.title.as_deref().map(str::trim).unwrap_or_default();
    let description = raw.description.as_deref().map(str::trim).unwrap_or_default();

    if title.is_empty() || description.is_empty() {
        return Err("Activity missing required fields".to_string());
    }

    Ok(Activity::new(title, description))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_both_fields() {
        let activity = decode_activity_json(
            r#"{"title":"Dance in Public","description":"Find a busy public area and dance."}"#,
        )
        .unwrap();
        assert_eq!(activity, Activity::new("Dance in Public", "Find a busy public area and dance."));
    }

    #[test]
    fn ignores_extra_keys() {
        let activity =
            decode_activity_json(r#"{"title":"T","description":"D","difficulty":3}"#).unwrap();
        assert_eq!(activity.title, "T");
    }

    #[test]
    fn rejects_missing_or_blank_fields() {
        assert!(decode_activity_json(r#"{"title":"Only a title"}"#).is_err());
        assert!(decode_activity_json(r#"{"title":"","description":"D"}"#).is_err());
        assert!(decode_activity_json(r#"{"title":"T","description":"   "}"#).is_err());
    }

    #[test]
    fn rejects_non_objects() {
        assert!(decode_activity_json("[1, 2, 3]").is_err());
        assert!(decode_activity_json("not json at all").is_err());
        assert!(decode_activity_json(r#"{"title":7,"description":"D"}"#).is_err());
    }
}
