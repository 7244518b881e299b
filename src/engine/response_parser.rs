use crate::model::activity::Activity;
use crate::model::llm_decode::decode_activity_json;

const TITLE_MAX_WORDS: usize = 5;
const TITLE_MAX_CHARS: usize = 30;
const PLACEHOLDER_TITLE: &str = "Spontaneous Activity";

/// Outcome of interpreting one raw model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// The reply held a well-formed JSON activity.
    Parsed(Activity),
    /// JSON decoding failed but a title and description were salvaged.
    Recovered(Activity),
    Unrecoverable,
}

/// Normalize raw model text: strip fences, cut out the outermost `{...}`,
/// decode strictly, and fall back to heuristic recovery on the raw text.
pub fn normalize_response(raw: &str) -> ParsedResponse {
    let cleaned = strip_fences(raw.trim());
    let candidate = extract_json_object(&cleaned).unwrap_or(cleaned.trim());

    match decode_activity_json(candidate) {
        Ok(activity) => ParsedResponse::Parsed(activity),
        Err(reason) => {
            tracing::warn!(%reason, "model reply was not a usable JSON activity, attempting recovery");
            tracing::debug!(raw, "unparsed model reply");

            match recover_activity(raw) {
                Some(activity) => ParsedResponse::Recovered(activity),
                None => ParsedResponse::Unrecoverable,
            }
        }
    }
}

/// Best-effort extraction of a title and description from free text.
pub fn recover_activity(raw: &str) -> Option<Activity> {
    let stripped = strip_fences(raw);
    let clean = stripped.trim();
    if clean.is_empty() {
        return None;
    }

    let (title, description) = if let Some((quoted, inner)) = find_quoted(clean) {
        (inner.to_string(), clean.replacen(quoted, "", 1))
    } else if let Some(segment) = short_segment(clean) {
        (segment.to_string(), clean.replacen(segment, "", 1))
    } else {
        let words: Vec<&str> = clean.split_whitespace().collect();
        if words.len() > TITLE_MAX_WORDS {
            (
                words[..TITLE_MAX_WORDS].join(" "),
                words[TITLE_MAX_WORDS..].join(" "),
            )
        } else {
            (PLACEHOLDER_TITLE.to_string(), clean.to_string())
        }
    };

    let title = title.trim();
    let description = tidy_description(&description);
    if title.is_empty() || description.is_empty() {
        return None;
    }

    Some(Activity::new(title, description))
}

fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

/// Greedy: from the first `{` to the last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// First non-empty single- or double-quoted run. Returns the run including
/// its quotes and the inner text.
fn find_quoted(text: &str) -> Option<(&str, &str)> {
    for (start, open) in text.char_indices() {
        if open != '"' && open != '\'' {
            continue;
        }

        let body_start = start + open.len_utf8();
        if let Some(len) = text[body_start..].find(open) {
            if len > 0 {
                let body_end = body_start + len;
                return Some((
                    &text[start..body_end + open.len_utf8()],
                    &text[body_start..body_end],
                ));
            }
        }
    }
    None
}

/// First sentence or line short enough to read as a title.
fn short_segment(text: &str) -> Option<&str> {
    text.split(|c: char| matches!(c, '\n' | '.' | '!' | '?'))
        .map(str::trim)
        .find(|segment| {
            !segment.is_empty()
                && segment.split_whitespace().count() <= TITLE_MAX_WORDS
                && segment.chars().count() <= TITLE_MAX_CHARS
        })
}

fn tidy_description(text: &str) -> String {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ':' | ';' | '-'));
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}
