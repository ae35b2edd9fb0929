//! Parsing the model response into schedule entries
//!
//! The model is asked for a bare JSON array but may wrap it in markdown
//! fences or prose. The parser extracts the first top-level array and
//! decodes it; anything else is a parse failure.

use tracing::debug;

use crate::domain::ScheduleEntry;

/// Parse the raw response text into schedule entries
pub fn parse_schedule(raw: &str) -> Result<Vec<ScheduleEntry>, String> {
    let json = extract_json_array(raw).ok_or_else(|| "No JSON array found in response".to_string())?;
    debug!(json_len = json.len(), "parse_schedule: extracted array");

    serde_json::from_str::<Vec<ScheduleEntry>>(json).map_err(|e| format!("Response is not a schedule array: {}", e))
}

/// Locate the first top-level JSON array in the text
///
/// Strips markdown code fences first, then matches brackets (respecting
/// string literals and escapes) so trailing prose does not confuse the
/// extraction.
fn extract_json_array(raw: &str) -> Option<&str> {
    let text = strip_code_fences(raw);

    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Remove a surrounding markdown code fence, if present
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line (e.g. "json")
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    const PLAIN: &str = r#"[
        {"task_name": "Write report", "start_time": "09:00", "end_time": "11:00", "priority": "high"},
        {"task_name": "Email replies", "start_time": "11:00", "end_time": "11:30", "priority": "low"}
    ]"#;

    #[test]
    fn test_parse_plain_array() {
        let entries = parse_schedule(PLAIN).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].task_name, "Write report");
        assert_eq!(entries[1].priority, Priority::Low);
    }

    #[test]
    fn test_parse_fenced_array() {
        let fenced = format!("```json\n{}\n```", PLAIN);
        let entries = parse_schedule(&fenced).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_parse_fence_without_language_tag() {
        let fenced = format!("```\n{}\n```", PLAIN);
        assert_eq!(parse_schedule(&fenced).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_prose_wrapped_array() {
        let wrapped = format!("Here is your optimized schedule:\n{}\nEnjoy your day!", PLAIN);
        let entries = parse_schedule(&wrapped).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_schedule("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_schedule("I could not produce a schedule.").is_err());
    }

    #[test]
    fn test_parse_wrong_shape_fails() {
        assert!(parse_schedule(r#"[{"foo": "bar"}]"#).is_err());
    }

    #[test]
    fn test_parse_unterminated_array_fails() {
        assert!(parse_schedule(r#"[{"task_name": "x""#).is_err());
    }

    #[test]
    fn test_brackets_inside_strings_ignored() {
        let tricky = r#"[{"task_name": "Review [draft]", "start_time": "09:00", "end_time": "10:00", "priority": "medium"}]"#;
        let entries = parse_schedule(tricky).unwrap();
        assert_eq!(entries[0].task_name, "Review [draft]");
    }
}
