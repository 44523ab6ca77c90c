//! Locating the section list inside a payload cell.

use serde_json::Value;

/// Record keys searched, in order, for a wrapped section list.
pub const SECTION_LIST_KEYS: [&str; 5] = ["sections", "data", "form", "payload", "answers"];

/// Parses a payload cell into its list of sections.
///
/// Returns `None` for a missing cell, blank text, text that does not start
/// with `[` or `{`, text that is not JSON even after stripping surrounding
/// double quotes, and JSON that is neither a list nor a record wrapping a
/// list under one of [`SECTION_LIST_KEYS`]. Never fails.
///
/// # Examples
///
/// ```
/// use form_flatten::payload::parse_sections;
///
/// assert_eq!(parse_sections(Some(r#"[{"questions": []}]"#)).map(|s| s.len()), Some(1));
/// assert_eq!(parse_sections(Some(r#"{"form": [{}, {}]}"#)).map(|s| s.len()), Some(2));
/// assert!(parse_sections(Some("not json")).is_none());
/// assert!(parse_sections(None).is_none());
/// ```
pub fn parse_sections(cell: Option<&str>) -> Option<Vec<Value>> {
    let text = cell?.trim();
    if text.is_empty() || !(text.starts_with('[') || text.starts_with('{')) {
        return None;
    }

    let parsed = serde_json::from_str::<Value>(text)
        .or_else(|_| serde_json::from_str::<Value>(text.trim_matches('"')))
        .ok()?;

    match parsed {
        Value::Array(sections) => Some(sections),
        Value::Object(mut record) => SECTION_LIST_KEYS
            .iter()
            .find(|key| record.get(**key).is_some_and(Value::is_array))
            .and_then(|key| record.remove(*key))
            .and_then(|value| match value {
                Value::Array(sections) => Some(sections),
                _ => None,
            }),
        _ => None,
    }
}

/// Like [`parse_sections`], but also treats an empty section list as absent.
///
/// This is the test the pipeline and the column sniffer use to decide
/// whether a row carries a usable payload.
pub fn parse_nonempty_sections(cell: Option<&str>) -> Option<Vec<Value>> {
    parse_sections(cell).filter(|sections| !sections.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_and_non_structured_text() {
        assert!(parse_sections(Some("")).is_none());
        assert!(parse_sections(Some("   \n")).is_none());
        assert!(parse_sections(Some("hello")).is_none());
        assert!(parse_sections(Some("42")).is_none());
    }

    #[test]
    fn test_list_is_returned_directly() {
        let sections = parse_sections(Some("  [1, {\"a\": 2}]  ")).unwrap();
        assert_eq!(sections.len(), 2);
    }

    #[test]
    fn test_wrapped_list_uses_key_preference_order() {
        let cell = r#"{"answers": [1], "data": [1, 2], "sections": "nope"}"#;
        assert_eq!(parse_sections(Some(cell)).unwrap().len(), 2);

        let cell = r#"{"sections": [1, 2, 3], "data": [1]}"#;
        assert_eq!(parse_sections(Some(cell)).unwrap().len(), 3);
    }

    #[test]
    fn test_record_without_list_is_absent() {
        assert!(parse_sections(Some(r#"{"sections": {"a": 1}}"#)).is_none());
        assert!(parse_sections(Some(r#"{"other": []}"#)).is_none());
    }

    #[test]
    fn test_retries_after_stripping_quotes() {
        let cell = r#"[{"questions": []}]""#;
        assert_eq!(parse_sections(Some(cell)).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_json_is_absent() {
        assert!(parse_sections(Some("[{\"questions\": ")).is_none());
        assert!(parse_sections(Some("{not: json}")).is_none());
    }

    #[test]
    fn test_empty_list_is_not_a_usable_payload() {
        assert_eq!(parse_sections(Some("[]")).map(|s| s.len()), Some(0));
        assert!(parse_nonempty_sections(Some("[]")).is_none());
        assert!(parse_nonempty_sections(Some("[{}]")).is_some());
    }
}
