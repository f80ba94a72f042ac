//! Document key conventions.
//!
//! Pure string functions, no AWS SDK dependency. A session document lives
//! at `{collection}/{code}.json`; the collection name is configuration.

/// Key of the session document for a learner code.
pub fn session_record(collection: &str, code: &str) -> String {
    format!("{}{}.json", collection_prefix(collection), sanitize_code(code))
}

/// Prefix under which every session document of a collection lives.
pub fn collection_prefix(collection: &str) -> String {
    format!("{}/", collection.trim_end_matches('/'))
}

/// Codes come from a login directory, but they still end up in an object
/// key, so anything outside `[A-Za-z0-9_-]` is replaced.
fn sanitize_code(code: &str) -> String {
    code.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_joins_collection_and_code() {
        assert_eq!(session_record("responses", "A1"), "responses/A1.json");
        assert_eq!(session_record("responses/", "A1"), "responses/A1.json");
    }

    #[test]
    fn record_key_never_escapes_collection() {
        assert_eq!(session_record("responses", "../x y"), "responses/___x_y.json");
    }

    #[test]
    fn prefix_has_single_trailing_slash() {
        assert_eq!(collection_prefix("responses"), "responses/");
        assert_eq!(collection_prefix("responses/"), "responses/");
    }
}
