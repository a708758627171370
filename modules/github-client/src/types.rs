use serde::Deserialize;
use serde_json::Value;

use crate::error::{GithubError, Result};

/// One file descriptor from a contents-listing response.
///
/// Lenient by design: directories carry `download_url: null`, and submodule
/// entries omit fields entirely. Eligibility filtering happens downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Interpret a contents-endpoint success body as a directory listing.
///
/// The endpoint returns an array for directories and an object for single
/// files or errors (`{"message": "Not Found"}`). Anything that is not an
/// array aborts the sync before any fetch begins.
pub fn parse_listing(body: Value) -> Result<Vec<ContentEntry>> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(GithubError::from))
            .collect(),
        other => {
            let message = other
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| "expected a JSON array of file descriptors".to_string());
            Err(GithubError::Listing(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_array_of_descriptors() {
        let body = json!([
            {
                "name": "intro.md",
                "path": "docs/intro.md",
                "sha": "abc123",
                "url": "https://api.github.com/repos/o/r/contents/docs/intro.md",
                "download_url": "https://raw.githubusercontent.com/o/r/main/docs/intro.md",
                "type": "file"
            },
            {
                "name": "img",
                "path": "docs/img",
                "sha": "def456",
                "url": "https://api.github.com/repos/o/r/contents/docs/img",
                "download_url": null,
                "type": "dir"
            }
        ]);

        let entries = parse_listing(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "intro.md");
        assert!(entries[0].download_url.is_some());
        assert_eq!(entries[1].kind, "dir");
        assert!(entries[1].download_url.is_none());
    }

    #[test]
    fn error_object_is_a_listing_error() {
        let err = parse_listing(json!({"message": "Not Found"})).unwrap_err();
        match err {
            GithubError::Listing(msg) => assert_eq!(msg, "Not Found"),
            other => panic!("expected Listing error, got {other:?}"),
        }
    }

    #[test]
    fn non_array_without_message_is_a_listing_error() {
        assert!(matches!(
            parse_listing(json!("nope")),
            Err(GithubError::Listing(_))
        ));
    }
}
