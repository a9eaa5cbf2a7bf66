//! Validated paths relative to the upload root.

use std::fmt;

use crate::{Result, VidshelfError};

/// A path below the upload root, held as validated segments.
///
/// Segments never contain separators, `.` or `..`, so joining them onto the
/// root cannot climb out of it lexically. Symlink escapes are caught later by
/// [`UploadRoot::resolve`](super::UploadRoot::resolve).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RelativePath {
    segments: Vec<String>,
}

impl RelativePath {
    /// The upload root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-separated path. Empty segments are skipped, so `""`, `"/"`
    /// and `"a//b/"` are all accepted.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for segment in raw.split('/').filter(|s| !s.is_empty()) {
            validate_segment(segment)?;
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// A single file name directly under the root.
    pub fn file_name(name: &str) -> Result<Self> {
        if name.contains('/') {
            return Err(VidshelfError::Validation(format!(
                "file name must not contain '/': {name}"
            )));
        }
        // A bad upload name is a client error, not an escape attempt on a stored path.
        validate_segment(name).map_err(|e| match e {
            VidshelfError::PathEscape(msg) => {
                VidshelfError::Validation(format!("invalid file name: {msg}"))
            }
            other => other,
        })?;
        Ok(Self {
            segments: vec![name.to_string()],
        })
    }

    /// Path segments from the root down.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The path with its last segment dropped. `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// Append one segment.
    pub fn join(&self, segment: &str) -> Result<Self> {
        validate_segment(segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    /// Percent-encoded form suitable for a URL path (no leading slash).
    pub fn to_url_path(&self) -> String {
        self.segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(VidshelfError::Validation("empty path segment".to_string()));
    }
    if segment == "." || segment == ".." || segment.contains('\\') || segment.contains('/') {
        return Err(VidshelfError::PathEscape(segment.to_string()));
    }
    if segment.chars().any(char::is_control) {
        return Err(VidshelfError::Validation(
            "path segment contains control characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root_forms() {
        assert!(RelativePath::parse("").unwrap().is_root());
        assert!(RelativePath::parse("/").unwrap().is_root());
        assert_eq!(RelativePath::parse("").unwrap(), RelativePath::root());
    }

    #[test]
    fn test_parse_skips_empty_segments() {
        let path = RelativePath::parse("a//b/").unwrap();
        assert_eq!(path.segments(), ["a", "b"]);
        assert_eq!(path.to_string(), "a/b");
    }

    #[test]
    fn test_parse_rejects_traversal() {
        for raw in ["..", "../../etc", "a/../b", "./a", "a/.", "a\\..\\b"] {
            let result = RelativePath::parse(raw);
            assert!(
                matches!(result, Err(VidshelfError::PathEscape(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_control_characters() {
        let result = RelativePath::parse("a/b\0c");
        assert!(matches!(result, Err(VidshelfError::Validation(_))));
    }

    #[test]
    fn test_parse_allows_dots_inside_names() {
        let path = RelativePath::parse("season..1/clip.final.mp4").unwrap();
        assert_eq!(path.segments(), ["season..1", "clip.final.mp4"]);
    }

    #[test]
    fn test_file_name() {
        let path = RelativePath::file_name("clip.mp4").unwrap();
        assert_eq!(path.segments(), ["clip.mp4"]);

        assert!(RelativePath::file_name("").is_err());
        assert!(matches!(
            RelativePath::file_name(".."),
            Err(VidshelfError::Validation(_))
        ));
        assert!(RelativePath::file_name("sub/clip.mp4").is_err());
        assert!(RelativePath::file_name("..\\clip.mp4").is_err());
        assert!(RelativePath::file_name("clip\n.mp4").is_err());
    }

    #[test]
    fn test_parent_drops_last_segment() {
        let path = RelativePath::parse("a/b/c").unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "a/b");
        assert!(RelativePath::parse("a").unwrap().parent().unwrap().is_root());
        assert!(RelativePath::root().parent().is_none());
    }

    #[test]
    fn test_join_and_name() {
        let path = RelativePath::parse("shows").unwrap().join("pilot.mkv").unwrap();
        assert_eq!(path.to_string(), "shows/pilot.mkv");
        assert_eq!(path.name(), Some("pilot.mkv"));
        assert!(path.join("..").is_err());
    }

    #[test]
    fn test_to_url_path_encodes_segments() {
        let path = RelativePath::parse("my videos/clip #1.mp4").unwrap();
        assert_eq!(path.to_url_path(), "my%20videos/clip%20%231.mp4");
        assert_eq!(RelativePath::root().to_url_path(), "");
    }
}
