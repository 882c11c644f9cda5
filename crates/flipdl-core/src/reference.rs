//! Reference normalization: any viewer URL of a book → its two-segment base.

use url::Url;

use crate::error::FlipbookError;

/// Canonical locator of one flipbook: scheme, host and exactly two path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipbookReference {
    url: Url,
}

impl FlipbookReference {
    /// Normalizes `input`, keeping only the first two path segments.
    ///
    /// `https://example.com/abc/123/456?x=1` → `https://example.com/abc/123`.
    pub fn parse(input: &str) -> Result<Self, FlipbookError> {
        let invalid = |reason: &str| FlipbookError::InvalidReference {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(input.trim()).map_err(|e| invalid(&e.to_string()))?;
        let segments: Vec<String> = url
            .path_segments()
            .ok_or_else(|| invalid("reference has no path"))?
            .filter(|s| !s.is_empty())
            .take(2)
            .map(str::to_string)
            .collect();
        if segments.len() < 2 {
            return Err(invalid("expected at least two path segments"));
        }

        url.set_path(&format!("/{}/{}", segments[0], segments[1]));
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { url })
    }

    /// Book path, e.g. `/abc/123`.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Last path segment (the book id); used as fallback title.
    pub fn last_segment(&self) -> &str {
        self.url
            .path_segments()
            .and_then(|mut s| s.next_back())
            .unwrap_or_default()
    }

    /// URL of the configuration payload: `<reference>?configjs`.
    pub fn config_url(&self) -> String {
        format!("{}?configjs", self.url)
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl std::fmt::Display for FlipbookReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}
