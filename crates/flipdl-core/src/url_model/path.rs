//! Filename extraction from URL path.

/// Extracts the last path segment of a URL, as used for staged page files.
///
/// Returns `None` if the URL cannot be parsed or the path ends in `/`.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.last()?;
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
