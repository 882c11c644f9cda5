//! Filesystem-safe names.

/// Sanitizes a candidate file name (typically a book title).
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Drops `'` and `:`
/// - Trims leading/trailing dots and underscores
/// - Collapses consecutive underscores
/// - Limits length to 250 bytes, leaving room for an extension
pub fn sanitize_file_name(name: &str) -> String {
    const STEM_MAX: usize = 250;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        if c == '\'' || c == ':' {
            continue;
        }
        let replacement = if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() > STEM_MAX {
        let mut take = STEM_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
