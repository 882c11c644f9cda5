//! File naming: staged page names from page URLs, document names from titles.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_file_name;

/// Name used when a title sanitizes to nothing.
const DEFAULT_DOCUMENT_STEM: &str = "flipbook";

/// Output document file name for a book title, e.g. `"My Book: Vol 1"` → `"My_Book_Vol_1.pdf"`.
pub fn document_file_name(title: &str, extension: &str) -> String {
    let stem = sanitize_file_name(title);
    let stem = if stem.is_empty() {
        DEFAULT_DOCUMENT_STEM
    } else {
        stem.as_str()
    };
    format!("{stem}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_name_from_title() {
        assert_eq!(document_file_name("Annual Report", "pdf"), "Annual_Report.pdf");
        assert_eq!(document_file_name("My Book: Vol 1", "pdf"), "My_Book_Vol_1.pdf");
    }

    #[test]
    fn document_name_fallback() {
        assert_eq!(document_file_name("", "pdf"), "flipbook.pdf");
        assert_eq!(document_file_name(" .. ", "pdf"), "flipbook.pdf");
        assert_eq!(document_file_name("'/'", "pdf"), "flipbook.pdf");
    }
}
