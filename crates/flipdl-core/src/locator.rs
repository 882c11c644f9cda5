//! Page resource locations for a book.
//!
//! Two layouts exist on the image host:
//! - numbered pages: `<host><book>/files/mobile/<i>.jpg`, `i` in `1..=N`
//! - named pages: `<host><book>/files/large/<name>`, one per `pageFileNames` entry

use url::Url;

use crate::error::FlipbookError;
use crate::metadata::FlipbookMetadata;
use crate::reference::FlipbookReference;

/// How page images are named on the image host; decided once per book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    /// 1-based numbered pages.
    Positional,
    /// Explicit per-page file names, in page order.
    Filename(Vec<String>),
}

impl Addressing {
    /// Picks the layout from metadata; fewer names than pages is an error.
    pub fn choose(metadata: &FlipbookMetadata) -> Result<Self, FlipbookError> {
        let names = &metadata.page_file_names;
        if names.is_empty() {
            return Ok(Addressing::Positional);
        }
        if names.len() < metadata.page_count {
            return Err(FlipbookError::PageFileNameCountMismatch {
                expected: metadata.page_count,
                found: names.len(),
            });
        }
        if names.len() > metadata.page_count {
            tracing::debug!(
                names = names.len(),
                pages = metadata.page_count,
                "extra page file names ignored"
            );
        }
        Ok(Addressing::Filename(
            names[..metadata.page_count].to_vec(),
        ))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Addressing::Positional => "positional",
            Addressing::Filename(_) => "filename",
        }
    }
}

/// One page image to retrieve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResource {
    /// 1-based for positional addressing, 0-based for filename addressing.
    pub index: usize,
    /// Absolute URL of the page image.
    pub location: String,
}

impl PageResource {
    /// Last path segment of the location; the staged file name.
    pub fn file_name(&self) -> Option<String> {
        crate::url_model::filename_from_url_path(&self.location)
    }
}

/// Builds the ordered page list for a book. Always exactly `page_count` entries.
pub fn locate_pages(
    image_host: &str,
    reference: &FlipbookReference,
    addressing: &Addressing,
    page_count: usize,
) -> Result<Vec<PageResource>, FlipbookError> {
    let mut base = Url::parse(image_host).map_err(|e| FlipbookError::InvalidReference {
        input: image_host.to_string(),
        reason: format!("image host: {e}"),
    })?;
    base.set_query(None);
    base.set_fragment(None);
    let book_path = reference.path().trim_end_matches('/');

    let page = |index: usize, tail: &str| {
        let mut url = base.clone();
        url.set_path(&format!("{book_path}/files/{tail}"));
        PageResource {
            index,
            location: url.into(),
        }
    };

    let pages = match addressing {
        Addressing::Positional => (1..=page_count)
            .map(|i| page(i, &format!("mobile/{i}.jpg")))
            .collect(),
        Addressing::Filename(names) => {
            if names.len() < page_count {
                return Err(FlipbookError::PageFileNameCountMismatch {
                    expected: page_count,
                    found: names.len(),
                });
            }
            names
                .iter()
                .take(page_count)
                .enumerate()
                .map(|(i, name)| page(i, &format!("large/{name}")))
                .collect()
        }
    };
    Ok(pages)
}
