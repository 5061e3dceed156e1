//! Document ingestion
//!
//! Pulls plain text out of a paged document one page at a time. Extraction is
//! best effort: a page that fails is logged and skipped, and the caller gets
//! whatever text was collected together with the number of failed pages.

use async_trait::async_trait;
use serde::Serialize;

/// Form feed, the page separator `pdftotext` emits
const PAGE_BREAK: char = '\u{0C}';

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Unreadable document: {0}")]
    Unreadable(String),

    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("Extraction failed: {0}")]
    Extraction(String),
}

/// A paged document that can hand out the plain text of each page
#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn page_count(&self) -> usize;

    /// Text of `page`, numbered from 1
    async fn page_text(&self, page: usize) -> Result<String, DocumentError>;
}

/// Result of ingesting a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ingestion {
    /// Page texts in page order, each followed by a newline
    pub text: String,
    pub pages: usize,
    pub failed_pages: usize,
}

/// Extract every page in ascending order, one request at a time
pub async fn ingest(document: &dyn DocumentSource) -> Ingestion {
    let pages = document.page_count();
    let mut ingestion = Ingestion {
        pages,
        ..Default::default()
    };

    for page in 1..=pages {
        match document.page_text(page).await {
            Ok(text) => {
                ingestion.text.push_str(&text);
                ingestion.text.push('\n');
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "Failed to extract page text");
                ingestion.failed_pages += 1;
            }
        }
    }

    tracing::info!(
        pages,
        failed = ingestion.failed_pages,
        chars = ingestion.text.len(),
        "Ingested document"
    );
    ingestion
}

/// Already-extracted document text with pages separated by form feeds
#[derive(Debug, Clone)]
pub struct TextDocument {
    pages: Vec<String>,
}

impl TextDocument {
    pub fn from_text(text: &str) -> Self {
        let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();

        // pdftotext terminates the last page with a form feed too
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }

        Self { pages }
    }
}

#[async_trait]
impl DocumentSource for TextDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_text(&self, page: usize) -> Result<String, DocumentError> {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .cloned()
            .ok_or(DocumentError::PageOutOfRange {
                page,
                count: self.pages.len(),
            })
    }
}
