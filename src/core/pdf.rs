//! PDF documents
//!
//! Page text is pulled out with `lopdf` when the document is loaded, so the
//! parsed object tree never has to cross an await point.

use async_trait::async_trait;
use lopdf::Document;

use super::ingest::{DocumentError, DocumentSource};

/// A PDF whose pages have been run through text extraction
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pages: Vec<Result<String, String>>,
}

impl PdfDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let document =
            Document::load_mem(bytes).map_err(|e| DocumentError::Unreadable(e.to_string()))?;

        let pages: Vec<_> = document
            .get_pages()
            .into_keys()
            .map(|number| {
                document
                    .extract_text(&[number])
                    .map_err(|e| e.to_string())
            })
            .collect();

        tracing::debug!(pages = pages.len(), "Loaded PDF");
        Ok(Self { pages })
    }
}

#[async_trait]
impl DocumentSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_text(&self, page: usize) -> Result<String, DocumentError> {
        let extracted = page
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .ok_or(DocumentError::PageOutOfRange {
                page,
                count: self.pages.len(),
            })?;

        extracted
            .clone()
            .map_err(DocumentError::Extraction)
    }
}

/// Builds a PDF with one line of Courier text per page
#[cfg(test)]
pub(crate) fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ingest;

    #[tokio::test]
    async fn test_pages_extracted_in_order() {
        let bytes = sample_pdf(&["What is ATP?", "Energy currency."]);
        let document = tokio_test::assert_ok!(PdfDocument::from_bytes(&bytes));

        assert_eq!(document.page_count(), 2);
        assert_eq!(document.page_text(1).await.unwrap().trim(), "What is ATP?");
        assert_eq!(document.page_text(2).await.unwrap().trim(), "Energy currency.");
    }

    #[tokio::test]
    async fn test_out_of_range_page() {
        let document = PdfDocument::from_bytes(&sample_pdf(&["Only page."])).unwrap();

        let err = document.page_text(2).await.unwrap_err();
        assert!(matches!(err, DocumentError::PageOutOfRange { page: 2, count: 1 }));
    }

    #[tokio::test]
    async fn test_ingest_pdf() {
        let document = PdfDocument::from_bytes(&sample_pdf(&["Cells divide.", "By mitosis."])).unwrap();

        let ingestion = ingest(&document).await;

        assert_eq!(ingestion.pages, 2);
        assert_eq!(ingestion.failed_pages, 0);
        assert!(ingestion.text.contains("Cells divide."));
        assert!(ingestion.text.contains("By mitosis."));
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = tokio_test::assert_err!(PdfDocument::from_bytes(b"plain notes, not a PDF"));
        assert!(matches!(err, DocumentError::Unreadable(_)));
    }
}
