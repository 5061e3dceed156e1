//! Core study engine components
//!
//! This module contains the orchestration logic that feeds the flashcard
//! store and the conversation registry.

mod chat;
mod ingest;
mod pdf;

pub use chat::{ChatOrchestrator, SendOutcome};
pub use ingest::{ingest, DocumentSource, TextDocument};
pub use pdf::PdfDocument;

#[cfg(test)]
pub(crate) use pdf::sample_pdf;
