//! Flashcard store and the document-to-card pipeline
//!
//! Cards are created either by hand or in batches derived from document text.
//! Every id comes from one monotonic counter owned by the [`FlashcardStore`],
//! so manual and batch additions never collide however they interleave.

mod segment;
mod synth;

use serde::{Deserialize, Serialize};

pub use segment::Segmenter;
pub use synth::synthesize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: u64,
    pub question: String,
    pub answer: String,
    pub flipped: bool,
}

/// Ordered collection of flashcards for one study session
#[derive(Default)]
pub struct FlashcardStore {
    cards: Vec<Flashcard>,
    /// Highest id ever allocated
    last_id: u64,
    segmenter: Segmenter,
}

impl FlashcardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card typed in by the user.
    ///
    /// Returns `None` without touching the store when either side is blank.
    pub fn add_manual(&mut self, question: &str, answer: &str) -> Option<Flashcard> {
        if question.trim().is_empty() || answer.trim().is_empty() {
            tracing::debug!("Rejecting flashcard with blank question or answer");
            return None;
        }

        self.last_id += 1;
        let card = Flashcard {
            id: self.last_id,
            question: question.to_string(),
            answer: answer.to_string(),
            flipped: false,
        };
        self.cards.push(card.clone());
        Some(card)
    }

    /// Append pre-numbered cards in order, keeping their ids.
    ///
    /// Returns the cards actually stored; a card whose id is taken is skipped.
    pub fn add_batch(&mut self, cards: Vec<Flashcard>) -> Vec<Flashcard> {
        let mut added = Vec::with_capacity(cards.len());
        for card in cards {
            if self.get(card.id).is_some() {
                tracing::warn!(id = card.id, "Skipping flashcard with duplicate id");
                continue;
            }
            self.last_id = self.last_id.max(card.id);
            self.cards.push(card.clone());
            added.push(card);
        }
        added
    }

    /// Offset to hand to [`synthesize`] for the next batch
    pub fn id_offset(&self) -> u64 {
        self.last_id
    }

    /// Segment `text`, pair the segments into cards and append them.
    ///
    /// Returns only the cards that made it into the store.
    pub fn ingest_text(&mut self, text: &str) -> Vec<Flashcard> {
        let segments = self.segmenter.segment(text);
        let cards = synthesize(&segments, self.id_offset());
        let derived = cards.len();
        let added = self.add_batch(cards);

        tracing::info!(
            segments = segments.len(),
            derived,
            added = added.len(),
            "Derived flashcards from text"
        );
        added
    }

    /// Toggle the card between question and answer side
    pub fn flip(&mut self, id: u64) -> bool {
        match self.cards.iter_mut().find(|card| card.id == id) {
            Some(card) => {
                card.flipped = !card.flipped;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: u64) -> Option<&Flashcard> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_id(store: &FlashcardStore) -> u64 {
        store.cards().iter().map(|c| c.id).max().unwrap_or(0)
    }

    #[test]
    fn test_first_manual_card_gets_id_one() {
        let mut store = FlashcardStore::new();
        assert!(store.is_empty());

        let card = store.add_manual("What is DNA?", "A nucleic acid").unwrap();

        assert_eq!(card.id, 1);
        assert!(!card.flipped);
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_manual_ids_follow_max() {
        let mut store = FlashcardStore::new();
        store.add_manual("q1", "a1").unwrap();
        store.ingest_text("Q1. A1. Q2. A2.");

        let previous_max = max_id(&store);
        let previous_len = store.len();
        let card = store.add_manual("q2", "a2").unwrap();

        assert_eq!(card.id, previous_max + 1);
        assert_eq!(store.len(), previous_len + 1);
    }

    #[test]
    fn test_blank_fields_rejected() {
        let mut store = FlashcardStore::new();
        store.add_manual("kept", "card").unwrap();

        assert!(store.add_manual("", "x").is_none());
        assert!(store.add_manual("x", "  ").is_none());

        assert_eq!(store.len(), 1);
        assert_eq!(max_id(&store), 1);
        assert_eq!(store.add_manual("next", "card").unwrap().id, 2);
    }

    #[test]
    fn test_manual_keeps_raw_text() {
        let mut store = FlashcardStore::new();
        let card = store.add_manual("  spaced ", "answer\n").unwrap();
        assert_eq!(card.question, "  spaced ");
        assert_eq!(card.answer, "answer\n");
    }

    #[test]
    fn test_flip_toggles_only_target() {
        let mut store = FlashcardStore::new();
        store.add_manual("q1", "a1").unwrap();
        store.add_manual("q2", "a2").unwrap();
        let before = store.cards().to_vec();

        assert!(store.flip(2));
        assert_eq!(store.cards()[0], before[0]);
        assert!(store.get(2).unwrap().flipped);
        assert_eq!(store.get(2).unwrap().question, "q2");

        assert!(store.flip(2));
        assert_eq!(store.cards(), before.as_slice());
    }

    #[test]
    fn test_flip_unknown_is_noop() {
        let mut store = FlashcardStore::new();
        store.add_manual("q", "a").unwrap();
        let before = store.cards().to_vec();

        assert!(!store.flip(99));
        assert_eq!(store.cards(), before.as_slice());
    }

    #[test]
    fn test_ingest_text_after_manual_cards() {
        let mut store = FlashcardStore::new();
        store.add_manual("q1", "a1").unwrap();
        store.add_manual("q2", "a2").unwrap();

        let cards = store.ingest_text("What is mitosis? Cell division.\nWhat is meiosis? Gamete formation.\n");

        let ids: Vec<u64> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 5]);
        assert_eq!(cards[0].question, "What is mitosis?");
        assert_eq!(cards[1].answer, "Gamete formation.");
        assert_eq!(store.len(), 4);

        let mut all: Vec<u64> = store.cards().iter().map(|c| c.id).collect();
        all.dedup();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_ingest_text_returns_what_was_stored() {
        let mut store = FlashcardStore::new();
        store.add_manual("q1", "a1").unwrap();

        let cards = store.ingest_text("Q1. A1. Q2. A2. Orphan.");

        assert_eq!(cards.len(), 2);
        assert_eq!(cards.as_slice(), &store.cards()[1..]);
        assert!(store.ingest_text("   ").is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_batch_advances_counter() {
        let mut store = FlashcardStore::new();
        let batch = synthesize(&["Q1.", "A1.", "Q2.", "A2."], store.id_offset());

        assert_eq!(store.add_batch(batch).len(), 2);
        assert_eq!(store.id_offset(), 3);
        assert_eq!(store.add_manual("q", "a").unwrap().id, 4);
    }

    #[test]
    fn test_batch_skips_duplicate_ids() {
        let mut store = FlashcardStore::new();
        let existing = store.add_manual("q", "a").unwrap();

        let fresh = Flashcard {
            id: 7,
            question: "What is a ribosome?".into(),
            answer: "A protein factory.".into(),
            flipped: false,
        };

        let added = store.add_batch(vec![existing.clone(), fresh.clone()]);

        assert_eq!(added, vec![fresh]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some(&existing));
        assert_eq!(store.id_offset(), 7);
    }
}
