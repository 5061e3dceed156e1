//! Question/answer pairing

use super::Flashcard;

/// Pair consecutive segments into flashcards.
///
/// Segment `2k` becomes the question and `2k + 1` the answer of the card with
/// id `id_offset + 2k + 1`. Blank segments are dropped before pairing. A
/// trailing unpaired segment is discarded.
pub fn synthesize<S: AsRef<str>>(segments: &[S], id_offset: u64) -> Vec<Flashcard> {
    let segments: Vec<&str> = segments
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.trim().is_empty())
        .collect();

    if segments.len() % 2 == 1 {
        tracing::debug!(
            dropped = segments[segments.len() - 1],
            "Discarding unpaired trailing segment"
        );
    }

    segments
        .chunks_exact(2)
        .enumerate()
        .map(|(k, pair)| Flashcard {
            id: id_offset + 2 * k as u64 + 1,
            question: pair[0].to_string(),
            answer: pair[1].to_string(),
            flipped: false,
        })
        .collect()
}
