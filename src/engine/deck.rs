use rand::Rng;
use rand::seq::SliceRandom;

use crate::client::api::ErrorRecord;
use crate::engine::selection::select_weighted;
use crate::generator;
use crate::session::question::{ExerciseType, Question};

/// Generate the candidate pool, pick up to `limit` cards weighted by past
/// misses, and shuffle them into play order.
pub fn build_deck<R: Rng>(
    mode: ExerciseType,
    tables: &[u32],
    errors: &[ErrorRecord],
    limit: usize,
    rng: &mut R,
) -> Vec<Question> {
    let candidates = generator::generate(mode, tables);
    let mut deck = select_weighted(candidates, errors, limit, rng);
    deck.shuffle(rng);
    tracing::debug!(mode = %mode, cards = deck.len(), "deck built");
    deck
}
