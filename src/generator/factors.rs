use std::collections::HashSet;

use crate::generator::{MULTIPLICANDS, QuestionGenerator};
use crate::session::question::Question;

/// Largest factor a learner is expected to know.
pub const MAX_FACTOR: u32 = 12;

/// Unordered factor pairs `(a, b)` with `a <= b <= MAX_FACTOR`.
///
/// The trivial pair `(1, n)` is only kept when nothing else qualifies, so
/// primes (and 1) remain answerable while `12` asks for `2 x 6` or `3 x 4`.
pub fn resolve_factor_pairs(n: u32) -> Vec<(u32, u32)> {
    if n == 0 {
        return Vec::new();
    }

    let mut pairs = Vec::new();
    let mut i = 1;
    while i * i <= n {
        if n % i == 0 {
            let j = n / i;
            if i <= MAX_FACTOR && j <= MAX_FACTOR {
                pairs.push((i, j));
            }
        }
        i += 1;
    }

    if pairs.len() > 1 {
        pairs.retain(|&(a, _)| a != 1);
    }
    pairs
}

pub struct FactorGenerator;

impl QuestionGenerator for FactorGenerator {
    fn generate(&self, tables: &[u32]) -> Vec<Question> {
        let mut seen = HashSet::new();
        let mut cards = Vec::new();
        for n in MULTIPLICANDS {
            for &table in tables {
                let product = table * n;
                if !seen.insert(product) {
                    continue;
                }
                let pairs = resolve_factor_pairs(product);
                if !pairs.is_empty() {
                    cards.push(Question::factor(product, pairs));
                }
            }
        }
        cards
    }
}
