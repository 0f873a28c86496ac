use crate::session::question::{Answer, Question};

pub fn is_correct(question: &Question, input: &str) -> bool {
    match &question.answer {
        Answer::Exact(expected) => matches_exact(expected, input),
        Answer::FactorPairs(pairs) => matches_factor_pair(input, pairs),
    }
}

pub fn matches_exact(expected: &str, input: &str) -> bool {
    input.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Accepts `"3,4"`, `"4 x 3"`, `"3*4"`, `"3 × 4"` and any mix of those
/// separators. The pair is unordered.
pub fn matches_factor_pair(input: &str, pairs: &[(u32, u32)]) -> bool {
    let Some((a, b)) = parse_factor_pair(input) else {
        return false;
    };
    pairs.iter().any(|&(x, y)| {
        let (x, y) = (i64::from(x), i64::from(y));
        (a == x && b == y) || (a == y && b == x)
    })
}

/// Exactly two integers separated by any run of whitespace, `,`, `x`, `*` or `×`.
pub fn parse_factor_pair(input: &str) -> Option<(i64, i64)> {
    let normalized = input.trim().to_lowercase();
    let mut parts = normalized
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | 'x' | '*' | '×'))
        .filter(|s| !s.is_empty());

    let a = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b))
}
