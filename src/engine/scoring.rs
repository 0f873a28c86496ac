use serde::{Deserialize, Serialize};

use crate::client::api::BestScore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Celebration {
    Standard,
    /// Perfect run through the base round and the bonus round.
    Ultimate,
}

pub fn ratio(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    score as f64 / total as f64
}

pub fn is_perfect(score: usize, total: usize) -> bool {
    total > 0 && score == total
}

/// Strictly better than the stored best ratio; an equal ratio is not a record.
pub fn is_new_record(score: usize, total: usize, best: &BestScore) -> bool {
    if total == 0 {
        return false;
    }
    let best_ratio = if best.total > 0 {
        f64::from(best.score) / f64::from(best.total)
    } else {
        0.0
    };
    ratio(score, total) > best_ratio
}
