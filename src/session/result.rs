use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::api::{BestScore, ResultReport};
use crate::engine::badges::{Badge, badges_for};
use crate::engine::scoring::{self, Celebration};
use crate::session::question::ExerciseType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusStatus {
    NotPlayed,
    Declined,
    Played,
}

/// Final (or, when abandoned, partial) numbers for one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: ExerciseType,
    pub tables: Vec<u32>,
    pub score: usize,
    pub total: usize,
    pub mean_time_seconds: f64,
    /// Number of questions a full run would have asked.
    pub expected_total: usize,
    pub bonus: BonusStatus,
    #[serde(default)]
    pub partial: bool,
    pub finished_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn is_full_length(&self) -> bool {
        self.total == self.expected_total
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionOutcome {
    pub perfect: bool,
    pub new_record: bool,
    pub celebration: Option<Celebration>,
    pub badges: Vec<Badge>,
}

/// Turns summaries into payloads and end-of-session verdicts for one player.
pub struct ResultReporter {
    player: String,
    group_id: Option<i64>,
    best: BestScore,
}

impl ResultReporter {
    pub fn new(player: impl Into<String>, group_id: Option<i64>, best: BestScore) -> Self {
        Self {
            player: player.into(),
            group_id,
            best,
        }
    }

    pub fn best(&self) -> BestScore {
        self.best
    }

    /// Payload for the result endpoint; `None` when nothing was answered.
    pub fn report(&self, summary: &SessionSummary) -> Option<ResultReport> {
        if summary.total == 0 {
            return None;
        }
        Some(ResultReport {
            name: self.player.clone(),
            score: summary.score as u32,
            total: summary.total as u32,
            tables: summary.tables.clone(),
            exercise_type: summary.mode,
            mean_time_seconds: summary.mean_time_seconds,
            group_id: self.group_id,
        })
    }

    pub fn outcome(&self, summary: &SessionSummary) -> SessionOutcome {
        let perfect = scoring::is_perfect(summary.score, summary.total);
        let new_record = scoring::is_new_record(summary.score, summary.total, &self.best);

        let celebration = match summary.bonus {
            BonusStatus::Declined => Some(Celebration::Standard),
            BonusStatus::Played if perfect && summary.is_full_length() => {
                Some(Celebration::Ultimate)
            }
            _ if summary.is_full_length() && (perfect || new_record) => {
                Some(Celebration::Standard)
            }
            _ => None,
        };

        let badges = if summary.mode.is_megamix() {
            Vec::new()
        } else {
            badges_for(
                summary.score as u32,
                summary.total as u32,
                summary.tables.len(),
            )
        };

        SessionOutcome {
            perfect,
            new_record,
            celebration,
            badges,
        }
    }
}
