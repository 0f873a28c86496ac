use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;

use crate::config::Config;
use crate::engine::validate::is_correct;
use crate::generator::{TABLE_RANGE, all_tables};
use crate::session::question::{ExerciseType, Question};
use crate::session::result::{BonusStatus, SessionSummary};
use crate::session::state::SessionState;
use crate::session::timer::{Countdown, Delay};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("select at least one table")]
    NoTables,
    #[error("table {0} is outside 1-12")]
    TableOutOfRange(u32),
}

/// A validated mode and table selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSetup {
    mode: ExerciseType,
    tables: Vec<u32>,
}

impl QuizSetup {
    pub fn new(mode: ExerciseType, tables: &[u32]) -> Result<Self, SetupError> {
        if mode.is_megamix() {
            return Ok(Self {
                mode,
                tables: all_tables(),
            });
        }
        if let Some(&bad) = tables.iter().find(|t| !TABLE_RANGE.contains(t)) {
            return Err(SetupError::TableOutOfRange(bad));
        }
        let mut tables = tables.to_vec();
        tables.sort_unstable();
        tables.dedup();
        if tables.is_empty() {
            return Err(SetupError::NoTables);
        }
        Ok(Self { mode, tables })
    }

    pub fn mode(&self) -> ExerciseType {
        self.mode
    }

    pub fn tables(&self) -> &[u32] {
        &self.tables
    }
}

/// Time limits, feedback pauses and the bonus threshold for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizRules {
    pub time_limit: Duration,
    pub factor_time_limit: Duration,
    pub correct_delay: Duration,
    pub incorrect_delay: Duration,
    /// A perfect Megamix round of exactly this many cards unlocks the bonus.
    pub bonus_threshold: usize,
}

impl Default for QuizRules {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl QuizRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            time_limit: Duration::from_secs(config.time_limit_secs),
            factor_time_limit: Duration::from_secs(config.factor_time_limit_secs),
            correct_delay: Duration::from_millis(config.correct_delay_ms),
            incorrect_delay: Duration::from_millis(config.incorrect_delay_ms),
            bonus_threshold: config.megamix_limit,
        }
    }

    fn limit_for(&self, question: &Question) -> Duration {
        if question.uses_extended_time() {
            self.factor_time_limit
        } else {
            self.time_limit
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { expected: String },
    TimedOut { expected: String },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct)
    }
}

/// Instructions for the presentation and collaborator layers.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    ShowQuestion {
        index: usize,
        total: usize,
        prompt: String,
        time_limit: Duration,
        bonus: bool,
    },
    EnableInput,
    DisableInput,
    ShowFeedback(Feedback),
    RecordMiss { prompt: String },
    OfferBonus,
    Finished(SessionSummary),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Asking(Countdown),
    Feedback(Delay),
    BonusOffer,
    Finished,
}

/// One quiz attempt, driven entirely by the caller's clock.
pub struct Quiz {
    setup: QuizSetup,
    rules: QuizRules,
    state: SessionState,
    phase: Phase,
    expected_total: usize,
    bonus_status: BonusStatus,
}

impl Quiz {
    pub fn new(setup: QuizSetup, cards: Vec<Question>, rules: QuizRules) -> Self {
        let expected_total = cards.len();
        Self {
            setup,
            rules,
            state: SessionState::new(cards),
            phase: Phase::Idle,
            expected_total,
            bonus_status: BonusStatus::NotPlayed,
        }
    }

    pub fn setup(&self) -> &QuizSetup {
        &self.setup
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        match &self.phase {
            Phase::Asking(countdown) => Some(countdown),
            _ => None,
        }
    }

    pub fn is_asking(&self) -> bool {
        matches!(self.phase, Phase::Asking(_))
    }

    pub fn is_offering_bonus(&self) -> bool {
        matches!(self.phase, Phase::BonusOffer)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    fn in_flight(&self) -> bool {
        matches!(
            self.phase,
            Phase::Asking(_) | Phase::Feedback(_) | Phase::BonusOffer
        )
    }

    pub fn start(&mut self, now: Instant) -> Vec<Intent> {
        if !matches!(self.phase, Phase::Idle) {
            return Vec::new();
        }
        tracing::info!(
            mode = %self.setup.mode,
            tables = ?self.setup.tables,
            cards = self.state.cards.len(),
            "session started"
        );
        self.show_current(now)
    }

    pub fn submit(&mut self, input: &str, now: Instant) -> Vec<Intent> {
        let Phase::Asking(countdown) = self.phase else {
            return Vec::new();
        };
        if countdown.expired(now) {
            return self.time_out(countdown, now);
        }
        let Some(question) = self.state.current().cloned() else {
            return Vec::new();
        };

        let elapsed = countdown.elapsed(now).as_secs_f64();
        let correct = is_correct(&question, input);
        self.state.record(correct, elapsed);
        tracing::debug!(prompt = %question.prompt, correct, elapsed, "answer submitted");

        let mut intents = vec![Intent::DisableInput];
        if correct {
            intents.push(Intent::ShowFeedback(Feedback::Correct));
            self.phase = Phase::Feedback(Delay::start(now, self.rules.correct_delay));
        } else {
            intents.push(Intent::ShowFeedback(Feedback::Incorrect {
                expected: question.display_answer(),
            }));
            intents.push(Intent::RecordMiss {
                prompt: question.prompt,
            });
            self.phase = Phase::Feedback(Delay::start(now, self.rules.incorrect_delay));
        }
        intents
    }

    /// Observe the clock: fires the countdown or ends the feedback pause.
    pub fn tick(&mut self, now: Instant) -> Vec<Intent> {
        match self.phase {
            Phase::Asking(countdown) if countdown.expired(now) => self.time_out(countdown, now),
            Phase::Feedback(delay) if delay.elapsed(now) => self.advance(now),
            _ => Vec::new(),
        }
    }

    /// Stop early and report whatever has been answered so far.
    pub fn end(&mut self, _now: Instant) -> Vec<Intent> {
        match self.phase {
            Phase::Asking(_) | Phase::Feedback(_) => {
                tracing::info!(answered = self.state.current_index, "session ended early");
                self.finalize()
            }
            Phase::BonusOffer => self.decline_bonus(),
            Phase::Idle | Phase::Finished => Vec::new(),
        }
    }

    /// The player is leaving mid-session. Returns the partial summary the
    /// first time only; a session that already reported returns `None`.
    pub fn abandon(&mut self, _now: Instant) -> Option<SessionSummary> {
        if !self.in_flight() || self.state.result_sent {
            self.phase = Phase::Finished;
            return None;
        }
        self.state.result_sent = true;
        self.phase = Phase::Finished;
        let mut summary = self.summary();
        summary.partial = true;
        tracing::info!(score = summary.score, total = summary.total, "session abandoned");
        Some(summary)
    }

    pub fn accept_bonus(&mut self, cards: Vec<Question>, now: Instant) -> Vec<Intent> {
        if !self.is_offering_bonus() {
            return Vec::new();
        }
        self.state.enter_bonus(cards);
        self.expected_total = self.state.totals().1 + self.state.cards.len();
        self.bonus_status = BonusStatus::Played;
        tracing::info!(cards = self.state.cards.len(), "bonus round started");
        self.show_current(now)
    }

    pub fn decline_bonus(&mut self) -> Vec<Intent> {
        if !self.is_offering_bonus() {
            return Vec::new();
        }
        self.bonus_status = BonusStatus::Declined;
        self.finalize()
    }

    fn time_out(&mut self, countdown: Countdown, now: Instant) -> Vec<Intent> {
        let Some(question) = self.state.current().cloned() else {
            return Vec::new();
        };
        self.state.record(false, countdown.limit().as_secs_f64());
        tracing::debug!(prompt = %question.prompt, "question timed out");
        self.phase = Phase::Feedback(Delay::start(now, self.rules.incorrect_delay));
        vec![
            Intent::DisableInput,
            Intent::ShowFeedback(Feedback::TimedOut {
                expected: question.display_answer(),
            }),
            Intent::RecordMiss {
                prompt: question.prompt,
            },
        ]
    }

    fn advance(&mut self, now: Instant) -> Vec<Intent> {
        if !self.state.is_complete() {
            return self.show_current(now);
        }
        if self.bonus_unlocked() {
            tracing::info!("perfect megamix round, offering bonus");
            self.phase = Phase::BonusOffer;
            return vec![Intent::DisableInput, Intent::OfferBonus];
        }
        self.finalize()
    }

    fn bonus_unlocked(&self) -> bool {
        let s = &self.state;
        self.setup.mode.is_megamix()
            && s.bonus.is_none()
            && s.cards.len() == self.rules.bonus_threshold
            && s.current_index == s.cards.len()
            && s.score == s.current_index
    }

    fn show_current(&mut self, now: Instant) -> Vec<Intent> {
        let Some(question) = self.state.current() else {
            return self.finalize();
        };
        let limit = self.rules.limit_for(question);
        let intents = vec![
            Intent::ShowQuestion {
                index: self.state.current_index,
                total: self.state.cards.len(),
                prompt: question.prompt.clone(),
                time_limit: limit,
                bonus: self.state.bonus_active(),
            },
            Intent::EnableInput,
        ];
        self.phase = Phase::Asking(Countdown::start(now, limit));
        intents
    }

    fn finalize(&mut self) -> Vec<Intent> {
        self.phase = Phase::Finished;
        if self.state.result_sent {
            return vec![Intent::DisableInput];
        }
        self.state.result_sent = true;
        let summary = self.summary();
        tracing::info!(
            score = summary.score,
            total = summary.total,
            bonus = ?summary.bonus,
            "session finished"
        );
        vec![Intent::DisableInput, Intent::Finished(summary)]
    }

    fn summary(&self) -> SessionSummary {
        let (score, total) = self.state.totals();
        SessionSummary {
            mode: self.setup.mode,
            tables: self.setup.tables.clone(),
            score,
            total,
            mean_time_seconds: self.state.mean_response_secs(),
            expected_total: self.expected_total,
            bonus: self.bonus_status,
            partial: false,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mul_cards(n: u32) -> Vec<Question> {
        (1..=n)
            .map(|i| Question::exact(format!("3 x {i} = ?"), 3 * i, ExerciseType::Multiplication))
            .collect()
    }

    fn quiz(cards: Vec<Question>) -> Quiz {
        let setup = QuizSetup::new(ExerciseType::Multiplication, &[3]).unwrap();
        Quiz::new(setup, cards, QuizRules::default())
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn finished(intents: &[Intent]) -> Option<&SessionSummary> {
        intents.iter().find_map(|i| match i {
            Intent::Finished(s) => Some(s),
            _ => None,
        })
    }

    #[test]
    fn test_setup_rejects_bad_tables() {
        assert_eq!(
            QuizSetup::new(ExerciseType::Addition, &[]),
            Err(SetupError::NoTables)
        );
        assert_eq!(
            QuizSetup::new(ExerciseType::Addition, &[3, 13]),
            Err(SetupError::TableOutOfRange(13))
        );
        let setup = QuizSetup::new(ExerciseType::Addition, &[5, 2, 5]).unwrap();
        assert_eq!(setup.tables(), &[2, 5]);
    }

    #[test]
    fn test_megamix_setup_uses_every_table() {
        let setup = QuizSetup::new(ExerciseType::Megamix, &[]).unwrap();
        assert_eq!(setup.tables().len(), 12);
    }

    #[test]
    fn test_start_shows_first_question() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(2));
        let intents = quiz.start(t0);
        assert_eq!(
            intents,
            vec![
                Intent::ShowQuestion {
                    index: 0,
                    total: 2,
                    prompt: "3 x 1 = ?".into(),
                    time_limit: secs(6),
                    bonus: false,
                },
                Intent::EnableInput,
            ]
        );
        assert!(quiz.is_asking());
        assert!(quiz.start(t0).is_empty());
    }

    #[test]
    fn test_correct_answer_uses_short_delay() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(2));
        quiz.start(t0);
        let intents = quiz.submit(" 3 ", t0 + secs(2));
        assert_eq!(
            intents,
            vec![Intent::DisableInput, Intent::ShowFeedback(Feedback::Correct)]
        );
        assert_eq!(quiz.state().score, 1);
        assert_eq!(quiz.state().response_times, vec![2.0]);

        assert!(quiz.tick(t0 + secs(2) + Duration::from_millis(499)).is_empty());
        let next = quiz.tick(t0 + secs(2) + Duration::from_millis(500));
        assert!(matches!(next[0], Intent::ShowQuestion { index: 1, .. }));
    }

    #[test]
    fn test_wrong_answer_records_miss_and_long_delay() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(2));
        quiz.start(t0);
        let intents = quiz.submit("4", t0 + secs(1));
        assert!(intents.contains(&Intent::ShowFeedback(Feedback::Incorrect {
            expected: "3".into()
        })));
        assert!(intents.contains(&Intent::RecordMiss {
            prompt: "3 x 1 = ?".into()
        }));
        assert!(quiz.tick(t0 + secs(10)).is_empty());
        assert!(!quiz.tick(t0 + secs(11)).is_empty());
    }

    #[test]
    fn test_submit_outside_asking_is_ignored() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(2));
        assert!(quiz.submit("3", t0).is_empty());
        quiz.start(t0);
        quiz.submit("3", t0 + secs(1));
        assert!(quiz.submit("6", t0 + secs(1)).is_empty());
        assert_eq!(quiz.state().current_index, 1);
    }

    #[test]
    fn test_timeout_is_a_miss_pinned_to_limit() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(2));
        quiz.start(t0);
        assert!(quiz.tick(t0 + secs(5)).is_empty());
        let intents = quiz.tick(t0 + secs(6));
        assert!(intents.contains(&Intent::ShowFeedback(Feedback::TimedOut {
            expected: "3".into()
        })));
        assert!(intents.iter().any(|i| matches!(i, Intent::RecordMiss { .. })));
        assert_eq!(quiz.state().response_times, vec![6.0]);
        assert_eq!(quiz.state().score, 0);
    }

    #[test]
    fn test_late_submit_counts_as_timeout() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(1));
        quiz.start(t0);
        let intents = quiz.submit("3", t0 + secs(6));
        assert!(matches!(
            intents[1],
            Intent::ShowFeedback(Feedback::TimedOut { .. })
        ));
        assert_eq!(quiz.state().score, 0);
    }

    #[test]
    fn test_factor_questions_get_extended_time() {
        let t0 = Instant::now();
        let setup = QuizSetup::new(ExerciseType::Factorization, &[3]).unwrap();
        let mut quiz = Quiz::new(
            setup,
            vec![Question::factor(12, vec![(2, 6), (3, 4)])],
            QuizRules::default(),
        );
        let intents = quiz.start(t0);
        assert!(matches!(
            intents[0],
            Intent::ShowQuestion { time_limit, .. } if time_limit == secs(20)
        ));
        assert!(quiz.tick(t0 + secs(15)).is_empty());
        let intents = quiz.submit("4 x 3", t0 + secs(15));
        assert!(intents.contains(&Intent::ShowFeedback(Feedback::Correct)));
    }

    #[test]
    fn test_megamix_factor_card_gets_extended_time() {
        let t0 = Instant::now();
        let setup = QuizSetup::new(ExerciseType::Megamix, &[]).unwrap();
        let mut cards = mul_cards(1);
        cards.push(Question::factor(12, vec![(2, 6), (3, 4)]));
        let mut quiz = Quiz::new(setup, cards, QuizRules::default());

        let intents = quiz.start(t0);
        assert!(matches!(
            intents[0],
            Intent::ShowQuestion { time_limit, .. } if time_limit == secs(6)
        ));
        quiz.submit("3", t0 + secs(1));
        let shown = t0 + secs(2);
        let intents = quiz.tick(shown);
        assert!(matches!(
            intents[0],
            Intent::ShowQuestion { index: 1, time_limit, .. } if time_limit == secs(20)
        ));
        assert!(quiz.tick(shown + secs(10)).is_empty());
        assert!(quiz.is_asking());
        let intents = quiz.submit("6 2", shown + secs(10));
        assert!(intents.contains(&Intent::ShowFeedback(Feedback::Correct)));
    }

    #[test]
    fn test_abandon_during_bonus_offer_reports_base_round_once() {
        let t0 = Instant::now();
        let rules = QuizRules {
            bonus_threshold: 2,
            ..QuizRules::default()
        };
        let setup = QuizSetup::new(ExerciseType::Megamix, &[]).unwrap();
        let mut quiz = Quiz::new(setup, mul_cards(2), rules);
        quiz.start(t0);
        quiz.submit("3", t0 + secs(1));
        quiz.tick(t0 + secs(2));
        quiz.submit("6", t0 + secs(3));
        let intents = quiz.tick(t0 + secs(4));
        assert!(intents.contains(&Intent::OfferBonus));

        let summary = quiz.abandon(t0 + secs(5)).unwrap();
        assert!(summary.partial);
        assert_eq!((summary.score, summary.total), (2, 2));
        assert_eq!(summary.bonus, BonusStatus::NotPlayed);
        assert!(quiz.is_finished());
        assert!(quiz.abandon(t0 + secs(6)).is_none());
        assert!(quiz.decline_bonus().is_empty());
    }

    #[test]
    fn test_completion_after_last_delay() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(1));
        quiz.start(t0);
        quiz.submit("3", t0 + secs(1));
        let intents = quiz.tick(t0 + secs(2));
        let summary = finished(&intents).unwrap();
        assert_eq!((summary.score, summary.total), (1, 1));
        assert_eq!(summary.expected_total, 1);
        assert!(!summary.partial);
        assert!(quiz.is_finished());
    }

    #[test]
    fn test_end_reports_partial_numbers_once() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(5));
        quiz.start(t0);
        quiz.submit("3", t0 + secs(1));
        let intents = quiz.end(t0 + secs(1));
        let summary = finished(&intents).unwrap();
        assert_eq!((summary.score, summary.total), (1, 1));
        assert!(!summary.is_full_length());
        assert!(quiz.end(t0 + secs(2)).is_empty());
        assert!(quiz.tick(t0 + secs(5)).is_empty());
        assert!(quiz.abandon(t0 + secs(5)).is_none());
    }

    #[test]
    fn test_abandon_mid_session_reports_once() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(5));
        quiz.start(t0);
        quiz.submit("3", t0 + secs(1));
        let summary = quiz.abandon(t0 + secs(1)).unwrap();
        assert!(summary.partial);
        assert_eq!(summary.total, 1);
        assert!(quiz.abandon(t0 + secs(2)).is_none());
        assert!(quiz.end(t0 + secs(2)).is_empty());
    }

    #[test]
    fn test_abandon_before_start_is_none() {
        let mut quiz = quiz(mul_cards(5));
        assert!(quiz.abandon(Instant::now()).is_none());
    }

    #[test]
    fn test_empty_deck_finishes_immediately() {
        let mut quiz = quiz(Vec::new());
        let intents = quiz.start(Instant::now());
        let summary = finished(&intents).unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.mean_time_seconds, 0.0);
    }

    #[test]
    fn test_non_megamix_perfect_round_offers_no_bonus() {
        let t0 = Instant::now();
        let rules = QuizRules {
            bonus_threshold: 1,
            ..QuizRules::default()
        };
        let setup = QuizSetup::new(ExerciseType::Multiplication, &[3]).unwrap();
        let mut quiz = Quiz::new(setup, mul_cards(1), rules);
        quiz.start(t0);
        quiz.submit("3", t0);
        let intents = quiz.tick(t0 + secs(1));
        assert!(!intents.contains(&Intent::OfferBonus));
        assert!(finished(&intents).is_some());
    }

    #[test]
    fn test_bonus_ops_outside_offer_are_ignored() {
        let t0 = Instant::now();
        let mut quiz = quiz(mul_cards(1));
        quiz.start(t0);
        assert!(quiz.accept_bonus(mul_cards(1), t0).is_empty());
        assert!(quiz.decline_bonus().is_empty());
        assert!(quiz.is_asking());
    }
}
