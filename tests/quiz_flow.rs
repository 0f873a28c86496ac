use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use tabledrill::client::api::{BestScore, ErrorRecord};
use tabledrill::engine::deck::build_deck;
use tabledrill::engine::scoring::Celebration;
use tabledrill::session::question::{ExerciseType, Question};
use tabledrill::session::quiz::{Intent, Quiz, QuizRules, QuizSetup};
use tabledrill::session::result::{BonusStatus, ResultReporter, SessionSummary};

const STEP: Duration = Duration::from_secs(1);
const PAUSE: Duration = Duration::from_secs(10);

fn right_answer(question: &Question) -> String {
    match question.expected_answer() {
        Some(answer) => answer.to_string(),
        None => {
            let (a, b) = question.valid_factor_pairs().unwrap()[0];
            format!("{b} x {a}")
        }
    }
}

fn finished(intents: &[Intent]) -> Option<SessionSummary> {
    intents.iter().find_map(|i| match i {
        Intent::Finished(s) => Some(s.clone()),
        _ => None,
    })
}

/// Answer every remaining card with `answer`, stepping the clock past each
/// feedback pause. Returns the intents from the last pause.
fn play_round(
    quiz: &mut Quiz,
    now: &mut Instant,
    mut answer: impl FnMut(&Question) -> String,
) -> Vec<Intent> {
    let mut last = Vec::new();
    while quiz.is_asking() {
        let question = quiz.state().current().unwrap().clone();
        *now += STEP;
        quiz.submit(&answer(&question), *now);
        *now += PAUSE;
        last = quiz.tick(*now);
    }
    last
}

fn megamix_quiz(rng: &mut SmallRng) -> Quiz {
    let setup = QuizSetup::new(ExerciseType::Megamix, &[]).unwrap();
    let cards = build_deck(ExerciseType::Megamix, setup.tables(), &[], 100, rng);
    Quiz::new(setup, cards, QuizRules::default())
}

#[test]
fn test_two_tables_multiplication_keeps_all_twenty() {
    let mut rng = SmallRng::seed_from_u64(1);
    let setup = QuizSetup::new(ExerciseType::Multiplication, &[2, 3]).unwrap();
    let cards = build_deck(setup.mode(), setup.tables(), &[], 40, &mut rng);
    assert_eq!(cards.len(), 20);

    let mut quiz = Quiz::new(setup, cards, QuizRules::default());
    let mut now = Instant::now();
    quiz.start(now);
    let last = play_round(&mut quiz, &mut now, right_answer);

    let summary = finished(&last).unwrap();
    assert_eq!((summary.score, summary.total), (20, 20));
    assert!((summary.mean_time_seconds - 1.0).abs() < 1e-9);
    assert!(quiz.is_finished());

    let state = quiz.state();
    assert_eq!(state.response_times.len(), state.current_index);
    assert!(state.score <= state.current_index);
}

#[test]
fn test_missed_questions_are_weighted_into_the_deck() {
    let errors = vec![ErrorRecord {
        question: "7 x 8 = ?".into(),
        error_count: 10,
    }];
    let mut hits = 0;
    for seed in 0..50 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let deck = build_deck(ExerciseType::Multiplication, &[1, 2, 3, 4, 5, 6, 7, 8], &errors, 10, &mut rng);
        assert_eq!(deck.len(), 10);
        if deck.iter().any(|q| q.prompt == "7 x 8 = ?") {
            hits += 1;
        }
    }
    // Weight 5 out of ~84 in 10 draws: well above the unweighted 1 in 8.
    assert!(hits > 10, "weighted card drawn in only {hits} of 50 decks");
}

#[test]
fn test_perfect_megamix_offers_bonus_and_decline_celebrates() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut quiz = megamix_quiz(&mut rng);
    let mut now = Instant::now();
    quiz.start(now);

    let last = play_round(&mut quiz, &mut now, right_answer);
    assert_eq!(last, vec![Intent::DisableInput, Intent::OfferBonus]);
    assert!(quiz.is_offering_bonus());

    let intents = quiz.decline_bonus();
    let summary = finished(&intents).unwrap();
    assert_eq!((summary.score, summary.total), (100, 100));
    assert_eq!(summary.bonus, BonusStatus::Declined);

    let reporter = ResultReporter::new("Ada", None, BestScore { score: 100, total: 100 });
    let outcome = reporter.outcome(&summary);
    assert!(!outcome.new_record);
    assert_eq!(outcome.celebration, Some(Celebration::Standard));
    assert!(reporter.report(&summary).is_some());

    assert!(quiz.abandon(now).is_none());
}

#[test]
fn test_accepted_bonus_carries_the_base_round() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut quiz = megamix_quiz(&mut rng);
    let mut now = Instant::now();
    quiz.start(now);
    play_round(&mut quiz, &mut now, right_answer);

    let bonus_cards = build_deck(ExerciseType::Megamix, &[], &[], 100, &mut rng);
    let intents = quiz.accept_bonus(bonus_cards, now);
    assert!(matches!(
        intents[0],
        Intent::ShowQuestion { index: 0, total: 100, bonus: true, .. }
    ));

    let state = quiz.state();
    let bonus = state.bonus.as_ref().unwrap();
    assert!(bonus.active);
    assert_eq!(bonus.carried_score, 100);
    assert_eq!(bonus.carried_total, 100);
    assert_eq!(state.current_index, 0);
    assert!(!state.result_sent);

    let last = play_round(&mut quiz, &mut now, right_answer);
    assert!(!last.contains(&Intent::OfferBonus));
    let summary = finished(&last).unwrap();
    assert_eq!((summary.score, summary.total), (200, 200));
    assert_eq!(summary.expected_total, 200);

    let reporter = ResultReporter::new("Ada", Some(2), BestScore { score: 100, total: 100 });
    assert_eq!(
        reporter.outcome(&summary).celebration,
        Some(Celebration::Ultimate)
    );
    let report = reporter.report(&summary).unwrap();
    assert_eq!((report.score, report.total), (200, 200));
    assert_eq!(report.exercise_type, ExerciseType::Megamix);
}

#[test]
fn test_imperfect_megamix_offers_no_bonus() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut quiz = megamix_quiz(&mut rng);
    let mut now = Instant::now();
    quiz.start(now);

    let mut first = true;
    let last = play_round(&mut quiz, &mut now, |q| {
        if std::mem::take(&mut first) {
            "wrong".to_string()
        } else {
            right_answer(q)
        }
    });
    let summary = finished(&last).unwrap();
    assert_eq!((summary.score, summary.total), (99, 100));
    assert_eq!(summary.bonus, BonusStatus::NotPlayed);
}

#[test]
fn test_abandon_mid_bonus_reports_combined_numbers_once() {
    let mut rng = SmallRng::seed_from_u64(6);
    let mut quiz = megamix_quiz(&mut rng);
    let mut now = Instant::now();
    quiz.start(now);
    play_round(&mut quiz, &mut now, right_answer);
    let bonus_cards = build_deck(ExerciseType::Megamix, &[], &[], 100, &mut rng);
    quiz.accept_bonus(bonus_cards, now);

    now += STEP;
    quiz.submit("nope", now);
    let summary = quiz.abandon(now).unwrap();
    assert!(summary.partial);
    assert_eq!((summary.score, summary.total), (100, 101));
    assert!(quiz.abandon(now).is_none());
    assert!(quiz.end(now).is_empty());
}

#[test]
fn test_timeouts_count_against_the_score() {
    let mut rng = SmallRng::seed_from_u64(8);
    let setup = QuizSetup::new(ExerciseType::Addition, &[4]).unwrap();
    let cards = build_deck(setup.mode(), setup.tables(), &[], 40, &mut rng);
    let mut quiz = Quiz::new(setup, cards, QuizRules::default());

    let mut now = Instant::now();
    quiz.start(now);
    let mut misses = 0;
    while quiz.is_asking() {
        now += Duration::from_secs(6);
        let intents = quiz.tick(now);
        misses += intents
            .iter()
            .filter(|i| matches!(i, Intent::RecordMiss { .. }))
            .count();
        now += PAUSE;
        quiz.tick(now);
    }
    assert_eq!(misses, 10);
    assert!(quiz.is_finished());
    assert_eq!(quiz.state().score, 0);
    assert!(quiz.state().response_times.iter().all(|&t| t == 6.0));
}
