use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use tabledrill::client::api::{self, Backend, ErrorRecord, MissReport};
use tabledrill::client::dispatch::{Dispatcher, Job};
use tabledrill::config::Config;
use tabledrill::engine::deck::build_deck;
use tabledrill::generator::TABLE_RANGE;
use tabledrill::session::question::ExerciseType;
use tabledrill::session::quiz::{Feedback, Intent, Quiz, QuizRules, QuizSetup};
use tabledrill::session::result::{ResultReporter, SessionOutcome, SessionSummary};
use tabledrill::store::identity::IdentityStore;

use crate::ui::theme::Theme;

const MAX_ANSWER_LEN: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Login,
    Setup,
    Quiz,
    BonusOffer,
    Results,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginField {
    Name,
    GroupKey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupFocus {
    Modes,
    Tables,
}

/// Mode and table choices on the setup screen.
pub struct SetupForm {
    pub mode_selected: usize,
    pub tables: [bool; 12],
    pub table_cursor: usize,
    pub focus: SetupFocus,
}

impl SetupForm {
    fn from_config(config: &Config) -> Self {
        let mut tables = [false; 12];
        for &t in &config.last_tables {
            if let Some(slot) = t.checked_sub(1).and_then(|i| tables.get_mut(i as usize)) {
                *slot = true;
            }
        }
        let mode_selected = ExerciseType::ALL
            .iter()
            .position(|m| *m == config.last_mode)
            .unwrap_or(0);
        Self {
            mode_selected,
            tables,
            table_cursor: 0,
            focus: SetupFocus::Modes,
        }
    }

    pub fn mode(&self) -> ExerciseType {
        ExerciseType::ALL[self.mode_selected]
    }

    pub fn selected_tables(&self) -> Vec<u32> {
        TABLE_RANGE
            .zip(self.tables.iter())
            .filter_map(|(t, &on)| on.then_some(t))
            .collect()
    }

    pub fn toggle_current(&mut self) {
        self.tables[self.table_cursor] = !self.tables[self.table_cursor];
    }

    pub fn toggle_all(&mut self) {
        let all_on = self.tables.iter().all(|&on| on);
        self.tables = [!all_on; 12];
    }
}

/// What the quiz screen currently shows, rebuilt from intents.
#[derive(Default)]
pub struct QuizView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub bonus: bool,
    pub input: String,
    pub input_enabled: bool,
    pub feedback: Option<Feedback>,
}

pub struct App {
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub config: Config,
    pub login_name: String,
    pub login_group_key: String,
    pub login_field: LoginField,
    pub setup: SetupForm,
    pub quiz: Option<Quiz>,
    pub view: QuizView,
    pub last_result: Option<(SessionSummary, SessionOutcome)>,
    pub status: Option<String>,
    pub should_quit: bool,
    backend: Arc<dyn Backend>,
    dispatcher: Option<Dispatcher>,
    identity: Box<dyn IdentityStore>,
    reporter: Option<ResultReporter>,
    /// Miss history fetched at session start, reused for the bonus deck.
    errors: Vec<ErrorRecord>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, backend: Arc<dyn Backend>, identity: Box<dyn IdentityStore>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let setup = SetupForm::from_config(&config);
        let screen = if identity.player().is_some() {
            AppScreen::Setup
        } else {
            AppScreen::Login
        };
        let dispatcher = Dispatcher::spawn(backend.clone());

        Self {
            screen,
            theme,
            config,
            login_name: String::new(),
            login_group_key: String::new(),
            login_field: LoginField::Name,
            setup,
            quiz: None,
            view: QuizView::default(),
            last_result: None,
            status: None,
            should_quit: false,
            backend,
            dispatcher: Some(dispatcher),
            identity,
            reporter: None,
            errors: Vec::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn player(&self) -> Option<&str> {
        self.identity.player()
    }

    pub fn group_name(&self) -> Option<&str> {
        self.identity.group().map(|g| g.name.as_str())
    }

    pub fn login(&mut self) {
        let name = self.login_name.trim().to_string();
        if name.is_empty() {
            self.status = Some("Enter your name to continue".to_string());
            return;
        }
        if let Err(e) = self.identity.set_player(&name) {
            tracing::warn!(error = %e, "could not save player name");
        }
        tracing::info!(player = %name, "logged in");

        let key = self.login_group_key.trim().to_string();
        self.status = None;
        if !key.is_empty() {
            self.join_group(&key);
        }
        self.login_name.clear();
        self.login_group_key.clear();
        self.login_field = LoginField::Name;
        self.screen = AppScreen::Setup;
    }

    pub fn join_group(&mut self, secret_key: &str) {
        match self.backend.find_group(secret_key) {
            Ok(Some(group)) => {
                self.status = Some(format!("Joined group {}", group.name));
                if let Err(e) = self.identity.set_group(Some(group)) {
                    tracing::warn!(error = %e, "could not save group");
                }
            }
            Ok(None) => self.status = Some("No group matches that key".to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "group lookup failed");
                self.status = Some("Group lookup failed".to_string());
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.identity.logout() {
            tracing::warn!(error = %e, "could not clear identity");
        }
        self.quiz = None;
        self.reporter = None;
        self.last_result = None;
        self.status = None;
        self.screen = AppScreen::Login;
    }

    pub fn start_session(&mut self, now: Instant) {
        let Some(player) = self.identity.player().map(str::to_string) else {
            self.screen = AppScreen::Login;
            return;
        };
        let mode = self.setup.mode();
        let setup = match QuizSetup::new(mode, &self.setup.selected_tables()) {
            Ok(setup) => setup,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };

        self.config.last_mode = mode;
        if !mode.is_megamix() {
            self.config.last_tables = setup.tables().to_vec();
        }
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "could not save config");
        }

        self.errors = api::errors_or_empty(self.backend.as_ref(), &player, mode);
        let best = api::best_or_default(self.backend.as_ref(), &player, mode);
        let group_id = self.identity.group().map(|g| g.id);
        self.reporter = Some(ResultReporter::new(player, group_id, best));

        let cards = build_deck(
            mode,
            setup.tables(),
            &self.errors,
            self.config.limit_for(mode),
            &mut self.rng,
        );
        let mut quiz = Quiz::new(setup, cards, QuizRules::from_config(&self.config));
        let intents = quiz.start(now);
        self.quiz = Some(quiz);
        self.view = QuizView::default();
        self.status = None;
        self.screen = AppScreen::Quiz;
        self.apply(intents);
    }

    pub fn type_char(&mut self, ch: char) {
        if self.view.input_enabled && self.view.input.len() < MAX_ANSWER_LEN {
            self.view.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.view.input_enabled {
            self.view.input.pop();
        }
    }

    pub fn submit_answer(&mut self, now: Instant) {
        if !self.view.input_enabled {
            return;
        }
        let input = std::mem::take(&mut self.view.input);
        let intents = match self.quiz.as_mut() {
            Some(quiz) => quiz.submit(&input, now),
            None => return,
        };
        self.apply(intents);
    }

    pub fn tick(&mut self, now: Instant) {
        let intents = match self.quiz.as_mut() {
            Some(quiz) => quiz.tick(now),
            None => return,
        };
        self.apply(intents);
    }

    pub fn end_session(&mut self, now: Instant) {
        let intents = match self.quiz.as_mut() {
            Some(quiz) => quiz.end(now),
            None => return,
        };
        self.apply(intents);
    }

    pub fn accept_bonus(&mut self, now: Instant) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        let cards = build_deck(
            ExerciseType::Megamix,
            &[],
            &self.errors,
            self.config.megamix_limit,
            &mut self.rng,
        );
        let intents = quiz.accept_bonus(cards, now);
        self.view = QuizView::default();
        self.screen = AppScreen::Quiz;
        self.apply(intents);
    }

    pub fn decline_bonus(&mut self) {
        let intents = match self.quiz.as_mut() {
            Some(quiz) => quiz.decline_bonus(),
            None => return,
        };
        self.apply(intents);
    }

    /// Leaving the quiz screen without finishing still records the attempt.
    pub fn abandon_session(&mut self, now: Instant) {
        if let Some(summary) = self.quiz.as_mut().and_then(|q| q.abandon(now)) {
            self.post_result(&summary);
        }
        self.quiz = None;
    }

    /// Flush partial results and give queued reports time to go out.
    pub fn shutdown(&mut self, now: Instant, grace: Duration) {
        self.abandon_session(now);
        if let Some(dispatcher) = self.dispatcher.take() {
            dispatcher.shutdown(grace);
        }
    }

    pub fn countdown_fraction(&self, now: Instant) -> Option<(f64, Duration)> {
        let countdown = self.quiz.as_ref()?.countdown()?;
        Some((countdown.fraction_remaining(now), countdown.remaining(now)))
    }

    fn apply(&mut self, intents: Vec<Intent>) {
        for intent in intents {
            match intent {
                Intent::ShowQuestion {
                    index,
                    total,
                    prompt,
                    bonus,
                    ..
                } => {
                    self.view.index = index;
                    self.view.total = total;
                    self.view.prompt = prompt;
                    self.view.bonus = bonus;
                    self.view.input.clear();
                    self.view.feedback = None;
                }
                Intent::EnableInput => self.view.input_enabled = true,
                Intent::DisableInput => self.view.input_enabled = false,
                Intent::ShowFeedback(feedback) => self.view.feedback = Some(feedback),
                Intent::RecordMiss { prompt } => self.record_miss(prompt),
                Intent::OfferBonus => self.screen = AppScreen::BonusOffer,
                Intent::Finished(summary) => self.finish(summary),
            }
        }
    }

    fn record_miss(&self, prompt: String) {
        let (Some(quiz), Some(player)) = (self.quiz.as_ref(), self.identity.player()) else {
            return;
        };
        self.send(Job::RecordMiss(MissReport {
            name: player.to_string(),
            exercise_type: quiz.setup().mode(),
            question: prompt,
            group_id: self.identity.group().map(|g| g.id),
        }));
    }

    fn finish(&mut self, summary: SessionSummary) {
        self.post_result(&summary);
        if let Some(reporter) = &self.reporter {
            let outcome = reporter.outcome(&summary);
            self.last_result = Some((summary, outcome));
        }
        self.screen = AppScreen::Results;
    }

    fn post_result(&self, summary: &SessionSummary) {
        if let Some(report) = self.reporter.as_ref().and_then(|r| r.report(summary)) {
            self.send(Job::PostResult(report));
        }
    }

    fn send(&self, job: Job) {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.send(job);
        }
    }
}
