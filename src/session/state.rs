use crate::session::question::Question;

/// Numbers carried over from a perfect base round into the bonus round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BonusRound {
    pub active: bool,
    pub carried_score: usize,
    pub carried_total: usize,
    pub carried_times: Vec<f64>,
}

/// Progress of one quiz attempt.
///
/// `response_times.len() == current_index` and `score <= current_index`
/// hold after every method returns.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub cards: Vec<Question>,
    pub current_index: usize,
    pub score: usize,
    pub response_times: Vec<f64>,
    pub result_sent: bool,
    pub bonus: Option<BonusRound>,
}

impl SessionState {
    pub fn new(cards: Vec<Question>) -> Self {
        Self {
            cards,
            current_index: 0,
            score: 0,
            response_times: Vec::new(),
            result_sent: false,
            bonus: None,
        }
    }

    pub fn current(&self) -> Option<&Question> {
        self.cards.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.cards.len()
    }

    pub fn bonus_active(&self) -> bool {
        self.bonus.as_ref().is_some_and(|b| b.active)
    }

    /// Close out the current card. Does nothing past the end of the deck.
    pub fn record(&mut self, correct: bool, response_secs: f64) {
        if self.is_complete() {
            return;
        }
        if correct {
            self.score += 1;
        }
        self.response_times.push(response_secs);
        self.current_index += 1;
    }

    /// Swap in the bonus deck, carrying the finished round's numbers.
    pub fn enter_bonus(&mut self, cards: Vec<Question>) {
        let carried_times = std::mem::take(&mut self.response_times);
        self.bonus = Some(BonusRound {
            active: true,
            carried_score: self.score,
            carried_total: self.current_index,
            carried_times,
        });
        self.cards = cards;
        self.current_index = 0;
        self.score = 0;
        self.result_sent = false;
    }

    /// `(score, total)` across both rounds once the bonus round was entered.
    pub fn totals(&self) -> (usize, usize) {
        match self.bonus.as_ref().filter(|b| b.active) {
            Some(b) => (
                b.carried_score + self.score,
                b.carried_total + self.current_index,
            ),
            None => (self.score, self.current_index),
        }
    }

    pub fn mean_response_secs(&self) -> f64 {
        let carried: &[f64] = match self.bonus.as_ref().filter(|b| b.active) {
            Some(b) => &b.carried_times,
            None => &[],
        };
        let count = carried.len() + self.response_times.len();
        if count == 0 {
            return 0.0;
        }
        let sum: f64 = carried.iter().chain(&self.response_times).sum();
        sum / count as f64
    }
}
