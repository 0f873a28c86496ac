use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    #[serde(rename = "mul")]
    Multiplication,
    #[serde(rename = "add")]
    Addition,
    #[serde(rename = "sub")]
    Subtraction,
    #[serde(rename = "fact", alias = "factor")]
    Factorization,
    Megamix,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 5] = [
        ExerciseType::Multiplication,
        ExerciseType::Addition,
        ExerciseType::Subtraction,
        ExerciseType::Factorization,
        ExerciseType::Megamix,
    ];

    /// Name used on the wire and in `?type=` query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseType::Multiplication => "mul",
            ExerciseType::Addition => "add",
            ExerciseType::Subtraction => "sub",
            ExerciseType::Factorization => "fact",
            ExerciseType::Megamix => "megamix",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExerciseType::Multiplication => "Multiplication",
            ExerciseType::Addition => "Addition",
            ExerciseType::Subtraction => "Subtraction",
            ExerciseType::Factorization => "Factor Pairs",
            ExerciseType::Megamix => "Megamix",
        }
    }

    pub fn is_megamix(self) -> bool {
        matches!(self, ExerciseType::Megamix)
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mul" | "multiplication" => Ok(ExerciseType::Multiplication),
            "add" | "addition" => Ok(ExerciseType::Addition),
            "sub" | "subtraction" => Ok(ExerciseType::Subtraction),
            "fact" | "factor" | "factors" | "factorization" => Ok(ExerciseType::Factorization),
            "megamix" | "mix" => Ok(ExerciseType::Megamix),
            other => Err(format!("unknown exercise type '{other}'")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    Exact(String),
    FactorPairs(Vec<(u32, u32)>),
}

/// One flashcard. `category` is always an arithmetic family, never `Megamix`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub answer: Answer,
    pub category: ExerciseType,
}

impl Question {
    pub fn exact(prompt: String, answer: u32, category: ExerciseType) -> Self {
        Self {
            prompt,
            answer: Answer::Exact(answer.to_string()),
            category,
        }
    }

    pub fn factor(product: u32, pairs: Vec<(u32, u32)>) -> Self {
        Self {
            prompt: format!("{product} = ? x ?"),
            answer: Answer::FactorPairs(pairs),
            category: ExerciseType::Factorization,
        }
    }

    pub fn expected_answer(&self) -> Option<&str> {
        match &self.answer {
            Answer::Exact(s) => Some(s),
            Answer::FactorPairs(_) => None,
        }
    }

    pub fn valid_factor_pairs(&self) -> Option<&[(u32, u32)]> {
        match &self.answer {
            Answer::Exact(_) => None,
            Answer::FactorPairs(pairs) => Some(pairs),
        }
    }

    pub fn uses_extended_time(&self) -> bool {
        self.category == ExerciseType::Factorization
    }

    /// Human-readable accepted answer(s), shown after a miss.
    pub fn display_answer(&self) -> String {
        match &self.answer {
            Answer::Exact(s) => s.clone(),
            Answer::FactorPairs(pairs) => pairs
                .iter()
                .map(|(a, b)| format!("{a} x {b}"))
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}
