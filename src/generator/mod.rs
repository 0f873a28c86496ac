pub mod arithmetic;
pub mod factors;
pub mod megamix;

use std::ops::RangeInclusive;

use crate::generator::arithmetic::{ArithmeticGenerator, Operation};
use crate::generator::factors::FactorGenerator;
use crate::generator::megamix::MegamixGenerator;
use crate::session::question::{ExerciseType, Question};

/// Tables a learner can pick from.
pub const TABLE_RANGE: RangeInclusive<u32> = 1..=12;
/// Second operand paired with every selected table.
pub const MULTIPLICANDS: RangeInclusive<u32> = 1..=10;

pub trait QuestionGenerator {
    fn generate(&self, tables: &[u32]) -> Vec<Question>;
}

pub fn all_tables() -> Vec<u32> {
    TABLE_RANGE.collect()
}

/// Full candidate pool for a mode. Megamix ignores `tables`.
pub fn generate(mode: ExerciseType, tables: &[u32]) -> Vec<Question> {
    match mode {
        ExerciseType::Multiplication => {
            ArithmeticGenerator::new(Operation::Multiply).generate(tables)
        }
        ExerciseType::Addition => ArithmeticGenerator::new(Operation::Add).generate(tables),
        ExerciseType::Subtraction => {
            ArithmeticGenerator::new(Operation::Subtract).generate(tables)
        }
        ExerciseType::Factorization => FactorGenerator.generate(tables),
        ExerciseType::Megamix => MegamixGenerator.generate(tables),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_multiplication_tables_yield_twenty_cards() {
        let cards = generate(ExerciseType::Multiplication, &[2, 3]);
        assert_eq!(cards.len(), 20);
        assert!(cards.iter().all(|q| q.category == ExerciseType::Multiplication));
    }

    #[test]
    fn test_no_tables_yields_no_cards() {
        assert!(generate(ExerciseType::Addition, &[]).is_empty());
    }

    #[test]
    fn test_megamix_ignores_selected_tables() {
        let narrow = generate(ExerciseType::Megamix, &[2]);
        let full = generate(ExerciseType::Megamix, &all_tables());
        assert_eq!(narrow.len(), full.len());
    }
}
