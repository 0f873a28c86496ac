use crate::generator::arithmetic::{ArithmeticGenerator, Operation};
use crate::generator::factors::FactorGenerator;
use crate::generator::{QuestionGenerator, all_tables};
use crate::session::question::Question;

/// All four families over the full table range. Each question keeps the
/// category of the generator that produced it; nothing is deduplicated
/// across families.
pub struct MegamixGenerator;

impl QuestionGenerator for MegamixGenerator {
    fn generate(&self, _tables: &[u32]) -> Vec<Question> {
        let tables = all_tables();
        let mut cards = Vec::new();
        for op in [Operation::Multiply, Operation::Add, Operation::Subtract] {
            cards.extend(ArithmeticGenerator::new(op).generate(&tables));
        }
        cards.extend(FactorGenerator.generate(&tables));
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::question::ExerciseType;

    #[test]
    fn test_megamix_covers_every_family() {
        let cards = MegamixGenerator.generate(&[]);
        for family in [
            ExerciseType::Multiplication,
            ExerciseType::Addition,
            ExerciseType::Subtraction,
            ExerciseType::Factorization,
        ] {
            let count = cards.iter().filter(|q| q.category == family).count();
            assert!(count > 0, "missing {family}");
        }
        assert!(cards.iter().all(|q| q.category != ExerciseType::Megamix));
    }

    #[test]
    fn test_megamix_pool_is_large_enough_for_a_full_round() {
        // 3 x 120 arithmetic cards plus the distinct products.
        let cards = MegamixGenerator.generate(&[]);
        assert!(cards.len() >= 360 + 40);
    }
}
