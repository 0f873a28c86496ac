use crate::generator::{MULTIPLICANDS, QuestionGenerator};
use crate::session::question::{ExerciseType, Question};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Multiply,
    Add,
    Subtract,
}

impl Operation {
    pub fn category(self) -> ExerciseType {
        match self {
            Operation::Multiply => ExerciseType::Multiplication,
            Operation::Add => ExerciseType::Addition,
            Operation::Subtract => ExerciseType::Subtraction,
        }
    }

    fn symbol(self) -> char {
        match self {
            Operation::Multiply => 'x',
            Operation::Add => '+',
            Operation::Subtract => '-',
        }
    }
}

pub struct ArithmeticGenerator {
    op: Operation,
}

impl ArithmeticGenerator {
    pub fn new(op: Operation) -> Self {
        Self { op }
    }

    fn card(&self, table: u32, n: u32) -> Question {
        let (lhs, rhs, result) = match self.op {
            Operation::Multiply => (table, n, table * n),
            Operation::Add => (table, n, table + n),
            // Larger operand first so the result is never negative.
            Operation::Subtract => {
                let (hi, lo) = (table.max(n), table.min(n));
                (hi, lo, hi - lo)
            }
        };
        let prompt = format!("{lhs} {} {rhs} = ?", self.op.symbol());
        Question::exact(prompt, result, self.op.category())
    }
}

impl QuestionGenerator for ArithmeticGenerator {
    fn generate(&self, tables: &[u32]) -> Vec<Question> {
        let mut cards = Vec::with_capacity(tables.len() * MULTIPLICANDS.count());
        for n in MULTIPLICANDS {
            for &table in tables {
                cards.push(self.card(table, n));
            }
        }
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::all_tables;

    #[test]
    fn test_multiplication_prompt_and_answer() {
        let cards = ArithmeticGenerator::new(Operation::Multiply).generate(&[7]);
        let q = cards.iter().find(|q| q.prompt == "7 x 8 = ?").unwrap();
        assert_eq!(q.expected_answer(), Some("56"));
    }

    #[test]
    fn test_addition_prompt_and_answer() {
        let cards = ArithmeticGenerator::new(Operation::Add).generate(&[12]);
        let q = cards.iter().find(|q| q.prompt == "12 + 10 = ?").unwrap();
        assert_eq!(q.expected_answer(), Some("22"));
        assert_eq!(q.category, ExerciseType::Addition);
    }

    #[test]
    fn test_subtraction_puts_larger_operand_first() {
        let cards = ArithmeticGenerator::new(Operation::Subtract).generate(&[3]);
        let prompts: Vec<&str> = cards.iter().map(|q| q.prompt.as_str()).collect();
        assert!(prompts.contains(&"3 - 1 = ?"));
        assert!(prompts.contains(&"9 - 3 = ?"));
        assert!(prompts.contains(&"3 - 3 = ?"));
    }

    #[test]
    fn test_subtraction_answers_never_negative() {
        let cards = ArithmeticGenerator::new(Operation::Subtract).generate(&all_tables());
        for q in &cards {
            let answer: i64 = q.expected_answer().unwrap().parse().unwrap();
            assert!(answer >= 0, "{} gave {answer}", q.prompt);
        }
    }
}
