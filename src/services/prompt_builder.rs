//! 出题提示词
//!
//! 生成服务没有对话记忆，每次调用都带上随机种子和一条随机的"创意要求"，
//! 以减少不同调用之间的重复题目。

use rand::Rng;
use std::ops::RangeInclusive;

use crate::models::QuizParameters;

/// 随机种子的取值范围
pub const SEED_RANGE: RangeInclusive<u32> = 1_000_000..=9_999_999;

/// 随机创意要求
pub const CREATIVE_HINTS: [&str; 6] = [
    "make it funny",
    "make it tricky",
    "avoid previously seen patterns",
    "use uncommon numbers",
    "use real-life scenario",
    "use classroom example",
];

/// 构建好的提示词及其随机成分（用于日志）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    pub text: String,
    pub seed: u32,
    pub hint: &'static str,
}

/// 构建出题提示词
///
/// `count == 1` 时要求输出一个 JSON 对象，否则要求输出包含 `count` 个对象的数组。
pub fn build_prompt(
    params: &QuizParameters,
    count: usize,
    rng: &mut impl Rng,
) -> GenerationPrompt {
    let seed = rng.gen_range(SEED_RANGE);
    let hint = CREATIVE_HINTS[rng.gen_range(0..CREATIVE_HINTS.len())];

    let shape = r#"{
  "question": "<text>",
  "options": ["A) ...", "B) ...", "C) ...", "D) ..."],
  "answer": "A/B/C/D"
}"#;

    let (task, output) = if count == 1 {
        (
            "Generate a UNIQUE multiple-choice question.".to_string(),
            format!("Output strictly JSON only, a single object:\n{}", shape),
        )
    } else {
        (
            format!(
                "Generate {} UNIQUE multiple-choice questions. Every question in the list must be different from the others.",
                count
            ),
            format!(
                "Output strictly JSON only, an array of exactly {} objects, each shaped like:\n{}",
                count, shape
            ),
        )
    };

    let text = format!(
        r#"{task}
Never repeat earlier questions. Add creativity: {hint}

SEED: {seed}

{output}

Each question must have exactly four options labelled A) to D) and exactly one correct answer letter.

Class: {grade}
Board: {board}
Subject: {subject}
Lesson: {lesson}
Difficulty: {difficulty}
"#,
        task = task,
        hint = hint,
        seed = seed,
        output = output,
        grade = params.grade(),
        board = params.board(),
        subject = params.subject(),
        lesson = params.lesson().unwrap_or("Any"),
        difficulty = params.difficulty(),
    );

    GenerationPrompt { text, seed, hint }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn params(lesson: &str) -> QuizParameters {
        QuizParameters::parse("7th", "CBSE", "Maths", lesson, "Hard").unwrap()
    }

    #[test]
    fn test_single_prompt_contains_parameters() {
        let mut rng = StdRng::seed_from_u64(7);
        let prompt = build_prompt(&params("Fractions"), 1, &mut rng);

        assert!(prompt.text.contains("a single object"));
        assert!(prompt.text.contains("Class: 7th"));
        assert!(prompt.text.contains("Board: CBSE"));
        assert!(prompt.text.contains("Subject: Maths"));
        assert!(prompt.text.contains("Lesson: Fractions"));
        assert!(prompt.text.contains("Difficulty: Hard"));
        assert!(SEED_RANGE.contains(&prompt.seed));
        assert!(prompt.text.contains(&format!("SEED: {}", prompt.seed)));
        assert!(CREATIVE_HINTS.contains(&prompt.hint));
        assert!(prompt.text.contains(prompt.hint));
    }

    #[test]
    fn test_batch_prompt_asks_for_array() {
        let mut rng = StdRng::seed_from_u64(7);
        let prompt = build_prompt(&params(""), 20, &mut rng);

        assert!(prompt.text.contains("an array of exactly 20 objects"));
        assert!(prompt.text.contains("Generate 20 UNIQUE"));
        assert!(prompt.text.contains("Lesson: Any"));
    }

    #[test]
    fn test_same_seed_same_prompt() {
        let a = build_prompt(&params(""), 1, &mut StdRng::seed_from_u64(42));
        let b = build_prompt(&params(""), 1, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_entropy_varies_between_calls() {
        let mut rng = StdRng::seed_from_u64(1);
        let seeds: std::collections::HashSet<u32> = (0..10)
            .map(|_| build_prompt(&params(""), 1, &mut rng).seed)
            .collect();
        assert!(seeds.len() > 1);
    }
}
