//! 兜底题目
//!
//! 生成失败或响应无法解析时使用，保证游戏流程总能继续。

use crate::models::{AnswerLetter, QuestionRecord};

pub const FALLBACK_QUESTION: &str = "Fallback: What is 5 × 3?";
pub const FALLBACK_OPTIONS: [&str; 4] = ["8", "15", "10", "35"];
pub const FALLBACK_ANSWER: AnswerLetter = AnswerLetter::B;

/// 固定的兜底题目
pub fn fallback_record() -> QuestionRecord {
    QuestionRecord::new(FALLBACK_QUESTION, FALLBACK_OPTIONS, FALLBACK_ANSWER)
        .expect("兜底题目必须合法")
}

/// `count` 道相同的兜底题目
pub fn fallback_records(count: usize) -> Vec<QuestionRecord> {
    vec![fallback_record(); count]
}
