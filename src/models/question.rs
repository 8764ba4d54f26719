use serde::{Deserialize, Serialize};

use crate::error::ResponseError;

/// 选项字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [
        AnswerLetter::A,
        AnswerLetter::B,
        AnswerLetter::C,
        AnswerLetter::D,
    ];

    /// 从字符解析（忽略大小写）
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(AnswerLetter::A),
            'B' => Some(AnswerLetter::B),
            'C' => Some(AnswerLetter::C),
            'D' => Some(AnswerLetter::D),
            _ => None,
        }
    }

    /// 按选项位置（从 0 开始）取字母
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_char(self) -> char {
        match self {
            AnswerLetter::A => 'A',
            AnswerLetter::B => 'B',
            AnswerLetter::C => 'C',
            AnswerLetter::D => 'D',
        }
    }

    /// 解析用户输入，只接受单个字母（可带首尾空白）
    pub fn parse_input(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 一道经过校验的四选一题目
///
/// 只能通过 [`QuestionRecord::new`] 构造，因此答案一定对应四个选项之一，
/// 且每个选项都带有与位置一致的 `A)`..`D)` 标号。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    question: String,
    options: [String; 4],
    answer: AnswerLetter,
}

impl QuestionRecord {
    /// 用题干、四个选项正文（不带标号）和答案创建题目
    pub fn new(
        question: &str,
        bodies: [&str; 4],
        answer: AnswerLetter,
    ) -> Result<Self, ResponseError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ResponseError::EmptyQuestion);
        }

        let mut options: [String; 4] = Default::default();
        for (i, body) in bodies.iter().enumerate() {
            let body = body.trim();
            if body.is_empty() {
                return Err(ResponseError::EmptyOption(i + 1));
            }
            options[i] = format!("{}) {}", AnswerLetter::ALL[i], body);
        }

        Ok(Self {
            question: question.to_string(),
            options,
            answer,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// 带标号的四个选项，如 `"B) 15"`
    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    pub fn answer(&self) -> AnswerLetter {
        self.answer
    }

    /// 正确选项的完整文本
    pub fn answer_option(&self) -> &str {
        &self.options[self.answer.index()]
    }

    pub fn is_correct(&self, picked: AnswerLetter) -> bool {
        picked == self.answer
    }
}

/// 一次生成调用产出的题目序列
///
/// `fallback_count` 记录其中有多少道是兜底题，调用方可据此区分
/// 真实生成的题目和降级结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBatch {
    records: Vec<QuestionRecord>,
    fallback_count: usize,
}

impl QuestionBatch {
    pub(crate) fn new(records: Vec<QuestionRecord>, fallback_count: usize) -> Self {
        debug_assert!(fallback_count <= records.len());
        Self {
            records,
            fallback_count,
        }
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<QuestionRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fallback_count(&self) -> usize {
        self.fallback_count
    }

    /// 整批都是兜底题
    pub fn is_fallback(&self) -> bool {
        !self.records.is_empty() && self.fallback_count == self.records.len()
    }

    /// 部分题目被兜底题补齐
    pub fn is_partial(&self) -> bool {
        self.fallback_count > 0 && self.fallback_count < self.records.len()
    }
}

impl IntoIterator for QuestionBatch {
    type Item = QuestionRecord;
    type IntoIter = std::vec::IntoIter<QuestionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_renders_labels() {
        let record = QuestionRecord::new("2 + 2?", ["3", " 4 ", "5", "6"], AnswerLetter::B).unwrap();
        assert_eq!(record.options()[1], "B) 4");
        assert_eq!(record.answer_option(), "B) 4");
        assert!(record.is_correct(AnswerLetter::B));
        assert!(!record.is_correct(AnswerLetter::A));
    }

    #[test]
    fn test_record_rejects_empty_parts() {
        assert!(matches!(
            QuestionRecord::new("  ", ["1", "2", "3", "4"], AnswerLetter::A),
            Err(ResponseError::EmptyQuestion)
        ));
        assert!(matches!(
            QuestionRecord::new("Q", ["1", "", "3", "4"], AnswerLetter::A),
            Err(ResponseError::EmptyOption(2))
        ));
    }

    #[test]
    fn test_parse_input_letter() {
        assert_eq!(AnswerLetter::parse_input(" c "), Some(AnswerLetter::C));
        assert_eq!(AnswerLetter::parse_input("E"), None);
        assert_eq!(AnswerLetter::parse_input("AB"), None);
    }
}
