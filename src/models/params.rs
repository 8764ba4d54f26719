//! 出题参数
//!
//! 一局游戏开始时由用户选择一次，之后不再修改

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::models::{Difficulty, Grade, Subject};

/// 界面上提供的教材版本选项，"Other" 表示用户自行输入
pub const BOARD_CHOICES: [&str; 5] = ["CBSE", "CISCE", "NIOS", "State Board", "Other"];

/// 出题参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizParameters {
    grade: Grade,
    board: String,
    subject: Subject,
    lesson: Option<String>,
    difficulty: Difficulty,
}

impl QuizParameters {
    /// 创建出题参数
    ///
    /// 教材版本去掉首尾空白后不能为空；课程为空白时视为未指定。
    pub fn new(
        grade: Grade,
        board: impl Into<String>,
        subject: Subject,
        lesson: Option<String>,
        difficulty: Difficulty,
    ) -> Result<Self, ParameterError> {
        let board = board.into().trim().to_string();
        if board.is_empty() {
            return Err(ParameterError::EmptyBoard);
        }

        let lesson = lesson
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Ok(Self {
            grade,
            board,
            subject,
            lesson,
            difficulty,
        })
    }

    /// 从界面输入的原始字符串创建出题参数
    pub fn parse(
        grade: &str,
        board: &str,
        subject: &str,
        lesson: &str,
        difficulty: &str,
    ) -> Result<Self, ParameterError> {
        let grade =
            Grade::parse(grade).ok_or_else(|| ParameterError::UnknownGrade(grade.to_string()))?;
        let subject = Subject::parse(subject)
            .ok_or_else(|| ParameterError::UnknownSubject(subject.to_string()))?;
        let difficulty = Difficulty::parse(difficulty)
            .ok_or_else(|| ParameterError::UnknownDifficulty(difficulty.to_string()))?;

        Self::new(grade, board, subject, Some(lesson.to_string()), difficulty)
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn board(&self) -> &str {
        &self.board
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn lesson(&self) -> Option<&str> {
        self.lesson.as_deref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl std::fmt::Display for QuizParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[年级#{} 教材#{} 科目#{} 课程#{} 难度#{}]",
            self.grade,
            self.board,
            self.subject,
            self.lesson().unwrap_or("-"),
            self.difficulty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_parameters() {
        let params = QuizParameters::parse("8th", " CBSE ", "science", "Light", "medium").unwrap();
        assert_eq!(params.grade(), Grade::Eighth);
        assert_eq!(params.board(), "CBSE");
        assert_eq!(params.subject(), Subject::Science);
        assert_eq!(params.lesson(), Some("Light"));
        assert_eq!(params.difficulty(), Difficulty::Medium);
    }

    #[test]
    fn test_blank_lesson_is_none() {
        let params = QuizParameters::parse("5th", "NIOS", "Maths", "   ", "Easy").unwrap();
        assert_eq!(params.lesson(), None);
    }

    #[test]
    fn test_empty_board_rejected() {
        let err = QuizParameters::parse("5th", "  ", "Maths", "", "Easy").unwrap_err();
        assert_eq!(err, ParameterError::EmptyBoard);
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert_eq!(
            QuizParameters::parse("13th", "CBSE", "Maths", "", "Easy").unwrap_err(),
            ParameterError::UnknownGrade("13th".to_string())
        );
        assert_eq!(
            QuizParameters::parse("9th", "CBSE", "Art", "", "Easy").unwrap_err(),
            ParameterError::UnknownSubject("Art".to_string())
        );
        assert_eq!(
            QuizParameters::parse("9th", "CBSE", "Maths", "", "").unwrap_err(),
            ParameterError::UnknownDifficulty(String::new())
        );
    }
}
