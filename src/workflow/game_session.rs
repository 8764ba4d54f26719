//! 游戏会话状态机
//!
//! 一局游戏的全部状态都在 [`GameSession`] 里，由界面层持有并显式传递。
//! 计时以服务端为准：所有与时间相关的操作都接收调用方给出的 `Instant`，
//! 不信任客户端上报的已用时间。
//!
//! ```text
//! SelectingOptions ──present──▶ AwaitingAnswer ──submit/timeout──▶ Answered
//!        ▲                            ▲                              │
//!        │ begin                      └──────────present─────────────┘
//!     Finished ◀────────────────────finish (任意已开始状态)
//! ```

use std::time::{Duration, Instant};

use crate::error::GameError;
use crate::models::{AnswerLetter, QuestionRecord, QuizParameters};

/// 作答结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong { picked: AnswerLetter },
    Timeout,
}

/// 会话状态
#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    /// 选择出题参数
    SelectingOptions,
    /// 题目已展示，等待作答
    AwaitingAnswer {
        number: usize,
        question: QuestionRecord,
        started_at: Instant,
    },
    /// 已作答（或超时）
    Answered {
        number: usize,
        question: QuestionRecord,
        outcome: AnswerOutcome,
    },
    /// 本局结束
    Finished,
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            GameState::SelectingOptions => "SelectingOptions",
            GameState::AwaitingAnswer { .. } => "AwaitingAnswer",
            GameState::Answered { .. } => "Answered",
            GameState::Finished => "Finished",
        }
    }
}

/// 得分统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub wrong: usize,
    pub timed_out: usize,
}

impl Score {
    pub fn total(&self) -> usize {
        self.correct + self.wrong + self.timed_out
    }

    /// 正确率（百分比），还没有作答时为 0
    pub fn accuracy(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.correct as f64 * 100.0 / self.total() as f64
        }
    }

    fn record(&mut self, outcome: AnswerOutcome) {
        match outcome {
            AnswerOutcome::Correct => self.correct += 1,
            AnswerOutcome::Wrong { .. } => self.wrong += 1,
            AnswerOutcome::Timeout => self.timed_out += 1,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} correct ({:.0}%), {} wrong, {} timed out",
            self.correct,
            self.total(),
            self.accuracy(),
            self.wrong,
            self.timed_out
        )
    }
}

/// 游戏会话
#[derive(Debug, Clone)]
pub struct GameSession {
    params: Option<QuizParameters>,
    state: GameState,
    score: Score,
    question_number: usize,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            params: None,
            state: GameState::SelectingOptions,
            score: Score::default(),
            question_number: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn params(&self) -> Option<&QuizParameters> {
        self.params.as_ref()
    }

    /// 已展示的题目数量（即当前题号）
    pub fn question_number(&self) -> usize {
        self.question_number
    }

    /// 正在作答或刚结算的题目
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        match &self.state {
            GameState::AwaitingAnswer { question, .. } | GameState::Answered { question, .. } => {
                Some(question)
            }
            _ => None,
        }
    }

    /// 当前难度下每道题的作答时限
    pub fn time_limit(&self) -> Option<Duration> {
        self.params.as_ref().map(|p| p.difficulty().time_limit())
    }

    /// 开始新的一局，只允许在选择参数或已结束时调用
    pub fn begin(&mut self, params: QuizParameters) -> Result<(), GameError> {
        match self.state {
            GameState::SelectingOptions | GameState::Finished => {
                self.params = Some(params);
                self.state = GameState::SelectingOptions;
                self.score = Score::default();
                self.question_number = 0;
                Ok(())
            }
            _ => Err(self.invalid("begin")),
        }
    }

    /// 展示下一道题，开始计时
    pub fn present(&mut self, question: QuestionRecord, now: Instant) -> Result<usize, GameError> {
        if self.params.is_none() {
            return Err(GameError::NotStarted);
        }
        match self.state {
            GameState::SelectingOptions | GameState::Answered { .. } => {
                self.question_number += 1;
                self.state = GameState::AwaitingAnswer {
                    number: self.question_number,
                    question,
                    started_at: now,
                };
                Ok(self.question_number)
            }
            _ => Err(self.invalid("present")),
        }
    }

    /// 剩余作答时间，不在等待作答状态时为 `None`
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match &self.state {
            GameState::AwaitingAnswer { started_at, .. } => {
                let limit = self.time_limit()?;
                Some(limit.saturating_sub(now.saturating_duration_since(*started_at)))
            }
            _ => None,
        }
    }

    /// 检查是否超时，超时则记为 [`AnswerOutcome::Timeout`]
    pub fn poll_timeout(&mut self, now: Instant) -> Option<AnswerOutcome> {
        if self.remaining(now)? > Duration::ZERO {
            return None;
        }
        self.settle(AnswerOutcome::Timeout)
    }

    /// 提交答案；超过时限的提交记为超时
    pub fn submit(&mut self, picked: AnswerLetter, now: Instant) -> Result<AnswerOutcome, GameError> {
        let remaining = self.remaining(now).ok_or(GameError::NoActiveQuestion)?;

        let outcome = match &self.state {
            GameState::AwaitingAnswer { question, .. } => {
                if remaining == Duration::ZERO {
                    AnswerOutcome::Timeout
                } else if question.is_correct(picked) {
                    AnswerOutcome::Correct
                } else {
                    AnswerOutcome::Wrong { picked }
                }
            }
            _ => return Err(GameError::NoActiveQuestion),
        };

        self.settle(outcome).ok_or(GameError::NoActiveQuestion)
    }

    /// 结束本局，返回得分；等待中的题目不计分
    pub fn finish(&mut self) -> Result<Score, GameError> {
        if self.params.is_none() {
            return Err(GameError::NotStarted);
        }
        self.state = GameState::Finished;
        Ok(self.score)
    }

    fn settle(&mut self, outcome: AnswerOutcome) -> Option<AnswerOutcome> {
        let previous = std::mem::replace(&mut self.state, GameState::Finished);
        match previous {
            GameState::AwaitingAnswer {
                number, question, ..
            } => {
                self.score.record(outcome);
                self.state = GameState::Answered {
                    number,
                    question,
                    outcome,
                };
                Some(outcome)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    fn invalid(&self, action: &'static str) -> GameError {
        GameError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }
}
