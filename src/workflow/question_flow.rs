//! 出题流程 - 流程层
//!
//! 核心职责：决定"什么时候向出题服务要题"
//!
//! - 单题模式：每道题单独生成，题目永远不会用完
//! - 批量模式：开局一次生成 N 道，用完即结束本局

use std::collections::VecDeque;
use std::time::Instant;
use tracing::info;

use crate::clients::TextProvider;
use crate::config::{Config, QuizMode};
use crate::error::{AppResult, ParameterError};
use crate::models::{QuestionRecord, QuizParameters};
use crate::services::QuestionSource;
use crate::workflow::game_session::GameSession;

/// 出题模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionMode {
    Single,
    Batch(usize),
}

impl QuestionMode {
    pub fn from_config(config: &Config) -> Self {
        match config.quiz_mode {
            QuizMode::Single => QuestionMode::Single,
            QuizMode::Batch => QuestionMode::Batch(config.generation_count()),
        }
    }
}

/// 出题流程
///
/// 持有本局的出题参数和待答题目队列，不持有会话状态。
pub struct QuestionFlow<'a, P> {
    source: &'a QuestionSource<P>,
    params: QuizParameters,
    mode: QuestionMode,
    pending: VecDeque<QuestionRecord>,
    batch_generated: bool,
    served: usize,
    fallback_generated: usize,
}

impl<'a, P: TextProvider> QuestionFlow<'a, P> {
    pub fn new(source: &'a QuestionSource<P>, params: QuizParameters, mode: QuestionMode) -> Self {
        Self {
            source,
            params,
            mode,
            pending: VecDeque::new(),
            batch_generated: false,
            served: 0,
            fallback_generated: 0,
        }
    }

    pub fn mode(&self) -> QuestionMode {
        self.mode
    }

    pub fn params(&self) -> &QuizParameters {
        &self.params
    }

    /// 已发出的题目数量
    pub fn served(&self) -> usize {
        self.served
    }

    /// 生成过程中用到的兜底题数量
    pub fn fallback_generated(&self) -> usize {
        self.fallback_generated
    }

    /// 批量模式下剩余题目数量；单题模式为 `None`
    pub fn remaining_in_batch(&self) -> Option<usize> {
        match self.mode {
            QuestionMode::Single => None,
            QuestionMode::Batch(n) if !self.batch_generated => Some(n),
            QuestionMode::Batch(_) => Some(self.pending.len()),
        }
    }

    /// 取下一道题，批量模式下题目用完时返回 `None`
    pub async fn next_question(&mut self) -> Result<Option<QuestionRecord>, ParameterError> {
        match self.mode {
            QuestionMode::Single => {
                if self.pending.is_empty() {
                    self.refill(1).await?;
                }
            }
            QuestionMode::Batch(n) => {
                if !self.batch_generated {
                    self.refill(n).await?;
                    self.batch_generated = true;
                }
            }
        }

        let next = self.pending.pop_front();
        if next.is_some() {
            self.served += 1;
        }
        Ok(next)
    }

    /// 取下一道题并展示到会话中
    ///
    /// 返回题号；批量模式下题目用完时结束会话并返回 `None`。
    pub async fn advance(&mut self, session: &mut GameSession) -> AppResult<Option<usize>> {
        match self.next_question().await? {
            Some(question) => Ok(Some(session.present(question, Instant::now())?)),
            None => {
                let score = session.finish()?;
                info!("🏁 本批题目已全部作答: {}", score);
                Ok(None)
            }
        }
    }

    async fn refill(&mut self, count: usize) -> Result<(), ParameterError> {
        let batch = self.source.generate(&self.params, count).await?;
        self.fallback_generated += batch.fallback_count();
        self.pending.extend(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::GenerationOptions;
    use crate::error::ProviderError;
    use crate::workflow::game_session::GameState;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 按请求的题目数返回对应数量的不同题目
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl TextProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn complete<'a>(
            &'a self,
            prompt: &'a str,
            _options: &'a GenerationOptions,
        ) -> BoxFuture<'a, Result<String, ProviderError>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let count = if prompt.contains("a single object") { 1 } else { 3 };
            let items: Vec<String> = (0..count)
                .map(|i| {
                    format!(
                        r#"{{"question":"Call {} question {}","options":["1","2","3","4"],"answer":"A"}}"#,
                        call, i
                    )
                })
                .collect();
            let text = if count == 1 {
                items[0].clone()
            } else {
                format!("[{}]", items.join(","))
            };
            Box::pin(async move { Ok(text) })
        }
    }

    fn source() -> QuestionSource<CountingProvider> {
        QuestionSource::with_seed(
            CountingProvider {
                calls: AtomicUsize::new(0),
            },
            GenerationOptions::default(),
            3,
        )
    }

    fn params() -> QuizParameters {
        QuizParameters::parse("10th", "State Board", "English", "Grammar", "Medium").unwrap()
    }

    #[tokio::test]
    async fn test_single_mode_generates_each_question() {
        let source = source();
        let mut flow = QuestionFlow::new(&source, params(), QuestionMode::Single);

        for _ in 0..4 {
            assert!(flow.next_question().await.unwrap().is_some());
        }
        assert_eq!(flow.served(), 4);
        assert_eq!(flow.remaining_in_batch(), None);
        assert_eq!(source.provider().calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_batch_mode_generates_once_and_exhausts() {
        let source = source();
        let mut flow = QuestionFlow::new(&source, params(), QuestionMode::Batch(3));
        assert_eq!(flow.remaining_in_batch(), Some(3));

        let mut questions = Vec::new();
        while let Some(q) = flow.next_question().await.unwrap() {
            questions.push(q.question().to_string());
        }

        assert_eq!(
            questions,
            vec!["Call 0 question 0", "Call 0 question 1", "Call 0 question 2"]
        );
        assert_eq!(flow.remaining_in_batch(), Some(0));
        assert_eq!(flow.fallback_generated(), 0);
        assert_eq!(source.provider().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_batch_zero_is_rejected() {
        let source = source();
        let mut flow = QuestionFlow::new(&source, params(), QuestionMode::Batch(0));
        assert_eq!(flow.next_question().await, Err(ParameterError::ZeroCount));
    }

    #[tokio::test]
    async fn test_advance_finishes_session_when_batch_is_used_up() {
        let source = source();
        let mut flow = QuestionFlow::new(&source, params(), QuestionMode::Batch(3));
        let mut session = GameSession::new();
        session.begin(params()).unwrap();

        for expected in 1..=3 {
            assert_eq!(flow.advance(&mut session).await.unwrap(), Some(expected));
            session
                .submit(crate::models::AnswerLetter::A, Instant::now())
                .unwrap();
        }
        assert_eq!(flow.advance(&mut session).await.unwrap(), None);
        assert_eq!(session.state(), &GameState::Finished);
        assert_eq!(session.score().correct, 3);
    }
}
