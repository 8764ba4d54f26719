//! 出题服务 - 业务能力层
//!
//! 只负责"把出题参数变成若干道合法题目"，不关心游戏流程。
//!
//! 流程：构建提示词 → 调用生成服务（只调用一次，不重试）→ 解析校验 → 兜底补齐。
//! 生成服务出错或响应格式不对都不会返回给调用方，而是降级为兜底题目；
//! 唯一会返回的错误是参数错误，且此时不会发起网络请求。

use rand::{rngs::StdRng, SeedableRng};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::clients::{GenerationOptions, TextProvider};
use crate::error::ParameterError;
use crate::models::{QuestionBatch, QuizParameters};
use crate::services::fallback::fallback_records;
use crate::services::prompt_builder::build_prompt;
use crate::services::response_parser::parse_questions;
use crate::utils::logging::truncate_text;

/// 单次生成的题目数量上限
pub const MAX_QUESTION_COUNT: usize = 50;

/// 出题服务
pub struct QuestionSource<P> {
    provider: P,
    options: GenerationOptions,
    rng: Mutex<StdRng>,
}

impl<P: TextProvider> QuestionSource<P> {
    /// 创建出题服务，提示词随机成分取自系统熵源
    pub fn new(provider: P, options: GenerationOptions) -> Self {
        Self {
            provider,
            options,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// 使用固定种子创建（提示词可复现，便于测试）
    pub fn with_seed(provider: P, options: GenerationOptions, seed: u64) -> Self {
        Self {
            provider,
            options,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// 生成 `count` 道题目
    ///
    /// 返回的批次恰好包含 `count` 道合法题目（真实生成或兜底）。
    /// `count == 0` 时返回 [`ParameterError::ZeroCount`]，
    /// 超过 [`MAX_QUESTION_COUNT`] 时返回 [`ParameterError::TooManyQuestions`]。
    pub async fn generate(
        &self,
        params: &QuizParameters,
        count: usize,
    ) -> Result<QuestionBatch, ParameterError> {
        if count == 0 {
            return Err(ParameterError::ZeroCount);
        }
        if count > MAX_QUESTION_COUNT {
            return Err(ParameterError::TooManyQuestions {
                requested: count,
                max: MAX_QUESTION_COUNT,
            });
        }

        let prompt = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            build_prompt(params, count, &mut *rng)
        };

        info!("📝 请求生成 {} 道题目 {}", count, params);
        debug!("🎲 种子: {} | 创意要求: {}", prompt.seed, prompt.hint);

        let raw = match self.provider.complete(&prompt.text, &self.options).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "⚠️ 生成服务 {} 调用失败，使用兜底题目: {}",
                    self.provider.name(),
                    e
                );
                return Ok(QuestionBatch::new(fallback_records(count), count));
            }
        };

        debug!("模型响应: {}", truncate_text(&raw, 200));

        let mut records = match parse_questions(&raw, count) {
            Ok(records) => records,
            Err(e) => {
                warn!("⚠️ 模型响应无法解析，使用兜底题目: {}", e);
                return Ok(QuestionBatch::new(fallback_records(count), count));
            }
        };

        let missing = count - records.len();
        if missing > 0 {
            warn!("⚠️ 有效题目 {}/{}，补齐 {} 道兜底题目", records.len(), count, missing);
            records.extend(fallback_records(missing));
        } else {
            info!("✓ 成功生成 {} 道题目", count);
        }

        Ok(QuestionBatch::new(records, missing))
    }
}
