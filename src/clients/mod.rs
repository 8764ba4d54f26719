//! 文本生成服务客户端
//!
//! 出题流程只需要"提交一段提示词，拿回一段文本"，
//! 这里把这个能力抽象成 [`TextProvider`]，具体实现按配置选择。

pub mod gemini_client;
pub mod openai_client;

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiClient;

use futures::future::BoxFuture;

use crate::config::{Config, LlmProvider};
use crate::error::ProviderError;

/// 单次生成的采样参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            max_tokens: 4096,
        }
    }
}

/// 文本生成服务
pub trait TextProvider: Send + Sync {
    /// 服务名称（仅用于日志）
    fn name(&self) -> &str;

    /// 发送提示词，返回模型的原始文本
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        options: &'a GenerationOptions,
    ) -> BoxFuture<'a, Result<String, ProviderError>>;
}

impl<P: TextProvider + ?Sized> TextProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        options: &'a GenerationOptions,
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        (**self).complete(prompt, options)
    }
}

/// 按配置创建文本生成服务
pub fn build_provider(config: &Config) -> Box<dyn TextProvider> {
    match config.llm_provider {
        LlmProvider::OpenAi => Box::new(OpenAiClient::new(config)),
        LlmProvider::Gemini => Box::new(GeminiClient::new(config)),
    }
}
