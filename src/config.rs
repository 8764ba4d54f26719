use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// 文本生成服务类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// 兼容 OpenAI Chat Completions 的服务
    OpenAi,
    /// Google Gemini generateContent 接口
    Gemini,
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "gemini" => Ok(LlmProvider::Gemini),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// 出题模式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    /// 每道题单独生成
    Single,
    /// 开局一次生成 `batch_size` 道题
    Batch,
}

impl std::str::FromStr for QuizMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(QuizMode::Single),
            "batch" => Ok(QuizMode::Batch),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 采样温度，越高题目越多样
    pub temperature: f32,
    /// 单次生成的最大输出 token 数
    pub max_tokens: u32,
    // --- 出题配置 ---
    pub quiz_mode: QuizMode,
    /// 批量模式下每局的题目数量
    pub batch_size: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件，为空时不写文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_provider: LlmProvider::Gemini,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            llm_model_name: "gemini-2.0-flash-lite".to_string(),
            temperature: 0.9,
            max_tokens: 4096,
            quiz_mode: QuizMode::Single,
            batch_size: 20,
            verbose_logging: false,
            output_log_file: String::new(),
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置或无法解析的项使用 `base` 中的值
    pub fn from_env_with(base: Self) -> Self {
        Self {
            llm_provider: env_parse("LLM_PROVIDER").unwrap_or(base.llm_provider),
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .unwrap_or(base.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(base.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(base.llm_model_name),
            temperature: env_parse("LLM_TEMPERATURE").unwrap_or(base.temperature),
            max_tokens: env_parse("LLM_MAX_TOKENS").unwrap_or(base.max_tokens),
            quiz_mode: env_parse("QUIZ_MODE").unwrap_or(base.quiz_mode),
            batch_size: env_parse("QUIZ_BATCH_SIZE").unwrap_or(base.batch_size),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(base.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(base.output_log_file),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_with(Self::default())
    }

    /// 从 TOML 文件读取配置，缺少的键使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 加载配置：若设置了 `EDUMAN_CONFIG` 则先读该文件，再用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("EDUMAN_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(path.trim())?,
            _ => Self::default(),
        };
        Ok(Self::from_env_with(base))
    }

    /// 当前模式下每次生成的题目数量
    pub fn generation_count(&self) -> usize {
        match self.quiz_mode {
            QuizMode::Single => 1,
            QuizMode::Batch => self.batch_size.max(1),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
