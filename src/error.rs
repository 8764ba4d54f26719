//! 错误类型
//!
//! 每个关注点一个枚举，由 [`AppError`] 统一包装。
//! 其中 [`ProviderError`] 与 [`ResponseError`] 只在 `QuestionSource` 内部出现，
//! 会被降级为兜底题目，不会传给调用方。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 出题参数错误
    #[error("参数错误: {0}")]
    Parameter(#[from] ParameterError),
    /// 文本生成服务错误
    #[error("生成服务错误: {0}")]
    Provider(#[from] ProviderError),
    /// 模型返回内容格式错误
    #[error("响应格式错误: {0}")]
    Response(#[from] ResponseError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 游戏流程错误
    #[error("游戏流程错误: {0}")]
    Game(#[from] GameError),
}

/// 出题参数错误
///
/// 这是唯一会在发起网络请求之前直接返回给调用方的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// 教材版本为空
    #[error("教材版本 (board) 不能为空")]
    EmptyBoard,
    /// 年级无法识别
    #[error("无法识别的年级: {0:?}")]
    UnknownGrade(String),
    /// 科目无法识别
    #[error("无法识别的科目: {0:?}")]
    UnknownSubject(String),
    /// 难度无法识别
    #[error("无法识别的难度: {0:?}")]
    UnknownDifficulty(String),
    /// 题目数量为 0
    #[error("题目数量必须大于 0")]
    ZeroCount,
    /// 题目数量超过单次生成上限
    #[error("题目数量 {requested} 超过上限 {max}")]
    TooManyQuestions { requested: usize, max: usize },
}

/// 文本生成服务错误
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 网络请求失败（连接、鉴权、超时等）
    #[error("请求失败 ({provider}): {source}")]
    RequestFailed {
        provider: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务返回非成功状态码
    #[error("服务返回错误状态 ({provider}): {status}, body={body}")]
    BadStatus {
        provider: String,
        status: u16,
        body: String,
    },
    /// 返回内容为空
    #[error("返回内容为空 ({provider})")]
    EmptyContent { provider: String },
    /// 构建请求失败
    #[error("构建请求失败 ({provider}): {message}")]
    InvalidRequest { provider: String, message: String },
}

/// 模型返回内容格式错误
#[derive(Debug, Error)]
pub enum ResponseError {
    /// 文本中找不到可解析的 JSON
    #[error("响应中没有可解析的 JSON")]
    NoJsonFound,
    /// 批量模式下返回的不是数组
    #[error("批量模式需要 JSON 数组")]
    NotAList,
    /// 单题模式下返回的不是对象
    #[error("需要 JSON 对象")]
    NotAnObject,
    /// 缺少字段或字段类型不对
    #[error("字段 {0} 缺失或类型错误")]
    MissingField(&'static str),
    /// 题干为空
    #[error("题干为空")]
    EmptyQuestion,
    /// 选项数量不是 4
    #[error("选项数量必须为 4，实际为 {0}")]
    WrongOptionCount(usize),
    /// 选项内容为空
    #[error("第 {0} 个选项为空")]
    EmptyOption(usize),
    /// 选项标号与位置不一致
    #[error("选项标号不一致: 期望 {expected}，实际 {found}")]
    OptionLabelMismatch { expected: char, found: char },
    /// 答案不是 A-D 中的任何一个
    #[error("无效答案: {0:?}")]
    InvalidAnswer(String),
    /// 批量结果中没有任何有效题目
    #[error("没有有效题目")]
    NoValidRecords,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        source: toml::de::Error,
    },
    /// 未知的生成服务
    #[error("未知的生成服务: {0:?}")]
    UnknownProvider(String),
    /// 未知的出题模式
    #[error("未知的出题模式: {0:?}")]
    UnknownMode(String),
}

/// 游戏流程错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// 还没有选择出题参数
    #[error("尚未选择出题参数")]
    NotStarted,
    /// 当前没有等待作答的题目
    #[error("当前没有等待作答的题目")]
    NoActiveQuestion,
    /// 当前状态下不允许该操作
    #[error("状态 {state} 下不允许操作 {action}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

// ========== 便捷构造函数 ==========

impl ProviderError {
    /// 创建请求失败错误
    pub fn request_failed(
        provider: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::RequestFailed {
            provider: provider.into(),
            source: Box::new(source),
        }
    }

    /// 创建空内容错误
    pub fn empty_content(provider: impl Into<String>) -> Self {
        ProviderError::EmptyContent {
            provider: provider.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_wraps_parameter_error() {
        let err: AppError = ParameterError::EmptyBoard.into();
        assert!(matches!(err, AppError::Parameter(ParameterError::EmptyBoard)));
        assert!(err.to_string().contains("board"));
    }

    #[test]
    fn test_provider_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err = ProviderError::request_failed("gemini", io);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("gemini"));
    }
}
