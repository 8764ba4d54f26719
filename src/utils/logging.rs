//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则 `verbose_logging` 为真时用 `debug`，默认 `info`。
/// 配置了 `output_log_file` 时日志写入该文件（先写入文件头），否则写到 stderr。
/// 重复调用不会报错，已有的全局订阅者保持不变。
pub fn init(config: &Config) -> anyhow::Result<()> {
    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if config.output_log_file.is_empty() {
        if let Err(e) = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
        {
            debug!("日志已初始化，忽略重复初始化: {}", e);
        }
        return Ok(());
    }

    init_log_file(&config.output_log_file)?;
    let file = OpenOptions::new()
        .append(true)
        .open(&config.output_log_file)?;
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
    {
        debug!("日志已初始化，忽略重复初始化: {}", e);
    }
    Ok(())
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> anyhow::Result<()> {
    let log_header = format!(
        "{}\nEduMan 游戏日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 EduMan 启动");
    info!(
        "🤖 生成服务: {:?} | 模型: {}",
        config.llm_provider, config.llm_model_name
    );
    info!(
        "📋 出题模式: {:?} | 每次生成 {} 道",
        config.quiz_mode,
        config.generation_count()
    );
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `correct`: 答对数量
/// - `wrong`: 答错数量
/// - `timed_out`: 超时数量
pub fn print_final_stats(correct: usize, wrong: usize, timed_out: usize) {
    let total = correct + wrong + timed_out;
    info!("\n{}", "=".repeat(60));
    info!("📊 本局统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 答对: {}/{}", correct, total);
    info!("❌ 答错: {}", wrong);
    info!("⏳ 超时: {}", timed_out);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
