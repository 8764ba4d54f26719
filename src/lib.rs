//! # EduMan Quiz
//!
//! AI 出题的单机答题游戏：用户选择年级/教材/科目/课程/难度，
//! 由大模型生成四选一题目，限时作答并计分。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只提供"提交提示词，拿回文本"的能力
//! - `OpenAiClient` - 兼容 OpenAI 的 Chat Completions 接口
//! - `GeminiClient` - Gemini generateContent 接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `QuestionSource` - 构建提示词 → 调用模型 → 解析校验 → 兜底
//! - `response_parser` - 括号平衡提取 JSON + 题目结构校验
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一局游戏"的完整流程
//! - `GameSession` - 会话状态机（选参数 → 作答 → 结算 → 结束）
//! - `QuestionFlow` - 单题/批量两种出题节奏
//!
//! ### ④ 界面层
//! - `main.rs` - 终端交互，只负责输入输出
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{build_provider, GenerationOptions, TextProvider};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnswerLetter, QuestionBatch, QuestionRecord, QuizParameters};
pub use services::QuestionSource;
pub use workflow::{AnswerOutcome, GameSession, GameState, QuestionFlow, QuestionMode, Score};
