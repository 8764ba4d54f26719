//! 模型响应解析
//!
//! 分两步：
//! 1. [`extract_json`]：从夹杂说明文字、代码块的文本中找出第一段括号平衡且能严格解析的 JSON
//! 2. [`validate_record`]：把 JSON 对象校验（并做少量修复）成 [`QuestionRecord`]
//!
//! [`parse_questions`] 把两步串起来，并处理单题/批量两种形态。

use regex::Regex;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::error::ResponseError;
use crate::models::{AnswerLetter, QuestionRecord};

/// 选项开头的明确标号：`A)`、`(b)`
fn option_paren_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\(?\s*([A-Da-d])\s*\)\s*").expect("选项标号正则无效"))
}

/// 选项开头的弱标号：`C. `、`D: `（后面必须有空白，`B.R. Ambedkar` 不算）
fn option_dot_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Da-d])[.:]\s+").expect("选项标号正则无效"))
}

/// 只有字母的答案：`B`、`b)`、`(C)`、`Option D`
fn answer_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:option\s+)?\(?\s*([A-D])\s*\)?\s*$").expect("答案正则无效")
    })
}

/// 带标号的完整选项作为答案：`B) 15`
fn answer_labeled_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*\(?\s*([A-D])\s*\)\s*(\S.*?)\s*$").expect("答案正则无效")
    })
}

/// 最多扫描的响应长度（字节）
const MAX_SCAN_LEN: usize = 32 * 1024;

// ========== 第一步：提取 JSON ==========

/// 从任意文本中提取第一段可解析的 JSON 值
///
/// 依次尝试每个 `{` / `[`，从该位置按括号栈找到与之配对的结束括号
/// （跳过字符串内的括号和转义字符），第一段能严格解析的片段胜出。
/// 解析失败的片段中，位于字符串里的括号不再作为起点；超过
/// [`MAX_SCAN_LEN`] 的部分不扫描。
pub fn extract_json(text: &str) -> Option<JsonValue> {
    let bytes = text.as_bytes();
    if bytes.len() > MAX_SCAN_LEN {
        warn!(
            "⚠️ 模型响应过长 ({} 字节)，只扫描前 {} 字节",
            bytes.len(),
            MAX_SCAN_LEN
        );
    }
    let bytes = &bytes[..bytes.len().min(MAX_SCAN_LEN)];
    let mut skip = vec![false; bytes.len()];

    for (start, &b) in bytes.iter().enumerate() {
        if (b != b'{' && b != b'[') || skip[start] {
            continue;
        }
        let Some(candidate) = balanced_end(bytes, start) else {
            continue;
        };
        // 括号都是 ASCII，切片位置一定在字符边界上
        match serde_json::from_str::<JsonValue>(&text[start..=candidate.end]) {
            Ok(value) => return Some(value),
            Err(e) => {
                debug!("候选 JSON 片段 [{}..={}] 解析失败: {}", start, candidate.end, e);
                for i in candidate.quoted_brackets {
                    skip[i] = true;
                }
            }
        }
    }

    None
}

/// 括号平衡的候选片段
struct Candidate {
    /// 配对的结束括号位置
    end: usize,
    /// 片段内字符串里出现的开括号位置
    quoted_brackets: Vec<usize>,
}

/// 从 `start` 处开括号向后找配对的结束括号
fn balanced_end(bytes: &[u8], start: usize) -> Option<Candidate> {
    let mut stack: Vec<u8> = Vec::new();
    let mut quoted_brackets = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            } else if b == b'{' || b == b'[' {
                quoted_brackets.push(i);
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => stack.push(b'}'),
            b'[' => stack.push(b']'),
            b'}' | b']' => {
                if stack.pop() != Some(b) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(Candidate {
                        end: i,
                        quoted_brackets,
                    });
                }
            }
            _ => {}
        }
    }

    None
}

// ========== 第二步：校验题目 ==========

/// 把一个 JSON 对象校验成题目
///
/// 修复规则：
/// - 与位置一致的选项标号（`A)`、`(b)`、`C. `、`D: `）被去掉再按位置重新加上
/// - `X)` 形式的标号与位置不符视为格式错误；其他看起来像标号的开头按正文保留
/// - 答案可以是与某个选项正文完全相同的文本、单独的字母，或带标号的完整选项；
///   几种读法指向不同选项时视为无效答案
pub fn validate_record(value: &JsonValue) -> Result<QuestionRecord, ResponseError> {
    let obj = value.as_object().ok_or(ResponseError::NotAnObject)?;

    let question = obj
        .get("question")
        .and_then(JsonValue::as_str)
        .ok_or(ResponseError::MissingField("question"))?;

    let raw_options = obj
        .get("options")
        .and_then(JsonValue::as_array)
        .ok_or(ResponseError::MissingField("options"))?;
    if raw_options.len() != 4 {
        return Err(ResponseError::WrongOptionCount(raw_options.len()));
    }

    let mut bodies: Vec<String> = Vec::with_capacity(4);
    for (i, raw) in raw_options.iter().enumerate() {
        let text = option_text(raw).ok_or(ResponseError::MissingField("options"))?;
        bodies.push(strip_option_label(&text, i)?);
    }

    let answer_raw = match obj.get("answer") {
        Some(JsonValue::String(s)) => s.clone(),
        _ => return Err(ResponseError::MissingField("answer")),
    };
    let answer = parse_answer(&answer_raw, &bodies)
        .ok_or_else(|| ResponseError::InvalidAnswer(answer_raw.clone()))?;

    QuestionRecord::new(
        question,
        [
            bodies[0].as_str(),
            bodies[1].as_str(),
            bodies[2].as_str(),
            bodies[3].as_str(),
        ],
        answer,
    )
}

/// 选项允许是字符串或数字
fn option_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 去掉选项开头的标号，返回正文
fn strip_option_label(text: &str, position: usize) -> Result<String, ResponseError> {
    let expected = AnswerLetter::ALL[position].as_char();

    let body = if let Some((found, rest)) = leading_label(option_paren_label_re(), text) {
        if found != expected {
            return Err(ResponseError::OptionLabelMismatch { expected, found });
        }
        rest
    } else {
        match leading_label(option_dot_label_re(), text) {
            Some((found, rest)) if found == expected => rest,
            _ => text,
        }
    };

    let body = body.trim();
    if body.is_empty() {
        return Err(ResponseError::EmptyOption(position + 1));
    }
    Ok(body.to_string())
}

/// 匹配开头的标号，返回大写字母和标号之后的文本
fn leading_label<'t>(re: &Regex, text: &'t str) -> Option<(char, &'t str)> {
    let caps = re.captures(text)?;
    let letter = caps.get(1)?.as_str().chars().next()?.to_ascii_uppercase();
    let label_end = caps.get(0)?.end();
    Some((letter, &text[label_end..]))
}

/// 解析答案字段
fn parse_answer(raw: &str, bodies: &[String]) -> Option<AnswerLetter> {
    let wanted = raw.trim().to_lowercase();
    let by_text = bodies
        .iter()
        .position(|body| body.to_lowercase() == wanted)
        .and_then(AnswerLetter::from_index);

    let by_label = answer_letter_re()
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(AnswerLetter::from_char)
        .or_else(|| {
            let caps = answer_labeled_re().captures(raw)?;
            let letter = caps.get(1)?.as_str().chars().next().and_then(AnswerLetter::from_char)?;
            let body = caps.get(2)?.as_str().to_lowercase();
            (bodies.get(letter.index())?.to_lowercase() == body).then_some(letter)
        });

    match (by_text, by_label) {
        (Some(a), Some(b)) if a != b => {
            debug!("答案 {:?} 既像选项 {} 的正文又像字母 {}", raw, a, b);
            None
        }
        (Some(letter), _) | (None, Some(letter)) => Some(letter),
        (None, None) => None,
    }
}

// ========== 组合 ==========

/// 解析模型响应
///
/// - `count == 1`：期望 JSON 对象；若返回数组，取其中第一道有效题目
/// - `count > 1`：必须是数组；无效题目和重复题目（按题干归一化比较）被丢弃，
///   超出 `count` 的部分截断
///
/// 返回的题目数量在 `1..=count` 之间，不足部分由调用方补齐。
pub fn parse_questions(text: &str, count: usize) -> Result<Vec<QuestionRecord>, ResponseError> {
    let value = extract_json(text).ok_or(ResponseError::NoJsonFound)?;

    match &value {
        JsonValue::Array(items) => collect_unique(items, count.max(1)),
        JsonValue::Object(_) if count <= 1 => Ok(vec![validate_record(&value)?]),
        _ if count > 1 => Err(ResponseError::NotAList),
        _ => Err(ResponseError::NotAnObject),
    }
}

fn collect_unique(items: &[JsonValue], count: usize) -> Result<Vec<QuestionRecord>, ResponseError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(count.min(items.len()));

    for (i, item) in items.iter().enumerate() {
        if records.len() == count {
            debug!("已收集 {} 道题目，忽略剩余 {} 项", count, items.len() - i);
            break;
        }
        match validate_record(item) {
            Ok(record) => {
                if seen.insert(question_key(record.question())) {
                    records.push(record);
                } else {
                    warn!("⚠️ 丢弃重复题目 #{}: {}", i + 1, record.question());
                }
            }
            Err(e) => warn!("⚠️ 丢弃无效题目 #{}: {}", i + 1, e),
        }
    }

    if records.is_empty() {
        return Err(ResponseError::NoValidRecords);
    }
    Ok(records)
}

/// 题干归一化：忽略大小写和空白差异
fn question_key(question: &str) -> String {
    question
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
