use phf::phf_map;

/// 科目枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Subject {
    /// 数学
    Maths,
    /// 科学
    Science,
    /// 社会
    Social,
    /// 英语
    English,
}

static SUBJECT_NAMES: phf::Map<&'static str, Subject> = phf_map! {
    "maths" => Subject::Maths,
    "math" => Subject::Maths,
    "mathematics" => Subject::Maths,
    "science" => Subject::Science,
    "social" => Subject::Social,
    "social science" => Subject::Social,
    "social studies" => Subject::Social,
    "english" => Subject::English,
};

impl Subject {
    /// 所有可选科目
    pub const ALL: [Subject; 4] = [
        Subject::Maths,
        Subject::Science,
        Subject::Social,
        Subject::English,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Maths => "Maths",
            Subject::Science => "Science",
            Subject::Social => "Social",
            Subject::English => "English",
        }
    }

    /// 从字符串解析科目（忽略大小写，支持常见别名）
    pub fn parse(s: &str) -> Option<Self> {
        SUBJECT_NAMES.get(s.trim().to_lowercase().as_str()).copied()
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
