use phf::phf_map;

/// 年级枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Grade {
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

/// 小写名称 → 年级，同时接受 "5th" 和纯数字 "5"
static GRADE_NAMES: phf::Map<&'static str, Grade> = phf_map! {
    "5th" => Grade::Fifth,
    "5" => Grade::Fifth,
    "6th" => Grade::Sixth,
    "6" => Grade::Sixth,
    "7th" => Grade::Seventh,
    "7" => Grade::Seventh,
    "8th" => Grade::Eighth,
    "8" => Grade::Eighth,
    "9th" => Grade::Ninth,
    "9" => Grade::Ninth,
    "10th" => Grade::Tenth,
    "10" => Grade::Tenth,
    "11th" => Grade::Eleventh,
    "11" => Grade::Eleventh,
    "12th" => Grade::Twelfth,
    "12" => Grade::Twelfth,
};

impl Grade {
    /// 所有可选年级（按显示顺序）
    pub const ALL: [Grade; 8] = [
        Grade::Fifth,
        Grade::Sixth,
        Grade::Seventh,
        Grade::Eighth,
        Grade::Ninth,
        Grade::Tenth,
        Grade::Eleventh,
        Grade::Twelfth,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Grade::Fifth => "5th",
            Grade::Sixth => "6th",
            Grade::Seventh => "7th",
            Grade::Eighth => "8th",
            Grade::Ninth => "9th",
            Grade::Tenth => "10th",
            Grade::Eleventh => "11th",
            Grade::Twelfth => "12th",
        }
    }

    /// 从字符串解析年级（忽略大小写和首尾空白）
    pub fn parse(s: &str) -> Option<Self> {
        GRADE_NAMES.get(s.trim().to_lowercase().as_str()).copied()
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
