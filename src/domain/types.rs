// ==========================================
// 员工名录系统 - 领域类型定义
// ==========================================
// 职责: 性别枚举 / 排序方向 / 合同标签
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 性别 (Gender)
// ==========================================
// 存储格式: "M" / "F"（与导入模板一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    M, // 男
    F, // 女
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::M => write!(f, "M"),
            Gender::F => write!(f, "F"),
        }
    }
}

impl Gender {
    /// 严格解析存储编码（仅接受 "M" / "F"）
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Gender::M),
            "F" => Some(Gender::F),
            _ => None,
        }
    }

    /// 宽松解析自由文本
    ///
    /// # 规则
    /// - "m" / "masculino" → M
    /// - "f" / "feminino" → F
    /// - 其他 → None（不报错）
    pub fn normalize(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "m" | "masculino" => Some(Gender::M),
            "f" | "feminino" => Some(Gender::F),
            _ => None,
        }
    }
}

// ==========================================
// 排序方向 (Sort Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// 翻转方向
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}
