// ==========================================
// 员工名录系统 - 导入领域模型
// ==========================================
// 用途: 导入管道中间产物与结果汇总
// 流程: 文件解析 → RawRow → RowValidation → RowOutcome → ImportSummary
// ==========================================

use crate::domain::employee::{EmployeeDraft, EmployeeField};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ==========================================
// CellValue - 原始单元格
// ==========================================
// 序列化为 JSON 原生值（用于错误报告回显原始行）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// 表格原生日期序列号（1900 日期系统）
    DateSerial(f64),
    /// ISO 日期/时间文本（ODS 等格式）
    DateIso(String),
    /// 表格错误值（如 #DIV/0!）
    Error(String),
}

impl CellValue {
    /// 空单元格或纯空白文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) | CellValue::DateIso(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 转为文本（未修剪）
    ///
    /// # 规则
    /// - 整数值浮点去掉小数部分（"12345.0" → "12345"）
    /// - 错误值不转换（视为缺失）
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty | CellValue::Error(_) => None,
            CellValue::Text(s) | CellValue::DateIso(s) => Some(s.clone()),
            CellValue::Number(n) | CellValue::DateSerial(n) => Some(format_number(*n)),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

// ==========================================
// RawRow - 原始数据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRow {
    /// 源文件中的行号（1 起，表头为第 1 行）
    pub row_number: usize,
    pub cells: Vec<CellValue>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<CellValue>) -> Self {
        Self { row_number, cells }
    }

    /// 由文本单元格构造（测试/CSV 便捷入口）
    pub fn from_texts<S: AsRef<str>>(row_number: usize, texts: &[S]) -> Self {
        let cells = texts
            .iter()
            .map(|t| {
                if t.as_ref().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(t.as_ref().to_string())
                }
            })
            .collect();
        Self { row_number, cells }
    }

    /// 整行空白
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }

    /// 按位置取单元格，越界视为空
    pub fn cell(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }
}

// ==========================================
// RowValidation - 行映射结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RowValidation {
    Valid {
        row_number: usize,
        employee: EmployeeDraft,
    },
    Invalid {
        row_number: usize,
        error: String,
        missing_fields: Vec<EmployeeField>,
        raw: Vec<CellValue>,
    },
}

impl RowValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, RowValidation::Valid { .. })
    }

    pub fn row_number(&self) -> usize {
        match self {
            RowValidation::Valid { row_number, .. } | RowValidation::Invalid { row_number, .. } => {
                *row_number
            }
        }
    }
}

// ==========================================
// RowErrorKind / RowError - 行级错误
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowErrorKind {
    Validation,  // 校验失败（未调用持久化）
    Persistence, // 持久化层拒绝写入
    Unexpected,  // 处理过程中的其他异常
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub kind: RowErrorKind,
    pub error: String,
    /// 原始行回显（诊断用）
    pub data: Vec<CellValue>,
}

// ==========================================
// RowOutcome - 单行处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowOutcome {
    Success { row: usize, id: String },
    ValidationError(RowError),
    PersistenceError(RowError),
    UnexpectedError(RowError),
}

impl RowOutcome {
    pub fn row(&self) -> usize {
        match self {
            RowOutcome::Success { row, .. } => *row,
            RowOutcome::ValidationError(e)
            | RowOutcome::PersistenceError(e)
            | RowOutcome::UnexpectedError(e) => e.row,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RowOutcome::Success { .. })
    }

    pub fn into_error(self) -> Option<RowError> {
        match self {
            RowOutcome::Success { .. } => None,
            RowOutcome::ValidationError(e)
            | RowOutcome::PersistenceError(e)
            | RowOutcome::UnexpectedError(e) => Some(e),
        }
    }
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub success: usize,
    /// 按行号升序（顺序处理）
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            success: 0,
            errors: Vec::new(),
        }
    }

    /// 累加一行结果（fold 步骤，不短路）
    pub fn record(mut self, outcome: RowOutcome) -> Self {
        match outcome.into_error() {
            None => self.success += 1,
            Some(e) => self.errors.push(e),
        }
        self
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn count_by_kind(&self, kind: RowErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }
}

// ==========================================
// ImportProgress - 导入进度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportProgress {
    pub processed: usize,
    pub total: usize,
}

impl ImportProgress {
    /// 百分比（0.0 ~ 100.0）
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.processed as f64 / self.total as f64) * 100.0
    }
}

// ==========================================
// ImportReport - 文件导入报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub summary: ImportSummary,
    pub elapsed_time: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_error(row: usize, kind: RowErrorKind) -> RowError {
        RowError {
            row,
            kind,
            error: "x".to_string(),
            data: vec![],
        }
    }

    #[test]
    fn test_cell_as_text() {
        assert_eq!(CellValue::Number(12345.0).as_text(), Some("12345".to_string()));
        assert_eq!(CellValue::Number(1.5).as_text(), Some("1.5".to_string()));
        assert_eq!(CellValue::Empty.as_text(), None);
        assert_eq!(CellValue::Error("#N/A".to_string()).as_text(), None);
        assert_eq!(CellValue::Bool(true).as_text(), Some("true".to_string()));
    }

    #[test]
    fn test_raw_row_blank_and_out_of_range() {
        let row = RawRow::new(2, vec![CellValue::Empty, CellValue::Text("   ".to_string())]);
        assert!(row.is_blank());
        assert_eq!(row.cell(20), &CellValue::Empty);

        let row = RawRow::from_texts(3, &["", "", "x"]);
        assert!(!row.is_blank());
    }

    #[test]
    fn test_summary_fold() {
        let outcomes = vec![
            RowOutcome::Success { row: 2, id: "a".to_string() },
            RowOutcome::ValidationError(row_error(3, RowErrorKind::Validation)),
            RowOutcome::PersistenceError(row_error(4, RowErrorKind::Persistence)),
            RowOutcome::Success { row: 5, id: "b".to_string() },
        ];
        let summary = outcomes.into_iter().fold(ImportSummary::new(4), ImportSummary::record);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.success, 2);
        assert_eq!(summary.error_count(), 2);
        assert_eq!(summary.errors[0].row, 3);
        assert_eq!(summary.count_by_kind(RowErrorKind::Persistence), 1);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(ImportProgress { processed: 1, total: 4 }.percent(), 25.0);
        assert_eq!(ImportProgress { processed: 0, total: 0 }.percent(), 100.0);
    }

    #[test]
    fn test_cell_serialize_echo() {
        let cells = vec![
            CellValue::Empty,
            CellValue::Text("a".to_string()),
            CellValue::Number(2.0),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[null,"a",2.0]"#);
    }
}
