// ==========================================
// 员工名录系统 - 员工导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 文件解析 → 行映射（清洗/规范化）→ 逐行落库 → 汇总
// ==========================================

use crate::domain::import::{
    CellValue, ImportProgress, ImportReport, ImportSummary, RawRow, RowOutcome, RowValidation,
};
use crate::domain::types::Gender;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

/// 进度回调（每处理完一行调用一次）
pub type ProgressCallback = dyn Fn(ImportProgress) + Send + Sync;

// ==========================================
// EmployeeImporter Trait
// ==========================================
// 用途: 员工批量导入主接口
// 实现者: EmployeeImporterImpl
#[async_trait]
pub trait EmployeeImporter: Send + Sync {
    /// 从表格文件导入员工数据
    ///
    /// # 参数
    /// - file_path: .xlsx / .xls / .ods / .csv
    /// - progress: 进度回调（可选）
    ///
    /// # 返回
    /// - Ok(ImportReport): 批次信息 + 汇总（含逐行错误）
    /// - Err: 文件级错误（不可读、格式不支持、无数据、超出行数上限）
    async fn import_file(
        &self,
        file_path: &Path,
        progress: Option<&ProgressCallback>,
    ) -> ImportResult<ImportReport>;

    /// 导入已解析的数据行
    ///
    /// # 说明
    /// - 严格顺序处理，每行至多一次持久化调用
    /// - 单行失败不会中止后续行
    async fn import_rows(
        &self,
        rows: Vec<RawRow>,
        progress: Option<&ProgressCallback>,
    ) -> ImportResult<ImportSummary>;

    /// 逐行处理，返回每行结果（import_rows 的展开形式）
    async fn process_rows(
        &self,
        rows: Vec<RawRow>,
        progress: Option<&ProgressCallback>,
    ) -> ImportResult<Vec<RowOutcome>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析首个工作表为原始数据行
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 非空白数据行（行号为源文件行号）
    /// - Err: 文件读取错误、格式错误
    fn parse_to_rows(&self, file_path: &Path, options: &ParseOptions) -> ImportResult<Vec<RawRow>>;
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// 跳过的表头行数
    pub header_rows: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { header_rows: 1 }
    }
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 行映射接口（阶段 1）
// 实现者: EmployeeFieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将按位置排列的原始行映射为员工草稿
    ///
    /// # 返回
    /// - Ok(RowValidation::Valid): 必填齐全，可选字段已规范化
    /// - Ok(RowValidation::Invalid): 必填缺失（消息列出全部缺失字段）
    /// - Err: 映射过程异常（归类为意外错误）
    fn map_row(&self, row: &RawRow, options: &MappingOptions) -> ImportResult<RowValidation>;
}

/// 映射选项
#[derive(Debug, Clone)]
pub struct MappingOptions {
    /// 文本日期格式（按顺序尝试）
    pub date_formats: Vec<String>,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            date_formats: crate::config::import_config_trait::defaults::TEXT_DATE_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗与规范化接口
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 文本规范化（转文本 + TRIM，空 → None）
    fn normalize_text(&self, cell: &CellValue) -> Option<String>;

    /// 性别规范化（M / F / None，不报错）
    fn normalize_gender(&self, cell: &CellValue) -> Option<Gender>;

    /// 日期规范化
    ///
    /// # 规则
    /// - 数值: 1900 日期系统序列号
    /// - 文本: 按 formats 顺序解析
    /// - 无法解析 → None（导入路径上不致命）
    fn normalize_date(&self, cell: &CellValue, formats: &[String]) -> Option<NaiveDate>;
}
