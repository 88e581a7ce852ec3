// ==========================================
// 员工名录系统 - 导入层
// ==========================================
// 职责: 表格文件 → 校验后的员工草稿 → 逐行持久化
// 支持: Excel (.xlsx/.xls), ODS, CSV；模板与名录导出
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod employee_importer_impl;
pub mod employee_importer_trait;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod template;

// 重导出核心类型
pub use data_cleaner::{excel_serial_to_date, DataCleaner as DataCleanerImpl};
pub use employee_importer_impl::EmployeeImporterImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{supported_extension, CsvParser, ExcelParser, UniversalFileParser};

// 重导出 Trait 接口
pub use employee_importer_trait::{
    DataCleaner, EmployeeImporter, FieldMapper, FileParser, MappingOptions, ParseOptions,
    ProgressCallback,
};
