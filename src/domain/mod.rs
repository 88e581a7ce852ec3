// ==========================================
// 员工名录系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入中间产物
// 红线: 不含数据访问逻辑,不含文件解析逻辑
// ==========================================

pub mod employee;
pub mod import;
pub mod types;

// 重导出核心类型
pub use employee::{Employee, EmployeeDraft, EmployeeField};
pub use import::{
    CellValue, ImportProgress, ImportReport, ImportSummary, RawRow, RowError, RowErrorKind,
    RowOutcome, RowValidation,
};
pub use types::{Gender, SortDirection};
