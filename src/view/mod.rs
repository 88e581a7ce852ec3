// ==========================================
// 员工名录系统 - 视图模型层
// ==========================================
// 职责: 已加载记录集的内存过滤 / 排序（同步重算，无索引）
// ==========================================

pub mod directory;

pub use directory::{
    filter_employees, sort_employees, visible_employees, DirectoryState, DirectoryViewModel,
    SortState,
};
