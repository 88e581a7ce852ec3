// ==========================================
// 员工名录系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,列名仅来自 EmployeeField
// ==========================================

pub mod employee_repo;
pub mod employee_repo_impl;
pub mod error;

// 重导出核心仓储
pub use employee_repo::{EmployeeFilter, EmployeeRepository, OrderBy};
pub use employee_repo_impl::SqliteEmployeeRepository;
pub use error::{RepositoryError, RepositoryResult};
