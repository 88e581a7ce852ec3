// ==========================================
// 员工名录系统 - API 层
// ==========================================
// 职责: 面向呈现层（CLI）的业务接口
// ==========================================

pub mod employee_api;
pub mod error;
pub mod import_api;
pub mod validator;

// 重导出核心类型
pub use employee_api::EmployeeApi;
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use import_api::{ImportApi, ImportApiResponse};
pub use validator::{EmployeeFormSchema, EmployeeInput, FieldConstraint};
