// ==========================================
// 员工名录系统 - 核心库
// ==========================================
// 职责: 表格导入校验 / 持久化接缝 / 名录视图模型
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 外部持久化协作者
pub mod repository;

// 导入层 - 表格文件
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 视图模型层 - 名录过滤/排序
pub mod view;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{Employee, EmployeeDraft, EmployeeField, Gender, SortDirection};

// 导入
pub use importer::{EmployeeImporter, EmployeeImporterImpl, ImportError};

// 仓储
pub use repository::{EmployeeRepository, RepositoryError, SqliteEmployeeRepository};

// 视图模型
pub use view::{DirectoryState, DirectoryViewModel, SortState};

// API
pub use api::{ApiError, EmployeeApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Diretório de Funcionários";
