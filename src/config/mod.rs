// ==========================================
// 员工名录系统 - 配置层
// ==========================================
// 职责: 导入参数、界面语言、数据库位置
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

use std::path::PathBuf;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{DefaultImportConfig, ImportConfigReader};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "EMPLOYEE_DIRECTORY_DB_PATH";

/// 解析默认数据库路径
///
/// # 优先级
/// 1. 环境变量 EMPLOYEE_DIRECTORY_DB_PATH
/// 2. 用户数据目录/employee-directory/employee_directory.db（目录不存在则创建）
/// 3. 当前目录 ./employee_directory.db
pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(data_dir) = dirs::data_dir() {
        let app_dir = data_dir.join("employee-directory");
        match std::fs::create_dir_all(&app_dir) {
            Ok(()) => return app_dir.join("employee_directory.db"),
            Err(e) => tracing::warn!(
                path = %app_dir.display(),
                error = %e,
                "无法创建数据目录，回退到当前目录"
            ),
        }
    }

    PathBuf::from("employee_directory.db")
}
