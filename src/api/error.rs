// ==========================================
// 员工名录系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将仓储/导入错误转换为面向用户的错误消息
// 约定: 单条操作失败时只返回一个 ApiError，内存记录集不变
// ==========================================

use crate::domain::employee::EmployeeField;
use crate::i18n::{t, t_with_args};
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 输入错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 表单校验失败（带逐字段原因）
    #[error("表单校验失败: {}", summarize(.violations))]
    ValidationError { violations: Vec<ValidationViolation> },

    // ===== 数据访问错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ===== 导入错误 =====
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn summarize(violations: &[ValidationViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ConstraintViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换（文件级错误，本地化后呈现一次）
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => {
                ApiError::ImportError(t_with_args("import.file_not_found", &[("path", path.as_str())]))
            }
            ImportError::UnsupportedFormat(ext) => {
                ApiError::ImportError(t_with_args("import.unsupported_format", &[("ext", ext.as_str())]))
            }
            ImportError::EmptyFile => ApiError::ImportError(t("import.empty_file")),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 校验违规详情
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationViolation {
    /// 违规字段
    pub field: EmployeeField,
    /// 本地化原因
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::tests::LOCALE_TEST_LOCK;

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err: ApiError = RepositoryError::NotFound {
            entity: "Employee".to_string(),
            id: "x".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg.contains("x")));
    }

    #[test]
    fn test_backend_message_kept() {
        let err: ApiError =
            RepositoryError::ConstraintViolation("NOT NULL constraint failed".to_string()).into();
        assert_eq!(err.to_string(), "数据库错误: NOT NULL constraint failed");
    }

    #[test]
    fn test_import_error_localized() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        crate::i18n::set_locale("pt-BR");

        let err: ApiError = ImportError::EmptyFile.into();
        assert!(matches!(err, ApiError::ImportError(ref msg) if msg == "Arquivo vazio ou sem dados válidos"));

        let err: ApiError = ImportError::UnsupportedFormat(".pdf".to_string()).into();
        assert!(matches!(err, ApiError::ImportError(ref msg) if msg.contains(".pdf")));
    }

    #[test]
    fn test_validation_error_display_joins_messages() {
        let err = ApiError::ValidationError {
            violations: vec![
                ValidationViolation {
                    field: EmployeeField::Name,
                    message: "a".to_string(),
                },
                ValidationViolation {
                    field: EmployeeField::Email,
                    message: "b".to_string(),
                },
            ],
        };
        assert_eq!(err.to_string(), "表单校验失败: a; b");
    }
}
