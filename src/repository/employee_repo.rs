// ==========================================
// 员工名录系统 - 员工 Repository Trait
// ==========================================
// 职责: 外部持久化协作者的接口（记录级 CRUD + 条件查询）
// 红线: Repository 不含业务规则（必填校验在映射/表单层完成）
// ==========================================

use crate::domain::employee::{Employee, EmployeeDraft, EmployeeField};
use crate::domain::types::SortDirection;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::sync::Arc;

// ==========================================
// 查询条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeFilter {
    /// 字段文本完全相等
    Eq { field: EmployeeField, value: String },
    /// 字段文本包含（大小写不敏感）
    Contains { field: EmployeeField, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: EmployeeField,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(field: EmployeeField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: EmployeeField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

// ==========================================
// EmployeeRepository Trait
// ==========================================
// 实现者: SqliteEmployeeRepository
// 约定: 每次调用独立完成，不提供跨调用事务；不重试
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// 条件查询
    ///
    /// # 参数
    /// - filter: None 表示全部
    /// - order_by: None 表示按创建顺序
    async fn select(
        &self,
        filter: Option<EmployeeFilter>,
        order_by: Option<OrderBy>,
    ) -> RepositoryResult<Vec<Employee>>;

    /// 按 ID 查询
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Employee>>;

    /// 新增记录（ID 由持久化层生成）
    async fn insert(&self, draft: EmployeeDraft) -> RepositoryResult<Employee>;

    /// 整体替换记录的全部字段
    ///
    /// # 返回
    /// - Err(NotFound): ID 不存在
    async fn update(&self, id: &str, draft: EmployeeDraft) -> RepositoryResult<Employee>;

    /// 删除记录
    ///
    /// # 返回
    /// - Err(NotFound): ID 不存在
    async fn delete(&self, id: &str) -> RepositoryResult<()>;

    /// 记录总数
    async fn count(&self) -> RepositoryResult<usize>;
}

// 共享实例（导入器与单条操作共用同一仓储）
#[async_trait]
impl<R> EmployeeRepository for Arc<R>
where
    R: EmployeeRepository + ?Sized,
{
    async fn select(
        &self,
        filter: Option<EmployeeFilter>,
        order_by: Option<OrderBy>,
    ) -> RepositoryResult<Vec<Employee>> {
        (**self).select(filter, order_by).await
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Employee>> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, draft: EmployeeDraft) -> RepositoryResult<Employee> {
        (**self).insert(draft).await
    }

    async fn update(&self, id: &str, draft: EmployeeDraft) -> RepositoryResult<Employee> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        (**self).delete(id).await
    }

    async fn count(&self) -> RepositoryResult<usize> {
        (**self).count().await
    }
}
