// ==========================================
// 员工名录系统 - 员工 API
// ==========================================
// 职责: 单条新增 / 编辑 / 删除 / 查询
// 约定: 成功后整体重新加载名录；失败立即返回单个错误，内存记录集不变
//       写入已提交后重新加载失败只记日志，不改变操作结果
// ==========================================

use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{EmployeeFormSchema, EmployeeInput};
use crate::domain::employee::{Employee, EmployeeField};
use crate::repository::employee_repo::EmployeeRepository;
use crate::view::directory::{DirectoryViewModel, SortState};

/// 员工API
///
/// 持有唯一的名录视图模型，所有写操作经由此处
pub struct EmployeeApi<R>
where
    R: EmployeeRepository,
{
    directory: DirectoryViewModel<R>,
}

impl<R> EmployeeApi<R>
where
    R: EmployeeRepository,
{
    pub fn new(repo: R) -> Self {
        Self {
            directory: DirectoryViewModel::new(repo),
        }
    }

    /// 从持久化层重新加载名录（导入完成后也需调用）
    pub async fn refresh(&mut self) -> ApiResult<()> {
        self.directory.reload().await?;
        Ok(())
    }

    /// 新增员工
    ///
    /// # 返回
    /// - Err(ValidationError): 表单校验失败，未调用持久化层
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&mut self, input: EmployeeInput) -> ApiResult<Employee> {
        let draft = EmployeeFormSchema::validate(&input).map_err(|violations| {
            warn!(violations = violations.len(), "表单校验失败");
            ApiError::ValidationError { violations }
        })?;

        let employee = self.directory.repo().insert(draft).await?;
        info!(id = %employee.id, "员工已创建");

        self.reload_after_write().await;
        Ok(employee)
    }

    /// 整体替换员工全部字段
    #[instrument(skip(self, input))]
    pub async fn update(&mut self, id: &str, input: EmployeeInput) -> ApiResult<Employee> {
        let draft = EmployeeFormSchema::validate(&input)
            .map_err(|violations| ApiError::ValidationError { violations })?;

        let employee = self.directory.repo().update(id, draft).await?;
        info!(id = %employee.id, "员工已更新");

        self.reload_after_write().await;
        Ok(employee)
    }

    /// 删除员工
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: &str) -> ApiResult<()> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("员工ID不能为空".to_string()));
        }

        self.directory.repo().delete(id).await?;
        info!(id, "员工已删除");

        self.reload_after_write().await;
        Ok(())
    }

    // 写入已成功，重新加载失败时保留上一次的记录集，等待下一次 refresh
    async fn reload_after_write(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "写入后重新加载名录失败");
        }
    }

    /// 按 ID 查询（直接读持久化层）
    pub async fn get(&self, id: &str) -> ApiResult<Employee> {
        self.directory
            .repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Employee(id={})不存在", id)))
    }

    /// 当前查询与排序下的可见记录
    pub fn list(&self) -> Vec<&Employee> {
        self.directory.visible()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.directory.set_query(query);
    }

    pub fn toggle_sort(&mut self, field: EmployeeField) -> SortState {
        self.directory.toggle_sort(field)
    }

    /// 已加载记录数
    pub fn count(&self) -> usize {
        self.directory.state().len()
    }

    pub fn directory(&self) -> &DirectoryViewModel<R> {
        &self.directory
    }
}
