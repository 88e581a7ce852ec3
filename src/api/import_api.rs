// ==========================================
// 员工名录系统 - 导入API
// ==========================================
// 职责: 封装批量导入、模板下载、名录导出
// 约定: 文件级错误只返回一次；行级错误全部收集在响应中
// ==========================================

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::api::error::ApiResult;
use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::employee::Employee;
use crate::domain::import::RowError;
use crate::i18n::t_with_args;
use crate::importer::employee_importer_trait::{EmployeeImporter, ProgressCallback};
use crate::importer::template;
use crate::importer::EmployeeImporterImpl;
use crate::repository::employee_repo::EmployeeRepository;

/// 导入API响应
#[derive(Debug, Clone, Serialize)]
pub struct ImportApiResponse {
    /// 批次ID
    pub batch_id: String,
    /// 数据行总数（不含表头与空行）
    pub total: usize,
    /// 成功写入数
    pub success: usize,
    /// 行级错误（按行号升序）
    pub errors: Vec<RowError>,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u64,
    /// 成功提示
    pub message: String,
    /// 错误提示（无错误时为空）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// 导入API
pub struct ImportApi<R, C>
where
    R: EmployeeRepository,
    C: ImportConfigReader,
{
    importer: EmployeeImporterImpl<R, C>,
}

impl<R, C> ImportApi<R, C>
where
    R: EmployeeRepository,
    C: ImportConfigReader,
{
    /// 使用默认解析器与映射器
    pub fn new(repo: R, config: C) -> Self {
        Self {
            importer: EmployeeImporterImpl::with_defaults(repo, config),
        }
    }

    pub fn with_importer(importer: EmployeeImporterImpl<R, C>) -> Self {
        Self { importer }
    }

    /// 导入员工数据
    ///
    /// # 参数
    /// - file_path: .xlsx / .xls / .ods / .csv
    /// - progress: 每行处理后回调
    ///
    /// 完成后调用方需重新加载名录
    pub async fn import_employees(
        &self,
        file_path: &Path,
        progress: Option<&ProgressCallback>,
    ) -> ApiResult<ImportApiResponse> {
        let report = self.importer.import_file(file_path, progress).await?;

        let success = report.summary.success.to_string();
        let message = t_with_args("import.completed", &[("count", success.as_str())]);
        let error_message = (!report.summary.errors.is_empty()).then(|| {
            let count = report.summary.error_count().to_string();
            t_with_args("import.completed_with_errors", &[("count", count.as_str())])
        });

        Ok(ImportApiResponse {
            batch_id: report.batch_id,
            total: report.summary.total,
            success: report.summary.success,
            errors: report.summary.errors,
            elapsed_ms: u64::try_from(report.elapsed_time.as_millis()).unwrap_or(u64::MAX),
            message,
            error_message,
        })
    }

    /// 写出导入模板（表头 + 示例行）
    pub fn download_template(&self, output_path: &Path) -> ApiResult<()> {
        template::write_rows(output_path, &template::template_rows())?;
        info!(path = %output_path.display(), "导入模板已生成");
        Ok(())
    }

    /// 导出已加载的名录（与导入布局一致，可直接回导）
    pub fn export_directory(&self, output_path: &Path, employees: &[Employee]) -> ApiResult<usize> {
        template::write_rows(output_path, &template::export_rows(employees))?;
        info!(path = %output_path.display(), count = employees.len(), "名录已导出");
        Ok(employees.len())
    }
}
