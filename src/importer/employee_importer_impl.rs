// ==========================================
// 员工名录系统 - 员工批量导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到持久化
// 流程: 扩展名校验 → 解析 → 逐行（映射 → 插入）→ 汇总
// 约束: 严格顺序，每行至多一次插入，不重试，不提前中止
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::{
    CellValue, ImportProgress, ImportReport, ImportSummary, RawRow, RowError, RowErrorKind,
    RowOutcome, RowValidation,
};
use crate::i18n::t_with_args;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::employee_importer_trait::{
    EmployeeImporter, FieldMapper, FileParser, MappingOptions, ParseOptions, ProgressCallback,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as EmployeeFieldMapper;
use crate::importer::file_parser::{supported_extension, UniversalFileParser};
use crate::repository::EmployeeRepository;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// EmployeeImporterImpl - 员工批量导入器实现
// ==========================================
pub struct EmployeeImporterImpl<R, C>
where
    R: EmployeeRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    employee_repo: R,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
}

impl<R, C> EmployeeImporterImpl<R, C>
where
    R: EmployeeRepository,
    C: ImportConfigReader,
{
    /// 创建新的 EmployeeImporter 实例
    ///
    /// # 参数
    /// - employee_repo: 员工仓储（持久化协作者）
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - field_mapper: 行映射器
    pub fn new(
        employee_repo: R,
        config: C,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            employee_repo,
            config,
            file_parser,
            field_mapper,
        }
    }

    /// 使用标准组件（按扩展名选择解析器 + 默认清洗器）
    pub fn with_defaults(employee_repo: R, config: C) -> Self {
        Self::new(
            employee_repo,
            config,
            Box::new(UniversalFileParser),
            Box::new(EmployeeFieldMapper::new(Box::new(DataCleaner))),
        )
    }

    async fn mapping_options(&self) -> ImportResult<MappingOptions> {
        Ok(MappingOptions {
            date_formats: self.config.get_text_date_formats().await?,
        })
    }

    /// 处理单行（不向上抛错，所有失败都转为行结果）
    async fn process_row(&self, row: RawRow, options: &MappingOptions) -> RowOutcome {
        let row_number = row.row_number;

        let validation = match self.field_mapper.map_row(&row, options) {
            Ok(v) => v,
            Err(e) => {
                error!(row_number, error = %e, "行映射异常");
                let message = e.to_string();
                return RowOutcome::UnexpectedError(row_error(
                    row_number,
                    RowErrorKind::Unexpected,
                    t_with_args("import.unexpected_error", &[("message", message.as_str())]),
                    row.cells,
                ));
            }
        };

        let employee = match validation {
            RowValidation::Valid { employee, .. } => employee,
            RowValidation::Invalid { error, raw, .. } => {
                debug!(row_number, error = %error, "行校验失败");
                return RowOutcome::ValidationError(row_error(
                    row_number,
                    RowErrorKind::Validation,
                    error,
                    raw,
                ));
            }
        };

        match self.employee_repo.insert(employee).await {
            Ok(saved) => RowOutcome::Success {
                row: row_number,
                id: saved.id,
            },
            Err(e) if e.is_backend_rejection() => {
                warn!(row_number, error = %e, "行写入被拒绝");
                let message = e.backend_message();
                RowOutcome::PersistenceError(row_error(
                    row_number,
                    RowErrorKind::Persistence,
                    t_with_args("import.persistence_error", &[("message", message.as_str())]),
                    row.cells,
                ))
            }
            Err(e) => {
                error!(row_number, error = %e, "行写入异常");
                let message = e.backend_message();
                RowOutcome::UnexpectedError(row_error(
                    row_number,
                    RowErrorKind::Unexpected,
                    t_with_args("import.unexpected_error", &[("message", message.as_str())]),
                    row.cells,
                ))
            }
        }
    }
}

fn row_error(row: usize, kind: RowErrorKind, error: String, data: Vec<CellValue>) -> RowError {
    RowError {
        row,
        kind,
        error,
        data,
    }
}

#[async_trait::async_trait]
impl<R, C> EmployeeImporter for EmployeeImporterImpl<R, C>
where
    R: EmployeeRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, file_path, progress), fields(batch_id))]
    async fn import_file(
        &self,
        file_path: &Path,
        progress: Option<&ProgressCallback>,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        info!(batch_id = %batch_id, file_path = %file_path.display(), "开始导入员工数据");

        // === 步骤 1: 文件类型校验（读取前）===
        supported_extension(file_path)?;

        // === 步骤 2: 解析文件 ===
        let parse_options = ParseOptions {
            header_rows: self.config.get_header_rows().await?,
        };
        let rows = self
            .file_parser
            .parse_to_rows(file_path, &parse_options)
            .map_err(|e| {
                error!(error = %e, "文件解析失败");
                e
            })?;

        let total_rows = rows.len();
        info!(total_rows, "文件解析完成");

        if rows.is_empty() {
            warn!("文件无有效数据行");
            return Err(ImportError::EmptyFile);
        }

        let max_rows = self.config.get_max_import_rows().await?;
        if total_rows > max_rows {
            warn!(total_rows, max_rows, "数据行超出上限");
            return Err(ImportError::TooManyRows {
                actual: total_rows,
                limit: max_rows,
            });
        }

        // === 步骤 3: 逐行导入 ===
        let summary = self.import_rows(rows, progress).await?;

        let elapsed_time = start_time.elapsed();
        info!(
            batch_id = %batch_id,
            total = summary.total,
            success = summary.success,
            errors = summary.error_count(),
            elapsed_ms = elapsed_time.as_millis() as u64,
            "员工数据导入完成"
        );

        Ok(ImportReport {
            batch_id,
            file_name: file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            summary,
            elapsed_time,
        })
    }

    async fn import_rows(
        &self,
        rows: Vec<RawRow>,
        progress: Option<&ProgressCallback>,
    ) -> ImportResult<ImportSummary> {
        let total = rows.len();
        let outcomes = self.process_rows(rows, progress).await?;
        Ok(outcomes
            .into_iter()
            .fold(ImportSummary::new(total), ImportSummary::record))
    }

    #[instrument(skip(self, rows, progress), fields(total_rows = rows.len()))]
    async fn process_rows(
        &self,
        rows: Vec<RawRow>,
        progress: Option<&ProgressCallback>,
    ) -> ImportResult<Vec<RowOutcome>> {
        let total = rows.len();
        let options = self.mapping_options().await?;

        let mut outcomes = Vec::with_capacity(total);
        for (idx, row) in rows.into_iter().enumerate() {
            let outcome = self.process_row(row, &options).await;
            outcomes.push(outcome);

            if let Some(report) = progress {
                report(ImportProgress {
                    processed: idx + 1,
                    total,
                });
            }
        }

        debug!(
            success = outcomes.iter().filter(|o| o.is_success()).count(),
            failed = outcomes.iter().filter(|o| !o.is_success()).count(),
            "逐行处理完成"
        );
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultImportConfig;
    use crate::domain::employee::{Employee, EmployeeDraft};
    use crate::repository::{EmployeeFilter, OrderBy, RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    // 记录调用次数的内存仓储；名称为 "REJECT" 的草稿被拒绝
    #[derive(Default)]
    struct RecordingRepo {
        inserted: Mutex<Vec<EmployeeDraft>>,
    }

    #[async_trait]
    impl EmployeeRepository for RecordingRepo {
        async fn select(
            &self,
            _filter: Option<EmployeeFilter>,
            _order_by: Option<OrderBy>,
        ) -> RepositoryResult<Vec<Employee>> {
            Ok(vec![])
        }

        async fn find_by_id(&self, _id: &str) -> RepositoryResult<Option<Employee>> {
            Ok(None)
        }

        async fn insert(&self, draft: EmployeeDraft) -> RepositoryResult<Employee> {
            if draft.name == "REJECT" {
                return Err(RepositoryError::ConstraintViolation(
                    "value too long".to_string(),
                ));
            }
            if draft.name == "BOOM" {
                return Err(RepositoryError::LockError("poisoned".to_string()));
            }
            let mut inserted = self.inserted.lock().unwrap();
            inserted.push(draft.clone());
            Ok(Employee::from_draft(format!("id-{}", inserted.len()), draft))
        }

        async fn update(&self, _id: &str, _draft: EmployeeDraft) -> RepositoryResult<Employee> {
            unimplemented!()
        }

        async fn delete(&self, _id: &str) -> RepositoryResult<()> {
            unimplemented!()
        }

        async fn count(&self) -> RepositoryResult<usize> {
            Ok(self.inserted.lock().unwrap().len())
        }
    }

    fn row(n: usize, name: &str) -> RawRow {
        RawRow::from_texts(n, &[name, "1", "000", "Dev", "123", "TI"])
    }

    #[tokio::test]
    async fn test_outcomes_follow_row_order_without_abort() {
        let importer = EmployeeImporterImpl::with_defaults(RecordingRepo::default(), DefaultImportConfig);
        let rows = vec![
            row(2, "Ana"),
            row(3, ""),
            row(4, "REJECT"),
            row(5, "BOOM"),
            row(6, "Bia"),
        ];

        let outcomes = importer.process_rows(rows, None).await.unwrap();

        assert_eq!(outcomes.len(), 5);
        assert!(matches!(outcomes[0], RowOutcome::Success { row: 2, .. }));
        assert!(matches!(outcomes[1], RowOutcome::ValidationError(ref e) if e.row == 3));
        assert!(matches!(outcomes[2], RowOutcome::PersistenceError(ref e) if e.row == 4));
        assert!(matches!(outcomes[3], RowOutcome::UnexpectedError(ref e) if e.row == 5));
        assert!(matches!(outcomes[4], RowOutcome::Success { row: 6, .. }));
        assert_eq!(importer.employee_repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_persistence_error_keeps_backend_message() {
        let importer = EmployeeImporterImpl::with_defaults(RecordingRepo::default(), DefaultImportConfig);
        let summary = importer
            .import_rows(vec![row(2, "REJECT")], None)
            .await
            .unwrap();

        assert_eq!(summary.success, 0);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].kind, RowErrorKind::Persistence);
        assert!(summary.errors[0].error.contains("value too long"));
        assert_eq!(summary.errors[0].data.len(), 6);
    }

    #[tokio::test]
    async fn test_progress_monotonic_and_complete() {
        let importer = EmployeeImporterImpl::with_defaults(RecordingRepo::default(), DefaultImportConfig);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = move |p: ImportProgress| sink.lock().unwrap().push(p.percent());

        importer
            .import_rows(vec![row(2, "A"), row(3, ""), row(4, "C"), row(5, "D")], Some(&callback))
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![25.0, 50.0, 75.0, 100.0]);
    }

    #[tokio::test]
    async fn test_import_file_rejects_unsupported_extension_before_reading() {
        let importer = EmployeeImporterImpl::with_defaults(RecordingRepo::default(), DefaultImportConfig);
        let err = importer
            .import_file(Path::new("/definitely/missing/file.pdf"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }
}
