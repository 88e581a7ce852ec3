// ==========================================
// 员工名录系统 - 名录视图模型
// ==========================================
// 职责: 持有唯一的内存记录集（读穿缓存），提供过滤 / 排序视图
// 约定: 每次成功的写操作后整体丢弃并重新加载，不做增量合并
// ==========================================

use crate::domain::employee::{Employee, EmployeeField};
use crate::domain::types::SortDirection;
use crate::repository::employee_repo::EmployeeRepository;
use crate::repository::error::RepositoryResult;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, instrument};

// ==========================================
// DirectoryState - 版本化记录容器
// ==========================================
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectoryState {
    records: Vec<Employee>,
    version: u64,
}

impl DirectoryState {
    pub fn new(records: Vec<Employee>) -> Self {
        Self {
            records,
            version: 1,
        }
    }

    /// 整体替换记录集，版本号递增
    pub fn replace(&mut self, records: Vec<Employee>) {
        self.records = records;
        self.version += 1;
    }

    pub fn records(&self) -> &[Employee] {
        &self.records
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// SortState - 单键排序状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub field: EmployeeField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: EmployeeField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    /// 点击列头: 同一列翻转方向，新列重置为升序
    pub fn toggle(current: Option<SortState>, field: EmployeeField) -> SortState {
        match current {
            Some(state) if state.field == field => SortState {
                field,
                direction: state.direction.toggled(),
            },
            _ => SortState::new(field),
        }
    }
}

// ==========================================
// 视图函数
// ==========================================

/// 过滤: 任一字段文本包含查询串（大小写不敏感）；空查询返回全部且保持顺序
pub fn filter_employees<'a>(records: &'a [Employee], query: &str) -> Vec<&'a Employee> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|employee| {
            EmployeeField::ALL.iter().any(|field| {
                employee
                    .field_text(*field)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
        .collect()
}

/// 排序: 缺失值按空串比较；不保证相等键的相对顺序
pub fn sort_employees(records: &mut [&Employee], sort: SortState) {
    records.sort_unstable_by(|a, b| {
        let left = a.field_text(sort.field).unwrap_or_default();
        let right = b.field_text(sort.field).unwrap_or_default();
        let ordering: Ordering = left.cmp(&right);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// 过滤后排序（无排序状态时保持加载顺序）
pub fn visible_employees<'a>(
    state: &'a DirectoryState,
    query: &str,
    sort: Option<SortState>,
) -> Vec<&'a Employee> {
    let mut visible = filter_employees(state.records(), query);
    if let Some(sort) = sort {
        sort_employees(&mut visible, sort);
    }
    visible
}

// ==========================================
// DirectoryViewModel - 名录视图模型
// ==========================================
pub struct DirectoryViewModel<R>
where
    R: EmployeeRepository,
{
    repo: R,
    state: DirectoryState,
    query: String,
    sort: Option<SortState>,
}

impl<R> DirectoryViewModel<R>
where
    R: EmployeeRepository,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: DirectoryState::default(),
            query: String::new(),
            sort: None,
        }
    }

    /// 从持久化层整体重新加载（按创建顺序）
    ///
    /// 失败时保留原记录集
    #[instrument(skip(self))]
    pub async fn reload(&mut self) -> RepositoryResult<()> {
        let records = self.repo.select(None, None).await?;
        self.state.replace(records);
        debug!(
            count = self.state.len(),
            version = self.state.version(),
            "名录已重新加载"
        );
        Ok(())
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn toggle_sort(&mut self, field: EmployeeField) -> SortState {
        let next = SortState::toggle(self.sort, field);
        self.sort = Some(next);
        next
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// 当前查询与排序下的可见记录
    pub fn visible(&self) -> Vec<&Employee> {
        visible_employees(&self.state, &self.query, self.sort)
    }
}
