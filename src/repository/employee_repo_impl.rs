// ==========================================
// 员工名录系统 - 员工 Repository 实现
// ==========================================
// 职责: 基于 rusqlite 的 employees 表 CRUD
// 存储: 日期为 ISO 文本，性别为 "M"/"F"，审计列仅存在于库内
// 红线: 不在 await 点持有连接锁
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::employee::{Employee, EmployeeDraft, EmployeeField};
use crate::domain::types::Gender;
use crate::repository::employee_repo::{EmployeeFilter, EmployeeRepository, OrderBy};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "id, name, registration, cpf, specialty, phone, unit, email, \
     network_login, date_of_birth, admission_date, gender, coordination, contract, \
     work_schedule, photo";

// ==========================================
// SqliteEmployeeRepository
// ==========================================
pub struct SqliteEmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEmployeeRepository {
    /// 创建新的 Repository 实例（建表幂等）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与 ConfigManager 共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 共享底层连接
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
        let gender: Option<String> = row.get(11)?;
        Ok(Employee {
            id: row.get(0)?,
            name: row.get(1)?,
            registration: row.get(2)?,
            cpf: row.get(3)?,
            specialty: row.get(4)?,
            phone: row.get(5)?,
            unit: row.get(6)?,
            email: row.get(7)?,
            network_login: row.get(8)?,
            date_of_birth: row.get(9)?,
            admission_date: row.get(10)?,
            gender: gender.as_deref().and_then(Gender::from_code),
            coordination: row.get(12)?,
            contract: row.get(13)?,
            work_schedule: row.get(14)?,
            photo: row.get(15)?,
        })
    }

    /// 字段对应的 SQL 表达式（性别/日期已是文本存储）
    fn column(field: EmployeeField) -> &'static str {
        field.column_name()
    }

    fn build_select(
        filter: Option<&EmployeeFilter>,
        order_by: Option<&OrderBy>,
    ) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {} FROM employees", SELECT_COLUMNS);
        let mut args: Vec<Value> = Vec::new();

        match filter {
            Some(EmployeeFilter::Eq { field, value }) => {
                sql.push_str(&format!(" WHERE {} = ?1", Self::column(*field)));
                args.push(Value::Text(value.clone()));
            }
            Some(EmployeeFilter::Contains { field, value }) => {
                sql.push_str(&format!(
                    " WHERE instr(lower(COALESCE({}, '')), lower(?1)) > 0",
                    Self::column(*field)
                ));
                args.push(Value::Text(value.clone()));
            }
            None => {}
        }

        match order_by {
            Some(order) => sql.push_str(&format!(
                " ORDER BY {} {}, rowid",
                Self::column(order.field),
                order.direction.as_sql()
            )),
            None => sql.push_str(" ORDER BY created_at, rowid"),
        }

        (sql, args)
    }
}

#[async_trait]
impl EmployeeRepository for SqliteEmployeeRepository {
    async fn select(
        &self,
        filter: Option<EmployeeFilter>,
        order_by: Option<OrderBy>,
    ) -> RepositoryResult<Vec<Employee>> {
        let (sql, args) = Self::build_select(filter.as_ref(), order_by.as_ref());
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map(params_from_iter(args), Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(count = employees.len(), "员工查询完成");
        Ok(employees)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let employee = conn
            .query_row(
                &format!("SELECT {} FROM employees WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(employee)
    }

    async fn insert(&self, draft: EmployeeDraft) -> RepositoryResult<Employee> {
        let id = Uuid::new_v4().to_string();
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO employees (
                id, name, registration, cpf, specialty, phone, unit, email,
                network_login, date_of_birth, admission_date, gender, coordination,
                contract, work_schedule, photo
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                id,
                draft.name,
                draft.registration,
                draft.cpf,
                draft.specialty,
                draft.phone,
                draft.unit,
                draft.email,
                draft.network_login,
                draft.date_of_birth,
                draft.admission_date,
                draft.gender.map(|g| g.to_string()),
                draft.coordination,
                draft.contract,
                draft.work_schedule,
                draft.photo,
            ],
        )?;

        info!(employee_id = %id, "员工记录已新增");
        Ok(Employee::from_draft(id, draft))
    }

    async fn update(&self, id: &str, draft: EmployeeDraft) -> RepositoryResult<Employee> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"
            UPDATE employees SET
                name = ?2, registration = ?3, cpf = ?4, specialty = ?5, phone = ?6,
                unit = ?7, email = ?8, network_login = ?9, date_of_birth = ?10,
                admission_date = ?11, gender = ?12, coordination = ?13, contract = ?14,
                work_schedule = ?15, photo = ?16, updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                draft.name,
                draft.registration,
                draft.cpf,
                draft.specialty,
                draft.phone,
                draft.unit,
                draft.email,
                draft.network_login,
                draft.date_of_birth,
                draft.admission_date,
                draft.gender.map(|g| g.to_string()),
                draft.coordination,
                draft.contract,
                draft.work_schedule,
                draft.photo,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: id.to_string(),
            });
        }

        info!(employee_id = %id, "员工记录已更新");
        Ok(Employee::from_draft(id.to_string(), draft))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM employees WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: id.to_string(),
            });
        }

        info!(employee_id = %id, "员工记录已删除");
        Ok(())
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn repo() -> SqliteEmployeeRepository {
        let conn = Connection::open_in_memory().unwrap();
        SqliteEmployeeRepository::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    fn draft(name: &str, unit: &str) -> EmployeeDraft {
        EmployeeDraft::required(name, "1", "000", "Dev", "123", unit)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = repo();
        let mut d = draft("João Silva", "TI");
        d.date_of_birth = NaiveDate::from_ymd_opt(1990, 1, 15);
        d.gender = Some(Gender::M);

        let saved = repo.insert(d.clone()).await.unwrap();
        assert!(Uuid::parse_str(&saved.id).is_ok());

        let found = repo.find_by_id(&saved.id).await.unwrap().unwrap();
        assert_eq!(found, saved);
        assert_eq!(found.to_draft(), d);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_same_draft_twice_creates_two_records() {
        let repo = repo();
        let a = repo.insert(draft("Ana", "RH")).await.unwrap();
        let b = repo.insert(draft("Ana", "RH")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let repo = repo();
        let mut d = draft("Ana", "RH");
        d.email = Some("ana@empresa.com".to_string());
        let saved = repo.insert(d).await.unwrap();

        let replacement = draft("Ana Souza", "TI");
        let updated = repo.update(&saved.id, replacement.clone()).await.unwrap();
        assert_eq!(updated.id, saved.id);

        let found = repo.find_by_id(&saved.id).await.unwrap().unwrap();
        assert_eq!(found.to_draft(), replacement);
        assert_eq!(found.email, None);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id() {
        let repo = repo();
        let err = repo.update("missing", draft("A", "B")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));

        let err = repo.delete("missing").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo();
        let saved = repo.insert(draft("Ana", "RH")).await.unwrap();
        repo.delete(&saved.id).await.unwrap();
        assert!(repo.find_by_id(&saved.id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_select_filter_and_order() {
        let repo = repo();
        repo.insert(draft("Maria Santos", "RH")).await.unwrap();
        repo.insert(draft("João Silva", "TI")).await.unwrap();
        repo.insert(draft("Carlos Lima", "TI")).await.unwrap();

        // 默认按创建顺序
        let all = repo.select(None, None).await.unwrap();
        let names: Vec<_> = all.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Maria Santos", "João Silva", "Carlos Lima"]);

        let ti = repo
            .select(
                Some(EmployeeFilter::Eq {
                    field: EmployeeField::Unit,
                    value: "TI".to_string(),
                }),
                Some(OrderBy::asc(EmployeeField::Name)),
            )
            .await
            .unwrap();
        let names: Vec<_> = ti.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Carlos Lima", "João Silva"]);

        let contains = repo
            .select(
                Some(EmployeeFilter::Contains {
                    field: EmployeeField::Name,
                    value: "SANTOS".to_string(),
                }),
                Some(OrderBy::desc(EmployeeField::Name)),
            )
            .await
            .unwrap();
        assert_eq!(contains.len(), 1);
        assert_eq!(contains[0].name, "Maria Santos");
    }
}
