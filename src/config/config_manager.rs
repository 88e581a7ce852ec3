// ==========================================
// 员工名录系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、快照
// 存储: config_kv 表 (scope_id + key → value)
// ==========================================

use crate::config::import_config_trait::{defaults, ImportConfigReader};
use crate::db::open_sqlite_connection;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（建表幂等）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
            crate::db::init_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::debug!(config_key = key, "配置已写入");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON 对象，键有序）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名的 global 配置，快照中不存在的键保持不变
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> RepositoryResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)
            .map_err(|e| RepositoryError::ValidationError(format!("快照格式错误: {}", e)))?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 读取配置值（读取失败转为 ImportError::ConfigReadError）
    fn get_config_or_default(&self, key: &str, default: &str) -> ImportResult<String> {
        self.get_global_config_value(key)
            .map(|v| v.unwrap_or_else(|| default.to_string()))
            .map_err(|e| ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn get_usize_config(&self, key: &str, default: usize) -> ImportResult<usize> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        value
            .trim()
            .parse::<usize>()
            .map_err(|e| ImportError::ConfigValueError {
                key: key.to_string(),
                value: value.clone(),
                message: e.to_string(),
            })
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_header_rows(&self) -> ImportResult<usize> {
        self.get_usize_config(config_keys::IMPORT_HEADER_ROWS, defaults::HEADER_ROWS)
    }

    async fn get_max_import_rows(&self) -> ImportResult<usize> {
        self.get_usize_config(config_keys::IMPORT_MAX_ROWS, defaults::MAX_IMPORT_ROWS)
    }

    async fn get_text_date_formats(&self) -> ImportResult<Vec<String>> {
        let default = defaults::TEXT_DATE_FORMATS.join(",");
        let value = self.get_config_or_default(config_keys::IMPORT_DATE_FORMATS, &default)?;

        let formats: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if formats.is_empty() {
            tracing::warn!(
                config_key = config_keys::IMPORT_DATE_FORMATS,
                raw_value = %value,
                "日期格式配置为空，使用默认值"
            );
            Ok(defaults::TEXT_DATE_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect())
        } else {
            Ok(formats)
        }
    }

    async fn get_locale(&self) -> ImportResult<String> {
        self.get_config_or_default(config_keys::LOCALE, defaults::LOCALE)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const IMPORT_HEADER_ROWS: &str = "import_header_rows";
    pub const IMPORT_MAX_ROWS: &str = "import_max_rows";
    pub const IMPORT_DATE_FORMATS: &str = "import_date_formats"; // 逗号分隔

    // 界面
    pub const LOCALE: &str = "locale";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let cm = manager();
        assert_eq!(cm.get_header_rows().await.unwrap(), 1);
        assert_eq!(cm.get_max_import_rows().await.unwrap(), 5000);
        assert_eq!(cm.get_locale().await.unwrap(), "pt-BR");
        assert_eq!(cm.get_text_date_formats().await.unwrap()[0], "%Y-%m-%d");
    }

    #[tokio::test]
    async fn test_override_and_invalid_value() {
        let cm = manager();
        cm.set_global_config_value(config_keys::IMPORT_MAX_ROWS, "10")
            .unwrap();
        assert_eq!(cm.get_max_import_rows().await.unwrap(), 10);

        cm.set_global_config_value(config_keys::IMPORT_HEADER_ROWS, "abc")
            .unwrap();
        let err = cm.get_header_rows().await.unwrap_err();
        assert!(matches!(err, ImportError::ConfigValueError { .. }));
    }

    #[test]
    fn test_snapshot_restore() {
        let cm = manager();
        cm.set_global_config_value(config_keys::LOCALE, "en").unwrap();
        cm.set_global_config_value(config_keys::IMPORT_MAX_ROWS, "42")
            .unwrap();
        let snapshot = cm.get_config_snapshot().unwrap();
        assert_eq!(snapshot, r#"{"import_max_rows":"42","locale":"en"}"#);

        cm.set_global_config_value(config_keys::LOCALE, "zh-CN").unwrap();
        let restored = cm.restore_config_from_snapshot(&snapshot).unwrap();
        assert_eq!(restored, 2);
        assert_eq!(
            cm.get_global_config_value(config_keys::LOCALE).unwrap(),
            Some("en".to_string())
        );
    }

    #[test]
    fn test_restore_rejects_malformed_snapshot() {
        let cm = manager();
        let err = cm.restore_config_from_snapshot("not json").unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }
}
