// ==========================================
// 员工名录系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）, DefaultImportConfig
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取表头行数（数据行之前跳过的行数）
    ///
    /// # 默认值
    /// - 1
    async fn get_header_rows(&self) -> ImportResult<usize>;

    /// 获取单次导入的最大数据行数
    ///
    /// # 默认值
    /// - 5000
    ///
    /// # 用途
    /// - 超出上限视为文件级错误，整批不导入
    async fn get_max_import_rows(&self) -> ImportResult<usize>;

    /// 获取文本日期可接受的格式列表（按顺序尝试）
    ///
    /// # 默认值
    /// - ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%B %d, %Y", "%B %d %Y", "%d %B %Y"]
    /// - 斜杠日期按 月/日/年 解读，与表格程序导出的文本一致
    async fn get_text_date_formats(&self) -> ImportResult<Vec<String>>;

    /// 获取用户可见消息的语言
    ///
    /// # 默认值
    /// - "pt-BR"
    async fn get_locale(&self) -> ImportResult<String>;
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const HEADER_ROWS: usize = 1;
    pub const MAX_IMPORT_ROWS: usize = 5_000;
    pub const TEXT_DATE_FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%Y/%m/%d",
        "%B %d, %Y",
        "%B %d %Y",
        "%d %B %Y",
    ];
    pub const LOCALE: &str = "pt-BR";
}

// ==========================================
// DefaultImportConfig - 内置默认配置
// ==========================================
// 用途: 无数据库配置时（测试 / 纯文件校验）
#[derive(Debug, Clone, Default)]
pub struct DefaultImportConfig;

#[async_trait]
impl ImportConfigReader for DefaultImportConfig {
    async fn get_header_rows(&self) -> ImportResult<usize> {
        Ok(defaults::HEADER_ROWS)
    }

    async fn get_max_import_rows(&self) -> ImportResult<usize> {
        Ok(defaults::MAX_IMPORT_ROWS)
    }

    async fn get_text_date_formats(&self) -> ImportResult<Vec<String>> {
        Ok(defaults::TEXT_DATE_FORMATS
            .iter()
            .map(|f| f.to_string())
            .collect())
    }

    async fn get_locale(&self) -> ImportResult<String> {
        Ok(defaults::LOCALE.to_string())
    }
}

// 共享实例（导入器与 CLI 共用同一配置管理器）
#[async_trait]
impl<C> ImportConfigReader for std::sync::Arc<C>
where
    C: ImportConfigReader + ?Sized,
{
    async fn get_header_rows(&self) -> ImportResult<usize> {
        (**self).get_header_rows().await
    }

    async fn get_max_import_rows(&self) -> ImportResult<usize> {
        (**self).get_max_import_rows().await
    }

    async fn get_text_date_formats(&self) -> ImportResult<Vec<String>> {
        (**self).get_text_date_formats().await
    }

    async fn get_locale(&self) -> ImportResult<String> {
        (**self).get_locale().await
    }
}
