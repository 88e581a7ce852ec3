// ==========================================
// 员工名录系统 - 命令行入口
// ==========================================
// 职责: 呈现层适配（参数解析 → API 调用 → JSON 输出）
// ==========================================

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use employee_directory::api::{EmployeeApi, ImportApi};
use employee_directory::config::{default_db_path, ConfigManager, ImportConfigReader, DB_PATH_ENV};
use employee_directory::domain::{EmployeeField, ImportProgress};
use employee_directory::i18n::{self, t, t_with_args};
use employee_directory::importer::ProgressCallback;
use employee_directory::repository::SqliteEmployeeRepository;
use employee_directory::{db, logging};

/// 员工名录命令行工具
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite 数据库路径
    #[arg(long, global = true, env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// 界面语言（pt-BR / en / zh-CN），默认读取配置
    #[arg(long, global = true)]
    locale: Option<String>,

    /// 输出 JSON 格式日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出员工（可过滤、排序）
    List {
        /// 任意字段包含的文本（大小写不敏感）
        #[arg(long)]
        query: Option<String>,
        /// 排序字段（如 name / unit / admission_date）
        #[arg(long, value_parser = parse_field)]
        sort: Option<EmployeeField>,
        /// 降序
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// 从 .xlsx / .xls / .ods / .csv 批量导入
    Import { file: PathBuf },
    /// 生成导入模板（.xlsx / .csv）
    Template { file: PathBuf },
    /// 导出名录（.xlsx / .csv，可直接回导）
    Export { file: PathBuf },
    /// 删除员工
    Delete { id: String },
    /// 输出配置快照（JSON）
    ConfigSnapshot,
}

fn parse_field(value: &str) -> Result<EmployeeField, String> {
    EmployeeField::from_column_name(value).ok_or_else(|| format!("未知字段: {}", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = args.db.clone().unwrap_or_else(default_db_path);
    let db_path = db_path
        .to_str()
        .ok_or_else(|| anyhow!("数据库路径不是有效的 UTF-8: {}", db_path.display()))?
        .to_string();
    tracing::info!(db_path = %db_path, version = employee_directory::VERSION, "使用数据库");

    // 仓储与配置共用同一连接
    let conn = db::open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    let conn = Arc::new(Mutex::new(conn));
    let repo = Arc::new(SqliteEmployeeRepository::from_connection(conn.clone())?);
    let config = Arc::new(ConfigManager::from_connection(conn)?);

    let locale = match args.locale {
        Some(locale) => locale,
        None => config.get_locale().await?,
    };
    i18n::set_locale(&locale);

    let mut employees = EmployeeApi::new(repo.clone());

    match args.command {
        Command::List { query, sort, desc } => {
            employees.refresh().await?;
            if let Some(query) = query {
                employees.set_query(query);
            }
            if let Some(field) = sort {
                employees.toggle_sort(field);
                if desc {
                    employees.toggle_sort(field);
                }
            }
            let count = employees.count().to_string();
            eprintln!("{}", t_with_args("employee.count", &[("count", count.as_str())]));
            println!("{}", serde_json::to_string_pretty(&employees.list())?);
        }
        Command::Import { file } => {
            let importer = ImportApi::new(repo, config);
            let progress: &ProgressCallback = &|p: ImportProgress| {
                tracing::debug!(processed = p.processed, total = p.total, "导入进度");
            };
            let response = importer.import_employees(&file, Some(progress)).await?;
            employees.refresh().await?;

            eprintln!("{}", response.message);
            if let Some(error_message) = &response.error_message {
                eprintln!("{}", error_message);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Template { file } => {
            ImportApi::new(repo, config).download_template(&file)?;
            eprintln!("{}", t("common.success"));
        }
        Command::Export { file } => {
            employees.refresh().await?;
            let exported = ImportApi::new(repo, config)
                .export_directory(&file, employees.directory().state().records())?;
            let count = exported.to_string();
            eprintln!("{}", t_with_args("employee.count", &[("count", count.as_str())]));
        }
        Command::Delete { id } => {
            employees.delete(&id).await?;
            eprintln!("{}", t("employee.deleted"));
        }
        Command::ConfigSnapshot => {
            println!("{}", config.get_config_snapshot()?);
        }
    }

    Ok(())
}
