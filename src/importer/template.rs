// ==========================================
// 员工名录系统 - 导入模板 / 名录导出
// ==========================================
// 职责: 生成 15 列布局的表头 + 数据行，写出为 .xlsx / .csv
// 约定: 列顺序与 EmployeeField::IMPORT_COLUMNS 一致（导出文件可直接回导）
// ==========================================

use crate::domain::employee::{Employee, EmployeeField};
use crate::i18n::t;
use crate::importer::error::{ImportError, ImportResult};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::info;

/// 模板示例行
pub const TEMPLATE_EXAMPLE_ROW: [&str; 15] = [
    "João Silva",
    "12345",
    "123.456.789-00",
    "Desenvolvedor",
    "(11) 99999-9999",
    "TI",
    "joao@empresa.com",
    "joao.silva",
    "1990-01-15",
    "M",
    "2023-01-01",
    "Coordenação TI",
    "CLT",
    "Segunda a Sexta - 9h às 18h",
    "https://exemplo.com/foto.jpg",
];

/// 本地化表头行
pub fn header_row() -> Vec<String> {
    EmployeeField::IMPORT_COLUMNS
        .iter()
        .map(|f| f.label())
        .collect()
}

/// 模板内容：表头 + 一行示例
pub fn template_rows() -> Vec<Vec<String>> {
    vec![
        header_row(),
        TEMPLATE_EXAMPLE_ROW.iter().map(|s| s.to_string()).collect(),
    ]
}

/// 名录导出内容：表头 + 每名员工一行（缺失字段为空串）
pub fn export_rows(employees: &[Employee]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(employees.len() + 1);
    rows.push(header_row());
    rows.extend(employees.iter().map(|e| {
        EmployeeField::IMPORT_COLUMNS
            .iter()
            .map(|f| e.field_text(*f).unwrap_or_default())
            .collect()
    }));
    rows
}

// ==========================================
// 写出
// ==========================================

/// 按扩展名写出（.xlsx / .csv）
///
/// # 返回
/// - Err(UnsupportedFormat): 其他扩展名
pub fn write_rows(path: &Path, rows: &[Vec<String>]) -> ImportResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" => write_xlsx(path, rows)?,
        "csv" => write_csv(path, rows)?,
        _ => return Err(ImportError::UnsupportedFormat(format!(".{}", ext))),
    }

    info!(path = %path.display(), rows = rows.len(), "表格文件已写出");
    Ok(())
}

/// 写出单工作表 .xlsx（工作表名为本地化的 template.sheet_name）
pub fn write_xlsx(path: &Path, rows: &[Vec<String>]) -> ImportResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(t("template.sheet_name"))?;

    for (r, row) in rows.iter().enumerate() {
        let r = u32::try_from(r)
            .map_err(|_| ImportError::TemplateWriteError("行数超出工作表上限".to_string()))?;
        for (c, value) in row.iter().enumerate() {
            let c = u16::try_from(c)
                .map_err(|_| ImportError::TemplateWriteError("列数超出工作表上限".to_string()))?;
            if !value.is_empty() {
                worksheet.write_string(r, c, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// 写出 .csv（UTF-8，逗号分隔）
pub fn write_csv(path: &Path, rows: &[Vec<String>]) -> ImportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
