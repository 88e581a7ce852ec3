// ==========================================
// 员工名录系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xlsm/.xls) / OpenDocument (.ods) / CSV (.csv)
// 约定: 仅读取首个工作表；行号为源文件中的 1 起行号
// ==========================================

use crate::domain::import::{CellValue, RawRow};
use crate::importer::employee_importer_trait::{FileParser, ParseOptions};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

/// 可导入的文件扩展名（小写）
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "ods", "csv"];

/// 校验文件扩展名，返回小写扩展名
///
/// # 返回
/// - Ok(ext): 受支持的扩展名
/// - Err(UnsupportedFormat): 无扩展名或不在支持列表中
pub fn supported_extension(path: &Path) -> ImportResult<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ImportError::UnsupportedFormat(if ext.is_empty() {
            path.display().to_string()
        } else {
            format!(".{}", ext)
        }))
    }
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 根据首行判断分隔符（';' 多于 ',' 时使用 ';'）
    fn sniff_delimiter(content: &[u8]) -> u8 {
        let first_line = content
            .split(|b| *b == b'\n')
            .next()
            .unwrap_or_default();

        let mut in_quotes = false;
        let (mut commas, mut semicolons) = (0usize, 0usize);
        for b in first_line {
            match *b {
                b'"' => in_quotes = !in_quotes,
                b',' if !in_quotes => commas += 1,
                b';' if !in_quotes => semicolons += 1,
                _ => {}
            }
        }

        if semicolons > commas {
            b';'
        } else {
            b','
        }
    }
}

impl FileParser for CsvParser {
    fn parse_to_rows(&self, file_path: &Path, options: &ParseOptions) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let content = std::fs::read(file_path)?;
        let content = content
            .strip_prefix(b"\xEF\xBB\xBF")
            .unwrap_or(&content);
        let delimiter = Self::sniff_delimiter(content);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .delimiter(delimiter)
            .from_reader(content);

        let mut rows = Vec::new();
        for (idx, result) in reader.byte_records().enumerate() {
            let record = result?;
            if idx < options.header_rows {
                continue;
            }

            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);

            let cells = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(String::from_utf8_lossy(field).into_owned())
                    }
                })
                .collect();

            let row = RawRow::new(row_number, cells);
            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        debug!(
            file = %file_path.display(),
            delimiter = %(delimiter as char),
            rows = rows.len(),
            "CSV 解析完成"
        );
        Ok(rows)
    }
}

// ==========================================
// Excel / ODS Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::DateSerial(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::DateIso(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_rows(&self, file_path: &Path, options: &ParseOptions) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ImportError::NoWorksheet)?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 已用区域起点（0 起）；左侧空列补齐以保持列位置
        let (start_row, start_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows = Vec::new();
        for (idx, data_row) in range.rows().enumerate() {
            if idx < options.header_rows {
                continue;
            }

            let mut cells = vec![CellValue::Empty; start_col];
            cells.extend(data_row.iter().map(Self::convert_cell));

            let row = RawRow::new(start_row + idx + 1, cells);
            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        debug!(
            file = %file_path.display(),
            sheet = %sheet_name,
            rows = rows.len(),
            "工作表解析完成"
        );
        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_rows(&self, file_path: &Path, options: &ParseOptions) -> ImportResult<Vec<RawRow>> {
        match supported_extension(file_path)?.as_str() {
            "csv" => CsvParser.parse_to_rows(file_path, options),
            _ => ExcelParser.parse_to_rows(file_path, options),
        }
    }
}
