// ==========================================
// 员工名录系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 性别规范化 / 日期规范化
// 原则: 可选字段规范化失败一律降级为 None，不产生行错误
// ==========================================

use crate::domain::import::CellValue;
use crate::domain::types::Gender;
use crate::importer::employee_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{Days, NaiveDate};

/// 1900 日期系统中最大的有效序列号（9999-12-31）
const MAX_SERIAL: f64 = 2_958_465.0;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_text(&self, cell: &CellValue) -> Option<String> {
        self.normalize_null(cell.as_text())
    }

    fn normalize_gender(&self, cell: &CellValue) -> Option<Gender> {
        cell.as_text().and_then(|v| Gender::normalize(&v))
    }

    fn normalize_date(&self, cell: &CellValue, formats: &[String]) -> Option<NaiveDate> {
        match cell {
            CellValue::Number(n) | CellValue::DateSerial(n) => excel_serial_to_date(*n),
            CellValue::DateIso(s) | CellValue::Text(s) => parse_date_text(s, formats),
            CellValue::Empty | CellValue::Bool(_) | CellValue::Error(_) => None,
        }
    }
}

impl DataCleaner {
    /// 标准化 NULL 值（空字符串/空白 → None）
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }
}

/// 表格日期序列号 → 日历日期（1900 日期系统）
///
/// # 规则
/// - 小数部分（时间）舍去
/// - 序列号 60 对应不存在的 1900-02-29 → None
/// - 60 之前的序列号以 1899-12-31 为第 0 天，之后以 1899-12-30 为第 0 天
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL {
        return None;
    }

    let days = serial.floor() as u64;
    let epoch = match days {
        60 => return None,
        d if d < 60 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    epoch.checked_add_days(Days::new(days))
}

/// 文本日期解析
///
/// # 顺序
/// 1. formats 中的格式逐个尝试
/// 2. ISO 日期时间前缀（"2023-01-01T08:00:00" 等）
/// 3. 纯数字文本按序列号处理（CSV 导出的表格日期）
fn parse_date_text(value: &str, formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }

    if let Some(prefix) = value.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }

    value.parse::<f64>().ok().and_then(excel_serial_to_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::import_config_trait::defaults::TEXT_DATE_FORMATS;

    fn formats() -> Vec<String> {
        TEXT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_normalize_text() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.normalize_text(&CellValue::Text("  João  ".to_string())),
            Some("João".to_string())
        );
        assert_eq!(cleaner.normalize_text(&CellValue::Text("   ".to_string())), None);
        assert_eq!(cleaner.normalize_text(&CellValue::Empty), None);
        assert_eq!(
            cleaner.normalize_text(&CellValue::Number(12345.0)),
            Some("12345".to_string())
        );
    }

    #[test]
    fn test_normalize_gender_cells() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.normalize_gender(&CellValue::Text("Feminino".to_string())),
            Some(Gender::F)
        );
        assert_eq!(cleaner.normalize_gender(&CellValue::Number(1.0)), None);
        assert_eq!(cleaner.normalize_gender(&CellValue::Empty), None);
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(44927.0), ymd(2023, 1, 1));
        assert_eq!(excel_serial_to_date(44927.75), ymd(2023, 1, 1));
        assert_eq!(excel_serial_to_date(1.0), ymd(1900, 1, 1));
        assert_eq!(excel_serial_to_date(59.0), ymd(1900, 2, 28));
        assert_eq!(excel_serial_to_date(60.0), None);
        assert_eq!(excel_serial_to_date(61.0), ymd(1900, 3, 1));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(-5.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(1e12), None);
    }

    #[test]
    fn test_normalize_date_text() {
        let cleaner = DataCleaner;
        let f = formats();
        let text = |s: &str| CellValue::Text(s.to_string());

        assert_eq!(cleaner.normalize_date(&text("1990-01-15"), &f), ymd(1990, 1, 15));
        assert_eq!(cleaner.normalize_date(&text("01/15/1990"), &f), ymd(1990, 1, 15));
        assert_eq!(cleaner.normalize_date(&text("1990/01/15"), &f), ymd(1990, 1, 15));
        assert_eq!(
            cleaner.normalize_date(&text("2023-01-01T08:30:00"), &f),
            ymd(2023, 1, 1)
        );
        assert_eq!(cleaner.normalize_date(&text("44927"), &f), ymd(2023, 1, 1));
        assert_eq!(cleaner.normalize_date(&text("not a date"), &f), None);
        assert_eq!(cleaner.normalize_date(&text("2023-02-30"), &f), None);
        assert_eq!(cleaner.normalize_date(&CellValue::Empty, &f), None);
    }

    #[test]
    fn test_slashed_dates_read_month_first() {
        let cleaner = DataCleaner;
        let f = formats();
        let text = |s: &str| CellValue::Text(s.to_string());

        assert_eq!(cleaner.normalize_date(&text("05/03/1990"), &f), ymd(1990, 5, 3));
        assert_eq!(cleaner.normalize_date(&text("5/3/1990"), &f), ymd(1990, 5, 3));
        // 第一段超过 12 不是合法月份
        assert_eq!(cleaner.normalize_date(&text("15/01/1990"), &f), None);
    }

    #[test]
    fn test_month_name_dates() {
        let cleaner = DataCleaner;
        let f = formats();
        let text = |s: &str| CellValue::Text(s.to_string());

        assert_eq!(cleaner.normalize_date(&text("January 15, 1990"), &f), ymd(1990, 1, 15));
        assert_eq!(cleaner.normalize_date(&text("Jan 15, 1990"), &f), ymd(1990, 1, 15));
        assert_eq!(cleaner.normalize_date(&text("March 3 1985"), &f), ymd(1985, 3, 3));
        assert_eq!(cleaner.normalize_date(&text("15 January 1990"), &f), ymd(1990, 1, 15));
    }

    #[test]
    fn test_normalize_date_cells() {
        let cleaner = DataCleaner;
        let f = formats();
        assert_eq!(
            cleaner.normalize_date(&CellValue::DateSerial(44927.0), &f),
            ymd(2023, 1, 1)
        );
        assert_eq!(
            cleaner.normalize_date(&CellValue::DateIso("2023-01-01T00:00:00".to_string()), &f),
            ymd(2023, 1, 1)
        );
        assert_eq!(cleaner.normalize_date(&CellValue::Bool(true), &f), None);
    }

    #[test]
    fn test_iso_round_trip() {
        let cleaner = DataCleaner;
        let f = formats();
        let date = cleaner
            .normalize_date(&CellValue::Text("2000-02-29".to_string()), &f)
            .unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2000-02-29");
    }
}
