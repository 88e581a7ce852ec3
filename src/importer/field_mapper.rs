// ==========================================
// 员工名录系统 - 字段映射器实现
// ==========================================
// 职责: 位置列 → 员工字段 + 必填校验 + 可选字段规范化
// 布局: EmployeeField::IMPORT_COLUMNS（15 列，超出部分忽略）
// ==========================================

use crate::domain::employee::{EmployeeDraft, EmployeeField};
use crate::domain::import::{CellValue, RawRow, RowValidation};
use crate::i18n::t_with_args;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::employee_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait, MappingOptions,
};
use crate::importer::error::ImportResult;

pub struct FieldMapper {
    cleaner: Box<dyn DataCleanerTrait>,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(Box::new(DataCleaner))
    }
}

impl FieldMapper {
    pub fn new(cleaner: Box<dyn DataCleanerTrait>) -> Self {
        Self { cleaner }
    }

    fn cell<'a>(row: &'a RawRow, field: EmployeeField) -> Option<&'a CellValue> {
        field.import_index().map(|idx| row.cell(idx))
    }

    fn text(&self, row: &RawRow, field: EmployeeField) -> Option<String> {
        Self::cell(row, field).and_then(|c| self.cleaner.normalize_text(c))
    }

    fn date(
        &self,
        row: &RawRow,
        field: EmployeeField,
        options: &MappingOptions,
    ) -> Option<chrono::NaiveDate> {
        Self::cell(row, field).and_then(|c| self.cleaner.normalize_date(c, &options.date_formats))
    }

    /// 必填缺失时的行错误
    fn missing_required(row: &RawRow, missing: Vec<EmployeeField>) -> RowValidation {
        let labels: Vec<String> = missing.iter().map(|f| f.label()).collect();
        let fields = labels.join(", ");
        let error = t_with_args("import.missing_required", &[("fields", fields.as_str())]);

        RowValidation::Invalid {
            row_number: row.row_number,
            error,
            missing_fields: missing,
            raw: row.cells.clone(),
        }
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_row(&self, row: &RawRow, options: &MappingOptions) -> ImportResult<RowValidation> {
        use EmployeeField as F;

        // 必填字段：全部检查后统一报告，不做后续规范化
        let required = (
            self.text(row, F::Name),
            self.text(row, F::Registration),
            self.text(row, F::Cpf),
            self.text(row, F::Specialty),
            self.text(row, F::Phone),
            self.text(row, F::Unit),
        );

        let (name, registration, cpf, specialty, phone, unit) = match required {
            (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)) => (a, b, c, d, e, f),
            (a, b, c, d, e, f) => {
                let present = [
                    a.is_some(),
                    b.is_some(),
                    c.is_some(),
                    d.is_some(),
                    e.is_some(),
                    f.is_some(),
                ];
                let missing = F::REQUIRED
                    .iter()
                    .zip(present)
                    .filter(|(_, ok)| !ok)
                    .map(|(field, _)| *field)
                    .collect();
                return Ok(Self::missing_required(row, missing));
            }
        };

        let gender = Self::cell(row, F::Gender).and_then(|c| self.cleaner.normalize_gender(c));

        let employee = EmployeeDraft {
            name,
            registration,
            cpf,
            specialty,
            phone,
            unit,
            email: self.text(row, F::Email),
            network_login: self.text(row, F::NetworkLogin),
            date_of_birth: self.date(row, F::DateOfBirth, options),
            admission_date: self.date(row, F::AdmissionDate, options),
            gender,
            coordination: self.text(row, F::Coordination),
            contract: self.text(row, F::Contract),
            work_schedule: self.text(row, F::WorkSchedule),
            photo: self.text(row, F::Photo),
        };

        Ok(RowValidation::Valid {
            row_number: row.row_number,
            employee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Gender;
    use crate::i18n::tests::LOCALE_TEST_LOCK;
    use chrono::NaiveDate;

    const FULL_ROW: [&str; 15] = [
        "João Silva",
        "12345",
        "123.456.789-00",
        "Desenvolvedor",
        "(11) 99999-9999",
        "TI",
        "joao@empresa.com",
        "joao.silva",
        "1990-01-15",
        "Masculino",
        "2023-01-01",
        "Coordenação TI",
        "CLT",
        "Segunda a Sexta - 9h às 18h",
        "https://exemplo.com/foto.jpg",
    ];

    fn map(texts: &[&str]) -> RowValidation {
        FieldMapper::default()
            .map_row(&RawRow::from_texts(2, texts), &MappingOptions::default())
            .unwrap()
    }

    #[test]
    fn test_map_full_row() {
        match map(&FULL_ROW) {
            RowValidation::Valid { row_number, employee } => {
                assert_eq!(row_number, 2);
                assert_eq!(employee.name, "João Silva");
                assert_eq!(employee.email.as_deref(), Some("joao@empresa.com"));
                assert_eq!(employee.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 15));
                assert_eq!(employee.admission_date, NaiveDate::from_ymd_opt(2023, 1, 1));
                assert_eq!(employee.gender, Some(Gender::M));
                assert_eq!(employee.photo.as_deref(), Some("https://exemplo.com/foto.jpg"));
            }
            other => panic!("expected valid row, got {:?}", other),
        }
    }

    #[test]
    fn test_required_only_gives_absent_optionals() {
        let row = ["Ana", "1", "000", "Dev", "123", "RH", "", "  ", "", "", "", "", "", "", ""];
        match map(&row) {
            RowValidation::Valid { employee, .. } => {
                assert_eq!(
                    employee,
                    EmployeeDraft::required("Ana", "1", "000", "Dev", "123", "RH")
                );
            }
            other => panic!("expected valid row, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_is_valid_when_required_present() {
        assert!(map(&["Ana", "1", "000", "Dev", "123", "RH"]).is_valid());
    }

    #[test]
    fn test_missing_required_lists_every_missing_field() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        crate::i18n::set_locale("pt-BR");

        let row = ["", "12345", "  ", "Dev", "123", ""];
        match map(&row) {
            RowValidation::Invalid {
                row_number,
                error,
                missing_fields,
                raw,
            } => {
                assert_eq!(row_number, 2);
                assert_eq!(
                    missing_fields,
                    vec![EmployeeField::Name, EmployeeField::Cpf, EmployeeField::Unit]
                );
                assert_eq!(error, "Campos obrigatórios faltando: Nome, CPF, Unidade");
                assert_eq!(raw.len(), 6);
            }
            other => panic!("expected invalid row, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_optionals_become_absent() {
        let mut row = FULL_ROW;
        row[8] = "ontem";
        row[9] = "outro";
        row[10] = "31/02/2023";
        match map(&row) {
            RowValidation::Valid { employee, .. } => {
                assert_eq!(employee.date_of_birth, None);
                assert_eq!(employee.gender, None);
                assert_eq!(employee.admission_date, None);
            }
            other => panic!("expected valid row, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_cells_are_coerced() {
        let row = RawRow::new(
            7,
            vec![
                CellValue::Text("Maria".to_string()),
                CellValue::Number(54321.0),
                CellValue::Text("cpf".to_string()),
                CellValue::Text("QA".to_string()),
                CellValue::Number(11987654321.0),
                CellValue::Text("RH".to_string()),
                CellValue::Empty,
                CellValue::Empty,
                CellValue::DateSerial(44927.0),
            ],
        );
        let result = FieldMapper::default()
            .map_row(&row, &MappingOptions::default())
            .unwrap();
        match result {
            RowValidation::Valid { row_number, employee } => {
                assert_eq!(row_number, 7);
                assert_eq!(employee.registration, "54321");
                assert_eq!(employee.phone, "11987654321");
                assert_eq!(employee.date_of_birth, NaiveDate::from_ymd_opt(2023, 1, 1));
            }
            other => panic!("expected valid row, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_columns_ignored() {
        let mut row: Vec<&str> = FULL_ROW.to_vec();
        row.push("extra");
        row.push("more");
        assert!(map(&row).is_valid());
    }
}
