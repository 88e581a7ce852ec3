// ==========================================
// 员工名录系统 - 模板 / 导出集成测试
// ==========================================
// 覆盖: 模板可直接导入；名录导出后回导字段一致
// ==========================================


use chrono::NaiveDate;
use employee_directory::api::ImportApi;
use employee_directory::config::DefaultImportConfig;
use employee_directory::domain::{EmployeeDraft, Gender};
use employee_directory::repository::EmployeeRepository;

fn full_draft() -> EmployeeDraft {
    let mut draft = EmployeeDraft::required(
        "João Silva",
        "12345",
        "123.456.789-00",
        "Desenvolvedor",
        "(11) 99999-9999",
        "TI",
    );
    draft.email = Some("joao@empresa.com".to_string());
    draft.date_of_birth = NaiveDate::from_ymd_opt(1990, 1, 15);
    draft.gender = Some(Gender::M);
    draft.admission_date = NaiveDate::from_ymd_opt(2023, 1, 1);
    draft.contract = Some("CLT".to_string());
    draft
}

#[tokio::test]
async fn test_template_imports_example_row() {
    let (_db, repo) = test_helpers::create_test_repo();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("modelo_funcionarios.xlsx");

    let api = ImportApi::new(repo.clone(), DefaultImportConfig);
    api.download_template(&path).unwrap();

    let response = api.import_employees(&path, None).await.unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.success, 1);
    assert!(response.errors.is_empty());
    assert!(response.error_message.is_none());

    let stored = repo.select(None, None).await.unwrap();
    assert_eq!(stored[0].to_draft().name, "João Silva");
    assert_eq!(stored[0].gender, Some(Gender::M));
    assert_eq!(stored[0].admission_date, NaiveDate::from_ymd_opt(2023, 1, 1));
}

#[tokio::test]
async fn test_export_round_trip() {
    for ext in ["xlsx", "csv"] {
        let (_src_db, source) = test_helpers::create_test_repo();
        source.insert(full_draft()).await.unwrap();
        source
            .insert(EmployeeDraft::required("Maria", "2", "000", "RH", "123", "RH"))
            .await
            .unwrap();
        let records = source.select(None, None).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("diretorio.{}", ext));
        let exported = ImportApi::new(source.clone(), DefaultImportConfig)
            .export_directory(&path, &records)
            .unwrap();
        assert_eq!(exported, 2);

        let (_dst_db, target) = test_helpers::create_test_repo();
        let response = ImportApi::new(target.clone(), DefaultImportConfig)
            .import_employees(&path, None)
            .await
            .unwrap();
        assert_eq!(response.success, 2, "格式: {}", ext);

        let imported = target.select(None, None).await.unwrap();
        let drafts: Vec<EmployeeDraft> = imported.iter().map(|e| e.to_draft()).collect();
        let expected: Vec<EmployeeDraft> = records.iter().map(|e| e.to_draft()).collect();
        assert_eq!(drafts, expected, "格式: {}", ext);
    }
}

#[tokio::test]
async fn test_import_response_messages() {
    let _guard = test_helpers::lock_locale();
    employee_directory::i18n::set_locale("pt-BR");

    let (_db, repo) = test_helpers::create_test_repo();
    let file = test_helpers::write_csv(&[
        test_helpers::csv_row("Ana", "1", "TI"),
        test_helpers::csv_row("", "2", "TI"),
    ]);

    let response = ImportApi::new(repo, DefaultImportConfig)
        .import_employees(file.path(), None)
        .await
        .unwrap();

    assert_eq!(response.message, "1 funcionários importados com sucesso");
    assert_eq!(
        response.error_message.as_deref(),
        Some("1 registros com erro. Verifique o relatório.")
    );
}
