// ==========================================
// 员工名录系统 - 员工领域模型
// ==========================================
// 职责: 员工记录 / 待持久化草稿 / 字段元信息
// 对齐: employees 表 + 15 列导入模板
// ==========================================

use crate::domain::types::Gender;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Employee - 员工记录（已持久化）
// ==========================================
// 用途: 持久化层读写,名录视图只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    // ===== 主键（持久化层生成）=====
    pub id: String,

    // ===== 必填字段 =====
    pub name: String,
    pub registration: String, // 工号（不做唯一性约束）
    pub cpf: String,          // 自由文本，不做校验位校验
    pub specialty: String,
    pub phone: String,
    pub unit: String,

    // ===== 可选字段 =====
    pub email: Option<String>,
    pub network_login: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub coordination: Option<String>,
    pub contract: Option<String>,
    pub work_schedule: Option<String>,
    pub photo: Option<String>, // URL，不校验可达性
}

impl Employee {
    /// 由草稿和持久化层生成的 ID 构造记录
    pub fn from_draft(id: String, draft: EmployeeDraft) -> Self {
        Self {
            id,
            name: draft.name,
            registration: draft.registration,
            cpf: draft.cpf,
            specialty: draft.specialty,
            phone: draft.phone,
            unit: draft.unit,
            email: draft.email,
            network_login: draft.network_login,
            date_of_birth: draft.date_of_birth,
            admission_date: draft.admission_date,
            gender: draft.gender,
            coordination: draft.coordination,
            contract: draft.contract,
            work_schedule: draft.work_schedule,
            photo: draft.photo,
        }
    }

    /// 去掉 ID 得到可整体替换的草稿（编辑表单回填）
    pub fn to_draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            name: self.name.clone(),
            registration: self.registration.clone(),
            cpf: self.cpf.clone(),
            specialty: self.specialty.clone(),
            phone: self.phone.clone(),
            unit: self.unit.clone(),
            email: self.email.clone(),
            network_login: self.network_login.clone(),
            date_of_birth: self.date_of_birth,
            admission_date: self.admission_date,
            gender: self.gender,
            coordination: self.coordination.clone(),
            contract: self.contract.clone(),
            work_schedule: self.work_schedule.clone(),
            photo: self.photo.clone(),
        }
    }

    /// 字段的文本表示（过滤/排序/导出共用）
    ///
    /// # 返回
    /// - None: 可选字段缺失
    /// - 日期为 ISO 格式，性别为 "M"/"F"
    pub fn field_text(&self, field: EmployeeField) -> Option<String> {
        let date_text = |d: &Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());
        match field {
            EmployeeField::Id => Some(self.id.clone()),
            EmployeeField::Name => Some(self.name.clone()),
            EmployeeField::Registration => Some(self.registration.clone()),
            EmployeeField::Cpf => Some(self.cpf.clone()),
            EmployeeField::Specialty => Some(self.specialty.clone()),
            EmployeeField::Phone => Some(self.phone.clone()),
            EmployeeField::Unit => Some(self.unit.clone()),
            EmployeeField::Email => self.email.clone(),
            EmployeeField::NetworkLogin => self.network_login.clone(),
            EmployeeField::DateOfBirth => date_text(&self.date_of_birth),
            EmployeeField::Gender => self.gender.map(|g| g.to_string()),
            EmployeeField::AdmissionDate => date_text(&self.admission_date),
            EmployeeField::Coordination => self.coordination.clone(),
            EmployeeField::Contract => self.contract.clone(),
            EmployeeField::WorkSchedule => self.work_schedule.clone(),
            EmployeeField::Photo => self.photo.clone(),
        }
    }
}

// ==========================================
// EmployeeDraft - 待持久化的员工数据
// ==========================================
// 来源: 导入行映射 / 表单校验
// 生命周期: 持久化前（无 ID）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    pub registration: String,
    pub cpf: String,
    pub specialty: String,
    pub phone: String,
    pub unit: String,
    pub email: Option<String>,
    pub network_login: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub admission_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub coordination: Option<String>,
    pub contract: Option<String>,
    pub work_schedule: Option<String>,
    pub photo: Option<String>,
}

impl EmployeeDraft {
    /// 仅含必填字段的草稿
    pub fn required(
        name: impl Into<String>,
        registration: impl Into<String>,
        cpf: impl Into<String>,
        specialty: impl Into<String>,
        phone: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            registration: registration.into(),
            cpf: cpf.into(),
            specialty: specialty.into(),
            phone: phone.into(),
            unit: unit.into(),
            email: None,
            network_login: None,
            date_of_birth: None,
            admission_date: None,
            gender: None,
            coordination: None,
            contract: None,
            work_schedule: None,
            photo: None,
        }
    }

    pub fn field_text(&self, field: EmployeeField) -> Option<String> {
        let date_text = |d: &Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());
        match field {
            EmployeeField::Id => None,
            EmployeeField::Name => Some(self.name.clone()),
            EmployeeField::Registration => Some(self.registration.clone()),
            EmployeeField::Cpf => Some(self.cpf.clone()),
            EmployeeField::Specialty => Some(self.specialty.clone()),
            EmployeeField::Phone => Some(self.phone.clone()),
            EmployeeField::Unit => Some(self.unit.clone()),
            EmployeeField::Email => self.email.clone(),
            EmployeeField::NetworkLogin => self.network_login.clone(),
            EmployeeField::DateOfBirth => date_text(&self.date_of_birth),
            EmployeeField::Gender => self.gender.map(|g| g.to_string()),
            EmployeeField::AdmissionDate => date_text(&self.admission_date),
            EmployeeField::Coordination => self.coordination.clone(),
            EmployeeField::Contract => self.contract.clone(),
            EmployeeField::WorkSchedule => self.work_schedule.clone(),
            EmployeeField::Photo => self.photo.clone(),
        }
    }
}

// ==========================================
// EmployeeField - 字段枚举
// ==========================================
// 列顺序即导入/导出兼容契约
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeField {
    Id,
    Name,
    Registration,
    Cpf,
    Specialty,
    Phone,
    Unit,
    Email,
    NetworkLogin,
    DateOfBirth,
    Gender,
    AdmissionDate,
    Coordination,
    Contract,
    WorkSchedule,
    Photo,
}

impl EmployeeField {
    /// 所有字段（含 ID）
    pub const ALL: [EmployeeField; 16] = [
        EmployeeField::Id,
        EmployeeField::Name,
        EmployeeField::Registration,
        EmployeeField::Cpf,
        EmployeeField::Specialty,
        EmployeeField::Phone,
        EmployeeField::Unit,
        EmployeeField::Email,
        EmployeeField::NetworkLogin,
        EmployeeField::DateOfBirth,
        EmployeeField::Gender,
        EmployeeField::AdmissionDate,
        EmployeeField::Coordination,
        EmployeeField::Contract,
        EmployeeField::WorkSchedule,
        EmployeeField::Photo,
    ];

    /// 导入/导出的 15 列位置布局
    pub const IMPORT_COLUMNS: [EmployeeField; 15] = [
        EmployeeField::Name,
        EmployeeField::Registration,
        EmployeeField::Cpf,
        EmployeeField::Specialty,
        EmployeeField::Phone,
        EmployeeField::Unit,
        EmployeeField::Email,
        EmployeeField::NetworkLogin,
        EmployeeField::DateOfBirth,
        EmployeeField::Gender,
        EmployeeField::AdmissionDate,
        EmployeeField::Coordination,
        EmployeeField::Contract,
        EmployeeField::WorkSchedule,
        EmployeeField::Photo,
    ];

    /// 必填字段（均位于前 6 列）
    pub const REQUIRED: [EmployeeField; 6] = [
        EmployeeField::Name,
        EmployeeField::Registration,
        EmployeeField::Cpf,
        EmployeeField::Specialty,
        EmployeeField::Phone,
        EmployeeField::Unit,
    ];

    /// 数据库列名 / 命令行字段名
    pub fn column_name(self) -> &'static str {
        match self {
            EmployeeField::Id => "id",
            EmployeeField::Name => "name",
            EmployeeField::Registration => "registration",
            EmployeeField::Cpf => "cpf",
            EmployeeField::Specialty => "specialty",
            EmployeeField::Phone => "phone",
            EmployeeField::Unit => "unit",
            EmployeeField::Email => "email",
            EmployeeField::NetworkLogin => "network_login",
            EmployeeField::DateOfBirth => "date_of_birth",
            EmployeeField::Gender => "gender",
            EmployeeField::AdmissionDate => "admission_date",
            EmployeeField::Coordination => "coordination",
            EmployeeField::Contract => "contract",
            EmployeeField::WorkSchedule => "work_schedule",
            EmployeeField::Photo => "photo",
        }
    }

    /// 按列名解析（大小写不敏感）
    pub fn from_column_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }

    /// 在导入列布局中的位置（ID 不在布局中）
    pub fn import_index(self) -> Option<usize> {
        Self::IMPORT_COLUMNS.iter().position(|f| *f == self)
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// 本地化显示名（导入报错 / 模板表头）
    pub fn label(self) -> String {
        crate::i18n::t(&format!("field.{}", self.column_name()))
    }
}

impl fmt::Display for EmployeeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}
