// ==========================================
// 员工名录系统 - 员工表单校验
// ==========================================
// 职责: 单条新增/编辑的输入校验（类型化表单模式）
// 规则: 必填非空 / 邮箱语法 / 性别 ∈ {M,F} / ISO 日期；可选空串 → 缺失
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::api::error::ValidationViolation;
use crate::domain::employee::{EmployeeDraft, EmployeeField};
use crate::domain::types::Gender;
use crate::i18n::{t, t_with_args};

// ==========================================
// FieldConstraint - 字段约束
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldConstraint {
    /// 非空（去除首尾空白后）
    Required,
    /// 任意文本，空串视为缺失
    Optional,
    /// 可选；非空时须为合法邮箱
    Email,
    /// 可选；非空时须为 YYYY-MM-DD
    IsoDate,
    /// 可选；非空时须为列出的取值之一
    OneOf(&'static [&'static str]),
}

// ==========================================
// EmployeeInput - 表单原始输入
// ==========================================
// 所有字段均为文本，未提交的字段为空串
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeInput {
    pub name: String,
    pub registration: String,
    pub cpf: String,
    pub specialty: String,
    pub phone: String,
    pub unit: String,
    pub email: String,
    pub network_login: String,
    pub date_of_birth: String,
    pub admission_date: String,
    pub gender: String,
    pub coordination: String,
    pub contract: String,
    pub work_schedule: String,
    pub photo: String,
}

impl EmployeeInput {
    pub fn value(&self, field: EmployeeField) -> &str {
        match field {
            EmployeeField::Id => "",
            EmployeeField::Name => &self.name,
            EmployeeField::Registration => &self.registration,
            EmployeeField::Cpf => &self.cpf,
            EmployeeField::Specialty => &self.specialty,
            EmployeeField::Phone => &self.phone,
            EmployeeField::Unit => &self.unit,
            EmployeeField::Email => &self.email,
            EmployeeField::NetworkLogin => &self.network_login,
            EmployeeField::DateOfBirth => &self.date_of_birth,
            EmployeeField::Gender => &self.gender,
            EmployeeField::AdmissionDate => &self.admission_date,
            EmployeeField::Coordination => &self.coordination,
            EmployeeField::Contract => &self.contract,
            EmployeeField::WorkSchedule => &self.work_schedule,
            EmployeeField::Photo => &self.photo,
        }
    }
}

// ==========================================
// EmployeeFormSchema - 员工表单模式
// ==========================================
pub struct EmployeeFormSchema;

const GENDER_CODES: &[&str] = &["M", "F"];

impl EmployeeFormSchema {
    /// 字段 → 约束（顺序即违规报告顺序）
    pub const FIELDS: [(EmployeeField, FieldConstraint); 15] = [
        (EmployeeField::Name, FieldConstraint::Required),
        (EmployeeField::Registration, FieldConstraint::Required),
        (EmployeeField::Cpf, FieldConstraint::Required),
        (EmployeeField::Specialty, FieldConstraint::Required),
        (EmployeeField::Phone, FieldConstraint::Required),
        (EmployeeField::Unit, FieldConstraint::Required),
        (EmployeeField::Email, FieldConstraint::Email),
        (EmployeeField::NetworkLogin, FieldConstraint::Optional),
        (EmployeeField::DateOfBirth, FieldConstraint::IsoDate),
        (EmployeeField::Gender, FieldConstraint::OneOf(GENDER_CODES)),
        (EmployeeField::AdmissionDate, FieldConstraint::IsoDate),
        (EmployeeField::Coordination, FieldConstraint::Optional),
        (EmployeeField::Contract, FieldConstraint::Optional),
        (EmployeeField::WorkSchedule, FieldConstraint::Optional),
        (EmployeeField::Photo, FieldConstraint::Optional),
    ];

    pub fn constraint(field: EmployeeField) -> Option<FieldConstraint> {
        Self::FIELDS
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| *c)
    }

    /// 校验单个字段，返回本地化原因
    pub fn check(field: EmployeeField, value: &str) -> Option<String> {
        let value = value.trim();
        let constraint = Self::constraint(field)?;
        match constraint {
            FieldConstraint::Required if value.is_empty() => {
                let label = field.label();
                Some(t_with_args("form.required", &[("field", label.as_str())]))
            }
            _ if value.is_empty() => None,
            FieldConstraint::Email if !value.validate_email() => Some(t("form.invalid_email")),
            FieldConstraint::IsoDate if parse_iso_date(value).is_none() => {
                let label = field.label();
                Some(t_with_args("form.invalid_date", &[("field", label.as_str())]))
            }
            FieldConstraint::OneOf(allowed) if !allowed.iter().any(|a| *a == value) => {
                Some(t("form.invalid_gender"))
            }
            _ => None,
        }
    }

    /// 校验整张表单
    ///
    /// # 返回
    /// - Ok(EmployeeDraft): 可选字段空串已转为缺失
    /// - Err(violations): 全部违规（按字段顺序）
    pub fn validate(input: &EmployeeInput) -> Result<EmployeeDraft, Vec<ValidationViolation>> {
        let violations: Vec<ValidationViolation> = Self::FIELDS
            .iter()
            .filter_map(|(field, _)| {
                Self::check(*field, input.value(*field)).map(|message| ValidationViolation {
                    field: *field,
                    message,
                })
            })
            .collect();

        if !violations.is_empty() {
            return Err(violations);
        }

        let optional = |field: EmployeeField| {
            let value = input.value(field).trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        let date = |field: EmployeeField| parse_iso_date(input.value(field).trim());

        Ok(EmployeeDraft {
            name: input.name.trim().to_string(),
            registration: input.registration.trim().to_string(),
            cpf: input.cpf.trim().to_string(),
            specialty: input.specialty.trim().to_string(),
            phone: input.phone.trim().to_string(),
            unit: input.unit.trim().to_string(),
            email: optional(EmployeeField::Email),
            network_login: optional(EmployeeField::NetworkLogin),
            date_of_birth: date(EmployeeField::DateOfBirth),
            admission_date: date(EmployeeField::AdmissionDate),
            gender: Gender::from_code(input.gender.trim()),
            coordination: optional(EmployeeField::Coordination),
            contract: optional(EmployeeField::Contract),
            work_schedule: optional(EmployeeField::WorkSchedule),
            photo: optional(EmployeeField::Photo),
        })
    }
}

fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
