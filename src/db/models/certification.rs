use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};
use validator::Validate;

/// A named credential category, e.g. "CPR Certified". A NULL `school_id`
/// marks the type as global; `is_universal` marks it as implicitly required
/// for every program regardless of explicit requirement links.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub school_id: Option<Uuid>,
    pub is_universal: bool,
    pub validity_period_months: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A coach's evidence of holding a certification type. `expiration_date`
/// NULL means the certification never expires.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachCertification {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub certification_type_id: Uuid,
    pub certificate_number: Option<String>,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<Date>,
    pub expiration_date: Option<Date>,
    pub document_url: Option<String>,
    pub extracted_metadata: Option<Value>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A program requirement link joined with its certification type.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRequirement {
    pub requirement_id: Uuid,
    pub is_required: bool,
    pub locked_by_admin: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub certification_type: CertificationType,
}

/// An expiring certification enriched with coach contact details, for the
/// externally scheduled notification job.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringCertification {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub certification: CoachCertification,
    pub certification_name: String,
    pub coach_name: String,
    pub coach_email: String,
    pub school_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCertificationType {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    pub school_id: Option<Uuid>,
    #[serde(default)]
    pub is_universal: bool,
    #[validate(range(min = 1))]
    pub validity_period_months: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCertificationType {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_universal: Option<bool>,
    #[validate(range(min = 1))]
    pub validity_period_months: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProgramRequirement {
    pub program_id: Uuid,
    pub certification_type_id: Uuid,
    #[serde(default = "default_true")]
    pub is_required: bool,
    #[serde(default)]
    pub locked_by_admin: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCoachCertification {
    pub coach_id: Uuid,
    pub certification_type_id: Uuid,
    pub certificate_number: Option<String>,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<Date>,
    pub expiration_date: Option<Date>,
    pub document_url: Option<String>,
    pub extracted_metadata: Option<Value>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoachCertification {
    pub certificate_number: Option<String>,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<Date>,
    pub expiration_date: Option<Date>,
    pub document_url: Option<String>,
    pub extracted_metadata: Option<Value>,
}

fn default_true() -> bool {
    true
}
