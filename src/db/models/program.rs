use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: Uuid,
    pub school_id: Uuid,
    pub name: String,
    pub sport: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Coach-to-program assignment. Head and assistant coaches both carry the
/// full certification requirements of the program.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramAssignment {
    pub id: Uuid,
    pub program_id: Uuid,
    pub coach_id: Uuid,
    pub created_at: OffsetDateTime,
}
