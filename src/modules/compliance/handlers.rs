use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    certifications::{
        check_coach_compliance, get_coach_compliance_status, get_expiring_certifications,
        ComplianceStatus,
    },
    db::ExpiringCertification,
    error::{AppError, AppResult},
};

/// Compliance for one coach against one program.
pub async fn coach_program_compliance(
    State(state): State<AppState>,
    Path((coach_id, program_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ComplianceStatus>> {
    let status = check_coach_compliance(
        &state.db,
        coach_id,
        program_id,
        OffsetDateTime::now_utc(),
        state.env.compliance.warning_days,
    )
    .await;

    match status {
        Some(status) => Ok(Json(status)),
        None => Err(AppError::NotFound(format!("program {program_id} not found"))),
    }
}

/// Compliance for every program the coach is assigned to.
pub async fn coach_compliance(
    State(state): State<AppState>,
    Path(coach_id): Path<Uuid>,
) -> Json<Vec<ComplianceStatus>> {
    let statuses = get_coach_compliance_status(
        &state.db,
        coach_id,
        OffsetDateTime::now_utc(),
        state.env.compliance.warning_days,
    )
    .await;
    Json(statuses)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringQuery {
    pub days: Option<i64>,
    pub school_id: Option<Uuid>,
}

/// Feed for the externally scheduled expiry-notification job.
pub async fn expiring_certifications(
    State(state): State<AppState>,
    Query(query): Query<ExpiringQuery>,
) -> Json<Vec<ExpiringCertification>> {
    let days = query
        .days
        .unwrap_or(state.env.compliance.expiring_notice_days);
    let rows = get_expiring_certifications(
        &state.db,
        days,
        query.school_id,
        OffsetDateTime::now_utc().date(),
    )
    .await;
    Json(rows)
}
