use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    db::{
        CertificationRepository, CertificationType, CoachCertification, DatabaseError,
        NewCertificationType, NewCoachCertification, NewProgramRequirement, ProgramRequirement,
        UpdateCertificationType, UpdateCoachCertification,
    },
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTypesQuery {
    pub school_id: Option<Uuid>,
}

pub async fn list_types(
    State(state): State<AppState>,
    Query(query): Query<ListTypesQuery>,
) -> AppResult<Json<Vec<CertificationType>>> {
    let types = CertificationRepository::list_types(&state.db, query.school_id)
        .await
        .map_err(DatabaseError::from)?;
    Ok(Json(types))
}

pub async fn create_type(
    State(state): State<AppState>,
    Json(new_type): Json<NewCertificationType>,
) -> AppResult<(StatusCode, Json<CertificationType>)> {
    new_type.validate()?;
    let created = CertificationRepository::create_type(&state.db, &new_type)
        .await
        .map_err(DatabaseError::from)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_type(
    State(state): State<AppState>,
    Path(type_id): Path<Uuid>,
    Json(update): Json<UpdateCertificationType>,
) -> AppResult<Json<CertificationType>> {
    update.validate()?;
    let updated = CertificationRepository::update_type(&state.db, type_id, &update)
        .await
        .map_err(DatabaseError::from)?;
    Ok(Json(updated))
}

pub async fn delete_type(
    State(state): State<AppState>,
    Path(type_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    CertificationRepository::delete_type(&state.db, type_id)
        .await
        .map_err(DatabaseError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_requirements(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProgramRequirement>>> {
    let requirements = CertificationRepository::program_requirements(&state.db, program_id)
        .await
        .map_err(DatabaseError::from)?;
    Ok(Json(requirements))
}

pub async fn add_requirement(
    State(state): State<AppState>,
    Json(new_requirement): Json<NewProgramRequirement>,
) -> AppResult<(StatusCode, Json<ProgramRequirement>)> {
    new_requirement.validate()?;
    let created = CertificationRepository::add_requirement(&state.db, &new_requirement)
        .await
        .map_err(DatabaseError::from)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Admin-locked requirement rows cannot be removed through this endpoint.
pub async fn remove_requirement(
    State(state): State<AppState>,
    Path(requirement_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    match CertificationRepository::requirement_lock(&state.db, requirement_id)
        .await
        .map_err(DatabaseError::from)?
    {
        None => return Err(AppError::NotFound(format!(
            "requirement {requirement_id} not found"
        ))),
        Some(true) => {
            return Err(AppError::Conflict(
                "requirement is locked by an administrator".to_string(),
            ))
        }
        Some(false) => {}
    }

    CertificationRepository::remove_requirement(&state.db, requirement_id)
        .await
        .map_err(DatabaseError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_coach_certifications(
    State(state): State<AppState>,
    Path(coach_id): Path<Uuid>,
) -> AppResult<Json<Vec<CoachCertification>>> {
    let certifications = CertificationRepository::coach_certifications(&state.db, coach_id)
        .await
        .map_err(DatabaseError::from)?;
    Ok(Json(certifications))
}

pub async fn create_coach_certification(
    State(state): State<AppState>,
    Json(new_certification): Json<NewCoachCertification>,
) -> AppResult<(StatusCode, Json<CoachCertification>)> {
    new_certification.validate()?;
    let created =
        CertificationRepository::create_coach_certification(&state.db, &new_certification)
            .await
            .map_err(DatabaseError::from)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_coach_certification(
    State(state): State<AppState>,
    Path(certification_id): Path<Uuid>,
    Json(update): Json<UpdateCoachCertification>,
) -> AppResult<Json<CoachCertification>> {
    update.validate()?;
    let updated =
        CertificationRepository::update_coach_certification(&state.db, certification_id, &update)
            .await
            .map_err(DatabaseError::from)?;
    Ok(Json(updated))
}

pub async fn delete_coach_certification(
    State(state): State<AppState>,
    Path(certification_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    CertificationRepository::delete_coach_certification(&state.db, certification_id)
        .await
        .map_err(DatabaseError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
