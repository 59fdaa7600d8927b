use sqlx::{Error, PgPool};
use time::Date;
use uuid::Uuid;

use crate::db::models::{
    CertificationType, CoachCertification, ExpiringCertification, NewCertificationType,
    NewCoachCertification, NewProgramRequirement, ProgramRequirement, UpdateCertificationType,
    UpdateCoachCertification,
};

pub struct CertificationRepository;

impl CertificationRepository {
    // Certification type functions

    /// Global types plus, when a school is given, that school's own types.
    pub async fn list_types(
        pool: &PgPool,
        school_id: Option<Uuid>,
    ) -> Result<Vec<CertificationType>, Error> {
        sqlx::query_as::<_, CertificationType>(
            r#"
            SELECT id, name, description, school_id, is_universal, validity_period_months, created_at, updated_at
            FROM certification_types
            WHERE school_id IS NULL OR school_id = $1
            ORDER BY name
            "#,
        )
        .bind(school_id)
        .fetch_all(pool)
        .await
    }

    pub async fn universal_types(pool: &PgPool) -> Result<Vec<CertificationType>, Error> {
        sqlx::query_as::<_, CertificationType>(
            r#"
            SELECT id, name, description, school_id, is_universal, validity_period_months, created_at, updated_at
            FROM certification_types
            WHERE is_universal = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn create_type(
        pool: &PgPool,
        new_type: &NewCertificationType,
    ) -> Result<CertificationType, Error> {
        sqlx::query_as::<_, CertificationType>(
            r#"
            INSERT INTO certification_types (name, description, school_id, is_universal, validity_period_months)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, school_id, is_universal, validity_period_months, created_at, updated_at
            "#,
        )
        .bind(&new_type.name)
        .bind(&new_type.description)
        .bind(new_type.school_id)
        .bind(new_type.is_universal)
        .bind(new_type.validity_period_months)
        .fetch_one(pool)
        .await
    }

    pub async fn update_type(
        pool: &PgPool,
        type_id: Uuid,
        update: &UpdateCertificationType,
    ) -> Result<CertificationType, Error> {
        sqlx::query_as::<_, CertificationType>(
            r#"
            UPDATE certification_types
            SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                is_universal = COALESCE($3, is_universal),
                validity_period_months = COALESCE($4, validity_period_months),
                updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, description, school_id, is_universal, validity_period_months, created_at, updated_at
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.is_universal)
        .bind(update.validity_period_months)
        .bind(type_id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_type(pool: &PgPool, type_id: Uuid) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM certification_types WHERE id = $1")
            .bind(type_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        Ok(())
    }

    // Program requirement functions

    pub async fn program_requirements(
        pool: &PgPool,
        program_id: Uuid,
    ) -> Result<Vec<ProgramRequirement>, Error> {
        sqlx::query_as::<_, ProgramRequirement>(
            r#"
            SELECT
                r.id AS requirement_id,
                r.is_required,
                r.locked_by_admin,
                ct.id, ct.name, ct.description, ct.school_id, ct.is_universal,
                ct.validity_period_months, ct.created_at, ct.updated_at
            FROM program_certification_requirements r
            JOIN certification_types ct ON ct.id = r.certification_type_id
            WHERE r.program_id = $1
            ORDER BY ct.name
            "#,
        )
        .bind(program_id)
        .fetch_all(pool)
        .await
    }

    pub async fn add_requirement(
        pool: &PgPool,
        new_requirement: &NewProgramRequirement,
    ) -> Result<ProgramRequirement, Error> {
        sqlx::query_as::<_, ProgramRequirement>(
            r#"
            WITH inserted AS (
                INSERT INTO program_certification_requirements (program_id, certification_type_id, is_required, locked_by_admin)
                VALUES ($1, $2, $3, $4)
                RETURNING id, certification_type_id, is_required, locked_by_admin
            )
            SELECT
                inserted.id AS requirement_id,
                inserted.is_required,
                inserted.locked_by_admin,
                ct.id, ct.name, ct.description, ct.school_id, ct.is_universal,
                ct.validity_period_months, ct.created_at, ct.updated_at
            FROM inserted
            JOIN certification_types ct ON ct.id = inserted.certification_type_id
            "#,
        )
        .bind(new_requirement.program_id)
        .bind(new_requirement.certification_type_id)
        .bind(new_requirement.is_required)
        .bind(new_requirement.locked_by_admin)
        .fetch_one(pool)
        .await
    }

    /// Returns whether the requirement row is locked by an admin, or None
    /// when the row does not exist.
    pub async fn requirement_lock(
        pool: &PgPool,
        requirement_id: Uuid,
    ) -> Result<Option<bool>, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT locked_by_admin FROM program_certification_requirements WHERE id = $1",
        )
        .bind(requirement_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn remove_requirement(pool: &PgPool, requirement_id: Uuid) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM program_certification_requirements WHERE id = $1")
            .bind(requirement_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        Ok(())
    }

    // Coach certification functions

    pub async fn coach_certifications(
        pool: &PgPool,
        coach_id: Uuid,
    ) -> Result<Vec<CoachCertification>, Error> {
        sqlx::query_as::<_, CoachCertification>(
            r#"
            SELECT id, coach_id, certification_type_id, certificate_number, issuing_organization,
                   issue_date, expiration_date, document_url, extracted_metadata, created_at, updated_at
            FROM coach_certifications
            WHERE coach_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(coach_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create_coach_certification(
        pool: &PgPool,
        new_certification: &NewCoachCertification,
    ) -> Result<CoachCertification, Error> {
        sqlx::query_as::<_, CoachCertification>(
            r#"
            INSERT INTO coach_certifications (coach_id, certification_type_id, certificate_number,
                issuing_organization, issue_date, expiration_date, document_url, extracted_metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, coach_id, certification_type_id, certificate_number, issuing_organization,
                      issue_date, expiration_date, document_url, extracted_metadata, created_at, updated_at
            "#,
        )
        .bind(new_certification.coach_id)
        .bind(new_certification.certification_type_id)
        .bind(&new_certification.certificate_number)
        .bind(&new_certification.issuing_organization)
        .bind(new_certification.issue_date)
        .bind(new_certification.expiration_date)
        .bind(&new_certification.document_url)
        .bind(&new_certification.extracted_metadata)
        .fetch_one(pool)
        .await
    }

    pub async fn update_coach_certification(
        pool: &PgPool,
        certification_id: Uuid,
        update: &UpdateCoachCertification,
    ) -> Result<CoachCertification, Error> {
        sqlx::query_as::<_, CoachCertification>(
            r#"
            UPDATE coach_certifications
            SET
                certificate_number = COALESCE($1, certificate_number),
                issuing_organization = COALESCE($2, issuing_organization),
                issue_date = COALESCE($3, issue_date),
                expiration_date = COALESCE($4, expiration_date),
                document_url = COALESCE($5, document_url),
                extracted_metadata = COALESCE($6, extracted_metadata),
                updated_at = NOW()
            WHERE id = $7
            RETURNING id, coach_id, certification_type_id, certificate_number, issuing_organization,
                      issue_date, expiration_date, document_url, extracted_metadata, created_at, updated_at
            "#,
        )
        .bind(&update.certificate_number)
        .bind(&update.issuing_organization)
        .bind(update.issue_date)
        .bind(update.expiration_date)
        .bind(&update.document_url)
        .bind(&update.extracted_metadata)
        .bind(certification_id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_coach_certification(
        pool: &PgPool,
        certification_id: Uuid,
    ) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM coach_certifications WHERE id = $1")
            .bind(certification_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }
        Ok(())
    }

    /// Certifications whose expiration date falls inside the inclusive band,
    /// enriched with coach contact details. School filtering is applied by
    /// the caller after the fetch.
    pub async fn expiring_between(
        pool: &PgPool,
        from: Date,
        to: Date,
    ) -> Result<Vec<ExpiringCertification>, Error> {
        sqlx::query_as::<_, ExpiringCertification>(
            r#"
            SELECT
                c.id, c.coach_id, c.certification_type_id, c.certificate_number, c.issuing_organization,
                c.issue_date, c.expiration_date, c.document_url, c.extracted_metadata, c.created_at, c.updated_at,
                ct.name AS certification_name,
                u.first_name || ' ' || u.last_name AS coach_name,
                u.email AS coach_email,
                u.school_id
            FROM coach_certifications c
            JOIN certification_types ct ON ct.id = c.certification_type_id
            JOIN users u ON u.id = c.coach_id
            WHERE c.expiration_date >= $1 AND c.expiration_date <= $2
            ORDER BY c.expiration_date
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }
}
