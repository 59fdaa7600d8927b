use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use time::{Date, Duration, OffsetDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::certifications::status::{certification_status, CertificationStatus};
use crate::db::{
    CertificationRepository, CertificationType, CoachCertification, ExpiringCertification,
    Program, ProgramRepository, ProgramRequirement,
};

/// Everything a coach still owes a program, plus what is about to lapse.
/// Derived on demand; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatus {
    pub program_id: Uuid,
    pub program_name: String,
    pub total_required: usize,
    pub total_recommended: usize,
    pub completed_required: usize,
    pub completed_recommended: usize,
    pub missing_required: Vec<CertificationType>,
    pub missing_recommended: Vec<CertificationType>,
    pub expiring_certs: Vec<CoachCertification>,
    pub is_compliant: bool,
}

/// Pure compliance computation over already-fetched rows.
///
/// Universal certification types are merged into the required set whether or
/// not an explicit requirement row links them to the program. The missing
/// list is de-duplicated by type id, but `total_required` stays additive: a
/// type that is both universal and explicitly required counts twice. That
/// double-count is deliberate and matched by callers.
pub fn evaluate_compliance(
    program: &Program,
    requirements: &[ProgramRequirement],
    universal_types: &[CertificationType],
    coach_certs: &[CoachCertification],
    now: OffsetDateTime,
    warning_days: i64,
) -> ComplianceStatus {
    // Types the coach holds evidence for, regardless of expiry.
    let held: HashSet<Uuid> = coach_certs
        .iter()
        .map(|c| c.certification_type_id)
        .collect();

    let required: Vec<&CertificationType> = requirements
        .iter()
        .filter(|r| r.is_required)
        .map(|r| &r.certification_type)
        .collect();
    let recommended: Vec<&CertificationType> = requirements
        .iter()
        .filter(|r| !r.is_required)
        .map(|r| &r.certification_type)
        .collect();

    let mut missing_required: Vec<CertificationType> = required
        .iter()
        .filter(|t| !held.contains(&t.id))
        .map(|t| (*t).clone())
        .collect();
    for universal in universal_types {
        if !held.contains(&universal.id) && !missing_required.iter().any(|t| t.id == universal.id) {
            missing_required.push(universal.clone());
        }
    }

    let missing_recommended: Vec<CertificationType> = recommended
        .iter()
        .filter(|t| !held.contains(&t.id))
        .map(|t| (*t).clone())
        .collect();

    let expiring_certs: Vec<CoachCertification> = coach_certs
        .iter()
        .filter(|c| {
            matches!(
                certification_status(c.expiration_date, now, warning_days),
                CertificationStatus::ExpiringSoon | CertificationStatus::Expired
            )
        })
        .cloned()
        .collect();

    let has_expired = expiring_certs.iter().any(|c| {
        certification_status(c.expiration_date, now, warning_days) == CertificationStatus::Expired
    });

    let total_required = required.len() + universal_types.len();
    let total_recommended = recommended.len();

    ComplianceStatus {
        program_id: program.id,
        program_name: program.name.clone(),
        total_required,
        total_recommended,
        completed_required: total_required - missing_required.len(),
        completed_recommended: total_recommended - missing_recommended.len(),
        is_compliant: missing_required.is_empty() && !has_expired,
        missing_required,
        missing_recommended,
        expiring_certs,
    }
}

/// Compliance for one (coach, program) pair. An unknown program, or a failed
/// program lookup, yields `None`; any other failed fetch degrades to an
/// empty collection so the computation still produces a result.
pub async fn check_coach_compliance(
    pool: &PgPool,
    coach_id: Uuid,
    program_id: Uuid,
    now: OffsetDateTime,
    warning_days: i64,
) -> Option<ComplianceStatus> {
    let program = match ProgramRepository::get_program(pool, program_id).await {
        Ok(Some(program)) => program,
        Ok(None) => return None,
        Err(err) => {
            warn!(%program_id, "program lookup failed: {err}");
            return None;
        }
    };

    let requirements = fetch_or_empty(
        CertificationRepository::program_requirements(pool, program_id).await,
        "program requirements",
    );
    let universal_types = fetch_or_empty(
        CertificationRepository::universal_types(pool).await,
        "universal certification types",
    );
    let coach_certs = fetch_or_empty(
        CertificationRepository::coach_certifications(pool, coach_id).await,
        "coach certifications",
    );

    Some(evaluate_compliance(
        &program,
        &requirements,
        &universal_types,
        &coach_certs,
        now,
        warning_days,
    ))
}

/// Compliance for every program the coach is assigned to, in assignment
/// fetch order. A coach with no assignments gets an empty list.
pub async fn get_coach_compliance_status(
    pool: &PgPool,
    coach_id: Uuid,
    now: OffsetDateTime,
    warning_days: i64,
) -> Vec<ComplianceStatus> {
    let assignments = fetch_or_empty(
        ProgramRepository::coach_assignments(pool, coach_id).await,
        "coach assignments",
    );

    let mut statuses = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        if let Some(status) =
            check_coach_compliance(pool, coach_id, assignment.program_id, now, warning_days).await
        {
            statuses.push(status);
        }
    }
    statuses
}

/// Certifications expiring in the 2-day band anchored `days_before_expiry`
/// days out, for the externally scheduled daily notification job. The band
/// keeps the job from re-firing every day for the same certification.
pub async fn get_expiring_certifications(
    pool: &PgPool,
    days_before_expiry: i64,
    school_id: Option<Uuid>,
    today: Date,
) -> Vec<ExpiringCertification> {
    let (from, to) = expiry_window(today, days_before_expiry);
    let rows = fetch_or_empty(
        CertificationRepository::expiring_between(pool, from, to).await,
        "expiring certifications",
    );
    filter_by_school(rows, school_id)
}

/// Inclusive `[today + days - 1, today + days]` band.
pub fn expiry_window(today: Date, days_before_expiry: i64) -> (Date, Date) {
    (
        today + Duration::days(days_before_expiry - 1),
        today + Duration::days(days_before_expiry),
    )
}

/// Post-fetch school filter; the band query itself spans all schools.
pub fn filter_by_school(
    mut rows: Vec<ExpiringCertification>,
    school_id: Option<Uuid>,
) -> Vec<ExpiringCertification> {
    if let Some(school_id) = school_id {
        rows.retain(|r| r.school_id == Some(school_id));
    }
    rows
}

fn fetch_or_empty<T>(result: Result<Vec<T>, sqlx::Error>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!("failed to fetch {what}, degrading to empty: {err}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-06-15 10:30 UTC);
    const WARNING_DAYS: i64 = 30;

    fn certification_type(name: &str, is_universal: bool) -> CertificationType {
        CertificationType {
            id: Uuid::now_v7(),
            name: name.to_string(),
            description: None,
            school_id: None,
            is_universal,
            validity_period_months: Some(24),
            created_at: NOW,
            updated_at: NOW,
        }
    }

    fn program(name: &str) -> Program {
        Program {
            id: Uuid::now_v7(),
            school_id: Uuid::now_v7(),
            name: name.to_string(),
            sport: "soccer".to_string(),
            description: None,
            is_active: true,
            created_at: NOW,
            updated_at: NOW,
        }
    }

    fn requirement(cert_type: &CertificationType, is_required: bool) -> ProgramRequirement {
        ProgramRequirement {
            requirement_id: Uuid::now_v7(),
            is_required,
            locked_by_admin: false,
            certification_type: cert_type.clone(),
        }
    }

    fn held_certification(
        coach_id: Uuid,
        cert_type: &CertificationType,
        expiration: Option<Date>,
    ) -> CoachCertification {
        CoachCertification {
            id: Uuid::now_v7(),
            coach_id,
            certification_type_id: cert_type.id,
            certificate_number: Some("CERT-001".to_string()),
            issuing_organization: None,
            issue_date: None,
            expiration_date: expiration,
            document_url: None,
            extracted_metadata: None,
            created_at: NOW,
            updated_at: NOW,
        }
    }

    #[test]
    fn universal_type_required_without_explicit_link() {
        let universal = certification_type("CPR Certified", true);
        let status = evaluate_compliance(
            &program("Varsity Soccer"),
            &[],
            &[universal.clone()],
            &[],
            NOW,
            WARNING_DAYS,
        );

        assert_eq!(status.total_required, 1);
        assert_eq!(status.missing_required, vec![universal]);
        assert!(!status.is_compliant);
    }

    #[test]
    fn universal_also_linked_double_counts_total_but_not_missing() {
        let cpr = certification_type("CPR Certified", true);
        let status = evaluate_compliance(
            &program("Varsity Soccer"),
            &[requirement(&cpr, true)],
            &[cpr.clone()],
            &[],
            NOW,
            WARNING_DAYS,
        );

        // Additive count, de-duplicated missing list.
        assert_eq!(status.total_required, 2);
        assert_eq!(status.missing_required.len(), 1);
        assert_eq!(status.completed_required, 1);
    }

    #[test]
    fn compliant_when_everything_held_and_current() {
        let cpr = certification_type("CPR Certified", true);
        let first_aid = certification_type("First Aid", false);
        let coach_id = Uuid::now_v7();
        let future = NOW.date() + Duration::days(365);

        let status = evaluate_compliance(
            &program("Varsity Soccer"),
            &[requirement(&first_aid, true)],
            &[cpr.clone()],
            &[
                held_certification(coach_id, &cpr, Some(future)),
                held_certification(coach_id, &first_aid, None),
            ],
            NOW,
            WARNING_DAYS,
        );

        assert!(status.is_compliant);
        assert_eq!(status.total_required, 2);
        assert_eq!(status.completed_required, 2);
        assert!(status.missing_required.is_empty());
        assert!(status.expiring_certs.is_empty());
    }

    #[test]
    fn expired_certification_breaks_compliance() {
        let cpr = certification_type("CPR Certified", false);
        let coach_id = Uuid::now_v7();
        let past = NOW.date() - Duration::days(10);

        let status = evaluate_compliance(
            &program("Varsity Soccer"),
            &[requirement(&cpr, true)],
            &[],
            &[held_certification(coach_id, &cpr, Some(past))],
            NOW,
            WARNING_DAYS,
        );

        // The record exists, so nothing is "missing", but the expiry blocks
        // compliance.
        assert!(status.missing_required.is_empty());
        assert_eq!(status.expiring_certs.len(), 1);
        assert!(!status.is_compliant);
    }

    #[test]
    fn expiring_soon_is_surfaced_but_still_compliant() {
        let cpr = certification_type("CPR Certified", false);
        let coach_id = Uuid::now_v7();
        let soon = NOW.date() + Duration::days(10);

        let status = evaluate_compliance(
            &program("Varsity Soccer"),
            &[requirement(&cpr, true)],
            &[],
            &[held_certification(coach_id, &cpr, Some(soon))],
            NOW,
            WARNING_DAYS,
        );

        assert_eq!(status.expiring_certs.len(), 1);
        assert!(status.is_compliant);
    }

    #[test]
    fn recommended_types_never_block_compliance() {
        let concussion = certification_type("Concussion Protocol", false);
        let status = evaluate_compliance(
            &program("Varsity Soccer"),
            &[requirement(&concussion, false)],
            &[],
            &[],
            NOW,
            WARNING_DAYS,
        );

        assert_eq!(status.total_recommended, 1);
        assert_eq!(status.completed_recommended, 0);
        assert_eq!(status.missing_recommended.len(), 1);
        assert!(status.missing_required.is_empty());
        assert!(status.is_compliant);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let cpr = certification_type("CPR Certified", true);
        let first_aid = certification_type("First Aid", false);
        let coach_id = Uuid::now_v7();
        let certs = [held_certification(
            coach_id,
            &first_aid,
            Some(NOW.date() + Duration::days(5)),
        )];
        let requirements = [requirement(&first_aid, true), requirement(&cpr, false)];
        let program = program("JV Basketball");

        let first = evaluate_compliance(
            &program,
            &requirements,
            &[cpr.clone()],
            &certs,
            NOW,
            WARNING_DAYS,
        );
        let second = evaluate_compliance(
            &program,
            &requirements,
            &[cpr.clone()],
            &certs,
            NOW,
            WARNING_DAYS,
        );

        assert_eq!(first, second);
    }

    #[test]
    fn expiry_window_is_two_day_band() {
        let today = NOW.date();
        let (from, to) = expiry_window(today, 30);
        assert_eq!(from, today + Duration::days(29));
        assert_eq!(to, today + Duration::days(30));
    }

    #[test]
    fn school_filter_drops_other_schools() {
        let school = Uuid::now_v7();
        let other = Uuid::now_v7();
        let cpr = certification_type("CPR Certified", false);
        let make_row = |school_id: Option<Uuid>| ExpiringCertification {
            certification: held_certification(
                Uuid::now_v7(),
                &cpr,
                Some(NOW.date() + Duration::days(30)),
            ),
            certification_name: cpr.name.clone(),
            coach_name: "Alex Morgan".to_string(),
            coach_email: "alex@example.com".to_string(),
            school_id,
        };

        let rows = vec![make_row(Some(school)), make_row(Some(other)), make_row(None)];

        let filtered = filter_by_school(rows.clone(), Some(school));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].school_id, Some(school));

        // No filter passes everything through.
        assert_eq!(filter_by_school(rows, None).len(), 3);
    }
}
