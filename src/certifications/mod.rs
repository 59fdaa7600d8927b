//! Certification compliance engine.
//!
//! Computes, per (coach, program) pair, which required and recommended
//! certification types are missing and which held certifications are
//! expiring or expired. Status is always recomputed from the current
//! timestamp; nothing here is cached or persisted.

mod compliance;
mod status;

pub use compliance::{
    check_coach_compliance, evaluate_compliance, expiry_window, filter_by_school,
    get_coach_compliance_status, get_expiring_certifications, ComplianceStatus,
};
pub use status::{
    certification_status, days_until_expiry, CertificationStatus, DEFAULT_WARNING_DAYS,
};
