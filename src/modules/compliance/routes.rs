use axum::{routing::get, Router};

use super::handlers::{coach_compliance, coach_program_compliance, expiring_certifications};
use crate::app_state::AppState;

pub fn compliance_routes() -> Router<AppState> {
    Router::new()
        .route("/coaches/:coach_id", get(coach_compliance))
        .route(
            "/coaches/:coach_id/programs/:program_id",
            get(coach_program_compliance),
        )
        .route("/expiring", get(expiring_certifications))
}
