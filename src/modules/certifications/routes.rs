use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    add_requirement, create_coach_certification, create_type, delete_coach_certification,
    delete_type, list_coach_certifications, list_requirements, list_types, remove_requirement,
    update_coach_certification, update_type,
};
use crate::app_state::AppState;

pub fn certification_routes() -> Router<AppState> {
    Router::new()
        .route("/types", get(list_types).post(create_type))
        .route("/types/:type_id", put(update_type).delete(delete_type))
        .route("/requirements", post(add_requirement))
        .route("/requirements/:requirement_id", delete(remove_requirement))
        .route("/programs/:program_id/requirements", get(list_requirements))
        .route(
            "/coaches/:coach_id",
            get(list_coach_certifications),
        )
        .route("/", post(create_coach_certification))
        .route(
            "/:certification_id",
            put(update_coach_certification).delete(delete_coach_certification),
        )
}
