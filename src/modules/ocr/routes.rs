use axum::{routing::post, Router};

use super::handlers::{extract_dates, extract_dates_summary};
use crate::app_state::AppState;

pub fn ocr_routes() -> Router<AppState> {
    Router::new()
        .route("/extract-dates", post(extract_dates))
        .route("/extract-dates/summary", post(extract_dates_summary))
}
