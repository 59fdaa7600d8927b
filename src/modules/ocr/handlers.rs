use axum::Json;
use serde::Deserialize;
use time::OffsetDateTime;
use validator::Validate;

use crate::{
    error::AppResult,
    ocr::{extract_dates_from_text, format_extracted_data, ExtractedDataSummary, ExtractedDates},
};

/// Text recognized client-side (the browser runs the OCR engine against the
/// uploaded certificate image) plus the engine's confidence score.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedTextPayload {
    pub text: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub confidence: f32,
}

pub async fn extract_dates(
    Json(payload): Json<RecognizedTextPayload>,
) -> AppResult<Json<ExtractedDates>> {
    payload.validate()?;
    let extracted =
        extract_dates_from_text(&payload.text, payload.confidence, OffsetDateTime::now_utc());
    Ok(Json(extracted))
}

/// Same pipeline, projected into the summary stored alongside the
/// certification record.
pub async fn extract_dates_summary(
    Json(payload): Json<RecognizedTextPayload>,
) -> AppResult<Json<ExtractedDataSummary>> {
    payload.validate()?;
    let extracted =
        extract_dates_from_text(&payload.text, payload.confidence, OffsetDateTime::now_utc());
    Ok(Json(format_extracted_data(&extracted)))
}
