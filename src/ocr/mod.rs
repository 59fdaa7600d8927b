//! OCR date-extraction heuristic.
//!
//! Text recognition itself is an external engine behind [`TextRecognizer`];
//! everything after it is a deterministic pipeline of pure functions:
//! extract date-shaped substrings, parse them, then classify issue vs.
//! expiration by keyword proximity with a temporal-inference fallback. The
//! heuristic is best-effort by design: engine failure yields an empty
//! result, never an error.

mod classify;
mod dates;
mod recognizer;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

pub use dates::{extract_date_strings, format_iso, parse_date};
pub use recognizer::{RecognitionError, RecognizedText, TextRecognizer};

/// Extraction result. Dates are `YYYY-MM-DD`; `all_dates` holds the raw
/// matched substrings before parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDates {
    pub issue_date: Option<String>,
    pub expiration_date: Option<String>,
    pub all_dates: Vec<String>,
    pub raw_text: String,
    pub confidence: f32,
}

/// Display/storage-friendly projection of an extraction result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDataSummary {
    pub suggested_issue_date: Option<String>,
    pub suggested_expiration_date: Option<String>,
    pub detected_dates: Vec<String>,
    pub confidence: i32,
    pub raw_text_length: usize,
}

/// Recognize text in a scanned certificate image and extract issue and
/// expiration dates from it.
///
/// The recognition call is the only suspension point. Engine progress is
/// re-scaled from a 0.0-1.0 fraction to 0-100 for the caller's callback.
/// If the engine fails the error is logged and the empty result returned;
/// OCR is an assistive feature and must never block the upload flow.
pub async fn extract_dates_from_image<R: TextRecognizer>(
    recognizer: &R,
    image: &[u8],
    on_progress: Option<&(dyn Fn(u8) + Send + Sync)>,
) -> ExtractedDates {
    let report = move |fraction: f32| {
        if let Some(callback) = on_progress {
            callback((fraction.clamp(0.0, 1.0) * 100.0).round() as u8);
        }
    };

    match recognizer.recognize(image, &report).await {
        Ok(recognized) => extract_dates_from_text(
            &recognized.text,
            recognized.confidence,
            OffsetDateTime::now_utc(),
        ),
        Err(err) => {
            warn!("{err}; returning empty extraction");
            ExtractedDates::default()
        }
    }
}

/// The deterministic part of the pipeline, separated from the engine call
/// so it can run on text recognized elsewhere (the web client performs
/// recognition in-browser) and be tested without an engine.
pub fn extract_dates_from_text(
    text: &str,
    confidence: f32,
    now: OffsetDateTime,
) -> ExtractedDates {
    let all_dates = dates::extract_date_strings(text);
    let (issue, expiration) = classify::classify_dates(text, &all_dates, now);

    ExtractedDates {
        issue_date: issue.map(dates::format_iso),
        expiration_date: expiration.map(dates::format_iso),
        all_dates,
        raw_text: text.to_string(),
        confidence,
    }
}

/// Pure projection for display and storage alongside the certification
/// record.
pub fn format_extracted_data(extracted: &ExtractedDates) -> ExtractedDataSummary {
    ExtractedDataSummary {
        suggested_issue_date: extracted.issue_date.clone(),
        suggested_expiration_date: extracted.expiration_date.clone(),
        detected_dates: extracted.all_dates.clone(),
        confidence: extracted.confidence.round() as i32,
        raw_text_length: extracted.raw_text.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-06-15 10:30 UTC);

    struct FixedRecognizer {
        text: &'static str,
        confidence: f32,
    }

    impl TextRecognizer for FixedRecognizer {
        async fn recognize(
            &self,
            _image: &[u8],
            on_progress: &(dyn Fn(f32) + Send + Sync),
        ) -> Result<RecognizedText, RecognitionError> {
            for fraction in [0.25, 0.5, 1.0] {
                on_progress(fraction);
            }
            Ok(RecognizedText {
                text: self.text.to_string(),
                confidence: self.confidence,
            })
        }
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        async fn recognize(
            &self,
            _image: &[u8],
            _on_progress: &(dyn Fn(f32) + Send + Sync),
        ) -> Result<RecognizedText, RecognitionError> {
            Err(RecognitionError("engine crashed".to_string()))
        }
    }

    #[test]
    fn labeled_dates_round_trip() {
        let extracted = extract_dates_from_text(
            "Certificate of Completion\nIssued: 01/15/2024\nExpires: 01/15/2026",
            91.5,
            NOW,
        );

        assert_eq!(extracted.issue_date.as_deref(), Some("2024-01-15"));
        assert_eq!(extracted.expiration_date.as_deref(), Some("2026-01-15"));
        assert_eq!(extracted.all_dates, vec!["01/15/2024", "01/15/2026"]);
        assert_eq!(extracted.confidence, 91.5);
    }

    #[test]
    fn unlabeled_dates_fall_back_to_temporal_order() {
        let extracted = extract_dates_from_text("03/01/2020 03/01/2023", 80.0, NOW);
        assert_eq!(extracted.issue_date.as_deref(), Some("2020-03-01"));
        assert_eq!(extracted.expiration_date.as_deref(), Some("2023-03-01"));
    }

    #[test]
    fn dateless_text_extracts_nothing() {
        let extracted = extract_dates_from_text("no dates here", 70.0, NOW);
        assert_eq!(extracted.issue_date, None);
        assert_eq!(extracted.expiration_date, None);
        assert!(extracted.all_dates.is_empty());
        assert_eq!(extracted.raw_text, "no dates here");
    }

    #[tokio::test]
    async fn recognizer_output_flows_through_pipeline() {
        let recognizer = FixedRecognizer {
            text: "Valid until 12/31/2099",
            confidence: 88.0,
        };
        let extracted = extract_dates_from_image(&recognizer, b"fake image", None).await;

        assert_eq!(extracted.issue_date, None);
        assert_eq!(extracted.expiration_date.as_deref(), Some("2099-12-31"));
        assert_eq!(extracted.confidence, 88.0);
    }

    #[tokio::test]
    async fn progress_is_scaled_to_percent() {
        let seen: Mutex<Vec<u8>> = Mutex::new(Vec::new());
        let recognizer = FixedRecognizer {
            text: "",
            confidence: 0.0,
        };
        let record = |percent: u8| seen.lock().unwrap().push(percent);

        extract_dates_from_image(&recognizer, b"fake image", Some(&record)).await;

        assert_eq!(*seen.lock().unwrap(), vec![25, 50, 100]);
    }

    #[tokio::test]
    async fn engine_failure_resolves_to_empty_result() {
        let extracted = extract_dates_from_image(&FailingRecognizer, b"fake image", None).await;
        assert_eq!(extracted, ExtractedDates::default());
        assert_eq!(extracted.issue_date, None);
        assert_eq!(extracted.expiration_date, None);
        assert!(extracted.all_dates.is_empty());
        assert_eq!(extracted.raw_text, "");
        assert_eq!(extracted.confidence, 0.0);
    }

    #[test]
    fn summary_projects_without_side_effects() {
        let extracted = extract_dates_from_text("Issued: 01/15/2024", 87.6, NOW);
        let summary = format_extracted_data(&extracted);

        assert_eq!(summary.suggested_issue_date.as_deref(), Some("2024-01-15"));
        assert_eq!(summary.suggested_expiration_date, None);
        assert_eq!(summary.detected_dates, vec!["01/15/2024"]);
        assert_eq!(summary.confidence, 88);
        assert_eq!(summary.raw_text_length, "Issued: 01/15/2024".len());
    }
}
