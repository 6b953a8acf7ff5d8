//! 场次成绩导出（CSV / JSON）

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AttemptService;
use crate::errors::{EvalAdminError, Result};
use crate::models::{
    ApiResponse, ErrorCode,
    attempts::responses::AttemptExport,
    common::{ExportFormat, ExportQuery},
    reports::responses::round2,
    submissions::entities::SubmissionSummary,
};
use crate::services::access::{
    attachment, current_user, internal_error, load_attempt, safe_filename,
};

fn format_score(score: Option<f64>) -> String {
    score.map(|s| round2(s).to_string()).unwrap_or_default()
}

/// 每个学生一行
pub fn render_csv(results: &[SubmissionSummary], total_questions: i64) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "student_id",
        "username",
        "display_name",
        "status",
        "answered",
        "total_questions",
        "score",
        "max_score",
        "percentage",
        "started_at",
        "submitted_at",
    ])?;

    for row in results {
        let submission = &row.submission;
        wtr.write_record([
            submission.student_id.to_string(),
            row.student_username.clone(),
            row.student_display_name.clone().unwrap_or_default(),
            submission.status.to_string(),
            row.answered_count.to_string(),
            total_questions.to_string(),
            format_score(submission.score),
            round2(submission.max_score).to_string(),
            format_score(submission.percentage()),
            submission.started_at.to_rfc3339(),
            submission
                .submitted_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| EvalAdminError::export(format!("CSV flush failed: {e}")))?;
    String::from_utf8(data).map_err(|e| EvalAdminError::export(e.to_string()))
}

pub async fn export_results(
    service: &AttemptService,
    attempt_id: i64,
    query: ExportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let format = query.format.unwrap_or(ExportFormat::Csv);
    if !matches!(format, ExportFormat::Csv | ExportFormat::Json) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ExportFormatUnsupported,
            format!("Unsupported export format for attempt results: {format}"),
        )));
    }

    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let (attempt, evaluation) = try_response!(load_attempt(&storage, &user, attempt_id).await);

    let results = match storage.list_submission_summaries(attempt_id).await {
        Ok(results) => results,
        Err(e) => return Ok(internal_error("Failed to list submissions", e)),
    };

    let filename = format!(
        "{}-{}-results.{}",
        safe_filename(&evaluation.title),
        attempt.code.to_ascii_lowercase(),
        format.extension()
    );

    let body = match format {
        ExportFormat::Csv => render_csv(&results, evaluation.question_count),
        _ => serde_json::to_string_pretty(&AttemptExport {
            attempt,
            evaluation_title: evaluation.title,
            total_questions: evaluation.question_count,
            results,
            exported_at: chrono::Utc::now(),
        })
        .map_err(EvalAdminError::from),
    };

    match body {
        Ok(body) => Ok(attachment(format.content_type(), &filename, body)),
        Err(e) => {
            error!("Attempt export failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ExportFailed,
                format!("Attempt export failed: {e}"),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::{Submission, SubmissionStatus};

    #[test]
    fn test_render_csv() {
        let now = chrono::Utc::now();
        let results = vec![
            SubmissionSummary {
                submission: Submission {
                    id: 1,
                    attempt_id: 1,
                    student_id: 7,
                    status: SubmissionStatus::Submitted,
                    score: Some(7.5),
                    max_score: 10.0,
                    started_at: now,
                    last_activity_at: now,
                    submitted_at: Some(now),
                },
                student_username: "alice".into(),
                student_display_name: Some("Alice, A.".into()),
                answered_count: 4,
            },
            SubmissionSummary {
                submission: Submission {
                    id: 2,
                    attempt_id: 1,
                    student_id: 8,
                    status: SubmissionStatus::InProgress,
                    score: None,
                    max_score: 10.0,
                    started_at: now,
                    last_activity_at: now,
                    submitted_at: None,
                },
                student_username: "bob".into(),
                student_display_name: None,
                answered_count: 1,
            },
        ];

        let csv = render_csv(&results, 5).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("student_id,username"));
        assert!(lines[1].starts_with("7,alice,\"Alice, A.\",submitted,4,5,7.5,10,75,"));
        assert!(lines[2].starts_with("8,bob,,in_progress,1,5,,10,,"));
    }
}
