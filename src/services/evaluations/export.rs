//! 测评导出（JSON / Markdown）

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::fmt::Write;

use super::EvaluationService;
use crate::models::{
    ApiResponse, ErrorCode,
    common::{ExportFormat, ExportQuery},
    evaluations::{entities::EvaluationDetail, responses::EvaluationExport},
};
use crate::services::access::{
    attachment, current_user, internal_error, load_evaluation, safe_filename,
};

/// 选项序号 A, B, C ...
pub(crate) fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// 渲染为 Markdown 文档（包含答案与解析，供教师使用）
pub fn render_markdown(detail: &EvaluationDetail) -> String {
    let mut out = String::new();
    let evaluation = &detail.evaluation;

    let _ = writeln!(out, "# {}\n", evaluation.title);
    if let Some(description) = &evaluation.description {
        let _ = writeln!(out, "{description}\n");
    }
    let _ = writeln!(
        out,
        "- Questions: {}\n- Max score: {}\n",
        detail.questions.len(),
        detail.max_score()
    );

    for (index, question) in detail.questions.iter().enumerate() {
        let _ = writeln!(
            out,
            "## {}. {} ({}, {} pt)\n",
            index + 1,
            question.text,
            question.question_type,
            question.points
        );
        if let Some(language) = &question.language {
            let _ = writeln!(out, "Language: `{language}`\n");
        }
        if !question.options.is_empty() {
            for (i, option) in question.options.iter().enumerate() {
                let mark = if option.is_correct { "x" } else { " " };
                let _ = writeln!(out, "- [{mark}] {}) {}", option_letter(i), option.text);
            }
            out.push('\n');
        }
        if let Some(explanation) = &question.explanation {
            let _ = writeln!(out, "> {explanation}\n");
        }
    }

    out
}

pub async fn export_evaluation(
    service: &EvaluationService,
    evaluation_id: i64,
    query: ExportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let format = query.format.unwrap_or(ExportFormat::Json);
    if !matches!(format, ExportFormat::Json | ExportFormat::Markdown) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ExportFormatUnsupported,
            format!("Unsupported export format for evaluations: {format}"),
        )));
    }

    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    try_response!(load_evaluation(&storage, &user, evaluation_id).await);

    let detail = match storage.get_evaluation_detail(evaluation_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationNotFound,
                "Evaluation not found",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to get evaluation", e)),
    };

    let filename = format!(
        "{}.{}",
        safe_filename(&detail.evaluation.title),
        format.extension()
    );

    let body = match format {
        ExportFormat::Markdown => render_markdown(&detail),
        _ => {
            let max_score = detail.max_score();
            let export = EvaluationExport {
                detail,
                max_score,
                exported_at: chrono::Utc::now(),
            };
            match serde_json::to_string_pretty(&export) {
                Ok(json) => json,
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::ExportFailed,
                            format!("Evaluation export failed: {e}"),
                        ),
                    ));
                }
            }
        }
    };

    Ok(attachment(format.content_type(), &filename, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::entities::Evaluation;
    use crate::models::questions::entities::{Question, QuestionOption, QuestionType};

    fn sample_detail() -> EvaluationDetail {
        let now = chrono::Utc::now();
        let options = vec![
            QuestionOption {
                id: 1,
                question_id: 10,
                text: "Borrow".into(),
                is_correct: false,
                position: 1,
            },
            QuestionOption {
                id: 2,
                question_id: 10,
                text: "Move".into(),
                is_correct: true,
                position: 2,
            },
        ];
        EvaluationDetail {
            evaluation: Evaluation {
                id: 1,
                title: "Rust Ownership".into(),
                description: Some("Basics".into()),
                author_id: 2,
                question_count: 2,
                created_at: now,
                updated_at: now,
            },
            questions: vec![
                Question {
                    id: 10,
                    evaluation_id: 1,
                    text: "What happens on `let b = a;` for a String?".into(),
                    question_type: QuestionType::SingleChoice,
                    language: None,
                    points: 2.0,
                    position: 1,
                    explanation: Some("String is not Copy".into()),
                    options,
                    created_at: now,
                    updated_at: now,
                },
                Question {
                    id: 11,
                    evaluation_id: 1,
                    text: "Implement a stack".into(),
                    question_type: QuestionType::Code,
                    language: Some("rust".into()),
                    points: 3.0,
                    position: 2,
                    explanation: None,
                    options: vec![],
                    created_at: now,
                    updated_at: now,
                },
            ],
        }
    }

    #[test]
    fn test_render_markdown() {
        let md = render_markdown(&sample_detail());
        assert!(md.starts_with("# Rust Ownership\n"));
        assert!(md.contains("- Max score: 5"));
        assert!(md.contains("## 1. What happens"));
        assert!(md.contains("- [x] B) Move"));
        assert!(md.contains("- [ ] A) Borrow"));
        assert!(md.contains("> String is not Copy"));
        assert!(md.contains("Language: `rust`"));
    }

    #[test]
    fn test_option_letter() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
    }
}
