use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GeneratorService, parser::parse_questions, prompts::questions_prompt};
use crate::models::{
    ApiResponse, ErrorCode,
    generators::{
        entities::GeneratedQuestion,
        requests::{GenerateQuestionsRequest, ImportQuestionsRequest},
        responses::{GeneratedQuestionsResponse, ImportQuestionsResponse},
    },
    questions::{
        entities::QuestionType,
        requests::{CreateQuestionRequest, QuestionDraft, QuestionOptionInput},
    },
};
use crate::services::access::{current_user, external_error, internal_error, load_evaluation};
use crate::services::questions::{create::ensure_capacity, validation::build_draft};
use crate::utils::validate::{normalize_optional_text, validate_required_text};

pub const MAX_GENERATED_QUESTIONS: u32 = 20;
const DEFAULT_LANGUAGE: &str = "English";

fn bad_request(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::GeneratorRequestInvalid,
        msg,
    ))
}

/// 生成的题目转为待入库草稿，任何一题不合法都整体拒绝
pub fn drafts_from_generated(
    questions: Vec<GeneratedQuestion>,
    points: Option<f64>,
    language: Option<String>,
) -> Result<Vec<QuestionDraft>, String> {
    questions
        .into_iter()
        .enumerate()
        .map(|(index, q)| {
            let request = CreateQuestionRequest {
                text: q.text,
                question_type: q.question_type,
                language: if q.question_type == QuestionType::Code {
                    language.clone()
                } else {
                    None
                },
                points,
                position: None,
                explanation: q.explanation,
                options: q
                    .options
                    .into_iter()
                    .map(|o| QuestionOptionInput {
                        text: o.text,
                        is_correct: o.is_correct,
                    })
                    .collect(),
            };
            build_draft(request).map_err(|msg| format!("Question {}: {msg}", index + 1))
        })
        .collect()
}

pub async fn generate_questions(
    service: &GeneratorService,
    body: GenerateQuestionsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let topic = match validate_required_text("Topic", &body.topic, 1, 300) {
        Ok(topic) => topic,
        Err(msg) => return Ok(bad_request(msg)),
    };
    if body.count == 0 || body.count > MAX_GENERATED_QUESTIONS {
        return Ok(bad_request(format!(
            "Question count must be between 1 and {MAX_GENERATED_QUESTIONS}"
        )));
    }

    let user = try_response!(current_user(request));
    let generator = try_response!(service.get_generator(request));

    let language = normalize_optional_text(body.language);
    let programming_language = normalize_optional_text(body.programming_language);
    let prompt = questions_prompt(
        &topic,
        body.count,
        body.question_type,
        body.difficulty,
        language.as_deref().unwrap_or(DEFAULT_LANGUAGE),
        programming_language.as_deref(),
    );

    let output = match generator.generate(&prompt).await {
        Ok(output) => output,
        Err(e) => return Ok(external_error(&e, ErrorCode::GeneratorUpstreamError)),
    };
    let mut items = match parse_questions(&output, body.question_type) {
        Ok(items) => items,
        Err(e) => return Ok(external_error(&e, ErrorCode::GeneratorUpstreamError)),
    };
    items.truncate(body.count as usize);

    info!(
        "User {} generated {} question(s) about {:?}",
        user.id,
        items.len(),
        topic
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GeneratedQuestionsResponse {
            topic,
            requested: body.count,
            items,
        },
        "Questions generated successfully",
    )))
}

pub async fn import_questions(
    service: &GeneratorService,
    body: ImportQuestionsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if body.questions.is_empty() {
        return Ok(bad_request("No questions to import"));
    }

    let user = try_response!(current_user(request));
    let drafts = match drafts_from_generated(
        body.questions,
        body.points,
        normalize_optional_text(body.language),
    ) {
        Ok(drafts) => drafts,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::QuestionInvalid, msg)));
        }
    };

    let storage = service.get_storage(request);
    try_response!(load_evaluation(&storage, &user, body.evaluation_id).await);
    try_response!(ensure_capacity(&storage, body.evaluation_id, drafts.len()).await);

    match storage.create_questions(body.evaluation_id, drafts).await {
        Ok(items) => {
            info!(
                "Imported {} generated question(s) into evaluation {}",
                items.len(),
                body.evaluation_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                ImportQuestionsResponse {
                    evaluation_id: body.evaluation_id,
                    items,
                },
                "Questions imported successfully",
            )))
        }
        Err(e) => Ok(internal_error("Question import failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generators::entities::GeneratedOption;

    fn generated(question_type: QuestionType, options: Vec<(&str, bool)>) -> GeneratedQuestion {
        GeneratedQuestion {
            text: "Generated?".into(),
            question_type,
            options: options
                .into_iter()
                .map(|(text, is_correct)| GeneratedOption {
                    text: text.into(),
                    is_correct,
                })
                .collect(),
            explanation: None,
        }
    }

    #[test]
    fn test_drafts_from_generated() {
        let drafts = drafts_from_generated(
            vec![
                generated(QuestionType::SingleChoice, vec![("a", true), ("b", false)]),
                generated(QuestionType::Code, vec![]),
            ],
            Some(2.0),
            Some("rust".into()),
        )
        .unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].points, 2.0);
        assert_eq!(drafts[0].language, None);
        assert_eq!(drafts[1].language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_drafts_reject_invalid_question() {
        let err = drafts_from_generated(
            vec![
                generated(QuestionType::Open, vec![]),
                generated(QuestionType::TrueFalse, vec![("True", true)]),
            ],
            None,
            None,
        )
        .unwrap_err();
        assert!(err.starts_with("Question 2:"));
    }
}
