//! 题目校验
//!
//! 手工录入和 AI 生成导入共用同一套规则。

use crate::models::questions::{
    entities::{Question, QuestionType},
    requests::{CreateQuestionRequest, QuestionDraft, QuestionOptionInput, UpdateQuestionRequest},
};
use crate::utils::validate::normalize_optional_text;

pub const DEFAULT_POINTS: f64 = 1.0;

/// 按题型校验选项结构
pub fn validate_options(
    question_type: QuestionType,
    options: &[QuestionOptionInput],
) -> Result<(), String> {
    if !question_type.is_choice() {
        if !options.is_empty() {
            return Err(format!("{question_type} questions must not have options"));
        }
        return Ok(());
    }

    if options.len() < 2 {
        return Err("Choice questions require at least two options".to_string());
    }
    if options.iter().any(|o| o.text.trim().is_empty()) {
        return Err("Option text cannot be empty".to_string());
    }

    let correct = options.iter().filter(|o| o.is_correct).count();
    match question_type {
        QuestionType::TrueFalse if options.len() != 2 => {
            Err("True/false questions require exactly two options".to_string())
        }
        QuestionType::SingleChoice | QuestionType::TrueFalse if correct != 1 => {
            Err(format!("{question_type} questions require exactly one correct option"))
        }
        QuestionType::MultipleChoice if correct == 0 => {
            Err("Multiple choice questions require at least one correct option".to_string())
        }
        _ => Ok(()),
    }
}

/// 校验完整题目
pub fn validate_draft(draft: &QuestionDraft) -> Result<(), String> {
    if draft.text.trim().is_empty() {
        return Err("Question text cannot be empty".to_string());
    }
    if !draft.points.is_finite() || draft.points <= 0.0 {
        return Err("Points must be greater than zero".to_string());
    }
    if let Some(position) = draft.position
        && position < 1
    {
        return Err("Position must be 1 or greater".to_string());
    }
    validate_options(draft.question_type, &draft.options)
}

fn normalize_options(options: Vec<QuestionOptionInput>) -> Vec<QuestionOptionInput> {
    options
        .into_iter()
        .map(|o| QuestionOptionInput {
            text: o.text.trim().to_string(),
            is_correct: o.is_correct,
        })
        .collect()
}

/// 新建请求转为待写入的题目
pub fn build_draft(request: CreateQuestionRequest) -> Result<QuestionDraft, String> {
    let draft = QuestionDraft {
        text: request.text.trim().to_string(),
        question_type: request.question_type,
        language: normalize_optional_text(request.language),
        points: request.points.unwrap_or(DEFAULT_POINTS),
        position: request.position,
        explanation: normalize_optional_text(request.explanation),
        options: normalize_options(request.options),
    };
    validate_draft(&draft)?;
    Ok(draft)
}

/// 把更新请求合并到已有题目上，未提供的字段沿用原值
pub fn merge_update(
    existing: &Question,
    update: UpdateQuestionRequest,
) -> Result<QuestionDraft, String> {
    let options = match update.options {
        Some(options) => normalize_options(options),
        None => existing
            .options
            .iter()
            .map(|o| QuestionOptionInput {
                text: o.text.clone(),
                is_correct: o.is_correct,
            })
            .collect(),
    };

    let draft = QuestionDraft {
        text: update
            .text
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| existing.text.clone()),
        question_type: update.question_type.unwrap_or(existing.question_type),
        language: match update.language {
            Some(language) => normalize_optional_text(language),
            None => existing.language.clone(),
        },
        points: update.points.unwrap_or(existing.points),
        position: update.position,
        explanation: match update.explanation {
            Some(explanation) => normalize_optional_text(explanation),
            None => existing.explanation.clone(),
        },
        options,
    };
    validate_draft(&draft)?;
    Ok(draft)
}

/// 修改是否会使已保存的作答失效：题型变化，或选项数量变化导致选项 ID 增删
pub fn invalidates_answers(existing: &Question, draft: &QuestionDraft) -> bool {
    existing.question_type != draft.question_type || existing.options.len() != draft.options.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(text: &str, is_correct: bool) -> QuestionOptionInput {
        QuestionOptionInput {
            text: text.to_string(),
            is_correct,
        }
    }

    fn request(question_type: QuestionType, options: Vec<QuestionOptionInput>) -> CreateQuestionRequest {
        CreateQuestionRequest {
            text: "  Which one?  ".into(),
            question_type,
            language: None,
            points: None,
            position: None,
            explanation: Some("   ".into()),
            options,
        }
    }

    #[test]
    fn test_single_choice_rules() {
        assert!(validate_options(QuestionType::SingleChoice, &[opt("a", true)]).is_err());
        assert!(
            validate_options(QuestionType::SingleChoice, &[opt("a", true), opt("b", true)])
                .is_err()
        );
        assert!(
            validate_options(QuestionType::SingleChoice, &[opt("a", false), opt("b", false)])
                .is_err()
        );
        assert!(
            validate_options(
                QuestionType::SingleChoice,
                &[opt("a", false), opt("b", true), opt("c", false)]
            )
            .is_ok()
        );
    }

    #[test]
    fn test_true_false_rules() {
        assert!(
            validate_options(
                QuestionType::TrueFalse,
                &[opt("True", true), opt("False", false), opt("Maybe", false)]
            )
            .is_err()
        );
        assert!(
            validate_options(QuestionType::TrueFalse, &[opt("True", true), opt("False", false)])
                .is_ok()
        );
    }

    #[test]
    fn test_multiple_choice_rules() {
        assert!(
            validate_options(QuestionType::MultipleChoice, &[opt("a", false), opt("b", false)])
                .is_err()
        );
        assert!(
            validate_options(QuestionType::MultipleChoice, &[opt("a", true), opt("b", true)])
                .is_ok()
        );
        assert!(
            validate_options(QuestionType::MultipleChoice, &[opt(" ", true), opt("b", true)])
                .is_err()
        );
    }

    #[test]
    fn test_open_questions_have_no_options() {
        assert!(validate_options(QuestionType::Open, &[]).is_ok());
        assert!(validate_options(QuestionType::Code, &[opt("a", true)]).is_err());
    }

    #[test]
    fn test_build_draft_defaults() {
        let draft = build_draft(request(QuestionType::Open, vec![])).unwrap();
        assert_eq!(draft.text, "Which one?");
        assert_eq!(draft.points, DEFAULT_POINTS);
        assert_eq!(draft.explanation, None);

        let mut bad = request(QuestionType::Open, vec![]);
        bad.points = Some(0.0);
        assert!(build_draft(bad).is_err());

        let mut blank = request(QuestionType::Open, vec![]);
        blank.text = "   ".into();
        assert!(build_draft(blank).is_err());
    }

    #[test]
    fn test_merge_update_keeps_existing_fields() {
        let now = chrono::Utc::now();
        let existing = Question {
            id: 1,
            evaluation_id: 1,
            text: "Old".into(),
            question_type: QuestionType::Code,
            language: Some("rust".into()),
            points: 4.0,
            position: 2,
            explanation: Some("why".into()),
            options: vec![],
            created_at: now,
            updated_at: now,
        };

        let draft = merge_update(
            &existing,
            UpdateQuestionRequest {
                text: Some("New".into()),
                explanation: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(draft.text, "New");
        assert_eq!(draft.language.as_deref(), Some("rust"));
        assert_eq!(draft.points, 4.0);
        assert_eq!(draft.explanation, None);
        assert_eq!(draft.position, None);

        // 改为选择题但未提供选项
        let err = merge_update(
            &existing,
            UpdateQuestionRequest {
                question_type: Some(QuestionType::SingleChoice),
                ..Default::default()
            },
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_invalidates_answers() {
        let now = chrono::Utc::now();
        let existing = Question {
            id: 7,
            evaluation_id: 1,
            text: "Pick".into(),
            question_type: QuestionType::SingleChoice,
            language: None,
            points: 1.0,
            position: 1,
            explanation: None,
            options: (0..3)
                .map(|i| crate::models::questions::entities::QuestionOption {
                    id: 70 + i,
                    question_id: 7,
                    text: format!("o{i}"),
                    is_correct: i == 1,
                    position: i as i32 + 1,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        };

        let reworded = merge_update(
            &existing,
            UpdateQuestionRequest {
                text: Some("Pick one".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!invalidates_answers(&existing, &reworded));

        let fewer = merge_update(
            &existing,
            UpdateQuestionRequest {
                options: Some(vec![opt("a", true), opt("b", false)]),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(invalidates_answers(&existing, &fewer));

        let retyped = merge_update(
            &existing,
            UpdateQuestionRequest {
                question_type: Some(QuestionType::MultipleChoice),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(invalidates_answers(&existing, &retyped));
    }
}
