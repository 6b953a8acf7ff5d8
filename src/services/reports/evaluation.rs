use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::models::{
    ApiResponse,
    questions::entities::Question,
    reports::responses::{DistributionBucket, EvaluationReport, QuestionStat, ScoreStats, round2},
    submissions::entities::{Answer, SubmissionStatus},
};
use crate::services::access::{current_user, internal_error, load_evaluation};

/// 自动判分题目的正确率
pub fn question_stats(questions: &[Question], answers: &[Answer]) -> Vec<QuestionStat> {
    questions
        .iter()
        .filter(|q| q.question_type.is_choice())
        .map(|q| {
            let graded: Vec<&Answer> = answers
                .iter()
                .filter(|a| a.question_id == q.id && a.is_correct.is_some())
                .collect();
            let answered = graded.len() as i64;
            let correct = graded
                .iter()
                .filter(|a| a.is_correct == Some(true))
                .count() as i64;

            QuestionStat {
                question_id: q.id,
                text: q.text.clone(),
                question_type: q.question_type,
                answered,
                correct,
                correct_rate: (answered > 0)
                    .then(|| round2(correct as f64 / answered as f64 * 100.0)),
            }
        })
        .collect()
}

pub async fn evaluation_report(
    service: &ReportService,
    evaluation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));
    let storage = service.get_storage(request);
    let evaluation = try_response!(load_evaluation(&storage, &user, evaluation_id).await);

    let attempts = match storage.count_attempts_by_evaluation(evaluation_id).await {
        Ok(count) => count as i64,
        Err(e) => return Ok(internal_error("Failed to count attempts", e)),
    };
    let submissions = match storage.list_evaluation_submissions(evaluation_id).await {
        Ok(submissions) => submissions,
        Err(e) => return Ok(internal_error("Failed to list submissions", e)),
    };
    let questions = match storage.list_questions(evaluation_id).await {
        Ok(questions) => questions,
        Err(e) => return Ok(internal_error("Failed to list questions", e)),
    };
    let answers = match storage.list_evaluation_answers(evaluation_id).await {
        Ok(answers) => answers,
        Err(e) => return Ok(internal_error("Failed to list answers", e)),
    };

    let percentages: Vec<f64> = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Submitted)
        .filter_map(|s| s.percentage())
        .collect();
    let submitted = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Submitted)
        .count() as i64;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EvaluationReport {
            evaluation,
            attempts,
            submissions: submissions.len() as i64,
            submitted,
            stats: ScoreStats::from_percentages(&percentages),
            distribution: DistributionBucket::histogram(&percentages),
            questions: question_stats(&questions, &answers),
        },
        "Evaluation report generated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::QuestionType;

    fn question(id: i64, question_type: QuestionType) -> Question {
        let now = chrono::Utc::now();
        Question {
            id,
            evaluation_id: 1,
            text: format!("Q{id}"),
            question_type,
            language: None,
            points: 1.0,
            position: id as i32,
            explanation: None,
            options: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn answer(question_id: i64, is_correct: Option<bool>) -> Answer {
        Answer {
            id: 0,
            submission_id: 1,
            question_id,
            answer_text: None,
            selected_options: vec![],
            is_correct,
            score: None,
            answered_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_question_stats() {
        let questions = vec![
            question(1, QuestionType::SingleChoice),
            question(2, QuestionType::Open),
            question(3, QuestionType::TrueFalse),
        ];
        let answers = vec![
            answer(1, Some(true)),
            answer(1, Some(false)),
            answer(1, Some(true)),
            answer(2, Some(true)),
        ];

        let stats = question_stats(&questions, &answers);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].answered, 3);
        assert_eq!(stats[0].correct, 2);
        assert_eq!(stats[0].correct_rate, Some(66.67));
        assert_eq!(stats[1].question_id, 3);
        assert_eq!(stats[1].correct_rate, None);
    }
}
