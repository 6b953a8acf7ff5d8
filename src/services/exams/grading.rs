//! 自动判分与作答规范化
//!
//! 选择类题目按所选集合与正确集合完全一致判分，没有部分得分；
//! 主观题和编程题留待人工评分。

use std::collections::BTreeSet;

use crate::models::{
    questions::entities::{Question, QuestionType},
    submissions::{entities::Answer, requests::AnswerGrade},
};

pub const MAX_ANSWER_CHARS: usize = 20_000;

/// 校验并规范化一次作答，返回 (答案文本, 所选选项)
pub fn normalize_answer(
    question: &Question,
    answer_text: Option<String>,
    selected_options: Vec<i64>,
) -> Result<(Option<String>, Vec<i64>), String> {
    if question.question_type.is_choice() {
        let valid: BTreeSet<i64> = question.options.iter().map(|o| o.id).collect();
        let selected: BTreeSet<i64> = selected_options.into_iter().collect();

        if let Some(unknown) = selected.iter().find(|id| !valid.contains(id)) {
            return Err(format!(
                "Option {unknown} does not belong to question {}",
                question.id
            ));
        }
        if question.question_type != QuestionType::MultipleChoice && selected.len() > 1 {
            return Err("Only one option can be selected for this question".to_string());
        }
        return Ok((None, selected.into_iter().collect()));
    }

    if !selected_options.is_empty() {
        return Err("This question does not accept options".to_string());
    }
    // 代码题保留原始缩进，只把全空白视为未作答
    let text = answer_text.filter(|t| !t.trim().is_empty());
    if text
        .as_ref()
        .is_some_and(|t| t.chars().count() > MAX_ANSWER_CHARS)
    {
        return Err(format!(
            "Answer cannot exceed {MAX_ANSWER_CHARS} characters"
        ));
    }
    Ok((text, Vec::new()))
}

/// 判定单题，未作答的选择题记 0 分
pub fn grade_question(question: &Question, answer: Option<&Answer>) -> AnswerGrade {
    if !question.question_type.is_choice() {
        return AnswerGrade {
            question_id: question.id,
            is_correct: None,
            score: None,
        };
    }

    let correct: BTreeSet<i64> = question.correct_option_ids().into_iter().collect();
    let selected: BTreeSet<i64> = answer
        .map(|a| a.selected_options.iter().copied().collect())
        .unwrap_or_default();
    let is_correct = !selected.is_empty() && selected == correct;

    AnswerGrade {
        question_id: question.id,
        is_correct: Some(is_correct),
        score: Some(if is_correct { question.points } else { 0.0 }),
    }
}

/// 判定整份答卷
pub fn grade_submission(questions: &[Question], answers: &[Answer]) -> Vec<AnswerGrade> {
    questions
        .iter()
        .map(|q| {
            let answer = answers.iter().find(|a| a.question_id == q.id);
            grade_question(q, answer)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::QuestionOption;

    fn question(id: i64, question_type: QuestionType, correct: &[bool], points: f64) -> Question {
        let now = chrono::Utc::now();
        Question {
            id,
            evaluation_id: 1,
            text: format!("Q{id}"),
            question_type,
            language: None,
            points,
            position: id as i32,
            explanation: None,
            options: correct
                .iter()
                .enumerate()
                .map(|(i, c)| QuestionOption {
                    id: id * 10 + i as i64,
                    question_id: id,
                    text: format!("opt{i}"),
                    is_correct: *c,
                    position: i as i32 + 1,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn answer(question_id: i64, selected: Vec<i64>) -> Answer {
        Answer {
            id: question_id,
            submission_id: 1,
            question_id,
            answer_text: None,
            selected_options: selected,
            is_correct: None,
            score: None,
            answered_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_single_choice_grading() {
        let q = question(1, QuestionType::SingleChoice, &[false, true, false], 2.0);
        let right = grade_question(&q, Some(&answer(1, vec![11])));
        assert_eq!(right.is_correct, Some(true));
        assert_eq!(right.score, Some(2.0));

        let wrong = grade_question(&q, Some(&answer(1, vec![10])));
        assert_eq!(wrong.score, Some(0.0));

        let missing = grade_question(&q, None);
        assert_eq!(missing.is_correct, Some(false));
        assert_eq!(missing.score, Some(0.0));
    }

    #[test]
    fn test_multiple_choice_is_all_or_nothing() {
        let q = question(2, QuestionType::MultipleChoice, &[true, true, false], 3.0);
        assert_eq!(grade_question(&q, Some(&answer(2, vec![21, 20]))).score, Some(3.0));
        assert_eq!(grade_question(&q, Some(&answer(2, vec![20]))).score, Some(0.0));
        assert_eq!(
            grade_question(&q, Some(&answer(2, vec![20, 21, 22]))).score,
            Some(0.0)
        );
    }

    #[test]
    fn test_open_questions_stay_ungraded() {
        let q = question(3, QuestionType::Code, &[], 5.0);
        let grade = grade_question(&q, Some(&answer(3, vec![])));
        assert_eq!(grade.is_correct, None);
        assert_eq!(grade.score, None);
    }

    #[test]
    fn test_grade_submission_covers_every_question() {
        let questions = vec![
            question(1, QuestionType::TrueFalse, &[true, false], 1.0),
            question(2, QuestionType::Open, &[], 4.0),
            question(3, QuestionType::SingleChoice, &[false, true], 2.0),
        ];
        let answers = vec![answer(1, vec![10])];
        let grades = grade_submission(&questions, &answers);

        assert_eq!(grades.len(), 3);
        let total: f64 = grades.iter().filter_map(|g| g.score).sum();
        assert_eq!(total, 1.0);
        assert_eq!(grades[1].score, None);
    }

    #[test]
    fn test_normalize_answer() {
        let single = question(1, QuestionType::SingleChoice, &[true, false], 1.0);
        assert_eq!(
            normalize_answer(&single, Some("ignored".into()), vec![11]).unwrap(),
            (None, vec![11])
        );
        assert!(normalize_answer(&single, None, vec![10, 11]).is_err());
        assert!(normalize_answer(&single, None, vec![99]).is_err());

        let multi = question(2, QuestionType::MultipleChoice, &[true, true], 1.0);
        assert_eq!(
            normalize_answer(&multi, None, vec![21, 20, 21]).unwrap().1,
            vec![20, 21]
        );

        let code = question(3, QuestionType::Code, &[], 1.0);
        let (text, _) = normalize_answer(&code, Some("    fn main() {}".into()), vec![]).unwrap();
        assert_eq!(text.as_deref(), Some("    fn main() {}"));
        assert_eq!(normalize_answer(&code, Some("  ".into()), vec![]).unwrap().0, None);
        assert!(normalize_answer(&code, None, vec![1]).is_err());
    }
}
