use super::SeaOrmStorage;
use crate::models::{
    areas::requests::{AreaListQuery, CreateAreaRequest},
    attempts::{
        entities::AttemptStatus,
        requests::{AttemptListQuery, NewAttempt, UpdateAttemptRequest},
    },
    evaluations::requests::EvaluationListQuery,
    questions::{
        entities::QuestionType,
        requests::{QuestionDraft, QuestionOptionInput},
    },
    submissions::{
        entities::SubmissionStatus,
        requests::{AnswerGrade, AnswerUpsert},
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::connect("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory database")
}

async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole, area_id: Option<i64>) -> User {
    storage
        .create_user_impl(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hash".to_string(),
            role,
            display_name: None,
            area_id,
            evaluation_limit: None,
        })
        .await
        .unwrap()
}

fn choice_draft(text: &str, correct: usize) -> QuestionDraft {
    QuestionDraft {
        text: text.to_string(),
        question_type: QuestionType::SingleChoice,
        language: None,
        points: 2.0,
        position: None,
        explanation: None,
        options: (0..3)
            .map(|i| QuestionOptionInput {
                text: format!("option {i}"),
                is_correct: i == correct,
            })
            .collect(),
    }
}

fn open_draft(text: &str) -> QuestionDraft {
    QuestionDraft {
        text: text.to_string(),
        question_type: QuestionType::Open,
        language: Some("en".to_string()),
        points: 3.0,
        position: None,
        explanation: None,
        options: Vec::new(),
    }
}

fn window(offset_start: i64, offset_end: i64) -> (i64, i64) {
    let now = chrono::Utc::now().timestamp();
    (now + offset_start, now + offset_end)
}

#[tokio::test]
async fn test_user_crud_and_filters() {
    let storage = storage().await;
    let area = storage
        .create_area_impl(CreateAreaRequest {
            name: "Mathematics".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let teacher = user(&storage, "teacher1", UserRole::Teacher, Some(area.id)).await;
    user(&storage, "student1", UserRole::Student, None).await;

    let found = storage
        .get_user_by_username_or_email_impl("teacher1@example.com")
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(teacher.id));

    let teachers = storage
        .list_users_with_pagination_impl(UserListQuery {
            role: Some(UserRole::Teacher),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(teachers.pagination.total, 1);

    assert_eq!(storage.count_users_in_area_impl(area.id).await.unwrap(), 1);
    assert_eq!(storage.list_area_teachers_impl(area.id).await.unwrap().len(), 1);

    let updated = storage
        .update_user_impl(
            teacher.id,
            UpdateUserRequest {
                area_id: Some(None),
                evaluation_limit: Some(Some(3)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.area_id, None);
    assert_eq!(updated.evaluation_limit, Some(3));
    assert_eq!(storage.count_users_in_area_impl(area.id).await.unwrap(), 0);

    assert!(storage.update_last_login_impl(teacher.id).await.unwrap());
    assert!(storage.delete_user_impl(teacher.id).await.unwrap());
    assert_eq!(storage.count_users_impl().await.unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_username_is_unique_violation() {
    let storage = storage().await;
    user(&storage, "alice_01", UserRole::Student, None).await;

    let err = storage
        .create_user_impl(CreateUserRequest {
            username: "alice_01".to_string(),
            email: "other@example.com".to_string(),
            password: "hash".to_string(),
            role: UserRole::Student,
            display_name: None,
            area_id: None,
            evaluation_limit: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());
}

#[tokio::test]
async fn test_area_in_use_is_restricted() {
    let storage = storage().await;
    let area = storage
        .create_area_impl(CreateAreaRequest {
            name: "Physics".to_string(),
            description: Some("Lab".to_string()),
        })
        .await
        .unwrap();
    user(&storage, "teacher2", UserRole::Teacher, Some(area.id)).await;

    let err = storage.delete_area_impl(area.id).await.unwrap_err();
    assert!(err.is_foreign_key_violation());

    let list = storage
        .list_areas_with_pagination_impl(AreaListQuery {
            search: Some("phys".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.items.len(), 1);
}

#[tokio::test]
async fn test_questions_positions_and_replace() {
    let storage = storage().await;
    let teacher = user(&storage, "teacher3", UserRole::Teacher, None).await;
    let evaluation = storage
        .create_evaluation_impl("Algebra".to_string(), None, teacher.id)
        .await
        .unwrap();

    let created = storage
        .create_questions_impl(
            evaluation.id,
            vec![choice_draft("First", 0), open_draft("Second")],
        )
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].position, 1);
    assert_eq!(created[1].position, 2);
    assert_eq!(created[0].options.len(), 3);
    assert_eq!(created[0].options[0].position, 1);

    let more = storage
        .create_questions_impl(evaluation.id, vec![open_draft("Third")])
        .await
        .unwrap();
    assert_eq!(more[0].position, 3);

    let replaced = storage
        .replace_question_impl(created[0].id, choice_draft("First (edited)", 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.text, "First (edited)");
    assert_eq!(replaced.position, 1);
    assert_eq!(replaced.correct_option_ids().len(), 1);
    assert_eq!(replaced.options.len(), 3);

    let detail = storage
        .get_evaluation_detail_impl(evaluation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.evaluation.question_count, 3);
    assert_eq!(detail.max_score(), 8.0);

    let list = storage
        .list_evaluations_with_pagination_impl(EvaluationListQuery {
            author_id: Some(teacher.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.items[0].question_count, 3);

    assert!(storage.delete_evaluation_impl(evaluation.id).await.unwrap());
    assert!(storage.get_question_by_id_impl(created[1].id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_attempt_codes_and_status_filter() {
    let storage = storage().await;
    let teacher = user(&storage, "teacher4", UserRole::Teacher, None).await;
    let other = user(&storage, "teacher5", UserRole::Teacher, None).await;
    let evaluation = storage
        .create_evaluation_impl("Geometry".to_string(), None, teacher.id)
        .await
        .unwrap();
    let foreign = storage
        .create_evaluation_impl("Chemistry".to_string(), None, other.id)
        .await
        .unwrap();

    let (start, end) = window(-60, 3600);
    let active = storage
        .create_attempt_impl(NewAttempt {
            evaluation_id: evaluation.id,
            created_by: teacher.id,
            title: None,
            start_time: start,
            end_time: end,
            code_length: 6,
        })
        .await
        .unwrap();
    assert_eq!(active.code.len(), 6);
    assert_eq!(active.status, AttemptStatus::Active);

    let (start, end) = window(3600, 7200);
    storage
        .create_attempt_impl(NewAttempt {
            evaluation_id: foreign.id,
            created_by: other.id,
            title: Some("Later".to_string()),
            start_time: start,
            end_time: end,
            code_length: 8,
        })
        .await
        .unwrap();

    let by_code = storage
        .get_attempt_by_code_impl(&active.code.to_lowercase())
        .await
        .unwrap();
    assert_eq!(by_code.map(|a| a.id), Some(active.id));

    let active_list = storage
        .list_attempts_with_pagination_impl(AttemptListQuery {
            status: Some(AttemptStatus::Active),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(active_list.pagination.total, 1);

    let own = storage
        .list_attempts_with_pagination_impl(AttemptListQuery {
            author_id: Some(other.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(own.items.len(), 1);
    assert_eq!(own.items[0].evaluation_id, foreign.id);

    let closed = storage
        .update_attempt_impl(
            active.id,
            UpdateAttemptRequest {
                closed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(closed.status, AttemptStatus::Finished);
    assert_eq!(storage.count_attempts_by_evaluation_impl(evaluation.id).await.unwrap(), 1);

    // 有场次时测评不可删除
    assert!(storage.delete_evaluation_impl(evaluation.id).await.is_err());
}

#[tokio::test]
async fn test_submission_flow_and_manual_grading() {
    let storage = storage().await;
    let teacher = user(&storage, "teacher6", UserRole::Teacher, None).await;
    let student = user(&storage, "student6", UserRole::Student, None).await;
    let evaluation = storage
        .create_evaluation_impl("Biology".to_string(), None, teacher.id)
        .await
        .unwrap();
    let questions = storage
        .create_questions_impl(
            evaluation.id,
            vec![choice_draft("Cells", 1), open_draft("Explain")],
        )
        .await
        .unwrap();
    let (start, end) = window(-60, 3600);
    let attempt = storage
        .create_attempt_impl(NewAttempt {
            evaluation_id: evaluation.id,
            created_by: teacher.id,
            title: None,
            start_time: start,
            end_time: end,
            code_length: 6,
        })
        .await
        .unwrap();

    let (submission, created) = storage
        .create_submission_impl(attempt.id, student.id, 5.0)
        .await
        .unwrap();
    assert!(created);
    let (again, created_again) = storage
        .create_submission_impl(attempt.id, student.id, 5.0)
        .await
        .unwrap();
    assert_eq!(submission.id, again.id);
    assert!(!created_again);

    let choice = &questions[0];
    let correct = choice.correct_option_ids();
    storage
        .upsert_answer_impl(AnswerUpsert {
            submission_id: submission.id,
            question_id: choice.id,
            answer_text: None,
            selected_options: vec![choice.options[0].id],
        })
        .await
        .unwrap();
    let overwritten = storage
        .upsert_answer_impl(AnswerUpsert {
            submission_id: submission.id,
            question_id: choice.id,
            answer_text: None,
            selected_options: correct.clone(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(overwritten.selected_options, correct);

    let open = storage
        .upsert_answer_impl(AnswerUpsert {
            submission_id: submission.id,
            question_id: questions[1].id,
            answer_text: Some("Mitochondria".to_string()),
            selected_options: Vec::new(),
        })
        .await
        .unwrap()
        .unwrap();

    let summaries = storage.list_submission_summaries_impl(attempt.id).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].answered_count, 2);
    assert_eq!(summaries[0].student_username, "student6");

    let finalized = storage
        .finalize_submission_impl(
            submission.id,
            vec![
                AnswerGrade {
                    question_id: choice.id,
                    is_correct: Some(true),
                    score: Some(2.0),
                },
                AnswerGrade {
                    question_id: questions[1].id,
                    is_correct: None,
                    score: None,
                },
            ],
            5.0,
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finalized.status, SubmissionStatus::Submitted);
    assert_eq!(finalized.score, Some(2.0));
    assert!(finalized.submitted_at.is_some());

    let (answer, graded) = storage
        .grade_answer_impl(open.id, 2.5, Some(true))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(answer.score, Some(2.5));
    assert_eq!(graded.score, Some(4.5));

    assert_eq!(storage.count_answers_by_question_impl(choice.id).await.unwrap(), 1);
    assert_eq!(
        storage.list_evaluation_answers_impl(evaluation.id).await.unwrap().len(),
        2
    );

    let overview = storage.overview_report_impl(Some(teacher.id)).await.unwrap();
    assert_eq!(overview.totals.evaluations, 1);
    assert_eq!(overview.totals.questions, 2);
    assert_eq!(overview.totals.submissions, 1);
    assert_eq!(overview.average_percentage, Some(90.0));
    assert_eq!(overview.evaluations_by_area[0].key, "unassigned");
}

async fn active_attempt(storage: &SeaOrmStorage, title: &str, teacher_id: i64, drafts: Vec<QuestionDraft>) -> (i64, Vec<crate::models::questions::entities::Question>) {
    let evaluation = storage
        .create_evaluation_impl(title.to_string(), None, teacher_id)
        .await
        .unwrap();
    let questions = storage
        .create_questions_impl(evaluation.id, drafts)
        .await
        .unwrap();
    let (start, end) = window(-60, 3600);
    let attempt = storage
        .create_attempt_impl(NewAttempt {
            evaluation_id: evaluation.id,
            created_by: teacher_id,
            title: None,
            start_time: start,
            end_time: end,
            code_length: 6,
        })
        .await
        .unwrap();
    (attempt.id, questions)
}

#[tokio::test]
async fn test_rewording_question_keeps_option_ids_for_grading() {
    let storage = storage().await;
    let teacher = user(&storage, "teacher7", UserRole::Teacher, None).await;
    let student = user(&storage, "student7", UserRole::Student, None).await;
    let (attempt_id, questions) =
        active_attempt(&storage, "History", teacher.id, vec![choice_draft("Year", 1)]).await;
    let question = &questions[0];
    let before: Vec<i64> = question.options.iter().map(|o| o.id).collect();

    let (submission, _) = storage
        .create_submission_impl(attempt_id, student.id, 2.0)
        .await
        .unwrap();
    storage
        .upsert_answer_impl(AnswerUpsert {
            submission_id: submission.id,
            question_id: question.id,
            answer_text: None,
            selected_options: question.correct_option_ids(),
        })
        .await
        .unwrap()
        .unwrap();

    let edited = storage
        .replace_question_impl(question.id, choice_draft("Which year?", 1))
        .await
        .unwrap()
        .unwrap();
    let after: Vec<i64> = edited.options.iter().map(|o| o.id).collect();
    assert_eq!(before, after);
    assert_eq!(edited.text, "Which year?");

    let answers = storage.list_answers_impl(submission.id).await.unwrap();
    let grade = crate::services::exams::grading::grade_question(&edited, answers.first());
    assert_eq!(grade.is_correct, Some(true));

    // 移动正确项时 ID 不变，只改标记
    let moved = storage
        .replace_question_impl(question.id, choice_draft("Which year?", 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.options.iter().map(|o| o.id).collect::<Vec<_>>(), before);
    assert_eq!(moved.correct_option_ids(), vec![before[2]]);

    // 选项减少时删除末尾，增加时追加
    let mut shorter = choice_draft("Which year?", 0);
    shorter.options.truncate(2);
    let shrunk = storage
        .replace_question_impl(question.id, shorter)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shrunk.options.iter().map(|o| o.id).collect::<Vec<_>>(), before[..2].to_vec());

    let grown = storage
        .replace_question_impl(question.id, choice_draft("Which year?", 0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(grown.options.len(), 3);
    assert_eq!(grown.options[..2].iter().map(|o| o.id).collect::<Vec<_>>(), before[..2].to_vec());
    assert_eq!(grown.options[2].position, 3);
}

#[tokio::test]
async fn test_writes_after_submission_are_rejected() {
    let storage = storage().await;
    let teacher = user(&storage, "teacher8", UserRole::Teacher, None).await;
    let student = user(&storage, "student8", UserRole::Student, None).await;
    let (attempt_id, questions) =
        active_attempt(&storage, "Music", teacher.id, vec![choice_draft("Notes", 0)]).await;
    let question = &questions[0];

    let (submission, _) = storage
        .create_submission_impl(attempt_id, student.id, 2.0)
        .await
        .unwrap();
    storage
        .upsert_answer_impl(AnswerUpsert {
            submission_id: submission.id,
            question_id: question.id,
            answer_text: None,
            selected_options: question.correct_option_ids(),
        })
        .await
        .unwrap()
        .unwrap();

    let grades = vec![AnswerGrade {
        question_id: question.id,
        is_correct: Some(true),
        score: Some(2.0),
    }];
    let finalized = storage
        .finalize_submission_impl(submission.id, grades.clone(), 2.0)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finalized.score, Some(2.0));

    let late = storage
        .upsert_answer_impl(AnswerUpsert {
            submission_id: submission.id,
            question_id: question.id,
            answer_text: None,
            selected_options: vec![question.options[1].id],
        })
        .await
        .unwrap();
    assert!(late.is_none());

    let answers = storage.list_answers_impl(submission.id).await.unwrap();
    assert_eq!(answers[0].score, Some(2.0));
    assert_eq!(answers[0].is_correct, Some(true));
    assert_eq!(answers[0].selected_options, question.correct_option_ids());

    let second = storage
        .finalize_submission_impl(submission.id, grades, 2.0)
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn test_overview_scopes_to_teacher_evaluations() {
    let storage = storage().await;
    let area = storage
        .create_area_impl(CreateAreaRequest {
            name: "Languages".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let teacher = user(&storage, "teacher9", UserRole::Teacher, Some(area.id)).await;
    let other = user(&storage, "teacher10", UserRole::Teacher, None).await;
    let mine = user(&storage, "student9", UserRole::Student, None).await;
    let theirs = user(&storage, "student10", UserRole::Student, None).await;
    user(&storage, "student11", UserRole::Student, None).await;

    let (own_attempt, _) = active_attempt(
        &storage,
        "French",
        teacher.id,
        vec![choice_draft("Bonjour", 0), choice_draft("Merci", 1), open_draft("Essay")],
    )
    .await;
    let (other_attempt, _) =
        active_attempt(&storage, "German", other.id, vec![choice_draft("Hallo", 0)]).await;

    storage
        .create_submission_impl(own_attempt, mine.id, 7.0)
        .await
        .unwrap();
    storage
        .create_submission_impl(other_attempt, mine.id, 2.0)
        .await
        .unwrap();
    storage
        .create_submission_impl(other_attempt, theirs.id, 2.0)
        .await
        .unwrap();

    let scoped = storage.overview_report_impl(Some(teacher.id)).await.unwrap();
    assert_eq!(scoped.totals.students, 1);
    assert_eq!(scoped.totals.teachers, 1);
    assert_eq!(scoped.totals.areas, 1);
    assert_eq!(scoped.totals.evaluations, 1);
    assert_eq!(scoped.totals.questions, 3);
    assert_eq!(scoped.totals.attempts, 1);
    assert_eq!(scoped.totals.submissions, 1);
    assert_eq!(scoped.average_percentage, None);
    assert_eq!(scoped.evaluations_by_area[0].key, "Languages");
    assert_eq!(scoped.questions_by_type[0].key, "single_choice");
    assert_eq!(scoped.questions_by_type[0].count, 2);

    let global = storage.overview_report_impl(None).await.unwrap();
    assert_eq!(global.totals.students, 3);
    assert_eq!(global.totals.teachers, 2);
    assert_eq!(global.totals.evaluations, 2);
    assert_eq!(global.totals.questions, 4);
    assert_eq!(global.totals.submissions, 3);
    let by_area: Vec<(&str, i64)> = global
        .evaluations_by_area
        .iter()
        .map(|g| (g.key.as_str(), g.count))
        .collect();
    assert_eq!(by_area, vec![("Languages", 1), ("unassigned", 1)]);
}
