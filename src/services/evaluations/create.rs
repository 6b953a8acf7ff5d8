use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EvaluationService;
use crate::models::{
    ApiResponse, ErrorCode,
    evaluations::{requests::CreateEvaluationRequest, responses::EvaluationResponse},
    users::entities::{User, UserStatus},
};
use crate::services::access::{current_user, internal_error};
use crate::utils::validate::{normalize_optional_text, validate_title};

/// 测评数量是否已达上限
pub(crate) fn limit_reached(author: &User, current: u64) -> bool {
    match author.evaluation_limit {
        Some(limit) => current >= limit.max(0) as u64,
        None => false,
    }
}

pub async fn create_evaluation(
    service: &EvaluationService,
    body: CreateEvaluationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = try_response!(current_user(request));

    let title = match validate_title(&body.title) {
        Ok(title) => title,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::EvaluationTitleInvalid, msg)));
        }
    };
    let description = normalize_optional_text(body.description);

    let storage = service.get_storage(request);

    // 管理员可以代教师创建，教师只能以自己为作者
    let author = match body.author_id {
        Some(author_id) if user.is_admin() && author_id != user.id => {
            match storage.get_user_by_id(author_id).await {
                Ok(Some(author)) if author.is_teacher() && author.status == UserStatus::Active => {
                    author
                }
                Ok(_) => {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::EvaluationAuthorInvalid,
                        "Author must be an active teacher",
                    )));
                }
                Err(e) => return Ok(internal_error("Failed to get author", e)),
            }
        }
        _ => user,
    };

    if author.evaluation_limit.is_some() {
        let current = match storage.count_evaluations_by_author(author.id).await {
            Ok(count) => count,
            Err(e) => return Ok(internal_error("Failed to count evaluations", e)),
        };
        if limit_reached(&author, current) {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::EvaluationLimitReached,
                format!(
                    "Evaluation limit reached ({current}/{})",
                    author.evaluation_limit.unwrap_or_default()
                ),
            )));
        }
    }

    match storage.create_evaluation(title, description, author.id).await {
        Ok(evaluation) => {
            info!(
                "Evaluation {} created for author {}",
                evaluation.id, evaluation.author_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                EvaluationResponse { evaluation },
                "Evaluation created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Evaluation creation failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn teacher(limit: Option<i32>) -> User {
        let now = chrono::Utc::now();
        User {
            id: 3,
            username: "teacher".into(),
            email: "teacher@school.edu".into(),
            password_hash: String::new(),
            role: UserRole::Teacher,
            status: UserStatus::Active,
            display_name: None,
            area_id: None,
            evaluation_limit: limit,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_limit_reached() {
        assert!(!limit_reached(&teacher(None), 1000));
        assert!(!limit_reached(&teacher(Some(3)), 2));
        assert!(limit_reached(&teacher(Some(3)), 3));
        assert!(limit_reached(&teacher(Some(0)), 0));
    }
}
