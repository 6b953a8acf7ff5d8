//! 服务层共用的身份与权限辅助函数
//!
//! 这些函数返回 `Result<T, HttpResponse>`，错误分支已是可直接返回的响应，
//! 处理函数里配合 `try_response!` 使用。

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::errors::EvalAdminError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, attempts::entities::Attempt, evaluations::entities::Evaluation,
    users::entities::User,
};
use crate::storage::Storage;

/// 从请求中取出当前登录用户
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 500 响应
pub(crate) fn internal_error(context: &str, e: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{context}: {e}");
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {e}"),
    ))
}

/// 外部服务类错误映射为 HTTP 响应
pub(crate) fn external_error(err: &EvalAdminError, upstream_code: ErrorCode) -> HttpResponse {
    match err {
        EvalAdminError::ExternalServiceConfig(msg) => HttpResponse::ServiceUnavailable().json(
            ApiResponse::error_empty(ErrorCode::GeneratorNotConfigured, msg.clone()),
        ),
        EvalAdminError::ExternalService(msg) => {
            HttpResponse::BadGateway().json(ApiResponse::error_empty(upstream_code, msg.clone()))
        }
        EvalAdminError::ResponseParse(msg) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::error_empty(ErrorCode::GeneratorParseError, msg.clone()),
        ),
        EvalAdminError::NotFound(msg) => HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RepositoryNotFound,
            msg.clone(),
        )),
        EvalAdminError::Validation(msg) => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::BadRequest, msg.clone()),
        ),
        other => internal_error("Request failed", other),
    }
}

/// 教师只能操作自己创建的测评，管理员不受限制
pub(crate) fn can_manage(user: &User, evaluation: &Evaluation) -> bool {
    user.is_admin() || evaluation.author_id == user.id
}

/// 加载测评并校验当前用户是否有权管理
pub(crate) async fn load_evaluation(
    storage: &Arc<dyn Storage>,
    user: &User,
    evaluation_id: i64,
) -> Result<Evaluation, HttpResponse> {
    let evaluation = match storage.get_evaluation_by_id(evaluation_id).await {
        Ok(Some(evaluation)) => evaluation,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationNotFound,
                "Evaluation not found",
            )));
        }
        Err(e) => return Err(internal_error("Failed to get evaluation", e)),
    };

    if !can_manage(user, &evaluation) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EvaluationPermissionDenied,
            "You do not have permission to manage this evaluation",
        )));
    }

    Ok(evaluation)
}

/// 加载场次及其测评，并校验管理权限
pub(crate) async fn load_attempt(
    storage: &Arc<dyn Storage>,
    user: &User,
    attempt_id: i64,
) -> Result<(Attempt, Evaluation), HttpResponse> {
    let attempt = match storage.get_attempt_by_id(attempt_id).await {
        Ok(Some(attempt)) => attempt,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AttemptNotFound,
                "Attempt not found",
            )));
        }
        Err(e) => return Err(internal_error("Failed to get attempt", e)),
    };

    let evaluation = load_evaluation(storage, user, attempt.evaluation_id).await?;
    Ok((attempt, evaluation))
}

/// 文件下载响应
pub(crate) fn attachment(content_type: &str, filename: &str, body: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body.into())
}

/// 下载文件名中只保留安全字符
pub(crate) fn safe_filename(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let trimmed: Vec<&str> = cleaned.split('-').filter(|s| !s.is_empty()).collect();
    if trimmed.is_empty() {
        "export".to_string()
    } else {
        trimmed.join("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("Rust Basics: Ownership!"), "rust-basics-ownership");
        assert_eq!(safe_filename("数据库"), "export");
        assert_eq!(safe_filename("owner/repo"), "owner-repo");
    }

    #[test]
    fn test_external_error_status() {
        let resp = external_error(
            &EvalAdminError::external_service_config("missing key"),
            ErrorCode::GeneratorUpstreamError,
        );
        assert_eq!(resp.status(), actix_web::http::StatusCode::SERVICE_UNAVAILABLE);

        let resp = external_error(
            &EvalAdminError::external_service("500"),
            ErrorCode::GeneratorUpstreamError,
        );
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_GATEWAY);

        let resp = external_error(
            &EvalAdminError::response_parse("no blocks"),
            ErrorCode::GeneratorUpstreamError,
        );
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
