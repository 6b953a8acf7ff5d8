//! 路径参数提取器
//!
//! 在进入处理程序之前校验路径中的 ID，非数字或非正数直接返回 400。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError, http::StatusCode,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_i64(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}

fn invalid_path_error(name: &str) -> actix_web::Error {
    let response = HttpResponse::build(StatusCode::BAD_REQUEST).json(
        ApiResponse::<()>::error_empty(ErrorCode::BadRequest, format!("Invalid path parameter: {name}")),
    );
    InternalError::from_response(format!("invalid path parameter {name}"), response).into()
}

macro_rules! define_safe_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                ready(
                    parse_positive_i64(req.match_info().get($param))
                        .map($name)
                        .ok_or_else(|| invalid_path_error($param)),
                )
            }
        }
    };
}

define_safe_id_extractor!(SafeIDI64, "id");
define_safe_id_extractor!(SafeUserIdI64, "user_id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_i64() {
        assert_eq!(parse_positive_i64(Some("42")), Some(42));
        assert_eq!(parse_positive_i64(Some("0")), None);
        assert_eq!(parse_positive_i64(Some("-3")), None);
        assert_eq!(parse_positive_i64(Some("abc")), None);
        assert_eq!(parse_positive_i64(None), None);
    }

    #[actix_web::test]
    async fn test_extractor_from_path() {
        let req = actix_web::test::TestRequest::default()
            .param("id", "7")
            .to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 7);

        let bad = actix_web::test::TestRequest::default()
            .param("id", "x1")
            .to_http_request();
        assert!(SafeIDI64::extract(&bad).await.is_err());
    }
}
