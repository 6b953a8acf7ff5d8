pub mod analyzer;
pub mod areas;
pub mod attempts;
pub mod auth;
pub mod common;
pub mod evaluations;
pub mod generators;
pub mod live;
pub mod questions;
pub mod reports;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, ExportFormat, ExportQuery, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 写入 `ApiResponse.code`，前端据此展示具体错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    RateLimitExceeded = 1029,

    // 认证
    AuthFailed = 2000,
    UserNotActive = 2001,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserCreationFailed = 3005,
    UserUpdateFailed = 3006,
    UserDeleteFailed = 3007,
    CanNotDeleteCurrentUser = 3008,
    UserHasEvaluations = 3009,
    UserEvaluationLimitInvalid = 3010,

    // 领域
    AreaNotFound = 4000,
    AreaAlreadyExists = 4001,
    AreaInUse = 4002,
    AreaNameInvalid = 4003,

    // 测评与题目
    EvaluationNotFound = 5000,
    EvaluationLimitReached = 5001,
    EvaluationHasAttempts = 5002,
    EvaluationPermissionDenied = 5003,
    EvaluationTitleInvalid = 5004,
    EvaluationAuthorInvalid = 5005,
    QuestionNotFound = 5100,
    QuestionInvalid = 5101,
    QuestionHasAnswers = 5102,

    // 场次
    AttemptNotFound = 6000,
    AttemptWindowInvalid = 6001,
    AttemptCodeGenerationFailed = 6002,
    AttemptNotActive = 6003,
    AttemptHasNoQuestions = 6004,

    // 学生作答
    ExamCodeInvalid = 6100,
    SubmissionNotFound = 6101,
    SubmissionAlreadySubmitted = 6102,
    ExamWindowClosed = 6103,
    StudentBlocked = 6104,
    AnswerInvalid = 6105,
    AnswerNotFound = 6106,

    // 实时监控
    LiveMessageInvalid = 7000,
    LiveBlockNotFound = 7001,

    // 内容生成
    GeneratorNotConfigured = 8000,
    GeneratorUpstreamError = 8001,
    GeneratorParseError = 8002,
    GeneratorRequestInvalid = 8003,

    // 仓库分析
    RepositoryInvalid = 8100,
    RepositoryNotFound = 8101,
    AnalyzerUpstreamError = 8102,

    // 导出
    ExportFailed = 9000,
    ExportFormatUnsupported = 9001,
}
